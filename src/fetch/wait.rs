use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Outcome of a single poll attempt.
pub enum PollResult<T> {
    Ready(T),
    Pending,
}

/// Evaluate `poll` repeatedly, sleeping `interval` between attempts, until it
/// yields a value or `timeout` elapses. Timeout exhaustion is reported as
/// `None`, never swallowed into a default value.
///
/// The predicate runs at least once even with a zero timeout, so an already
/// satisfied condition is never missed.
pub async fn wait_until<T, F, Fut>(timeout: Duration, interval: Duration, mut poll: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = PollResult<T>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if let PollResult::Ready(value) = poll().await {
            return Some(value);
        }
        let now = Instant::now();
        if now >= deadline {
            return None;
        }
        sleep(interval.min(deadline - now)).await;
    }
}
