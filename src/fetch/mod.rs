mod change;
mod paginate;
mod session;
mod wait;

#[cfg(test)]
pub(crate) mod testutil;

pub use session::{FetchSettings, Session};
