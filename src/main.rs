mod browser;
mod cleaner;
mod config;
mod error;
mod export;
mod fetch;
mod logging;
mod scraper;
mod utils;

use browser::ChromeDriver;
use cleaner::Cleaner;
use config::{Config, Portal};
use error::{AppError, DriverError, Result};
use fetch::{FetchSettings, Session};
use logging::{init_logging, parse_log_level, LoggerConfig};
use scraper::Scraper;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_file("config.toml")?;

    init_logging(LoggerConfig {
        directory: config.logging.directory.clone(),
        file_name: config.logging.filename.clone(),
        level: parse_log_level(&config.logging.level)?,
        ..Default::default()
    })?;

    log_info!("[main] Starting supporter scraper");

    // Phase 1: drive each portal's page and bank the rendered snapshots.
    // A portal that fails mid-session is logged and skipped; a browser that
    // will not launch ends the run.
    for portal in &config.portals {
        let slug = utils::portal_slug(&portal.name);
        match acquire_portal(&config, portal, &slug).await {
            Ok(pages) => {
                log_info!("[main] {}: captured {} page(s)", portal.name, pages);
            }
            Err(e @ AppError::Driver(DriverError::Launch(_))) => return Err(e),
            Err(e) => {
                log_error!(e => "[main] {}: acquisition failed, skipping portal", portal.name);
            }
        }
    }

    // Phase 2: parse everything captured, normalize, and export.
    let mut raw = Vec::new();
    for portal in &config.portals {
        let slug = utils::portal_slug(&portal.name);
        let snapshots = utils::read_snapshots(&config.output.snapshot_directory, &slug)?;
        log_info!(
            "[main] {}: parsing {} snapshot(s)",
            portal.name,
            snapshots.len()
        );

        for (path, content) in snapshots {
            let scraper = Scraper::new(&content);
            match scraper.content(&config.selectors).extract_supporters() {
                Ok(mut supporters) => raw.append(&mut supporters),
                Err(e) => log_error!(e => "[main] Failed to parse snapshot {:?}", path),
            }
        }
    }

    let supporters = Cleaner::new().clean_data(raw);
    log_info!(
        "[main] {} supporter(s) after cleaning and deduplication",
        supporters.len()
    );

    let output_dir = Path::new(&config.output.directory);
    export::export_to_csv(&supporters, output_dir.join(&config.output.csv_filename))?;
    export::export_to_json(&supporters, output_dir.join(&config.output.json_filename))?;

    log_info!("[main] Done");
    Ok(())
}

/// Run one portal's acquisition session end to end and persist its snapshots.
async fn acquire_portal(config: &Config, portal: &Portal, slug: &str) -> Result<usize> {
    log_info!("[main] Acquiring {} ({})", portal.name, portal.url);

    let driver = ChromeDriver::launch(&config.browser).await?;

    let diagnostics_path = Path::new(&config.output.diagnostics_directory)
        .join(format!("{}-failure.png", slug));
    let settings = FetchSettings::from_config(config, diagnostics_path);

    let snapshots = Session::new(driver, settings)
        .run(&portal.url)
        .await
        .map_err(AppError::Fetch)?;

    let count = snapshots.len();
    for (index, snapshot) in snapshots.iter().enumerate() {
        utils::save_snapshot(
            &config.output.snapshot_directory,
            slug,
            index + 1,
            snapshot,
        )?;
    }

    Ok(count)
}
