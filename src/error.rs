use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Scraping error: {0}")]
    Scraper(#[from] ScraperError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required configuration: {0}")]
    MissingField(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Failures of the browser-automation resource itself. `Launch` is the one
/// unrecoverable case: without a driver there is no session to salvage.
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Page command failed: {0}")]
    Command(String),

    #[error("Failed to capture screenshot: {0}")]
    Screenshot(String),
}

/// Loop-level failures of an acquisition session. Exhausted pagination is not
/// listed here: "no more pages" is a normal outcome, not an error.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Observed region '{selector}' did not appear within {waited_secs}s")]
    RegionNotFound { selector: String, waited_secs: u64 },

    #[error("Content did not change within {waited_secs}s after advancing")]
    ChangeTimeout { waited_secs: u64 },

    #[error("Driver failure: {0}")]
    Driver(#[from] DriverError),
}

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Selector error: {0}")]
    SelectorError(String),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No rows to export")]
    EmptyDataset,

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write output file: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
