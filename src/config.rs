use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::info;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct Portal {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_directory")]
    pub directory: String,
    #[serde(default = "default_log_filename")]
    pub filename: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    /// CSS selector for the DOM subtree that holds the item list.
    #[serde(default = "default_region_selector")]
    pub region: String,

    /// Exact visible label of the advance control. Matching is exact-string:
    /// a site whose label differs in casing or whitespace is a no-match.
    #[serde(default = "default_advance_label")]
    pub advance_label: String,

    #[serde(default = "default_block_selector")]
    pub supporter_block: String,
    #[serde(default = "default_name_selector")]
    pub name: String,
    #[serde(default = "default_amount_selector")]
    pub amount: String,
    #[serde(default = "default_date_selector")]
    pub date: String,
    #[serde(default = "default_location_selector")]
    pub location: String,
    #[serde(default = "default_message_selector")]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeoutConfig {
    /// Seconds to wait for the observed region to first appear.
    #[serde(default = "default_bootstrap_timeout")]
    pub bootstrap: u64,

    /// Seconds to wait for the initial placeholder to give way to real
    /// content once the region exists.
    #[serde(default = "default_first_content_timeout")]
    pub first_content: u64,

    /// Seconds to wait for region content to change after an advance.
    /// Content refresh after pagination may be slow, so this is the long one.
    #[serde(default = "default_page_change_timeout")]
    pub page_change: u64,

    /// Seconds to wait while searching for the advance control.
    #[serde(default = "default_advance_timeout")]
    pub advance: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_headless")]
    pub headless: bool,
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: String,
    #[serde(default = "default_csv_filename")]
    pub csv_filename: String,
    #[serde(default = "default_json_filename")]
    pub json_filename: String,
    #[serde(default = "default_snapshot_directory")]
    pub snapshot_directory: String,
    #[serde(default = "default_diagnostics_directory")]
    pub diagnostics_directory: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_portals")]
    pub portals: Vec<Portal>,

    /// Hard upper bound on captured snapshots per session. A site whose
    /// pagination never exhausts must not keep a session alive forever.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    #[serde(default)]
    pub selectors: SelectorConfig,

    #[serde(default)]
    pub timeouts: TimeoutConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LogConfig,
}

// Default implementations
impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            region: default_region_selector(),
            advance_label: default_advance_label(),
            supporter_block: default_block_selector(),
            name: default_name_selector(),
            amount: default_amount_selector(),
            date: default_date_selector(),
            location: default_location_selector(),
            message: default_message_selector(),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            bootstrap: default_bootstrap_timeout(),
            first_content: default_first_content_timeout(),
            page_change: default_page_change_timeout(),
            advance: default_advance_timeout(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            csv_filename: default_csv_filename(),
            json_filename: default_json_filename(),
            snapshot_directory: default_snapshot_directory(),
            diagnostics_directory: default_diagnostics_directory(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: default_log_directory(),
            filename: default_log_filename(),
        }
    }
}

impl TimeoutConfig {
    pub fn bootstrap_wait(&self) -> Duration {
        Duration::from_secs(self.bootstrap)
    }

    pub fn first_content_wait(&self) -> Duration {
        Duration::from_secs(self.first_content)
    }

    pub fn page_change_wait(&self) -> Duration {
        Duration::from_secs(self.page_change)
    }

    pub fn advance_wait(&self) -> Duration {
        Duration::from_secs(self.advance)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::FileRead)?;

        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.portals.is_empty() {
            return Err(ConfigError::MissingField("portals".to_string()).into());
        }

        for portal in &self.portals {
            if portal.name.is_empty() {
                return Err(ConfigError::MissingField("portal name".to_string()).into());
            }
            Url::parse(&portal.url).map_err(|e| {
                ConfigError::InvalidValue(format!("portal url '{}': {}", portal.url, e))
            })?;
            if !portal.url.starts_with("http") {
                return Err(ConfigError::InvalidValue(format!(
                    "portal url must start with http(s): {}",
                    portal.url
                ))
                .into());
            }
        }

        if self.max_pages == 0 {
            return Err(ConfigError::InvalidValue(
                "max_pages must be greater than 0".to_string(),
            )
            .into());
        }

        if self.selectors.region.is_empty() {
            return Err(ConfigError::InvalidValue(
                "selectors.region cannot be empty".to_string(),
            )
            .into());
        }

        if self.selectors.advance_label.is_empty() {
            return Err(ConfigError::InvalidValue(
                "selectors.advance_label cannot be empty".to_string(),
            )
            .into());
        }

        if self.timeouts.bootstrap == 0 {
            return Err(ConfigError::InvalidValue(
                "timeouts.bootstrap must be greater than 0".to_string(),
            )
            .into());
        }

        if self.timeouts.first_content == 0 {
            return Err(ConfigError::InvalidValue(
                "timeouts.first_content must be greater than 0".to_string(),
            )
            .into());
        }

        if self.timeouts.page_change == 0 {
            return Err(ConfigError::InvalidValue(
                "timeouts.page_change must be greater than 0".to_string(),
            )
            .into());
        }

        if self.timeouts.advance == 0 {
            return Err(ConfigError::InvalidValue(
                "timeouts.advance must be greater than 0".to_string(),
            )
            .into());
        }

        if self.timeouts.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "timeouts.poll_interval_ms must be greater than 0".to_string(),
            )
            .into());
        }

        if self.output.directory.is_empty() {
            return Err(ConfigError::InvalidValue(
                "output.directory cannot be empty".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

fn default_portals() -> Vec<Portal> {
    vec![Portal {
        name: "TeamWater Donations".to_string(),
        url: "https://teamwater.org/donations".to_string(),
    }]
}

fn default_max_pages() -> usize {
    50
}

fn default_region_selector() -> String {
    "div.min-h-160".to_string()
}

fn default_advance_label() -> String {
    "Next".to_string()
}

fn default_block_selector() -> String {
    "div.white-box".to_string()
}

// The target site styles supporter blocks with utility classes; match on the
// distinguishing ones via substring attribute selectors.
fn default_name_selector() -> String {
    "div[class*='line-clamp-3']".to_string()
}

fn default_amount_selector() -> String {
    "div[class*='text-white']".to_string()
}

fn default_date_selector() -> String {
    "div[class*='text-[10px]']".to_string()
}

fn default_location_selector() -> String {
    "p.name".to_string()
}

fn default_message_selector() -> String {
    "div[class*='wrap-anywhere'][class*='text-xs']".to_string()
}

fn default_bootstrap_timeout() -> u64 {
    10
}

fn default_first_content_timeout() -> u64 {
    30
}

fn default_page_change_timeout() -> u64 {
    30
}

fn default_advance_timeout() -> u64 {
    5
}

fn default_poll_interval_ms() -> u64 {
    250
}

fn default_headless() -> bool {
    true
}

fn default_window_width() -> u32 {
    1400
}

fn default_window_height() -> u32 {
    1000
}

fn default_output_directory() -> String {
    "output".to_string()
}

fn default_csv_filename() -> String {
    "supporters.csv".to_string()
}

fn default_json_filename() -> String {
    "supporters.json".to_string()
}

fn default_snapshot_directory() -> String {
    "snapshots".to_string()
}

fn default_diagnostics_directory() -> String {
    "diagnostics".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> String {
    "logs".to_string()
}

fn default_log_filename() -> String {
    "scraper.log".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.selectors.advance_label, "Next");
        assert_eq!(config.timeouts.bootstrap, 10);
        assert_eq!(config.portals.len(), 1);
    }

    #[test]
    fn rejects_bad_portal_url() {
        let config: Config = toml::from_str(
            r#"
            [[portals]]
            name = "Broken"
            url = "not a url"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let config: Config = toml::from_str(
            r#"
            [timeouts]
            bootstrap = 0
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn overrides_apply() {
        let config: Config = toml::from_str(
            r#"
            max_pages = 3

            [selectors]
            advance_label = "Load more"

            [timeouts]
            page_change = 60
            "#,
        )
        .unwrap();
        config.validate().unwrap();
        assert_eq!(config.max_pages, 3);
        assert_eq!(config.selectors.advance_label, "Load more");
        assert_eq!(config.timeouts.page_change_wait().as_secs(), 60);
    }
}
