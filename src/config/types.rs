use serde::Deserialize;
use std::path::PathBuf;

/// Top-level configuration for Shelf-Harvest
///
/// Loaded from an optional TOML file; every field has a default, so a
/// missing file or an empty table is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Catalog site settings
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Entry URL of the catalog listing (its first page)
    #[serde(rename = "catalog-url", default = "default_catalog_url")]
    pub catalog_url: String,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            catalog_url: default_catalog_url(),
            user_agent: default_user_agent(),
        }
    }
}

/// Retry behavior for transient connection failures
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per request, including the first
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry (milliseconds)
    #[serde(rename = "initial-delay-ms", default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Factor applied to the delay after each failed attempt
    #[serde(rename = "backoff-multiplier", default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Parameters of a single harvest run
///
/// Assembled by the caller (the CLI binary) and immutable for the run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// First catalog page to fetch (1-based)
    pub start_page: u32,

    /// Page index at which to stop (exclusive)
    pub end_page: u32,

    /// Destination root for `books/`, `images/` and the dataset file
    pub dest_folder: PathBuf,

    /// Skip cover image downloads
    pub skip_images: bool,

    /// Skip book text downloads
    pub skip_text: bool,

    /// Dataset filename, relative to `dest_folder`
    pub output_path: PathBuf,
}

fn default_catalog_url() -> String {
    "https://tululu.org/l55/".to_string()
}

fn default_user_agent() -> String {
    "shelf-harvest/1.0".to_string()
}

fn default_max_attempts() -> u32 {
    10
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}
