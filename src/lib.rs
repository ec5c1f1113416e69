//! Shelf-Harvest: a fault-tolerant book catalog harvester
//!
//! This crate crawls a paginated online book catalog, extracts structured
//! metadata for each book, optionally downloads the book texts and cover
//! images, and emits the aggregated dataset as a JSON array.

pub mod config;
pub mod crawler;
pub mod download;
pub mod output;

use thiserror::Error;

/// Main error type for Shelf-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Dataset serialization error: {0}")]
    Dataset(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Failure of a single HTTP request
///
/// Splits request failures into the two kinds the crawl policy cares
/// about: connection-level failures (eligible for retry) and resource
/// failures (redirect or error status; retrying cannot help).
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection-level failure (refused, reset, timed out)
    #[error("Connection failure for {url}: {source}")]
    Transient { url: String, source: reqwest::Error },

    /// The server answered with a redirect. The catalog uses redirects to
    /// signal that a resource does not exist at the requested identifier,
    /// so this is terminal for the request.
    #[error("Redirect (HTTP {status}) for {url}")]
    Redirect { url: String, status: u16 },

    /// Non-success, non-redirect HTTP status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    /// Whether this failure is connection-level and eligible for retry
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Transient { .. })
    }
}

/// Markup extraction errors
///
/// Raised when a structural marker the extraction depends on is missing
/// from fetched markup. Never retried: the content will not change.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Missing {0} in page markup")]
    MissingMarker(&'static str),

    #[error("Malformed heading {heading:?}: expected \"Title :: Author\"")]
    MalformedHeading { heading: String },

    #[error("Invalid link {href:?}: {source}")]
    InvalidLink {
        href: String,
        source: url::ParseError,
    },

    #[error("Invalid selector {0:?}")]
    Selector(&'static str),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Shelf-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, CrawlConfig, RetryConfig, SiteConfig};
pub use crawler::{
    build_http_client, extract_listing, parse_book_page, with_retry, BookListing, BookRecord,
    Coordinator, RetryPolicy,
};
pub use download::{download_asset, sanitize_filename, WriteMode};
