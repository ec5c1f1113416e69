//! Configuration module for Shelf-Harvest
//!
//! This module handles loading, parsing, and validating the optional TOML
//! site-configuration file, plus the per-run crawl parameters assembled by
//! the caller.
//!
//! # Example
//!
//! ```no_run
//! use shelf_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Harvesting from: {}", config.site.catalog_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, RetryConfig, SiteConfig};

// Re-export parser and validation functions
pub use parser::{load_config, load_config_or_default};
pub use validation::validate_crawl_config;
