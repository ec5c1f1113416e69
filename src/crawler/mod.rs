//! Crawler module for catalog traversal and extraction
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with retry/backoff and redirect-as-failure detection
//! - Catalog listing parsing and pagination
//! - Book detail-page extraction
//! - Overall harvest coordination

mod coordinator;
mod detail;
mod fetcher;
mod listing;
mod retry;

pub use coordinator::{run_harvest, Coordinator};
pub use detail::{parse_book_page, BookRecord};
pub use fetcher::{build_http_client, fetch_page, fetch_response};
pub use listing::{extract_listing, BookListing};
pub use retry::{with_retry, RetryPolicy, RetryableError};
