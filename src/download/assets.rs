//! Asset download and persistence
//!
//! This module fetches a single asset (cover image or book text) through
//! the retrying fetcher and writes it under the destination tree. The
//! payload is fully retrieved before any filesystem effect, so a failed
//! or redirected request never leaves a partial file behind.

use crate::crawler::{fetch_response, with_retry, RetryPolicy};
use crate::download::filename::sanitize_filename;
use crate::{FetchError, HarvestError};
use reqwest::Client;
use std::path::{Path, PathBuf};
use url::Url;

/// How an asset's payload is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Raw byte payload (cover images)
    Binary,

    /// Decoded text payload (book bodies)
    Text,
}

/// Downloads one asset into the given folder
///
/// The filename is sanitized before path construction and the folder is
/// created if missing. Fetch failures carry the fetcher's error kinds;
/// filesystem failures propagate unmodified, since a broken destination
/// invalidates all further work.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `policy` - Retry policy for transient failures
/// * `url` - The asset URL
/// * `filename` - Proposed filename, sanitized before use
/// * `folder` - Destination directory, created if missing
/// * `mode` - Whether to persist raw bytes or decoded text
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(HarvestError)` - Fetch failure or filesystem failure
pub async fn download_asset(
    client: &Client,
    policy: &RetryPolicy,
    url: &Url,
    filename: &str,
    folder: &Path,
    mode: WriteMode,
) -> Result<PathBuf, HarvestError> {
    // Retrieve the full payload first; only then touch the filesystem
    let payload: Vec<u8> = with_retry(policy, || async move {
        let response = fetch_response(client, url).await?;
        match mode {
            WriteMode::Binary => response
                .bytes()
                .await
                .map(|bytes| bytes.to_vec())
                .map_err(|source| transient(url, source)),
            WriteMode::Text => response
                .text()
                .await
                .map(String::into_bytes)
                .map_err(|source| transient(url, source)),
        }
    })
    .await?;

    let filepath = folder.join(sanitize_filename(filename));

    tokio::fs::create_dir_all(folder).await?;
    tokio::fs::write(&filepath, &payload).await?;

    tracing::debug!("Saved {} ({} bytes)", filepath.display(), payload.len());

    Ok(filepath)
}

fn transient(url: &Url, source: reqwest::Error) -> FetchError {
    FetchError::Transient {
        url: url.to_string(),
        source,
    }
}
