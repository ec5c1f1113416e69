//! Harvest coordinator - main crawl orchestration logic
//!
//! This module contains the main harvest loop that coordinates all
//! aspects of a run, including:
//! - Walking the catalog page range, in order
//! - Fetching and parsing each book's detail page
//! - Downloading cover and text assets (partial failure tolerated)
//! - Accumulating records and serializing the dataset

use crate::config::{validate_crawl_config, Config, CrawlConfig};
use crate::crawler::detail::{parse_book_page, BookRecord, BOOKS_ROOT, IMAGES_ROOT};
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::listing::{extract_listing, BookListing};
use crate::crawler::retry::RetryPolicy;
use crate::download::{download_asset, WriteMode};
use crate::output::write_dataset;
use crate::{HarvestError, Result};
use reqwest::Client;
use std::path::PathBuf;
use url::Url;

/// Main harvest coordinator structure
///
/// Processing is sequential: one catalog page, then one book at a time,
/// in listing order. The accumulated records therefore match catalog
/// order, and the site never sees more than one in-flight request.
pub struct Coordinator {
    catalog_url: Url,
    crawl: CrawlConfig,
    policy: RetryPolicy,
    client: Client,
    records: Vec<BookRecord>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - Site and retry configuration
    /// * `crawl` - Parameters of this run
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - Invalid parameters or client build failure
    pub fn new(config: Config, crawl: CrawlConfig) -> Result<Self> {
        validate_crawl_config(&crawl)?;

        let catalog_url = Url::parse(&config.site.catalog_url)?;
        let client = build_http_client(&config.site.user_agent)?;
        let policy = RetryPolicy::from(&config.retry);

        Ok(Self {
            catalog_url,
            crawl,
            policy,
            client,
            records: Vec::new(),
        })
    }

    /// Runs the main harvest loop
    ///
    /// Walks catalog pages `start_page..end_page`, stopping early when a
    /// listing carries no next-page link. Request-scoped failures skip
    /// the page or book they belong to; filesystem failures abort the
    /// run. Finishes by serializing the accumulated records to the
    /// configured output path.
    pub async fn run(mut self) -> Result<Vec<BookRecord>> {
        tracing::info!(
            "Harvesting catalog pages {}..{} from {}",
            self.crawl.start_page,
            self.crawl.end_page,
            self.catalog_url
        );

        for page in self.crawl.start_page..self.crawl.end_page {
            // A failing catalog page is skipped AND the cursor advances;
            // staying on a bad page would loop forever.
            let listing = match self.process_page(page).await {
                Ok(listing) => listing,
                Err(HarvestError::Io(err)) => return Err(HarvestError::Io(err)),
                Err(err) => {
                    tracing::warn!("Skipping catalog page {}: {}", page, err);
                    continue;
                }
            };

            if listing.next_page.is_none() {
                tracing::info!("Reached the catalog's last page at page {}", page);
                break;
            }
        }

        tracing::info!("Harvest complete: {} records", self.records.len());

        let output_path = self.crawl.dest_folder.join(&self.crawl.output_path);
        write_dataset(&self.records, &output_path)?;

        Ok(self.records)
    }

    /// Fetches and processes one catalog page
    ///
    /// Each listed book is processed independently; a failing book is
    /// logged and skipped without aborting the page.
    async fn process_page(&mut self, page: u32) -> Result<BookListing> {
        let page_url = self.page_url(page)?;
        tracing::debug!("Fetching catalog page {} ({})", page, page_url);

        let body = fetch_page(&self.client, &self.policy, &page_url).await?;
        let listing = extract_listing(&body, &page_url)?;

        tracing::info!("Page {}: {} books listed", page, listing.book_urls.len());

        for book_url in &listing.book_urls {
            match self.process_book(book_url).await {
                Ok(record) => self.records.push(record),
                // A broken destination filesystem invalidates all further work
                Err(HarvestError::Io(err)) => return Err(HarvestError::Io(err)),
                Err(err) => tracing::warn!("Skipping book {}: {}", book_url, err),
            }
        }

        Ok(listing)
    }

    /// Fetches, parses, and downloads one book
    ///
    /// Asset downloads are best-effort: a failed cover or text download
    /// is logged and the record is still returned. Losing an asset is
    /// acceptable; losing the record is not.
    async fn process_book(&self, book_url: &Url) -> Result<BookRecord> {
        let body = fetch_page(&self.client, &self.policy, book_url).await?;
        let record = parse_book_page(&body, book_url)?;

        tracing::debug!("Parsed \"{}\" by {}", record.title, record.author);

        if !self.crawl.skip_images {
            tolerate_asset_failure(&record, "cover", self.download_cover(&record).await)?;
        }

        if !self.crawl.skip_text {
            tolerate_asset_failure(&record, "text", self.download_text(&record).await)?;
        }

        Ok(record)
    }

    /// Downloads the book's cover image under `<dest>/images/`
    async fn download_cover(&self, record: &BookRecord) -> Result<PathBuf> {
        let url = Url::parse(&record.img_src)?;
        let folder = self.crawl.dest_folder.join(IMAGES_ROOT);

        download_asset(
            &self.client,
            &self.policy,
            &url,
            record.img_filename(),
            &folder,
            WriteMode::Binary,
        )
        .await
    }

    /// Downloads the book's text under `<dest>/books/`
    async fn download_text(&self, record: &BookRecord) -> Result<PathBuf> {
        let url = Url::parse(&record.book_src)?;
        let folder = self.crawl.dest_folder.join(BOOKS_ROOT);

        download_asset(
            &self.client,
            &self.policy,
            &url,
            record.book_filename(),
            &folder,
            WriteMode::Text,
        )
        .await
    }

    /// URL of the catalog page with the given 1-based index
    ///
    /// Page 1 is the catalog entry URL itself; later pages append the
    /// page number as a path segment.
    fn page_url(&self, page: u32) -> Result<Url> {
        if page == 1 {
            Ok(self.catalog_url.clone())
        } else {
            Ok(self.catalog_url.join(&format!("{}/", page))?)
        }
    }
}

/// Distinguishes a broken destination filesystem (fatal) from a failed
/// remote asset (tolerated)
fn tolerate_asset_failure(
    record: &BookRecord,
    what: &str,
    result: Result<PathBuf>,
) -> Result<()> {
    match result {
        Ok(path) => {
            tracing::debug!("Saved {} for \"{}\" to {}", what, record.title, path.display());
            Ok(())
        }
        Err(HarvestError::Io(err)) => Err(HarvestError::Io(err)),
        Err(err) => {
            tracing::warn!(
                "Failed to download {} for \"{}\": {}",
                what,
                record.title,
                err
            );
            Ok(())
        }
    }
}

/// Runs a complete harvest
///
/// This is the main entry point for a run. It validates the run
/// parameters, builds the HTTP client, walks the catalog, and writes
/// the dataset.
///
/// # Arguments
///
/// * `config` - Site and retry configuration
/// * `crawl` - Parameters of this run
///
/// # Returns
///
/// * `Ok(Vec<BookRecord>)` - The harvested records, in catalog order
/// * `Err(HarvestError)` - Configuration or filesystem failure
pub async fn run_harvest(config: Config, crawl: CrawlConfig) -> Result<Vec<BookRecord>> {
    let coordinator = Coordinator::new(config, crawl)?;
    coordinator.run().await
}
