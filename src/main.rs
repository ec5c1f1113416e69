//! Shelf-Harvest main entry point
//!
//! This is the command-line interface for the Shelf-Harvest book catalog
//! harvester. It assembles the run parameters, loads the optional site
//! configuration, and hands everything to the harvest coordinator.

use anyhow::Context;
use clap::Parser;
use shelf_harvest::config::{load_config_or_default, CrawlConfig};
use shelf_harvest::crawler::run_harvest;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shelf-Harvest: a fault-tolerant book catalog harvester
///
/// Walks the configured catalog page range, extracts each book's
/// metadata, downloads book texts and cover images, and writes the
/// aggregated dataset as JSON.
#[derive(Parser, Debug)]
#[command(name = "shelf-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A fault-tolerant book catalog harvester", long_about = None)]
struct Cli {
    /// First catalog page to fetch (1-based)
    #[arg(long, default_value_t = 1)]
    start_page: u32,

    /// Page index at which to stop (exclusive)
    #[arg(long)]
    end_page: u32,

    /// Destination root folder for books, images, and the dataset
    #[arg(long, default_value = ".")]
    dest_folder: PathBuf,

    /// Do not download cover images
    #[arg(long)]
    skip_images: bool,

    /// Do not download book texts
    #[arg(long)]
    skip_text: bool,

    /// Dataset filename, relative to the destination folder
    #[arg(long, default_value = "books_data.json")]
    output: PathBuf,

    /// Path to a TOML site-configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config =
        load_config_or_default(cli.config.as_deref()).context("failed to load configuration")?;

    tracing::info!("Catalog: {}", config.site.catalog_url);

    let crawl = CrawlConfig {
        start_page: cli.start_page,
        end_page: cli.end_page,
        dest_folder: cli.dest_folder,
        skip_images: cli.skip_images,
        skip_text: cli.skip_text,
        output_path: cli.output,
    };

    let records = run_harvest(config, crawl).await.context("harvest failed")?;

    println!("Harvested {} books", records.len());

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shelf_harvest=info,warn"),
            1 => EnvFilter::new("shelf_harvest=debug,info"),
            2 => EnvFilter::new("shelf_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
