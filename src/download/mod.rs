//! Asset download and filesystem persistence
//!
//! This module handles getting book texts and cover images onto disk:
//! - Fetching asset payloads through the retry policy
//! - Sanitizing remote-derived filenames
//! - Creating destination directories and writing files

mod assets;
mod filename;

pub use assets::{download_asset, WriteMode};
pub use filename::sanitize_filename;
