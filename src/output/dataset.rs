//! Dataset serialization
//!
//! The harvest result is a JSON array of book records, UTF-8 encoded with
//! non-ASCII characters preserved unescaped, in catalog order. A separate
//! rendering component consumes this file via the stable field names and
//! relative asset paths; nothing else is assumed about the consumer.

use crate::crawler::BookRecord;
use crate::Result;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Writes the records to the given path as a JSON array
///
/// Parent directories are created if missing. The write is buffered and
/// flushed; filesystem failures propagate unmodified.
///
/// # Arguments
///
/// * `records` - The records to serialize, in final order
/// * `path` - Destination file path
pub fn write_dataset(records: &[BookRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;

    tracing::info!("Wrote {} records to {}", records.len(), path.display());

    Ok(())
}

/// Loads a previously written dataset
///
/// # Arguments
///
/// * `path` - Path of a file produced by [`write_dataset`]
///
/// # Returns
///
/// The records in their serialized order
pub fn read_dataset(path: &Path) -> Result<Vec<BookRecord>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let records = serde_json::from_reader(reader)?;
    Ok(records)
}
