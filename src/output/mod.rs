//! Output module for the harvested dataset

mod dataset;

pub use dataset::{read_dataset, write_dataset};
