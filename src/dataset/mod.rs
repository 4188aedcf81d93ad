//! Climate dataset discovery and loading.
//!
//! Datasets are CSV or JSON files of [`ClimateRecord`] rows. A dataset
//! path may point at a single file or at a directory of files, which are
//! merged in path order.

pub mod loader;
pub mod scanner;

pub use loader::{load_file, parse_bytes, parse_csv, DataFormat};
pub use scanner::{DatasetScanner, ScanConfig};

use crate::models::ClimateRecord;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while locating or parsing datasets.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid CSV in {dataset}: {source}")]
    Csv {
        dataset: String,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid JSON in {dataset}: {source}")]
    Json {
        dataset: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported dataset format: {0}")]
    UnsupportedFormat(String),

    #[error("Dataset {0} contains no records")]
    Empty(String),

    #[error("No dataset files found under {0}")]
    NoFiles(String),
}

/// A loaded climate dataset.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Where the records came from (file path, directory or upload label).
    pub source: String,
    /// Normalized column names, in first-seen order.
    pub columns: Vec<String>,
    /// Parsed rows.
    pub records: Vec<ClimateRecord>,
}

impl Dataset {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether a normalized column is present.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Append another dataset's rows, keeping first-seen column order.
    pub fn merge(&mut self, other: Dataset) {
        for column in other.columns {
            if !self.columns.contains(&column) {
                self.columns.push(column);
            }
        }
        self.records.extend(other.records);
    }
}

/// Load every dataset file under `path` and merge them into one dataset.
pub fn load_path(path: &Path, scan_config: &ScanConfig) -> Result<Dataset, DatasetError> {
    let scanner = DatasetScanner::new(path.to_path_buf(), scan_config.clone());
    let files = scanner.scan()?;
    info!("Found {} dataset file(s) under {}", files.len(), path.display());

    let mut dataset = Dataset {
        source: path.display().to_string(),
        ..Default::default()
    };

    for file in &files {
        let part = load_file(file)?;
        debug!("Loaded {} rows from {}", part.len(), file.display());
        dataset.merge(part);
    }

    if dataset.is_empty() {
        return Err(DatasetError::Empty(dataset.source));
    }

    Ok(dataset)
}
