//! Loading labeled expense records for training.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;

/// Default training data location, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "cleaned_transactions.csv";

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Dataset not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One CSV row. Every column is optional; extra columns are ignored.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    subcategory: Option<String>,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

/// A cleaned row ready for fitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingExample {
    pub description: String,
    pub category: String,
}

/// The kept examples plus counters describing what was filtered out.
#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    pub examples: Vec<TrainingExample>,
    pub total_rows: usize,
    pub dropped_missing_category: usize,
    pub dropped_empty_description: usize,
}

impl TrainingSet {
    /// Reads a CSV file with `subcategory`, `note` and `category` columns.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DatasetError::NotFound(path.to_path_buf()),
            _ => DatasetError::Io(e),
        })?;
        info!("Loading training data from {:?}", path);
        Self::from_reader(file)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut set = TrainingSet::default();
        for record in csv_reader.deserialize::<RawRecord>() {
            let record = record?;
            set.total_rows += 1;

            // Whitespace-only labels count as missing, unlike a plain null check.
            let category = match record.category {
                Some(c) if !c.trim().is_empty() => c,
                _ => {
                    set.dropped_missing_category += 1;
                    continue;
                }
            };

            let description = format!(
                "{} {}",
                record.subcategory.unwrap_or_default(),
                record.note.unwrap_or_default()
            );
            if description.trim().is_empty() {
                set.dropped_empty_description += 1;
                continue;
            }

            set.examples.push(TrainingExample {
                description,
                category,
            });
        }

        if set.examples.is_empty() {
            warn!("No usable rows out of {} in training data", set.total_rows);
        }
        info!(
            "Kept {} of {} rows ({} without category, {} with empty description)",
            set.examples.len(),
            set.total_rows,
            set.dropped_missing_category,
            set.dropped_empty_description
        );
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}
