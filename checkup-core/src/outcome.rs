//! Results of a conversion run

use crate::extract::CanonicalRecord;
use serde::Serialize;
use std::path::PathBuf;

/// Records pulled from a source workbook, ready to be written
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Final output column order
    pub columns: Vec<String>,
    pub records: Vec<CanonicalRecord>,
    /// Number of sheets read from the source workbook
    pub sheet_count: usize,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Non-fatal end states of a conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionOutcome {
    /// Records were extracted and written to `output`
    Written {
        output: PathBuf,
        records: usize,
        sheets: usize,
    },
    /// Nothing matched the report layout; no file was written
    Empty { sheets: usize },
}
