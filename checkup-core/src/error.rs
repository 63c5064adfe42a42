//! Fatal errors surfaced by the conversion pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a conversion run.
///
/// Structural mismatches inside a sheet (short rows, missing cells, blank
/// labels) are never reported here; they are skipped during extraction.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to open workbook {}: {source}", .path.display())]
    OpenWorkbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("failed to read sheet '{sheet}' in {}: {source}", .path.display())]
    ReadSheet {
        path: PathBuf,
        sheet: String,
        #[source]
        source: calamine::Error,
    },

    #[error("invalid template {}: {message}", .path.display())]
    Template { path: PathBuf, message: String },

    #[error("failed to write {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },

    #[error("failed to read configuration {}: {source}", .path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
