//! Writer module: column ordering, output naming and table persistence

mod xlsx_writer;

pub use xlsx_writer::{col_to_letter, write_xlsx};

use crate::config::ExtractionConfig;
use crate::error::{ConvertError, Result};
use crate::extract::CanonicalRecord;
use crate::reader::Template;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Final column order: date first, template columns in order, remainder last.
///
/// The date column is placed first even when the template does not name it.
/// The remainder column is kept when the template names it or any record
/// carries it.
pub fn column_order(
    template: &Template,
    records: &[CanonicalRecord],
    config: &ExtractionConfig,
) -> Vec<String> {
    let date = &config.date_column;
    let remainder = &config.remainder_column;

    let mut columns = vec![date.clone()];
    columns.extend(
        template
            .columns()
            .iter()
            .filter(|c| *c != date && *c != remainder)
            .cloned(),
    );

    if template.contains(remainder) || records.iter().any(|r| r.contains(remainder)) {
        columns.push(remainder.clone());
    }

    columns
}

/// Output path next to `input`: `{stem}{suffix}.xlsx`
pub fn output_path_for(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}{}.xlsx", stem, suffix))
}

/// Write records as a table with the given column order.
///
/// The workbook is first written to a hidden sibling file and then renamed
/// over `path`, so a failure never leaves a truncated output behind.
pub fn write_table<P: AsRef<Path>>(
    records: &[CanonicalRecord],
    columns: &[String],
    path: P,
) -> Result<()> {
    let path = path.as_ref();

    let mut rows: Vec<Vec<&str>> = Vec::with_capacity(records.len() + 1);
    rows.push(columns.iter().map(String::as_str).collect());
    for record in records {
        rows.push(columns.iter().map(|c| record.value_or_empty(c)).collect());
    }

    let staging = staging_path(path);
    let written = File::create(&staging)
        .map_err(anyhow::Error::from)
        .and_then(|file| write_xlsx(BufWriter::new(file), &rows))
        .and_then(|mut out| {
            use std::io::Write;
            out.flush()?;
            Ok(())
        })
        .and_then(|()| fs::rename(&staging, path).map_err(anyhow::Error::from));

    if let Err(err) = written {
        let _ = fs::remove_file(&staging);
        return Err(ConvertError::Write {
            path: path.to_path_buf(),
            message: format!("{:#}", err),
        });
    }

    debug!(path = %path.display(), rows = records.len(), "wrote table");
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.partial", name))
}
