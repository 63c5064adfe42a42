//! Output formatters for conversion summaries

use anyhow::Result;
use checkup_core::{CanonicalRecord, ConversionOutcome, Extraction};
use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Written,
    DryRun,
    Empty,
}

impl From<&ConversionOutcome> for Status {
    fn from(outcome: &ConversionOutcome) -> Self {
        match outcome {
            ConversionOutcome::Written { .. } => Status::Written,
            ConversionOutcome::Empty { .. } => Status::Empty,
        }
    }
}

/// What a run did, in a form both formatters can print
#[derive(Debug, Serialize)]
pub struct Summary {
    pub source: PathBuf,
    pub output: Option<PathBuf>,
    pub status: Status,
    pub sheets: usize,
    pub records: usize,
    /// Records that carry unmatched or duplicate entries
    pub records_with_remainder: usize,
    pub columns: Vec<String>,
    /// Record count per source sheet
    pub per_sheet: BTreeMap<String, usize>,
}

impl Summary {
    pub fn new(
        source: &Path,
        output: Option<PathBuf>,
        status: Status,
        extraction: &Extraction,
        remainder_column: &str,
    ) -> Self {
        let mut per_sheet = BTreeMap::new();
        for record in &extraction.records {
            *per_sheet.entry(record.sheet.clone()).or_insert(0) += 1;
        }

        Self {
            source: source.to_path_buf(),
            output,
            status,
            sheets: extraction.sheet_count,
            records: extraction.records.len(),
            records_with_remainder: count_with_remainder(&extraction.records, remainder_column),
            columns: extraction.columns.clone(),
            per_sheet,
        }
    }
}

fn count_with_remainder(records: &[CanonicalRecord], remainder_column: &str) -> usize {
    records
        .iter()
        .filter(|r| !r.value_or_empty(remainder_column).is_empty())
        .count()
}

/// Print the summary in human-readable format with colors
pub fn print_human(summary: &Summary) {
    println!(
        "{}",
        format!("Converting: {}", summary.source.display()).bold()
    );
    println!();

    println!(
        "  {} {} sheet(s), {} record(s)",
        "Read:".bold(),
        summary.sheets,
        summary.records
    );
    for (sheet, count) in &summary.per_sheet {
        println!("    {} {}", sheet.cyan(), count);
    }

    if summary.records_with_remainder > 0 {
        println!(
            "  {} {} record(s) carry unmatched or duplicate fields",
            "Note:".yellow().bold(),
            summary.records_with_remainder
        );
    }
    println!();

    match summary.status {
        Status::Written => {
            println!("{}", "✓ Conversion complete".green().bold());
            if let Some(output) = &summary.output {
                println!("Output: {}", output.display());
            }
        }
        Status::DryRun => {
            println!("{}", "[DRY RUN] No file written".bold());
            println!("Columns ({}):", summary.columns.len());
            for column in &summary.columns {
                println!("  - {}", column);
            }
            if let Some(output) = &summary.output {
                println!("\nOutput would be: {}", output.display());
            }
        }
        Status::Empty => {
            println!(
                "{}",
                "⚠ No records extracted; check that the file matches the report layout"
                    .yellow()
                    .bold()
            );
        }
    }
}

/// Print the summary in JSON format
pub fn print_json(summary: &Summary) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}
