//! Per-visit field scanning over the configured scan regions

use super::reconcile::{LabelReconciler, Reconciled};
use crate::config::ScanRegion;
use crate::reader::{Sheet, Template};
use std::collections::HashSet;
use tracing::trace;

/// Fields collected for one visit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Canonical column -> value, in scan order
    pub fields: Vec<(String, String)>,
    /// Entries that could not be placed in a template column
    pub remainder: Vec<String>,
}

impl ScanResult {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }
}

/// Walks the scan regions below an anchor for a single visit column
pub struct FieldScanner<'a> {
    regions: &'a [ScanRegion],
    reconciler: &'a LabelReconciler,
    template: &'a Template,
    duplicate_marker: &'a str,
}

impl<'a> FieldScanner<'a> {
    pub fn new(
        regions: &'a [ScanRegion],
        reconciler: &'a LabelReconciler,
        template: &'a Template,
        duplicate_marker: &'a str,
    ) -> Self {
        Self {
            regions,
            reconciler,
            template,
            duplicate_marker,
        }
    }

    pub fn scan(&self, sheet: &Sheet, anchor_row: usize, visit_column: usize) -> ScanResult {
        let mut result = ScanResult::default();
        let mut claimed: HashSet<String> = HashSet::new();

        for region in self.regions {
            let label_column = region.label_column_index();

            for offset in region.offsets() {
                let row = anchor_row + offset;
                // Reports may end before the region does: stop this region.
                if row >= sheet.row_count() {
                    break;
                }
                let Some(label_column) = label_column.filter(|&c| c < sheet.column_count())
                else {
                    continue;
                };
                if visit_column >= sheet.column_count() {
                    continue;
                }

                let label = sheet.cell(row, label_column).to_trimmed_text();
                if label.is_empty() {
                    continue;
                }
                let value = sheet.cell(row, visit_column).to_trimmed_text();
                if value.is_empty() {
                    continue;
                }

                match self.reconciler.reconcile(&label, self.template) {
                    Reconciled::Canonical(column) if !claimed.contains(column) => {
                        claimed.insert(column.to_string());
                        result.fields.push((column.to_string(), value));
                    }
                    Reconciled::Canonical(column) => {
                        trace!(row, column, "duplicate field diverted to remainder");
                        result
                            .remainder
                            .push(format!("{}{}:{}", label, self.duplicate_marker, value));
                    }
                    Reconciled::Unmapped(label) => {
                        trace!(row, label, "unmapped field diverted to remainder");
                        result.remainder.push(format!("{}:{}", label, value));
                    }
                }
            }
        }

        result
    }
}
