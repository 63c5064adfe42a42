//! Record extraction: anchors, visits, field scans and record assembly

pub mod blocks;
pub mod reconcile;
pub mod record;
pub mod scanner;
pub mod visits;

pub use blocks::find_anchor_rows;
pub use reconcile::{LabelReconciler, Reconciled};
pub use record::CanonicalRecord;
pub use scanner::{FieldScanner, ScanResult};
pub use visits::{VisitColumn, find_visit_columns};

use crate::config::ExtractionConfig;
use crate::reader::{Sheet, Template, Workbook};
use tracing::{debug, info};

/// A record block that has at least one visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub anchor_row: usize,
    pub visits: Vec<VisitColumn>,
}

/// Runs the extraction with one fixed configuration
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractionConfig,
    reconciler: LabelReconciler,
}

impl Extractor {
    /// Create an extractor with the reference configuration
    pub fn new() -> Self {
        Self::with_config(ExtractionConfig::default())
    }

    /// Create an extractor with a custom configuration
    pub fn with_config(config: ExtractionConfig) -> Self {
        let reconciler = LabelReconciler::new(config.aliases.clone());
        Self { config, reconciler }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Blocks of a sheet that carry visits, top to bottom.
    ///
    /// Anchors whose date row has no visit are left out entirely.
    pub fn locate(&self, sheet: &Sheet) -> Vec<Block> {
        find_anchor_rows(sheet, &self.config)
            .into_iter()
            .filter_map(|anchor_row| {
                let visits = find_visit_columns(sheet, anchor_row, &self.config);
                if visits.is_empty() {
                    debug!(sheet = %sheet.name, anchor_row, "block has no visit dates, skipped");
                    None
                } else {
                    Some(Block { anchor_row, visits })
                }
            })
            .collect()
    }

    /// Extract records from every sheet, block and visit, in that order
    pub fn extract(&self, workbook: &Workbook, template: &Template) -> Vec<CanonicalRecord> {
        let mut records = Vec::new();

        for sheet in &workbook.sheets {
            let before = records.len();
            self.extract_sheet(sheet, template, &mut records);
            info!(
                sheet = %sheet.name,
                records = records.len() - before,
                "processed sheet"
            );
        }

        records
    }

    /// Append the records of one sheet to `records`
    pub fn extract_sheet(
        &self,
        sheet: &Sheet,
        template: &Template,
        records: &mut Vec<CanonicalRecord>,
    ) {
        let scanner = FieldScanner::new(
            &self.config.scan_regions,
            &self.reconciler,
            template,
            &self.config.duplicate_marker,
        );

        for block in self.locate(sheet) {
            debug!(
                sheet = %sheet.name,
                anchor_row = block.anchor_row,
                visits = block.visits.len(),
                "found record block"
            );

            for visit in &block.visits {
                let scan = scanner.scan(sheet, block.anchor_row, visit.column);
                debug!(
                    column = visit.column,
                    date = %visit.date,
                    fields = scan.fields.len(),
                    remainder = scan.remainder.len(),
                    "scanned visit"
                );

                records.push(CanonicalRecord::build(
                    &sheet.name,
                    block.anchor_row,
                    visit.column,
                    &visit.date,
                    scan,
                    template,
                    &self.config,
                ));
            }
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DATE_COLUMN, REMAINDER_COLUMN};
    use crate::reader::CellValue;

    fn block_sheet(name: &str) -> Sheet {
        let mut sheet = Sheet::new(name, 12, 8);
        sheet.set_cell(0, 0, "姓名".into());
        sheet.set_cell(0, 2, "出生日期".into());
        sheet.set_cell(2, 4, "2024-01-01".into());
        sheet.set_cell(2, 6, "2024-06-01".into());
        sheet.set_cell(6, 1, "身高".into());
        sheet.set_cell(6, 4, CellValue::Number(170.0));
        sheet.set_cell(6, 6, CellValue::Number(171.0));
        sheet
    }

    #[test]
    fn test_locate_skips_blocks_without_visits() {
        let mut sheet = Sheet::new("Sheet1", 30, 8);
        sheet.set_cell(0, 0, "姓名".into());
        sheet.set_cell(0, 1, "出生日期".into());
        sheet.set_cell(6, 1, "身高".into());
        sheet.set_cell(6, 4, "170".into());
        sheet.set_cell(15, 0, "姓名".into());
        sheet.set_cell(15, 1, "出生日期".into());
        sheet.set_cell(17, 6, "2024-03-03".into());

        let extractor = Extractor::new();
        let blocks = extractor.locate(&sheet);
        assert_eq!(
            blocks,
            vec![Block {
                anchor_row: 15,
                visits: vec![VisitColumn {
                    column: 6,
                    date: "2024-03-03".into()
                }],
            }]
        );

        let workbook = Workbook {
            sheets: vec![sheet],
            ..Default::default()
        };
        let records = extractor.extract(&workbook, &Template::new(["身高"]));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].anchor_row, 15);
        assert_eq!(records[0].get("身高"), Some(""));
    }

    #[test]
    fn test_sheet_without_anchor_contributes_nothing() {
        let mut plain = Sheet::new("说明", 20, 10);
        plain.set_cell(2, 4, "2024-01-01".into());
        plain.set_cell(6, 1, "身高".into());
        plain.set_cell(6, 4, "170".into());

        let workbook = Workbook {
            sheets: vec![plain, block_sheet("Sheet2")],
            ..Default::default()
        };
        let records = Extractor::new().extract(&workbook, &Template::new(["身高"]));

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.sheet == "Sheet2"));
    }

    #[test]
    fn test_records_follow_sheet_block_visit_order() {
        let workbook = Workbook {
            sheets: vec![block_sheet("A"), block_sheet("B")],
            ..Default::default()
        };
        let records = Extractor::new().extract(&workbook, &Template::new(["身高"]));

        let order: Vec<_> = records
            .iter()
            .map(|r| (r.sheet.as_str(), r.visit_column, r.value_or_empty("身高")))
            .collect();
        assert_eq!(
            order,
            vec![("A", 4, "170"), ("A", 6, "171"), ("B", 4, "170"), ("B", 6, "171")]
        );
        assert_eq!(records[1].get(DATE_COLUMN), Some("2024-06-01"));
        assert!(!records[0].contains(REMAINDER_COLUMN));
    }

    #[test]
    fn test_extractor_can_move_to_worker_thread() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Extractor>();
    }

    #[test]
    fn test_custom_configuration() {
        let mut config = ExtractionConfig::default();
        config.scan_regions = vec![crate::config::ScanRegion::new(6, 6, "B")];
        config.aliases.insert("身高".into(), "Height".into());

        let workbook = Workbook {
            sheets: vec![block_sheet("Sheet1")],
            ..Default::default()
        };
        let records = Extractor::with_config(config).extract(&workbook, &Template::new(["Height"]));

        assert_eq!(records[0].get("Height"), Some("170"));
        assert_eq!(records[1].get("Height"), Some("171"));
    }
}
