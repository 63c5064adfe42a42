//! Output records, one per (block, visit)

use super::scanner::ScanResult;
use crate::config::ExtractionConfig;
use crate::reader::Template;
use std::collections::BTreeMap;

/// A normalized row keyed by template column name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRecord {
    /// Sheet the block was found on
    pub sheet: String,
    pub anchor_row: usize,
    pub visit_column: usize,
    values: BTreeMap<String, String>,
}

impl CanonicalRecord {
    /// Assemble a record: every template column blank, the visit date, the
    /// scanned fields on top, and the joined remainder if there is one.
    pub fn build(
        sheet: &str,
        anchor_row: usize,
        visit_column: usize,
        date: &str,
        scan: ScanResult,
        template: &Template,
        config: &ExtractionConfig,
    ) -> Self {
        let mut values: BTreeMap<String, String> = template
            .columns()
            .iter()
            .map(|c| (c.clone(), String::new()))
            .collect();

        values.insert(config.date_column.clone(), date.to_string());
        values.extend(scan.fields);

        if !scan.remainder.is_empty() {
            values.insert(
                config.remainder_column.clone(),
                scan.remainder.join(&config.remainder_separator),
            );
        }

        Self {
            sheet: sheet.to_string(),
            anchor_row,
            visit_column,
            values,
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Value for `column`, empty when the record has no such key
    pub fn value_or_empty(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DATE_COLUMN, REMAINDER_COLUMN};

    #[test]
    fn test_build_with_remainder() {
        let template = Template::new(["身高", DATE_COLUMN, "体重"]);
        let scan = ScanResult {
            fields: vec![("身高".into(), "170".into())],
            remainder: vec!["视力:5.0".into(), "身高(重复):171".into()],
        };

        let record = CanonicalRecord::build(
            "Sheet1",
            3,
            4,
            "2024-01-01",
            scan,
            &template,
            &ExtractionConfig::default(),
        );

        assert_eq!(record.get(DATE_COLUMN), Some("2024-01-01"));
        assert_eq!(record.get("身高"), Some("170"));
        assert_eq!(record.get("体重"), Some(""));
        assert_eq!(
            record.get(REMAINDER_COLUMN),
            Some("视力:5.0；身高(重复):171")
        );
    }

    #[test]
    fn test_build_without_remainder() {
        let template = Template::new(["身高"]);
        let record = CanonicalRecord::build(
            "Sheet1",
            0,
            6,
            "2024-06-01",
            ScanResult::default(),
            &template,
            &ExtractionConfig::default(),
        );

        assert_eq!(record.get(DATE_COLUMN), Some("2024-06-01"));
        assert_eq!(record.get("身高"), Some(""));
        assert!(!record.contains(REMAINDER_COLUMN));
        assert_eq!(record.value_or_empty(REMAINDER_COLUMN), "");
    }
}
