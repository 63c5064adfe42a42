//! Extraction configuration: report geometry, scan regions and label aliases
//!
//! The compiled-in [`ExtractionConfig::default`] is the reference layout of the
//! checkup report. A TOML file can override any subset of it.

use crate::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

/// Reference scan regions: (first offset, last offset, label column).
const REFERENCE_REGIONS: [(usize, usize, &str); 14] = [
    (6, 11, "B"),
    (13, 17, "C"),
    (19, 29, "C"),
    (31, 33, "C"),
    (35, 42, "C"),
    (44, 55, "C"),
    (57, 62, "C"),
    (64, 72, "C"),
    (74, 79, "C"),
    (81, 95, "C"),
    (97, 108, "C"),
    (110, 134, "B"),
    (136, 152, "C"),
    (153, 164, "B"),
];

/// Reference alias table: source label -> template column.
const REFERENCE_ALIASES: [(&str, &str); 8] = [
    ("抗链球菌溶血素O测定", "抗链球菌溶血素 O 测定"),
    ("EB病毒三项", "EB病毒"),
    ("尿白蛋白肌酐比（ACR）", "尿白蛋白肌酐比"),
    ("尿常规", "尿常规/沉渣"),
    ("头部MRA和头颅平扫", "头部MRA"),
    ("腰椎膝盖磁共振", "腰椎膝盖核磁"),
    ("X线", "胸部X线"),
    ("电子胃镜和电子肠镜（无痛）", "电子胃肠镜"),
];

pub const DATE_COLUMN: &str = "检查日期";
pub const REMAINDER_COLUMN: &str = "备注_未匹配及模糊项";
pub const REMAINDER_SEPARATOR: &str = "；";
pub const DUPLICATE_MARKER: &str = "(重复)";
pub const NAME_MARKER: &str = "姓名";
pub const BIRTH_DATE_MARKER: &str = "出生日期";
pub const OUTPUT_SUFFIX: &str = "_填报结果";

/// A block of label rows below an anchor, read from a single label column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRegion {
    /// First row offset from the anchor (inclusive)
    pub start: usize,
    /// Last row offset from the anchor (inclusive)
    pub end: usize,
    /// Column letter holding the labels ("A" is column 0)
    pub label_column: String,
}

impl ScanRegion {
    pub fn new(start: usize, end: usize, label_column: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label_column: label_column.into(),
        }
    }

    pub fn offsets(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    /// Zero-based index of the label column, `None` if the letter is invalid
    pub fn label_column_index(&self) -> Option<usize> {
        column_index(&self.label_column)
    }
}

/// Convert a column letter ("A", "C", "AA") to a 0-based index
pub fn column_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }

    let mut col = 0usize;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let digit = ch.to_ascii_uppercase() as usize - 'A' as usize + 1;
        col = col.checked_mul(26)?.checked_add(digit)?;
    }
    Some(col - 1)
}

/// Full extraction configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Marker text identifying the patient name cell of an anchor row
    pub name_marker: String,
    /// Marker text identifying the date-of-birth cell of an anchor row
    pub birth_date_marker: String,
    /// Number of leading cells joined when looking for the markers
    pub marker_width: usize,
    /// Offset from the anchor row to the row carrying visit dates
    pub date_row_offset: usize,
    /// First column that may hold a visit
    pub first_visit_column: usize,
    /// Distance between consecutive visit columns
    pub visit_stride: usize,
    pub date_column: String,
    pub remainder_column: String,
    pub remainder_separator: String,
    pub duplicate_marker: String,
    /// Appended to the source file stem to name the output file
    pub output_suffix: String,
    pub scan_regions: Vec<ScanRegion>,
    pub aliases: BTreeMap<String, String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            name_marker: NAME_MARKER.to_string(),
            birth_date_marker: BIRTH_DATE_MARKER.to_string(),
            marker_width: 5,
            date_row_offset: 2,
            first_visit_column: 4,
            visit_stride: 2,
            date_column: DATE_COLUMN.to_string(),
            remainder_column: REMAINDER_COLUMN.to_string(),
            remainder_separator: REMAINDER_SEPARATOR.to_string(),
            duplicate_marker: DUPLICATE_MARKER.to_string(),
            output_suffix: OUTPUT_SUFFIX.to_string(),
            scan_regions: REFERENCE_REGIONS
                .iter()
                .map(|&(start, end, col)| ScanRegion::new(start, end, col))
                .collect(),
            aliases: REFERENCE_ALIASES
                .iter()
                .map(|&(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }
}

impl ExtractionConfig {
    /// Load configuration from a TOML file; missing keys keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConvertError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConvertError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConvertError::Config(e.to_string()))
    }

    /// Check the configuration for values the extractor cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.scan_regions.is_empty() {
            return Err(ConvertError::Config(
                "at least one scan region is required".to_string(),
            ));
        }

        for (i, region) in self.scan_regions.iter().enumerate() {
            if region.start > region.end {
                return Err(ConvertError::Config(format!(
                    "scan region {} starts at offset {} after its end {}",
                    i + 1,
                    region.start,
                    region.end
                )));
            }
            if region.label_column_index().is_none() {
                return Err(ConvertError::Config(format!(
                    "scan region {} has invalid label column '{}'",
                    i + 1,
                    region.label_column
                )));
            }
        }

        if self.name_marker.is_empty() || self.birth_date_marker.is_empty() {
            return Err(ConvertError::Config(
                "anchor markers must not be empty".to_string(),
            ));
        }
        if self.marker_width == 0 {
            return Err(ConvertError::Config(
                "marker_width must be at least 1".to_string(),
            ));
        }
        if self.visit_stride == 0 {
            return Err(ConvertError::Config(
                "visit_stride must be at least 1".to_string(),
            ));
        }
        if self.date_column.trim().is_empty() || self.remainder_column.trim().is_empty() {
            return Err(ConvertError::Config(
                "date_column and remainder_column must not be empty".to_string(),
            ));
        }
        if self.date_column == self.remainder_column {
            return Err(ConvertError::Config(format!(
                "date_column and remainder_column are both '{}'",
                self.date_column
            )));
        }

        Ok(())
    }
}
