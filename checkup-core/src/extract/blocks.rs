//! Anchor row detection

use crate::config::ExtractionConfig;
use crate::reader::Sheet;

/// Find the rows that open a record block, top to bottom.
///
/// A row is an anchor when its first `marker_width` cells, joined with single
/// spaces, contain both the name marker and the birth date marker. Sheets
/// narrower than `marker_width` have no anchors.
pub fn find_anchor_rows(sheet: &Sheet, config: &ExtractionConfig) -> Vec<usize> {
    if sheet.column_count() < config.marker_width {
        return Vec::new();
    }

    (0..sheet.row_count())
        .filter(|&row| is_anchor_row(sheet, row, config))
        .collect()
}

fn is_anchor_row(sheet: &Sheet, row: usize, config: &ExtractionConfig) -> bool {
    let joined = sheet.row(row)[..config.marker_width]
        .iter()
        .map(|cell| cell.to_trimmed_text())
        .collect::<Vec<_>>()
        .join(" ");

    joined.contains(&config.name_marker) && joined.contains(&config.birth_date_marker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::CellValue;

    fn row(cells: &[&str]) -> Vec<CellValue> {
        cells.iter().map(|&c| CellValue::from(c)).collect()
    }

    #[test]
    fn test_finds_every_anchor() {
        let sheet = Sheet::from_rows(
            "Sheet1",
            vec![
                row(&["体检报告", "", "", "", ""]),
                row(&["姓名", "张三", "出生日期", "1970-01-01", ""]),
                row(&["", "", "", "", "2024-01-01"]),
                row(&["姓名：李四", "", "", "出生日期：1980-02-02", ""]),
            ],
        );

        let anchors = find_anchor_rows(&sheet, &ExtractionConfig::default());
        assert_eq!(anchors, vec![1, 3]);
    }

    #[test]
    fn test_requires_both_markers() {
        let sheet = Sheet::from_rows(
            "Sheet1",
            vec![
                row(&["姓名", "张三", "", "", ""]),
                row(&["", "出生日期", "", "", ""]),
            ],
        );

        assert!(find_anchor_rows(&sheet, &ExtractionConfig::default()).is_empty());
    }

    #[test]
    fn test_markers_past_fifth_cell_are_ignored() {
        let sheet = Sheet::from_rows(
            "Sheet1",
            vec![row(&["姓名", "", "", "", "", "出生日期"])],
        );

        assert!(find_anchor_rows(&sheet, &ExtractionConfig::default()).is_empty());
    }

    #[test]
    fn test_narrow_sheet_has_no_anchor() {
        let sheet = Sheet::from_rows("Sheet1", vec![row(&["姓名", "出生日期", "", ""])]);

        assert!(find_anchor_rows(&sheet, &ExtractionConfig::default()).is_empty());
    }
}
