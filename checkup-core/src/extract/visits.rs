//! Visit column discovery within one record block

use crate::config::ExtractionConfig;
use crate::reader::Sheet;

/// A column holding one checkup visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitColumn {
    pub column: usize,
    /// Trimmed text of the visit's date cell
    pub date: String,
}

/// Find the visit columns of the block anchored at `anchor_row`.
///
/// The date row sits `date_row_offset` rows below the anchor. Candidate
/// columns start at `first_visit_column` and advance by `visit_stride`, since
/// each visit is a data column followed by a spacer column.
pub fn find_visit_columns(
    sheet: &Sheet,
    anchor_row: usize,
    config: &ExtractionConfig,
) -> Vec<VisitColumn> {
    let date_row = anchor_row + config.date_row_offset;
    if date_row >= sheet.row_count() {
        return Vec::new();
    }

    (config.first_visit_column..sheet.column_count())
        .step_by(config.visit_stride.max(1))
        .filter_map(|column| {
            let date = sheet.cell(date_row, column).to_trimmed_text();
            (!date.is_empty()).then_some(VisitColumn { column, date })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::CellValue;

    fn sheet_with_date_row(date_row: Vec<CellValue>) -> Sheet {
        Sheet::from_rows(
            "Sheet1",
            vec![
                vec!["姓名".into(), "".into(), "出生日期".into()],
                vec![],
                date_row,
            ],
        )
    }

    #[test]
    fn test_even_columns_from_e() {
        let sheet = sheet_with_date_row(vec![
            "".into(),
            "".into(),
            "".into(),
            "日期".into(),
            "2024-01-01".into(),
            "备注".into(),
            "2024-06-01".into(),
            "".into(),
            "  ".into(),
            "".into(),
            CellValue::Number(45500.0),
        ]);

        let visits = find_visit_columns(&sheet, 0, &ExtractionConfig::default());
        assert_eq!(
            visits,
            vec![
                VisitColumn { column: 4, date: "2024-01-01".into() },
                VisitColumn { column: 6, date: "2024-06-01".into() },
                VisitColumn { column: 10, date: "45500".into() },
            ]
        );
    }

    #[test]
    fn test_no_dates() {
        let sheet = sheet_with_date_row(vec!["".into(), "".into(), "".into(), "日期".into()]);
        assert!(find_visit_columns(&sheet, 0, &ExtractionConfig::default()).is_empty());
    }

    #[test]
    fn test_date_row_past_end() {
        let sheet = sheet_with_date_row(vec![]);
        assert!(find_visit_columns(&sheet, 1, &ExtractionConfig::default()).is_empty());
    }
}
