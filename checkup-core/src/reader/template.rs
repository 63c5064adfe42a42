//! Output template: the ordered list of canonical column names

use super::workbook::{CellValue, Sheet};
use std::collections::HashSet;

/// Column names of the target table, in template order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    columns: Vec<String>,
    lookup: HashSet<String>,
}

impl Template {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let lookup = columns.iter().cloned().collect();
        Self { columns, lookup }
    }

    /// Build a template from the first row of a sheet.
    ///
    /// Empty header cells are named `Unnamed: {index}` and repeated names get
    /// a `.1`, `.2`, ... suffix so every column stays addressable. Text
    /// headers are kept verbatim, surrounding whitespace included.
    pub fn from_header_row(sheet: &Sheet) -> Self {
        let mut seen: HashSet<String> = HashSet::new();
        let mut columns = Vec::with_capacity(sheet.column_count());

        for (index, cell) in sheet.row(0).iter().enumerate() {
            let base = match cell {
                CellValue::Empty => format!("Unnamed: {}", index),
                CellValue::Text(s) if s.is_empty() => format!("Unnamed: {}", index),
                CellValue::Text(s) => s.clone(),
                other => other.to_trimmed_text(),
            };

            let mut name = base.clone();
            let mut count = 0;
            while seen.contains(&name) {
                count += 1;
                name = format!("{}.{}", base, count);
            }

            seen.insert(name.clone());
            columns.push(name);
        }

        Self::new(columns)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn contains(&self, column: &str) -> bool {
        self.lookup.contains(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_row() {
        let sheet = Sheet::from_rows(
            "模板",
            vec![
                vec![
                    "检查日期".into(),
                    CellValue::Empty,
                    "血压".into(),
                    "血压".into(),
                    "血压".into(),
                ],
                vec!["2024-01-01".into()],
            ],
        );

        let template = Template::from_header_row(&sheet);
        assert_eq!(
            template.columns(),
            &["检查日期", "Unnamed: 1", "血压", "血压.1", "血压.2"]
        );
        assert!(template.contains("血压.1"));
        assert!(!template.contains("体重"));
    }

    #[test]
    fn test_header_whitespace_is_kept() {
        let sheet = Sheet::from_rows(
            "模板",
            vec![vec![" 身高 ".into(), "体重".into(), CellValue::Number(2024.0)]],
        );

        let template = Template::from_header_row(&sheet);
        assert_eq!(template.columns(), &[" 身高 ", "体重", "2024"]);
        assert!(!template.contains("身高"));
    }

    #[test]
    fn test_empty_sheet() {
        let template = Template::from_header_row(&Sheet::new("空", 0, 0));
        assert!(template.is_empty());
    }
}
