//! Excel/ODS file reader using calamine

use crate::error::{ConvertError, Result};
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub mod template;
pub mod workbook;

pub use template::Template;
pub use workbook::{CellValue, Sheet, Workbook};

/// Read every sheet of a workbook, in workbook order
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Workbook> {
    let path = path.as_ref();
    let mut excel = open(path)?;

    let mut sheets = Vec::new();
    for sheet_name in excel.sheet_names() {
        let range = excel
            .worksheet_range(&sheet_name)
            .map_err(|source| ConvertError::ReadSheet {
                path: path.to_path_buf(),
                sheet: sheet_name.clone(),
                source,
            })?;
        sheets.push(parse_sheet(&sheet_name, &range));
    }

    Ok(Workbook {
        path: path.to_path_buf(),
        sheets,
    })
}

/// Read the template columns from the header row of the first sheet
pub fn read_template<P: AsRef<Path>>(path: P) -> Result<Template> {
    let path = path.as_ref();
    let mut excel = open(path)?;

    let Some(first) = excel.sheet_names().into_iter().next() else {
        return Err(ConvertError::Template {
            path: path.to_path_buf(),
            message: "workbook has no sheets".to_string(),
        });
    };

    let range = excel
        .worksheet_range(&first)
        .map_err(|source| ConvertError::ReadSheet {
            path: path.to_path_buf(),
            sheet: first.clone(),
            source,
        })?;

    let template = Template::from_header_row(&parse_sheet(&first, &range));
    if template.is_empty() {
        return Err(ConvertError::Template {
            path: path.to_path_buf(),
            message: format!("sheet '{}' has no header row", first),
        });
    }

    Ok(template)
}

fn open(path: &Path) -> Result<Sheets<BufReader<File>>> {
    open_workbook_auto(path).map_err(|source| ConvertError::OpenWorkbook {
        path: path.to_path_buf(),
        source,
    })
}

/// Lay a calamine range onto a grid addressed from A1
fn parse_sheet(name: &str, range: &Range<Data>) -> Sheet {
    let (Some(start), Some(end)) = (range.start(), range.end()) else {
        return Sheet::new(name, 0, 0);
    };

    let rows = end.0 as usize + 1;
    let cols = end.1 as usize + 1;
    let mut sheet = Sheet::new(name, rows, cols);

    for (rel_row, rel_col, data) in range.used_cells() {
        let row = start.0 as usize + rel_row;
        let col = start.1 as usize + rel_col;
        sheet.set_cell(row, col, parse_cell_value(data));
    }

    sheet
}

fn parse_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::Empty => CellValue::Empty,
        Data::DateTime(dt) => {
            if dt.is_duration() {
                CellValue::Number(dt.as_f64())
            } else {
                dt.as_datetime()
                    .map(CellValue::Date)
                    .unwrap_or(CellValue::Number(dt.as_f64()))
            }
        }
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_value() {
        assert_eq!(parse_cell_value(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(
            parse_cell_value(&Data::String("姓名".into())),
            CellValue::Text("姓名".into())
        );
        assert_eq!(parse_cell_value(&Data::String(String::new())), CellValue::Empty);
        assert_eq!(parse_cell_value(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn test_iso_dates() {
        let dt = parse_iso_datetime("2024-01-01T08:30:00").unwrap();
        assert_eq!(
            CellValue::Date(dt).to_trimmed_text(),
            "2024-01-01 08:30:00"
        );
        let d = parse_iso_datetime("2024-06-01").unwrap();
        assert_eq!(CellValue::Date(d).to_trimmed_text(), "2024-06-01 00:00:00");
        assert!(parse_iso_datetime("June 1st").is_none());
    }

    #[test]
    fn test_parse_sheet_keeps_absolute_positions() {
        let mut range: Range<Data> = Range::new((2, 1), (3, 4));
        range.set_value((2, 1), Data::String("姓名".into()));
        range.set_value((3, 4), Data::Float(1.5));

        let sheet = parse_sheet("Sheet1", &range);
        assert_eq!(sheet.row_count(), 4);
        assert_eq!(sheet.column_count(), 5);
        assert_eq!(sheet.cell(2, 1), &CellValue::Text("姓名".into()));
        assert_eq!(sheet.cell(3, 4), &CellValue::Number(1.5));
        assert_eq!(sheet.cell(0, 0), &CellValue::Empty);
    }
}
