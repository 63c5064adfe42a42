//! Workbook data structures

use chrono::NaiveDateTime;
use std::path::PathBuf;

/// Represents a complete workbook
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub path: PathBuf,
    /// Sheets in workbook order
    pub sheets: Vec<Sheet>,
}

/// A worksheet as a dense, rectangular grid anchored at A1
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    cells: Vec<CellValue>,
    rows: usize,
    cols: usize,
}

static EMPTY: CellValue = CellValue::Empty;

impl Sheet {
    /// Create an empty sheet with the given dimensions
    pub fn new(name: impl Into<String>, rows: usize, cols: usize) -> Self {
        Self {
            name: name.into(),
            cells: vec![CellValue::Empty; rows * cols],
            rows,
            cols,
        }
    }

    /// Build a sheet from row vectors; short rows are padded with empty cells
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut sheet = Self::new(name, rows.len(), cols);
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                sheet.cells[r * cols + c] = value;
            }
        }
        sheet
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.cols
    }

    /// Get the value at (row, col); out-of-range positions read as empty
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        if row < self.rows && col < self.cols {
            &self.cells[row * self.cols + col]
        } else {
            &EMPTY
        }
    }

    /// Set the value at (row, col); writes outside the grid are ignored
    pub fn set_cell(&mut self, row: usize, col: usize, value: CellValue) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = value;
        }
    }

    /// Cells of one row, empty for rows past the end
    pub fn row(&self, row: usize) -> &[CellValue] {
        if row < self.rows {
            &self.cells[row * self.cols..(row + 1) * self.cols]
        } else {
            &[]
        }
    }
}

/// Cell value types
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Boolean(bool),
    Date(NaiveDateTime),
    Error(String),
}

impl CellValue {
    /// The single text rendering used by every scan
    pub fn to_trimmed_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Boolean(true) => "True".to_string(),
            CellValue::Boolean(false) => "False".to_string(),
            CellValue::Date(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            CellValue::Error(e) => e.trim().to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

// Integral values print without ".0" so "5" in a report stays "5".
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
