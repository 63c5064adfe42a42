//! checkup-core: extraction of checkup visit records from report workbooks
//!
//! Report sheets hold one or more record blocks, each opened by an anchor row
//! and laid out with one column per visit. This library finds those blocks,
//! reads the labeled measurements of every visit, maps the labels onto the
//! columns of a template and writes the result as a flat table.

pub mod config;
pub mod error;
pub mod extract;
pub mod outcome;
pub mod reader;
pub mod writer;

use std::path::Path;
use tracing::{info, warn};

pub use config::{ExtractionConfig, ScanRegion};
pub use error::{ConvertError, Result};
pub use extract::{CanonicalRecord, Extractor};
pub use outcome::{ConversionOutcome, Extraction};
pub use reader::{CellValue, Sheet, Template, Workbook};

impl Extractor {
    /// Read the source and template workbooks and extract all records
    pub fn extract_files<P, Q>(&self, source: P, template: Q) -> Result<Extraction>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let template = reader::read_template(template)?;
        info!(columns = template.len(), "loaded template");

        let workbook = reader::read_workbook(source.as_ref())?;
        info!(
            path = %workbook.path.display(),
            sheets = workbook.sheets.len(),
            "loaded workbook"
        );

        let records = self.extract(&workbook, &template);
        let columns = writer::column_order(&template, &records, self.config());

        Ok(Extraction {
            columns,
            records,
            sheet_count: workbook.sheets.len(),
        })
    }

    /// Convert `source` into a table shaped like `template`, written to `output`.
    ///
    /// Returns [`ConversionOutcome::Empty`] without writing anything when no
    /// record could be extracted.
    pub fn convert_file<P, Q, R>(&self, source: P, template: Q, output: R) -> Result<ConversionOutcome>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        R: AsRef<Path>,
    {
        let extraction = self.extract_files(source, template)?;
        self.write_extraction(&extraction, output)
    }

    /// Write an extraction to `output`, or report it as empty
    pub fn write_extraction<P: AsRef<Path>>(
        &self,
        extraction: &Extraction,
        output: P,
    ) -> Result<ConversionOutcome> {
        if extraction.is_empty() {
            warn!(sheets = extraction.sheet_count, "no records extracted");
            return Ok(ConversionOutcome::Empty {
                sheets: extraction.sheet_count,
            });
        }

        let output = output.as_ref();
        writer::write_table(&extraction.records, &extraction.columns, output)?;
        info!(
            path = %output.display(),
            records = extraction.records.len(),
            "wrote output"
        );

        Ok(ConversionOutcome::Written {
            output: output.to_path_buf(),
            records: extraction.records.len(),
            sheets: extraction.sheet_count,
        })
    }
}
