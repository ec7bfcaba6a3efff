use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use polars::prelude::DataFrame;

use crate::errors::ReaderError;
use crate::model::{render_datetime, render_float, CellText, SourceFormat};
use crate::registry::TableReader;

use super::TableBuilder;

/// First worksheet of a workbook. Report exports carry a title banner above
/// the header, so `leading_rows` sheet rows are skipped before the header.
pub struct SpreadsheetReader {
    pub leading_rows: u32,
}

impl Default for SpreadsheetReader {
    fn default() -> Self {
        Self { leading_rows: 1 }
    }
}

impl SpreadsheetReader {
    const NAME: &'static str = "SPREADSHEET";

    fn cell_text(cell: &Data) -> CellText {
        match cell {
            Data::Empty | Data::Error(_) => None,
            Data::String(value) | Data::DateTimeIso(value) | Data::DurationIso(value) => {
                if value.is_empty() {
                    None
                } else {
                    Some(value.clone())
                }
            }
            Data::Int(value) => Some(value.to_string()),
            Data::Float(value) => Some(render_float(*value)),
            Data::Bool(value) => Some(value.to_string()),
            Data::DateTime(value) => value
                .as_datetime()
                .map(|dt| render_datetime(&dt))
                .or_else(|| Some(render_float(value.as_f64()))),
        }
    }
}

impl TableReader for SpreadsheetReader {
    fn format(&self) -> SourceFormat {
        SourceFormat::Spreadsheet
    }

    fn read(&self, bytes: &[u8]) -> Result<DataFrame, ReaderError> {
        let mut workbook =
            open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|err| {
                ReaderError::Workbook {
                    reader: Self::NAME,
                    message: err.to_string(),
                }
            })?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or(ReaderError::EmptyTable { reader: Self::NAME })?
            .map_err(|err| ReaderError::Workbook {
                reader: Self::NAME,
                message: err.to_string(),
            })?;

        // The used range starts at the first non-empty sheet row, which may
        // already be below the banner.
        let first_row = range.start().map(|(row, _)| row).unwrap_or(0);
        let skip = self.leading_rows.saturating_sub(first_row) as usize;

        let mut rows = range.rows().skip(skip);
        let header = rows.next().ok_or(ReaderError::EmptyTable { reader: Self::NAME })?;
        let header_names: Vec<String> = header
            .iter()
            .map(|cell| Self::cell_text(cell).unwrap_or_default())
            .collect();

        let mut builder = TableBuilder::new(Self::NAME, &header_names)?;
        for row in rows {
            if row.iter().all(|cell| matches!(cell, Data::Empty)) {
                continue;
            }
            builder.push_row(row.iter().map(Self::cell_text))?;
        }

        builder.build()
    }
}
