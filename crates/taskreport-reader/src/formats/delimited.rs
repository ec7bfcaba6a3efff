use polars::prelude::DataFrame;

use crate::errors::ReaderError;
use crate::model::SourceFormat;
use crate::registry::TableReader;

use super::{clean_cell, TableBuilder};

/// Comma separated export with the header on the first line. Rows may stop
/// short of the header; missing trailing cells read as empty.
pub struct DelimitedReader;

impl Default for DelimitedReader {
    fn default() -> Self {
        Self
    }
}

impl DelimitedReader {
    const NAME: &'static str = "DELIMITED";
}

impl TableReader for DelimitedReader {
    fn format(&self) -> SourceFormat {
        SourceFormat::Delimited
    }

    fn read(&self, bytes: &[u8]) -> Result<DataFrame, ReaderError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers = reader
            .headers()
            .map_err(|source| ReaderError::Csv {
                reader: Self::NAME,
                source,
            })?
            .clone();

        let mut builder = TableBuilder::new(Self::NAME, headers.iter())?;

        for record in reader.records() {
            let record = record.map_err(|source| ReaderError::Csv {
                reader: Self::NAME,
                source,
            })?;
            builder.push_row(record.iter().map(clean_cell))?;
        }

        builder.build()
    }
}
