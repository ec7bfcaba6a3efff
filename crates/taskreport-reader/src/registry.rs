use polars::prelude::DataFrame;

use crate::errors::ReaderError;
use crate::formats::{DelimitedReader, SpreadsheetReader};
use crate::model::SourceFormat;

pub trait TableReader {
    fn format(&self) -> SourceFormat;
    fn read(&self, bytes: &[u8]) -> Result<DataFrame, ReaderError>;
}

/// Loads an uploaded file into a table of nullable text columns, choosing the
/// reader from the declared file name.
pub fn read_upload(file_name: &str, bytes: &[u8]) -> Result<DataFrame, ReaderError> {
    let delimited = DelimitedReader;
    let spreadsheet = SpreadsheetReader::default();
    let readers: [&dyn TableReader; 2] = [&delimited, &spreadsheet];
    read_with_readers(file_name, bytes, &readers)
}

pub fn read_with_readers(
    file_name: &str,
    bytes: &[u8],
    readers: &[&dyn TableReader],
) -> Result<DataFrame, ReaderError> {
    let unsupported = || ReaderError::UnsupportedFormat {
        file_name: file_name.to_string(),
    };

    let format = SourceFormat::from_file_name(file_name).ok_or_else(unsupported)?;
    let reader = readers
        .iter()
        .find(|reader| reader.format() == format)
        .ok_or_else(unsupported)?;

    reader.read(bytes)
}
