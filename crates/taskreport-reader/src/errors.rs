use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("unsupported file format for '{file_name}' (expected .csv, .xlsx, .xlsm or .xls)")]
    UnsupportedFormat { file_name: String },

    #[error("{reader} CSV error: {source}")]
    Csv {
        reader: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{reader} workbook error: {message}")]
    Workbook {
        reader: &'static str,
        message: String,
    },

    #[error("{reader} header row invalid: {message}")]
    InvalidHeader {
        reader: &'static str,
        message: String,
    },

    #[error("{reader} data row {row} has {found} cells but the header has {expected}")]
    WideRow {
        reader: &'static str,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{reader} file did not contain a header row")]
    EmptyTable { reader: &'static str },

    #[error("{reader} failed to build table: {source}")]
    Table {
        reader: &'static str,
        #[source]
        source: polars::error::PolarsError,
    },
}

impl ReaderError {
    /// True when the upload was rejected before any parsing was attempted.
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, ReaderError::UnsupportedFormat { .. })
    }
}
