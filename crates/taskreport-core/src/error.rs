// crates/taskreport-core/src/error.rs

use taskreport_reader::ReaderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Missing column '{column}' in uploaded report")]
    MissingColumn { column: String },

    #[error("Unknown server '{server_id}'")]
    UnknownServer { server_id: String },

    #[error("Invalid timestamp '{value}': expected format YYYY-MM-DD HH:MM:SS")]
    InvalidTimestamp { value: String },

    #[error("Column '{column}' row {row} is not numeric: '{value}'")]
    NonNumericValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Region configuration error: {0}")]
    Config(String),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Rendering failed: {0}")]
    Render(String),
}

impl From<ReaderError> for PipelineError {
    fn from(err: ReaderError) -> Self {
        if err.is_unsupported_format() {
            PipelineError::UnsupportedFormat(err.to_string())
        } else {
            PipelineError::MalformedInput(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
