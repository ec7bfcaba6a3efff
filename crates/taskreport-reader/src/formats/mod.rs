mod common;
mod delimited;
mod spreadsheet;

pub use delimited::DelimitedReader;
pub use spreadsheet::SpreadsheetReader;

pub(crate) use common::{clean_cell, TableBuilder};
