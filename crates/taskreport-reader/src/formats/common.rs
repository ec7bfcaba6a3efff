use std::collections::HashSet;

use polars::prelude::*;

use crate::errors::ReaderError;
use crate::model::CellText;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Column-major accumulator shared by the readers. Every column ends up as a
/// nullable UTF-8 series named after its header cell.
pub(crate) struct TableBuilder {
    reader: &'static str,
    headers: Vec<String>,
    columns: Vec<Vec<CellText>>,
    rows: usize,
}

impl TableBuilder {
    pub fn new<I, S>(reader: &'static str, headers: I) -> Result<Self, ReaderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = Vec::new();
        let mut seen = HashSet::new();
        for (idx, raw) in headers.into_iter().enumerate() {
            let mut name = raw.as_ref().trim_start_matches(BYTE_ORDER_MARK).trim().to_string();
            if name.is_empty() {
                name = format!("Unnamed: {idx}");
            }
            if !seen.insert(name.clone()) {
                return Err(ReaderError::InvalidHeader {
                    reader,
                    message: format!("column '{name}' appears more than once"),
                });
            }
            names.push(name);
        }

        if names.is_empty() {
            return Err(ReaderError::EmptyTable { reader });
        }

        let columns = vec![Vec::new(); names.len()];
        Ok(Self {
            reader,
            headers: names,
            columns,
            rows: 0,
        })
    }

    /// Appends one row. Short rows are padded with empty cells; a row wider
    /// than the header is rejected unless the surplus cells are all empty.
    pub fn push_row<I>(&mut self, cells: I) -> Result<(), ReaderError>
    where
        I: IntoIterator<Item = CellText>,
    {
        let mut cells = cells.into_iter();
        let mut row: Vec<CellText> = Vec::with_capacity(self.columns.len());
        for _ in 0..self.columns.len() {
            row.push(cells.next().flatten());
        }

        let expected = self.columns.len();
        let mut found = expected;
        for (offset, surplus) in cells.enumerate() {
            if surplus.is_some() {
                found = expected + offset + 1;
            }
        }
        if found > expected {
            return Err(ReaderError::WideRow {
                reader: self.reader,
                row: self.rows + 1,
                expected,
                found,
            });
        }

        for (column, cell) in self.columns.iter_mut().zip(row) {
            column.push(cell);
        }
        self.rows += 1;
        Ok(())
    }

    pub fn build(self) -> Result<DataFrame, ReaderError> {
        let reader = self.reader;
        let columns: Vec<Column> = self
            .headers
            .iter()
            .zip(self.columns.iter())
            .map(|(name, values)| {
                let utf8: Vec<Option<&str>> = values.iter().map(|v| v.as_deref()).collect();
                Series::new(name.as_str().into(), utf8).into()
            })
            .collect();

        DataFrame::new(columns).map_err(|source| ReaderError::Table { reader, source })
    }
}

pub(crate) fn clean_cell(value: &str) -> CellText {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
