use std::fmt;
use std::path::Path;

use polars::prelude::*;
use rust_xlsxwriter::Workbook;

use crate::error::{PipelineError, Result};

pub const SHEET_NAME: &str = "Sheet1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSummary {
    pub rows: usize,
    pub columns: usize,
}

impl TableSummary {
    pub fn of(df: &DataFrame) -> Self {
        Self {
            rows: df.height(),
            columns: df.width(),
        }
    }
}

impl fmt::Display for TableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed DataFrame Size: {} columns and {} rows",
            self.columns, self.rows
        )
    }
}

/// `{server_id}_{stem}_transformed.xlsx`, where `stem` is the uploaded name
/// without its final extension.
pub fn download_file_name(server_id: &str, original_file_name: &str) -> String {
    let stem = Path::new(original_file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| original_file_name.to_string());
    format!("{server_id}_{stem}_transformed.xlsx")
}

fn text_columns(df: &DataFrame) -> Result<Vec<Column>> {
    Ok(df
        .get_columns()
        .iter()
        .map(|column| column.cast(&DataType::String))
        .collect::<PolarsResult<Vec<_>>>()?)
}

/// Comma separated rows without a header line, ready for pasting into the
/// destination's bulk-insert form.
pub fn render_clipboard_csv(df: &DataFrame) -> Result<String> {
    let columns = text_columns(df)?;
    let values = columns
        .iter()
        .map(|column| column.str())
        .collect::<PolarsResult<Vec<_>>>()?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for row in 0..df.height() {
        writer
            .write_record(values.iter().map(|ca| ca.get(row).unwrap_or("")))
            .map_err(|err| PipelineError::Render(format!("failed to write row {row}: {err}")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| PipelineError::Render(format!("failed to flush rows: {err}")))?;
    String::from_utf8(bytes).map_err(|err| PipelineError::Render(err.to_string()))
}

/// Single-sheet workbook holding the header row and every cell as text.
pub fn render_xlsx(df: &DataFrame) -> Result<Vec<u8>> {
    let columns = text_columns(df)?;
    let render_err = |err: rust_xlsxwriter::XlsxError| PipelineError::Render(err.to_string());

    let mut workbook = Workbook::new();
    {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME).map_err(render_err)?;

        for (col_idx, column) in columns.iter().enumerate() {
            let col = u16::try_from(col_idx)
                .map_err(|_| PipelineError::Render(format!("too many columns ({col_idx})")))?;
            worksheet
                .write_string(0, col, column.name().as_str())
                .map_err(render_err)?;

            for (row_idx, value) in column.str()?.into_iter().enumerate() {
                let Some(value) = value else {
                    continue;
                };
                let row = u32::try_from(row_idx + 1)
                    .map_err(|_| PipelineError::Render(format!("too many rows ({row_idx})")))?;
                worksheet
                    .write_string(row, col, value)
                    .map_err(render_err)?;
            }
        }
    }

    workbook.save_to_buffer().map_err(render_err)
}
