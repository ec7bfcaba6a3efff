use std::collections::HashSet;

use chrono::NaiveDateTime;
use polars::prelude::*;
use tracing::debug;

use crate::columns::{canonical_labels, dropped_columns, ReportColumn};
use crate::error::{PipelineError, Result};
use crate::profiles::UnitSystem;
use crate::timestamps::{parse_receipt, RECEIPT_FORMAT};

/// Which rows survive the transform.
#[derive(Debug, Clone, Copy)]
pub struct RowFilter<'a> {
    /// Rows must have been received strictly after this instant.
    pub cutoff: NaiveDateTime,
    /// Serial numbers to leave out, matched exactly.
    pub exclude: Option<&'a HashSet<String>>,
}

/// Reshapes a raw export into the canonical layout for `units`:
/// drops the export-only columns, prepends an empty `Id`, keeps rows received
/// after the cutoff (minus excluded serials) newest first, selects the
/// canonical columns and stamps the crystallization columns with `adjusted`.
///
/// Empty cells stay null; sentinel substitution happens in [`crate::sanitize`].
pub fn transform_rows(
    source: DataFrame,
    units: UnitSystem,
    filter: &RowFilter<'_>,
    adjusted: &str,
) -> Result<DataFrame> {
    let rows_in = source.height();

    let mut df = drop_report_irrelevant(source, units)?;
    ensure_canonical_columns(&df, units)?;

    let id_label = ReportColumn::Id.label(units);
    let height = df.height();
    df.insert_column(
        0,
        Series::full_null(id_label.into(), height, &DataType::String),
    )?;

    let df = filter_and_sort(&df, units, filter)?;
    let mut df = df.select(canonical_labels(units))?;
    stamp_crystallization(&mut df, units, adjusted)?;

    debug!(
        rows_in,
        rows_kept = df.height(),
        cutoff = %filter.cutoff,
        %units,
        "transformed report rows"
    );

    Ok(df)
}

fn drop_report_irrelevant(mut df: DataFrame, units: UnitSystem) -> Result<DataFrame> {
    for name in dropped_columns(units) {
        if df.get_column_index(name).is_some() {
            df = df.drop(name)?;
        }
    }
    // filled downstream, never taken from the export
    let id_label = ReportColumn::Id.label(units);
    if df.get_column_index(id_label).is_some() {
        df = df.drop(id_label)?;
    }
    Ok(df)
}

fn ensure_canonical_columns(df: &DataFrame, units: UnitSystem) -> Result<()> {
    for column in ReportColumn::CANONICAL.iter().filter(|c| c.is_sourced()) {
        let label = column.label(units);
        if df.get_column_index(label).is_none() {
            return Err(PipelineError::MissingColumn {
                column: label.to_string(),
            });
        }
    }
    Ok(())
}

fn filter_and_sort(df: &DataFrame, units: UnitSystem, filter: &RowFilter<'_>) -> Result<DataFrame> {
    let receipt_label = ReportColumn::ReceiveTaskReportTime.label(units);
    let serial_label = ReportColumn::SerialNumber.label(units);

    let receipts = df.column(receipt_label)?.cast(&DataType::String)?;
    let receipts = receipts.str()?;
    let serials = df.column(serial_label)?.cast(&DataType::String)?;
    let serials = serials.str()?;

    let mut kept: Vec<(IdxSize, NaiveDateTime)> = Vec::new();
    for (row, value) in receipts.into_iter().enumerate() {
        // an empty receipt never compares greater than the cutoff
        let Some(text) = value else {
            continue;
        };
        let received = parse_receipt(text).ok_or_else(|| {
            PipelineError::MalformedInput(format!(
                "data row {}: '{receipt_label}' value '{text}' is not a timestamp",
                row + 1
            ))
        })?;
        if received <= filter.cutoff {
            continue;
        }
        if let Some(exclude) = filter.exclude {
            if serials.get(row).is_some_and(|serial| exclude.contains(serial)) {
                continue;
            }
        }
        kept.push((row as IdxSize, received));
    }

    // stable, so rows sharing a receipt time keep their export order
    kept.sort_by(|a, b| b.1.cmp(&a.1));

    let indices = IdxCa::from_vec("row".into(), kept.iter().map(|(row, _)| *row).collect());
    let mut out = df.take(&indices)?;

    let normalized: Vec<String> = kept
        .iter()
        .map(|(_, received)| received.format(RECEIPT_FORMAT).to_string())
        .collect();
    out.with_column(Series::new(receipt_label.into(), normalized))?;

    Ok(out)
}

/// Overwrites both crystallization-area columns with `adjusted` on every row.
/// Whatever the export held there is discarded; the destination derives these
/// fields from the stamp.
pub fn stamp_crystallization(df: &mut DataFrame, units: UnitSystem, adjusted: &str) -> Result<()> {
    let height = df.height();
    for column in ReportColumn::CRYSTALLIZATION {
        let label = column.label(units);
        if df.get_column_index(label).is_none() {
            return Err(PipelineError::MissingColumn {
                column: label.to_string(),
            });
        }
        df.with_column(Series::new(label.into(), vec![adjusted; height]))?;
    }
    Ok(())
}

/// Newest receipt time in a transformed table, if any row has one.
pub fn latest_receipt(df: &DataFrame, units: UnitSystem) -> Result<Option<NaiveDateTime>> {
    let receipts = df
        .column(ReportColumn::ReceiveTaskReportTime.label(units))?
        .cast(&DataType::String)?;
    Ok(receipts
        .str()?
        .into_iter()
        .flatten()
        .filter_map(parse_receipt)
        .max())
}
