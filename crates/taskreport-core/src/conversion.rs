use polars::prelude::*;
use taskreport_reader::render_float;
use tracing::debug;

use crate::columns::ReportColumn;
use crate::error::{PipelineError, Result};
use crate::profiles::{RegionProfile, UnitSystem};
use crate::units::UnitFactors;

/// Rescales the volume and area/rate columns for imperial regions. Metric
/// regions pass through untouched.
///
/// Runs on the null-preserving table: empty cells stay empty, a `-`
/// placeholder counts as zero, thousands separators are ignored.
pub fn convert_units(df: &mut DataFrame, profile: &RegionProfile, factors: &UnitFactors) -> Result<()> {
    if profile.units != UnitSystem::Imperial {
        return Ok(());
    }

    let units = profile.units;
    scale_column(
        df,
        ReportColumn::WaterUsage.label(units),
        factors.liters_per_gallon,
        factors,
    )?;
    for column in ReportColumn::COMMA_BEARING {
        scale_column(
            df,
            column.label(units),
            factors.square_meters_per_square_foot,
            factors,
        )?;
    }

    debug!(server = %profile.server_id, rows = df.height(), "converted imperial columns");
    Ok(())
}

fn scale_column(df: &mut DataFrame, label: &str, factor: f64, factors: &UnitFactors) -> Result<()> {
    let text = df.column(label)?.cast(&DataType::String)?;
    let values = text.str()?;

    let mut converted: Vec<Option<String>> = Vec::with_capacity(values.len());
    for (row, value) in values.into_iter().enumerate() {
        let Some(raw) = value else {
            converted.push(None);
            continue;
        };
        let number = parse_quantity(raw).ok_or_else(|| PipelineError::NonNumericValue {
            column: label.to_string(),
            row: row + 1,
            value: raw.to_string(),
        })?;
        let rendered = render_float(factors.round(number * factor));
        converted.push(Some(normalize_zero(rendered)));
    }

    df.with_column(Series::new(label.into(), converted))?;
    Ok(())
}

fn parse_quantity(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned == "-" {
        return Some(0.0);
    }
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn normalize_zero(rendered: String) -> String {
    if rendered == "0.0" {
        "0".to_string()
    } else {
        rendered
    }
}
