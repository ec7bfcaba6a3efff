use polars::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::profiles::RegionProfile;
use crate::sanitize::fill_absent;

/// Metadata the non-primary exports do not carry; the destination fills them.
pub const PLACEHOLDER_COLUMNS: [&str; 2] = ["Site Id", "Vendor Name"];
pub const COORDINATE_COLUMNS: [&str; 2] = ["lat", "lng"];

/// Appends the placeholder columns for non-primary regions and, on request,
/// the coordinate columns, then writes `NULL` into every empty cell.
/// The primary region without coordinates passes through unchanged.
pub fn augment_columns(mut df: DataFrame, profile: &RegionProfile, with_coordinates: bool) -> Result<DataFrame> {
    let mut appended: Vec<&str> = Vec::new();
    if profile.needs_placeholder_columns() {
        appended.extend(PLACEHOLDER_COLUMNS);
    }
    if with_coordinates {
        appended.extend(COORDINATE_COLUMNS);
    }
    if appended.is_empty() {
        return Ok(df);
    }

    let height = df.height();
    for name in &appended {
        df.with_column(Series::full_null((*name).into(), height, &DataType::String))?;
    }
    debug!(server = %profile.server_id, columns = ?appended, "appended placeholder columns");

    fill_absent(&df)
}
