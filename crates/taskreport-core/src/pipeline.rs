use std::collections::HashSet;

use polars::prelude::DataFrame;
use tracing::{debug, info, warn};

use crate::augment::augment_columns;
use crate::conversion::convert_units;
use crate::error::Result;
use crate::profiles::{RegionProfile, RegionRegistry};
use crate::render::TableSummary;
use crate::sanitize::finalize;
use crate::timestamps::parse_cutoff;
use crate::transform::{transform_rows, RowFilter};
use crate::units::UnitFactors;

/// One uploaded file plus the form inputs that accompany it.
#[derive(Debug, Clone, Copy)]
pub struct PipelineRequest<'a> {
    pub file_name: &'a str,
    pub bytes: &'a [u8],
    pub server_id: &'a str,
    /// `YYYY-MM-DD HH:MM:SS`; only rows received after it are kept.
    pub cutoff: &'a str,
    /// Value stamped into the crystallization columns.
    pub adjusted_timestamp: &'a str,
    pub exclude: Option<&'a HashSet<String>>,
    /// Append empty `lat`/`lng` columns.
    pub with_coordinates: bool,
}

#[derive(Debug, Clone)]
pub struct ProcessedReport {
    pub profile: RegionProfile,
    pub table: DataFrame,
}

impl ProcessedReport {
    pub fn summary(&self) -> TableSummary {
        TableSummary::of(&self.table)
    }
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    registry: RegionRegistry,
    factors: UnitFactors,
}

impl Pipeline {
    pub fn new(registry: RegionRegistry) -> Self {
        Self {
            registry,
            factors: UnitFactors::default(),
        }
    }

    pub fn with_factors(mut self, factors: UnitFactors) -> Self {
        self.factors = factors;
        self
    }

    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    /// Runs the whole transformation for one upload. The region profile is
    /// resolved before the file is touched and the first failing stage aborts
    /// the call.
    pub fn process(&self, request: &PipelineRequest<'_>) -> Result<ProcessedReport> {
        let profile = self.registry.resolve(request.server_id)?;
        let cutoff = parse_cutoff(request.cutoff)?;

        let source = taskreport_reader::read_upload(request.file_name, request.bytes)?;
        debug!(
            file = request.file_name,
            rows = source.height(),
            columns = source.width(),
            "loaded upload"
        );

        let filter = RowFilter {
            cutoff,
            exclude: request.exclude,
        };
        let mut table = transform_rows(source, profile.units, &filter, request.adjusted_timestamp)?;
        if table.height() == 0 {
            warn!(server = %profile.server_id, cutoff = request.cutoff, "no rows received after cutoff");
        }

        convert_units(&mut table, profile, &self.factors)?;
        let table = finalize(&table, profile.units)?;
        let table = augment_columns(table, profile, request.with_coordinates)?;

        info!(
            server = %profile.server_id,
            units = %profile.units,
            rows = table.height(),
            columns = table.width(),
            "processed task report"
        );

        Ok(ProcessedReport {
            profile: profile.clone(),
            table,
        })
    }
}

/// Runs [`Pipeline::process`] against the built-in server table.
pub fn process(request: &PipelineRequest<'_>) -> Result<ProcessedReport> {
    Pipeline::new(RegionRegistry::builtin()?).process(request)
}

/// Splits a comma separated list of serial numbers, trimming each entry.
/// Returns `None` when nothing remains to exclude.
pub fn parse_exclusions(input: &str) -> Option<HashSet<String>> {
    let values: HashSet<String> = input
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}
