pub mod augment;
pub mod columns;
pub mod conversion;
pub mod error;
pub mod pipeline;
pub mod profiles;
pub mod render;
pub mod sanitize;
pub mod timestamps;
pub mod transform;
pub mod units;

pub use error::{PipelineError, Result};
pub use pipeline::{parse_exclusions, process, Pipeline, PipelineRequest, ProcessedReport};
pub use profiles::{Cadence, RegionProfile, RegionRegistry, UnitSystem};
pub use units::UnitFactors;
