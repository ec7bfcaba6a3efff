use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

const BUILTIN_SERVERS: &str = include_str!("../config/servers.toml");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    Metric,
    Imperial,
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Metric => f.write_str("metric"),
            UnitSystem::Imperial => f.write_str("imperial"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Daily,
    Weekly,
}

impl Cadence {
    pub fn task_label(&self) -> &'static str {
        match self {
            Cadence::Daily => "Daily Task",
            Cadence::Weekly => "Weekly Task",
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cadence::Daily => f.write_str("daily"),
            Cadence::Weekly => f.write_str("weekly"),
        }
    }
}

/// Processing rules for one report server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RegionProfile {
    #[serde(rename = "id")]
    pub server_id: String,
    pub units: UnitSystem,
    pub cadence: Cadence,
    pub utc_offset_hours: i32,
    #[serde(default)]
    pub primary: bool,
}

impl RegionProfile {
    pub fn utc_offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
    }

    /// Every region except the primary metric one carries the two
    /// placeholder columns in its output.
    pub fn needs_placeholder_columns(&self) -> bool {
        !(self.primary && self.units == UnitSystem::Metric)
    }
}

#[derive(Debug, Deserialize)]
struct RegistryDocument {
    #[serde(default)]
    servers: Vec<RegionProfile>,
}

/// The configured set of servers, in declaration order.
#[derive(Debug, Clone)]
pub struct RegionRegistry {
    profiles: Vec<RegionProfile>,
}

impl RegionRegistry {
    pub fn new(profiles: Vec<RegionProfile>) -> Result<Self> {
        let mut seen = HashSet::new();
        for profile in &profiles {
            if !seen.insert(profile.server_id.as_str()) {
                return Err(PipelineError::Config(format!(
                    "server '{}' is declared more than once",
                    profile.server_id
                )));
            }
            if profile.utc_offset().is_none() {
                return Err(PipelineError::Config(format!(
                    "server '{}' has out-of-range utc_offset_hours {}",
                    profile.server_id, profile.utc_offset_hours
                )));
            }
        }

        let primaries = profiles.iter().filter(|profile| profile.primary).count();
        if primaries != 1 {
            return Err(PipelineError::Config(format!(
                "expected exactly one primary server, found {primaries}"
            )));
        }

        Ok(Self { profiles })
    }

    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_SERVERS)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let document: RegistryDocument = toml::from_str(toml_str)
            .map_err(|err| PipelineError::Config(format!("failed to parse server table: {err}")))?;
        Self::new(document.servers)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|err| match err {
            PipelineError::Config(message) => {
                PipelineError::Config(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }

    pub fn resolve(&self, server_id: &str) -> Result<&RegionProfile> {
        self.profiles
            .iter()
            .find(|profile| profile.server_id == server_id)
            .ok_or_else(|| PipelineError::UnknownServer {
                server_id: server_id.to_string(),
            })
    }

    pub fn server_ids(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|profile| profile.server_id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegionProfile> {
        self.profiles.iter()
    }
}
