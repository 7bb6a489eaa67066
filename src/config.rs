use std::path::Path;

use chrono::{DateTime, Utc};
use config::{Config, ConfigError, File as ConfigFile};
use serde::Deserialize;

use crate::deadline::{DeadlinePolicy, PointScheme};
use crate::error::Error;
use crate::predicate::PathPredicate;

/// Per-assignment intake configuration, supplied by the surrounding
/// application as plain data or loaded from a file.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentConfig {
    pub name: String,
    pub required: Vec<PathPredicate>,
    pub deadlines: DeadlineConfig,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    /// Validate the archive listing before anything touches the
    /// filesystem, rejecting malformed submissions without extracting.
    #[serde(default = "default_preflight")]
    pub preflight: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeadlineConfig {
    pub outdate: DateTime<Utc>,
    pub early: DateTime<Utc>,
    pub on_time: DateTime<Utc>,
    pub late: DateTime<Utc>,
    pub points: PointScheme,
}

fn default_preflight() -> bool {
    true
}

impl AssignmentConfig {
    /// Build the validated deadline policy. Out-of-order instants are a
    /// configuration error and fail here, before any submission is seen.
    pub fn policy(&self) -> Result<DeadlinePolicy, Error> {
        DeadlinePolicy::new(
            self.deadlines.outdate,
            self.deadlines.early,
            self.deadlines.on_time,
            self.deadlines.late,
            self.deadlines.points,
        )
    }
}

pub fn load_configuration(path: &Path) -> Result<AssignmentConfig, ConfigError> {
    let builder = Config::builder().add_source(ConfigFile::from(path)).build()?;
    builder.try_deserialize::<AssignmentConfig>()
}
