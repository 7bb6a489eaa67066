use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::deadline::DeadlinePolicy;
use crate::error::Error;

/// How an extension adjusts the base policy: a uniform shift of all four
/// boundaries, or a replacement on-time instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Adjustment {
    Shift { seconds: i64 },
    ReplaceOnTime { on_time: DateTime<Utc> },
}

/// A per-student or per-group deadline override.
///
/// Overrides are never edited in place; a newer record supersedes an older
/// one in the external store that hands them to us.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionOverride {
    pub grantee: String,
    pub adjustment: Adjustment,
    pub note: String,
    pub granted_by: String,
    pub granted_at: DateTime<Utc>,
}

/// Merge a base policy with an optional override into the effective
/// policy for one (assignment, student-or-group) pair.
///
/// A replacement on-time keeps the base policy's `on_time - early` and
/// `late - on_time` gaps. When the replacement would invert the interval
/// (for example, a replacement earlier than the original early boundary
/// pushing `early` before `outdate`), it is rejected as a configuration
/// error rather than silently accepted.
pub fn resolve(
    base: &DeadlinePolicy,
    extension: Option<&ExtensionOverride>,
) -> Result<DeadlinePolicy, Error> {
    let extension = match extension {
        Some(extension) => extension,
        None => return Ok(base.clone()),
    };

    match &extension.adjustment {
        Adjustment::Shift { seconds } => Ok(base.shifted(Duration::seconds(*seconds))),
        Adjustment::ReplaceOnTime { on_time } => {
            let early_gap = base.on_time() - base.early();
            let late_gap = base.late() - base.on_time();
            DeadlinePolicy::new(
                base.outdate(),
                *on_time - early_gap,
                *on_time,
                *on_time + late_gap,
                base.points(),
            )
            .map_err(|_| {
                Error::ExtensionInverted(format!(
                    "replacement on-time {} for '{}' breaks boundary ordering",
                    on_time, extension.grantee
                ))
            })
        }
    }
}
