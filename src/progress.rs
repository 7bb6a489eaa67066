use crate::deadline::LatenessPeriod;

/// Trait for reporting intake progress.
///
/// The surrounding application implements this for its own display; all
/// methods have default no-op implementations.
pub trait IntakeReporter: Send + Sync {
    fn on_extract_start(&self, _submission: &str) {}
    fn on_extract_complete(&self, _entries: usize, _duration_secs: f64) {}
    fn on_validate_start(&self, _submission: &str) {}
    fn on_validate_complete(&self, _missing: usize) {}
    fn on_classified(&self, _submission: &str, _period: LatenessPeriod, _score: i64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl IntakeReporter for SilentReporter {}
