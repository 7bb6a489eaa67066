pub mod archive;
pub mod config;
pub mod deadline;
pub mod engine;
pub mod error;
pub mod extension;
pub mod extract;
pub mod paths;
pub mod predicate;
pub mod progress;
pub mod validate;

pub use archive::{open_source, ArchiveEntry, EntrySource};
pub use crate::config::{load_configuration, AssignmentConfig, DeadlineConfig};
pub use deadline::{DeadlinePolicy, LatenessPeriod, PointScheme};
pub use engine::{IntakeEngine, IntakeOutcome, Submission};
pub use error::Error;
pub use extension::{resolve, Adjustment, ExtensionOverride};
pub use extract::{extract, ExtractionResult};
pub use predicate::PathPredicate;
pub use progress::{IntakeReporter, SilentReporter};
pub use validate::{list_tree, validate, ValidationReport};
