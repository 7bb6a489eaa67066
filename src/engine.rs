use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use glob::Pattern;
use rayon::prelude::*;
use tracing::{error, info, warn};

use crate::archive::{self};
use crate::config::AssignmentConfig;
use crate::deadline::{DeadlinePolicy, LatenessPeriod};
use crate::error::Error;
use crate::extension::{self, ExtensionOverride};
use crate::extract::{self, ExtractionResult};
use crate::progress::IntakeReporter;
use crate::validate::{self, ValidationReport};

/// One student or group hand-in: the archive, the fresh directory to
/// unpack it into, when it was received, and any extension on record.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: String,
    pub archive: PathBuf,
    pub destination_root: PathBuf,
    pub submitted_at: DateTime<Utc>,
    pub extension: Option<ExtensionOverride>,
}

/// Terminal state of one intake attempt.
///
/// `Rejected` with a root means the unpacked tree was deliberately left in
/// place so a grader can inspect what was actually submitted; without a
/// root, the submission was turned away before extraction.
#[derive(Debug)]
pub enum IntakeOutcome {
    Failed {
        extraction: ExtractionResult,
    },
    Rejected {
        root: Option<PathBuf>,
        report: ValidationReport,
    },
    Classified {
        root: PathBuf,
        created: Vec<PathBuf>,
        period: LatenessPeriod,
        score: i64,
        needs_review: bool,
    },
}

/// Sequences extraction, validation, and lateness classification for one
/// assignment's submissions.
pub struct IntakeEngine {
    assignment: AssignmentConfig,
    policy: DeadlinePolicy,
    ignore: Vec<Pattern>,
    cancel: Arc<AtomicBool>,
    in_flight: DashMap<PathBuf, ()>,
}

impl IntakeEngine {
    /// Build an engine for one assignment. Deadline ordering is validated
    /// here, before any submission is processed.
    pub fn new(assignment: AssignmentConfig) -> Result<Self, Error> {
        let policy = assignment.policy()?;
        let ignore = compile_ignore(&assignment.ignore_patterns);
        Ok(Self {
            assignment,
            policy,
            ignore,
            cancel: Arc::new(AtomicBool::new(false)),
            in_flight: DashMap::new(),
        })
    }

    /// Token observed by in-flight extractions. Raising it makes the
    /// current extraction clean up and return `Cancelled`.
    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn policy(&self) -> &DeadlinePolicy {
        &self.policy
    }

    /// Run the full intake pipeline for one submission.
    ///
    /// Pipeline failures (extraction, missing requirements) come back as
    /// outcome data; configuration-level failures (an extension that
    /// inverts the deadline interval, a destination root already claimed
    /// by a concurrent attempt) are errors. Nothing is retried.
    pub fn process(
        &self,
        submission: &Submission,
        reporter: &dyn IntakeReporter,
    ) -> Result<IntakeOutcome, Error> {
        info!(
            "Processing submission '{}' from {}",
            submission.id,
            submission.archive.display()
        );

        let mut source = match archive::open_source(&submission.archive) {
            Ok(source) => source,
            Err(cause) => {
                warn!("Cannot open archive for '{}': {}", submission.id, cause);
                return Ok(IntakeOutcome::Failed {
                    extraction: ExtractionResult::Failure {
                        partial: false,
                        remaining: Vec::new(),
                        cause,
                    },
                });
            }
        };

        if self.assignment.preflight {
            reporter.on_validate_start(&submission.id);
            let entries = match source.list() {
                Ok(entries) => entries,
                Err(cause) => {
                    warn!("Cannot list archive for '{}': {}", submission.id, cause);
                    return Ok(IntakeOutcome::Failed {
                        extraction: ExtractionResult::Failure {
                            partial: false,
                            remaining: Vec::new(),
                            cause,
                        },
                    });
                }
            };
            let candidates = validate::candidates_from_entries(&entries);
            let report = validate::validate(&candidates, &self.assignment.required);
            reporter.on_validate_complete(report.missing().len());
            if !report.is_empty() {
                info!(
                    "Submission '{}' rejected before extraction, {} requirement(s) missing",
                    submission.id,
                    report.missing().len()
                );
                return Ok(IntakeOutcome::Rejected { root: None, report });
            }
        }

        let root = submission.destination_root.clone();
        let _guard = match RootGuard::acquire(&self.in_flight, root.clone()) {
            Some(guard) => guard,
            None => return Err(Error::DestinationBusy(root)),
        };

        reporter.on_extract_start(&submission.id);
        let extract_start = Instant::now();
        let (root, created) =
            match extract::extract(source.as_mut(), &root, &self.ignore, &self.cancel) {
                ExtractionResult::Success { root, created } => {
                    reporter
                        .on_extract_complete(created.len(), extract_start.elapsed().as_secs_f64());
                    (root, created)
                }
                ExtractionResult::Failure {
                    partial,
                    remaining,
                    cause,
                } => {
                    warn!(
                        "Extraction failed for '{}' (partial cleanup: {}): {}",
                        submission.id, partial, cause
                    );
                    return Ok(IntakeOutcome::Failed {
                        extraction: ExtractionResult::Failure {
                            partial,
                            remaining,
                            cause,
                        },
                    });
                }
            };

        reporter.on_validate_start(&submission.id);
        let listing = validate::list_tree(&root)?;
        let report = validate::validate(&listing, &self.assignment.required);
        reporter.on_validate_complete(report.missing().len());
        if !report.is_empty() {
            // The unpacked tree stays on disk for grader inspection.
            info!(
                "Submission '{}' rejected, {} requirement(s) missing",
                submission.id,
                report.missing().len()
            );
            return Ok(IntakeOutcome::Rejected {
                root: Some(root),
                report,
            });
        }

        let effective = extension::resolve(&self.policy, submission.extension.as_ref())?;
        let period = effective.classify(submission.submitted_at);
        let score = effective.score(period);
        let needs_review = period == LatenessPeriod::TooLate;
        reporter.on_classified(&submission.id, period, score);
        info!(
            "Submission '{}' classified {:?} with score {}",
            submission.id, period, score
        );

        Ok(IntakeOutcome::Classified {
            root,
            created,
            period,
            score,
            needs_review,
        })
    }

    /// Process independent submissions in parallel. Each runs the full
    /// pipeline against its own destination root; no ordering holds
    /// across submissions.
    pub fn process_batch(
        &self,
        submissions: &[Submission],
        reporter: &dyn IntakeReporter,
    ) -> Vec<(String, Result<IntakeOutcome, Error>)> {
        submissions
            .par_iter()
            .map(|submission| (submission.id.clone(), self.process(submission, reporter)))
            .collect()
    }
}

fn compile_ignore(ignore_globs: &[String]) -> Vec<Pattern> {
    ignore_globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                error!("Invalid glob pattern '{}': {}", glob, e);
                None
            }
        })
        .collect()
}

/// Exclusive claim on a destination root for the duration of one attempt.
struct RootGuard<'a> {
    in_flight: &'a DashMap<PathBuf, ()>,
    root: PathBuf,
}

impl<'a> RootGuard<'a> {
    fn acquire(in_flight: &'a DashMap<PathBuf, ()>, root: PathBuf) -> Option<Self> {
        if in_flight.insert(root.clone(), ()).is_some() {
            return None;
        }
        Some(Self { in_flight, root })
    }
}

impl Drop for RootGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.remove(&self.root);
    }
}
