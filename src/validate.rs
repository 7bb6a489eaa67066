use std::collections::BTreeSet;
use std::path::Path;

use walkdir::WalkDir;

use crate::archive::ArchiveEntry;
use crate::error::Error;
use crate::predicate::PathPredicate;

/// Ordered list of human-readable descriptions of missing required paths.
/// Empty means the submission is fully present.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    missing: Vec<String>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn missing(&self) -> &[String] {
        &self.missing
    }
}

/// Check every required rule against the candidate paths. All unmet
/// requirements are reported; the first failure never short-circuits the
/// rest, so one pass shows the user everything to fix.
pub fn validate(candidates: &BTreeSet<String>, required: &[PathPredicate]) -> ValidationReport {
    let mut missing = Vec::new();
    for rule in required {
        record_missing(rule, candidates, &mut missing);
    }
    ValidationReport { missing }
}

/// Candidate set from a pre-extraction archive listing. Ancestors of every
/// entry are included, since archives do not always carry explicit
/// directory entries.
pub fn candidates_from_entries(entries: &[ArchiveEntry]) -> BTreeSet<String> {
    let mut candidates = BTreeSet::new();
    for entry in entries {
        let mut prefix = String::new();
        for segment in entry.path.split('/') {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);
            candidates.insert(prefix.clone());
        }
    }
    candidates
}

/// Candidate set from an extracted tree: every file and directory under
/// `root` as a normalized relative path.
pub fn list_tree(root: &Path) -> Result<BTreeSet<String>, Error> {
    let mut candidates = BTreeSet::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(std::io::Error::from)?;
        let rel = match entry.path().strip_prefix(root) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let rel = rel.to_string_lossy().replace('\\', "/");
        if rel.is_empty() {
            continue;
        }
        candidates.insert(rel);
    }
    Ok(candidates)
}

fn satisfied(rule: &PathPredicate, candidates: &BTreeSet<String>) -> bool {
    match rule {
        PathPredicate::Exact { .. } => candidates.iter().any(|candidate| rule.matches(candidate)),
        PathPredicate::AllOf { rules } => rules.iter().all(|rule| satisfied(rule, candidates)),
        PathPredicate::AnyOf { rules } => rules.iter().any(|rule| satisfied(rule, candidates)),
        PathPredicate::Always => true,
    }
}

fn record_missing(rule: &PathPredicate, candidates: &BTreeSet<String>, out: &mut Vec<String>) {
    match rule {
        PathPredicate::Exact { path } => {
            if !satisfied(rule, candidates) {
                out.push(format!("missing required path: {}", path));
            }
        }
        // Every member of an AllOf must hold, so unmet members are listed
        // individually.
        PathPredicate::AllOf { rules } => {
            for rule in rules {
                record_missing(rule, candidates, out);
            }
        }
        PathPredicate::AnyOf { .. } => {
            if !satisfied(rule, candidates) {
                out.push(format!("missing required path: {}", rule.describe()));
            }
        }
        PathPredicate::Always => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(paths: &[&str]) -> BTreeSet<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_empty_report_when_all_present() {
        let report = validate(
            &candidates(&["src", "src/main.rs", "README.md"]),
            &[
                PathPredicate::exact("src/main.rs"),
                PathPredicate::exact("README.md"),
            ],
        );
        assert!(report.is_empty());
    }

    #[test]
    fn test_every_missing_requirement_is_listed() {
        let report = validate(
            &candidates(&["src/main.rs"]),
            &[
                PathPredicate::exact("src/main.rs"),
                PathPredicate::exact("report.pdf"),
                PathPredicate::exact("group.txt"),
            ],
        );
        assert_eq!(report.missing().len(), 2);
        assert!(report.missing()[0].contains("report.pdf"));
        assert!(report.missing()[1].contains("group.txt"));
    }

    #[test]
    fn test_any_of_reports_one_line_naming_alternatives() {
        let report = validate(
            &candidates(&["src/main.rs"]),
            &[PathPredicate::AnyOf {
                rules: vec![
                    PathPredicate::exact("Makefile"),
                    PathPredicate::exact("build.xml"),
                ],
            }],
        );
        assert_eq!(report.missing().len(), 1);
        assert!(report.missing()[0].contains("Makefile"));
        assert!(report.missing()[0].contains("build.xml"));
    }

    #[test]
    fn test_all_of_members_reported_individually() {
        let report = validate(
            &candidates(&[]),
            &[PathPredicate::AllOf {
                rules: vec![
                    PathPredicate::exact("a.txt"),
                    PathPredicate::exact("b.txt"),
                ],
            }],
        );
        assert_eq!(report.missing().len(), 2);
    }

    #[test]
    fn test_always_is_never_missing() {
        let report = validate(&candidates(&[]), &[PathPredicate::Always]);
        assert!(report.is_empty());
    }

    #[test]
    fn test_candidates_from_entries_include_ancestors() {
        let entries = vec![ArchiveEntry {
            path: "src/util/helpers.rs".to_string(),
            is_dir: false,
        }];
        let candidates = candidates_from_entries(&entries);
        assert!(candidates.contains("src"));
        assert!(candidates.contains("src/util"));
        assert!(candidates.contains("src/util/helpers.rs"));
    }
}
