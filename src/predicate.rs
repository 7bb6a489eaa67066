use serde::{Deserialize, Serialize};

use crate::paths::normalize_entry_path;

/// Structural requirement over a path relative to an extraction root.
///
/// Matching is purely textual; whether anything actually exists on disk is
/// the validator's concern, not the predicate's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathPredicate {
    /// Equal to the given relative path after normalization.
    Exact { path: String },
    /// Every member matches. An empty list is vacuously true.
    AllOf { rules: Vec<PathPredicate> },
    /// At least one member matches. An empty list is vacuously false.
    AnyOf { rules: Vec<PathPredicate> },
    /// Matches any path.
    Always,
}

impl PathPredicate {
    pub fn exact(path: &str) -> Self {
        Self::Exact {
            path: path.to_string(),
        }
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Exact { path } => {
                match (normalize_entry_path(path), normalize_entry_path(candidate)) {
                    (Some(required), Some(given)) => !required.is_empty() && required == given,
                    _ => false,
                }
            }
            Self::AllOf { rules } => rules.iter().all(|rule| rule.matches(candidate)),
            Self::AnyOf { rules } => rules.iter().any(|rule| rule.matches(candidate)),
            Self::Always => true,
        }
    }

    /// Human-readable form used in validation report lines.
    pub fn describe(&self) -> String {
        match self {
            Self::Exact { path } => path.clone(),
            Self::AllOf { rules } => format!("all of [{}]", Self::describe_list(rules)),
            Self::AnyOf { rules } => format!("one of [{}]", Self::describe_list(rules)),
            Self::Always => "any path".to_string(),
        }
    }

    fn describe_list(rules: &[PathPredicate]) -> String {
        rules
            .iter()
            .map(|rule| rule.describe())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_matches_normalized_forms() {
        let rule = PathPredicate::exact("src/main.rs");
        assert!(rule.matches("src/main.rs"));
        assert!(rule.matches("./src/main.rs"));
        assert!(!rule.matches("src/Main.rs"));
        assert!(!rule.matches("main.rs"));
    }

    #[test]
    fn test_exact_never_matches_unsafe_candidate() {
        let rule = PathPredicate::exact("etc/passwd");
        assert!(!rule.matches("../etc/passwd"));
    }

    #[test]
    fn test_all_of_empty_is_vacuously_true() {
        let rule = PathPredicate::AllOf { rules: vec![] };
        assert!(rule.matches("anything"));
    }

    #[test]
    fn test_any_of_empty_is_vacuously_false() {
        let rule = PathPredicate::AnyOf { rules: vec![] };
        assert!(!rule.matches("anything"));
    }

    #[test]
    fn test_always_matches_everything() {
        assert!(PathPredicate::Always.matches("whatever/you/like"));
    }

    #[test]
    fn test_nested_composition_follows_boolean_semantics() {
        let rule = PathPredicate::AllOf {
            rules: vec![
                PathPredicate::Always,
                PathPredicate::AnyOf {
                    rules: vec![
                        PathPredicate::exact("Makefile"),
                        PathPredicate::exact("build.xml"),
                    ],
                },
            ],
        };
        assert!(rule.matches("build.xml"));
        assert!(!rule.matches("pom.xml"));
    }
}
