/// Normalize a raw archive entry name into a clean relative path.
///
/// Backslashes are folded to forward slashes, `.` and empty segments are
/// dropped. Returns `None` for paths that must never be placed under an
/// extraction root: absolute paths, drive-prefixed paths, and anything
/// containing a `..` segment. A degenerate entry like `./` normalizes to
/// an empty string, which callers skip.
pub fn normalize_entry_path(raw: &str) -> Option<String> {
    let cleaned = raw.replace('\\', "/");

    if cleaned.starts_with('/') {
        return None;
    }
    if cleaned.chars().nth(1) == Some(':') {
        return None;
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in cleaned.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            other => segments.push(other),
        }
    }

    Some(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plain_path() {
        assert_eq!(
            normalize_entry_path("src/main.rs"),
            Some("src/main.rs".to_string())
        );
    }

    #[test]
    fn test_normalize_strips_dot_and_empty_segments() {
        assert_eq!(
            normalize_entry_path("./src//./main.rs"),
            Some("src/main.rs".to_string())
        );
    }

    #[test]
    fn test_normalize_folds_backslashes() {
        assert_eq!(
            normalize_entry_path("src\\main.rs"),
            Some("src/main.rs".to_string())
        );
    }

    #[test]
    fn test_normalize_trailing_slash_directory() {
        assert_eq!(normalize_entry_path("src/"), Some("src".to_string()));
    }

    #[test]
    fn test_normalize_rejects_traversal() {
        assert_eq!(normalize_entry_path("../../etc/passwd"), None);
        assert_eq!(normalize_entry_path("src/../../etc/passwd"), None);
    }

    #[test]
    fn test_normalize_rejects_absolute() {
        assert_eq!(normalize_entry_path("/etc/passwd"), None);
        assert_eq!(normalize_entry_path("C:\\Windows\\system.ini"), None);
    }

    #[test]
    fn test_normalize_degenerate_is_empty() {
        assert_eq!(normalize_entry_path("./"), Some(String::new()));
    }
}
