use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use glob::Pattern;
use tracing::{debug, warn};

use crate::archive::{ArchiveEntry, EntrySource};
use crate::error::Error;

/// Outcome of one extraction attempt.
///
/// `partial == false` on failure guarantees the destination root no longer
/// exists and the attempt left no trace. `partial == true` means some
/// created paths could not be removed again; they are listed in
/// `remaining` for manual remediation.
#[derive(Debug)]
pub enum ExtractionResult {
    Success {
        root: PathBuf,
        created: Vec<PathBuf>,
    },
    Failure {
        partial: bool,
        remaining: Vec<PathBuf>,
        cause: Error,
    },
}

impl ExtractionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Unpack `source` into `destination_root`, which must not yet exist.
///
/// Every created filesystem entry (the root included) is recorded in
/// creation order. Entries matching an ignore pattern are skipped. On any
/// mid-stream failure, or when the cancellation flag is observed, the
/// recorded entries are removed again in reverse order before returning.
pub fn extract(
    source: &mut dyn EntrySource,
    destination_root: &Path,
    ignore: &[Pattern],
    cancel: &AtomicBool,
) -> ExtractionResult {
    if destination_root.exists() {
        return ExtractionResult::Failure {
            partial: false,
            remaining: Vec::new(),
            cause: Error::DestinationExists(destination_root.to_path_buf()),
        };
    }

    if let Err(e) = fs::create_dir_all(destination_root) {
        return ExtractionResult::Failure {
            partial: false,
            remaining: Vec::new(),
            cause: e.into(),
        };
    }

    let mut created: Vec<PathBuf> = vec![destination_root.to_path_buf()];
    let mut seen_dirs: HashSet<PathBuf> = HashSet::new();
    seen_dirs.insert(destination_root.to_path_buf());

    let walk_result = source.walk(&mut |entry, reader| {
        if cancel.load(Ordering::Relaxed) {
            return Err(Error::Cancelled);
        }
        if ignore.iter().any(|pattern| pattern.matches(&entry.path)) {
            debug!("Skipping ignored entry '{}'", entry.path);
            return Ok(());
        }
        place_entry(
            destination_root,
            entry,
            reader,
            &mut created,
            &mut seen_dirs,
        )
    });

    match walk_result {
        Ok(()) => {
            debug!(
                "Extracted {} entries into {}",
                created.len().saturating_sub(1),
                destination_root.display()
            );
            ExtractionResult::Success {
                root: destination_root.to_path_buf(),
                created,
            }
        }
        Err(cause) => {
            warn!(
                "Extraction into {} failed, cleaning up: {}",
                destination_root.display(),
                cause
            );
            let remaining = remove_created(&created);
            ExtractionResult::Failure {
                partial: !remaining.is_empty(),
                remaining,
                cause,
            }
        }
    }
}

fn place_entry(
    root: &Path,
    entry: &ArchiveEntry,
    reader: &mut dyn Read,
    created: &mut Vec<PathBuf>,
    seen_dirs: &mut HashSet<PathBuf>,
) -> Result<(), Error> {
    if entry.is_dir {
        return ensure_dirs(root, &entry.path, created, seen_dirs);
    }

    let mut target = root.to_path_buf();
    match entry.path.rsplit_once('/') {
        Some((dir_part, file_part)) => {
            ensure_dirs(root, dir_part, created, seen_dirs)?;
            target.push(dir_part);
            target.push(file_part);
        }
        None => target.push(&entry.path),
    }

    let mut out = File::create(&target)?;
    created.push(target.clone());
    io::copy(reader, &mut out)?;
    Ok(())
}

/// Create each missing directory along `rel` under `root`, recording every
/// one actually created.
fn ensure_dirs(
    root: &Path,
    rel: &str,
    created: &mut Vec<PathBuf>,
    seen_dirs: &mut HashSet<PathBuf>,
) -> Result<(), Error> {
    let mut current = root.to_path_buf();
    for segment in rel.split('/') {
        current.push(segment);
        if seen_dirs.contains(&current) {
            continue;
        }
        match fs::create_dir(&current) {
            Ok(()) => {
                seen_dirs.insert(current.clone());
                created.push(current.clone());
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                seen_dirs.insert(current.clone());
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Remove recorded paths in reverse creation order, returning the ones
/// that could not be removed.
fn remove_created(created: &[PathBuf]) -> Vec<PathBuf> {
    let mut remaining = Vec::new();
    for path in created.iter().rev() {
        let removal = if path.is_dir() {
            fs::remove_dir(path)
        } else {
            fs::remove_file(path)
        };
        if let Err(e) = removal {
            if e.kind() == ErrorKind::NotFound {
                continue;
            }
            warn!("Failed to remove '{}' during cleanup: {}", path.display(), e);
            remaining.push(path.clone());
        }
    }
    remaining
}
