use std::fs::File;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tar::{Archive, EntryType};

use super::{ArchiveEntry, EntrySink, EntrySource};
use crate::error::Error;
use crate::paths::normalize_entry_path;

/// Gzipped tar entry source. The underlying stream is not seekable, so
/// each pass re-opens the file.
pub struct TarGzSource {
    path: PathBuf,
}

impl TarGzSource {
    pub fn open(path: &Path) -> Result<Self, Error> {
        // Fail now rather than on the first pass if the file is unreadable.
        File::open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    fn reopen(&self) -> Result<Archive<GzDecoder<File>>, Error> {
        let file = File::open(&self.path)?;
        Ok(Archive::new(GzDecoder::new(file)))
    }
}

impl EntrySource for TarGzSource {
    fn list(&mut self) -> Result<Vec<ArchiveEntry>, Error> {
        let mut archive = self.reopen()?;
        let mut entries = Vec::new();
        for entry in archive.entries()? {
            let entry = entry?;
            let raw = entry.path()?.to_string_lossy().into_owned();
            let entry_type = entry.header().entry_type();
            if entry_type == EntryType::Symlink || entry_type == EntryType::Link {
                return Err(Error::UnsafePath(raw));
            }
            let path = match normalize_entry_path(&raw) {
                Some(path) => path,
                None => return Err(Error::UnsafePath(raw)),
            };
            if path.is_empty() {
                continue;
            }
            entries.push(ArchiveEntry {
                path,
                is_dir: entry_type.is_dir(),
            });
        }
        Ok(entries)
    }

    fn walk(&mut self, sink: &mut EntrySink) -> Result<(), Error> {
        let mut archive = self.reopen()?;
        for entry in archive.entries()? {
            let mut entry = entry?;
            let raw = entry.path()?.to_string_lossy().into_owned();
            let entry_type = entry.header().entry_type();
            if entry_type == EntryType::Symlink || entry_type == EntryType::Link {
                return Err(Error::UnsafePath(raw));
            }
            let path = match normalize_entry_path(&raw) {
                Some(path) => path,
                None => return Err(Error::UnsafePath(raw)),
            };
            if path.is_empty() {
                continue;
            }
            let archive_entry = ArchiveEntry {
                path,
                is_dir: entry_type.is_dir(),
            };
            sink(&archive_entry, &mut entry)?;
        }
        Ok(())
    }
}
