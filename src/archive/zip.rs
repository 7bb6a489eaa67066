use std::fs::File;
use std::path::Path;

use zip::ZipArchive;

use super::{ArchiveEntry, EntrySink, EntrySource};
use crate::error::Error;
use crate::paths::normalize_entry_path;

/// Zip-format entry source. The container supports random access, but it
/// is presented as a single sequential pass like every other format.
pub struct ZipSource {
    archive: ZipArchive<File>,
}

impl ZipSource {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)?;
        let archive = ZipArchive::new(file).map_err(|e| Error::Archive(e.to_string()))?;
        Ok(Self { archive })
    }
}

impl EntrySource for ZipSource {
    fn list(&mut self) -> Result<Vec<ArchiveEntry>, Error> {
        let mut entries = Vec::with_capacity(self.archive.len());
        for index in 0..self.archive.len() {
            let file = self
                .archive
                .by_index(index)
                .map_err(|e| Error::Archive(e.to_string()))?;
            let raw = file.name().to_string();
            let is_dir = file.is_dir();
            if is_symlink(file.unix_mode()) {
                return Err(Error::UnsafePath(raw));
            }
            let path = match normalize_entry_path(&raw) {
                Some(path) => path,
                None => return Err(Error::UnsafePath(raw)),
            };
            if path.is_empty() {
                continue;
            }
            entries.push(ArchiveEntry { path, is_dir });
        }
        Ok(entries)
    }

    fn walk(&mut self, sink: &mut EntrySink) -> Result<(), Error> {
        for index in 0..self.archive.len() {
            let mut file = self
                .archive
                .by_index(index)
                .map_err(|e| Error::Archive(e.to_string()))?;
            let raw = file.name().to_string();
            let is_dir = file.is_dir();
            if is_symlink(file.unix_mode()) {
                return Err(Error::UnsafePath(raw));
            }
            let path = match normalize_entry_path(&raw) {
                Some(path) => path,
                None => return Err(Error::UnsafePath(raw)),
            };
            if path.is_empty() {
                continue;
            }
            let entry = ArchiveEntry { path, is_dir };
            sink(&entry, &mut file)?;
        }
        Ok(())
    }
}

fn is_symlink(unix_mode: Option<u32>) -> bool {
    matches!(unix_mode, Some(mode) if mode & 0o170000 == 0o120000)
}
