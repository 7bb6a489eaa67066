pub mod tar;
pub mod zip;

use std::io::Read;
use std::path::Path;

use crate::error::Error;

/// One file or directory record inside a submitted archive, before
/// extraction. The path is relative, normalized, and free of traversal
/// segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub path: String,
    pub is_dir: bool,
}

/// Receiver for one pass over an archive: called once per entry with the
/// entry's content reader.
pub type EntrySink<'a> = dyn FnMut(&ArchiveEntry, &mut dyn Read) -> Result<(), Error> + 'a;

/// Format-agnostic view of an archive as a finite sequence of entries.
///
/// `list` enumerates entry metadata without extracting anything. `walk` is
/// the extraction pass: one sequential, non-restartable traversal handing
/// each entry and its content to the sink. Both reject entries whose names
/// would escape an extraction root.
pub trait EntrySource {
    fn list(&mut self) -> Result<Vec<ArchiveEntry>, Error>;
    fn walk(&mut self, sink: &mut EntrySink) -> Result<(), Error>;
}

/// Pick an entry source from the archive file name. Formats are resolved
/// here so extraction logic stays format-blind.
pub fn open_source(path: &Path) -> Result<Box<dyn EntrySource>, Error> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    if name.ends_with(".zip") {
        Ok(Box::new(self::zip::ZipSource::open(path)?))
    } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        Ok(Box::new(self::tar::TarGzSource::open(path)?))
    } else {
        Err(Error::Archive(format!(
            "unsupported archive format: {}",
            path.display()
        )))
    }
}
