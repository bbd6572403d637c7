use std::path::PathBuf;

use crate::format::TarCompress;

/// One accepted archive member and where it lands inside the extraction root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Path as stored in the archive header.
    pub path: PathBuf,
    /// Sanitized absolute path under the root.
    pub target: PathBuf,
    pub size: u64,
    pub mode: Option<u32>,
    pub kind: EntryKind,
}

impl Entry {
    pub fn is_file(&self) -> bool {
        matches!(self.kind, EntryKind::File)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink { target: PathBuf },
}

/// Summary of a validated or extracted archive.
#[derive(Clone, Debug)]
pub struct ArchiveReport {
    pub compression: TarCompress,
    pub entry_count: usize,
    /// Sum of regular file sizes.
    pub total_bytes: u64,
    pub entries: Vec<Entry>,
    /// Members that were present but not written (hard links, devices, fifos).
    pub skipped: Vec<PathBuf>,
}

impl ArchiveReport {
    /// Regular files, in archive order.
    pub fn files(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| e.is_file())
    }
}
