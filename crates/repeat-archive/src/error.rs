use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported archive format")]
    UnsupportedFormat,

    #[error("failed to open archive '{path}': {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("path traversal detected: entry '{entry}' resolves to '{resolved}'")]
    PathTraversal { entry: PathBuf, resolved: PathBuf },

    #[error("symlink target escapes base directory: '{target}' -> '{resolved}'")]
    SymlinkEscape { target: PathBuf, resolved: PathBuf },

    #[error("symlink target is absolute path: '{target}' in '{symlink}'")]
    AbsoluteSymlinkTarget { target: PathBuf, symlink: PathBuf },

    #[error("entry path is not valid")]
    InvalidPath,

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("archive is corrupted: {source}")]
    Corrupted { source: io::Error },

    #[error("failed to create symlink '{link}' -> '{target}': {source}")]
    SymlinkCreationFailed {
        target: PathBuf,
        link: PathBuf,
        source: io::Error,
    },

    #[error("failed to create directory: {path}: {source}")]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    #[error("failed to create staging directory: {source}")]
    StagingFailed { source: io::Error },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Whether the error was raised because an entry tried to leave the
    /// extraction root.
    pub fn is_traversal(&self) -> bool {
        matches!(
            self,
            Self::PathTraversal { .. } | Self::SymlinkEscape { .. } | Self::AbsoluteSymlinkTarget { .. }
        )
    }

    pub(crate) fn corrupted(source: io::Error) -> Self {
        Self::Corrupted { source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
