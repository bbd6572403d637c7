use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read archive '{path}': {source}")]
    ArchiveRead {
        path: PathBuf,
        source: repeat_archive::Error,
    },

    #[error("archive '{path}' rejected: {source}")]
    PathTraversal {
        path: PathBuf,
        source: repeat_archive::Error,
    },

    #[error("failed to prepare staging directory: {source}")]
    Staging { source: repeat_archive::Error },

    #[error("expected exactly one '{pattern}' in archive, found {}", .matches.len())]
    CollectionNotFound {
        pattern: String,
        /// Candidates relative to the archive root.
        matches: Vec<PathBuf>,
    },

    #[error("invalid directory pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("failed to open database '{path}': {source}")]
    DatabaseOpen {
        path: PathBuf,
        source: rusqlite::Error,
    },

    #[error("table '{table}' not found (available: {})", .available.join(", "))]
    TableNotFound {
        table: String,
        available: Vec<String>,
    },

    #[error("failed to read table '{table}': {source}")]
    Query {
        table: String,
        source: rusqlite::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Sort an extraction failure into a traversal or a plain read error.
    pub(crate) fn from_archive(path: impl Into<PathBuf>, source: repeat_archive::Error) -> Self {
        let path = path.into();
        if source.is_traversal() {
            Self::PathTraversal { path, source }
        } else {
            Self::ArchiveRead { path, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
