use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::entry::ArchiveReport;
use crate::error::{Error, Result};
use crate::extract::extract_archive;

pub const DEFAULT_STAGING_PREFIX: &str = "repeat-collection-";

/// Where and how staging directories are created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagingOptions {
    pub prefix: String,
    /// Parent directory for staging; the system temp dir when unset.
    pub base_dir: Option<PathBuf>,
}

impl Default for StagingOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_STAGING_PREFIX.to_string(),
            base_dir: None,
        }
    }
}

impl StagingOptions {
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }
}

/// A uniquely named directory that exists for the lifetime of this value.
///
/// Dropping it removes the directory and everything extracted into it;
/// [`Staging::close`] does the same but reports failures.
#[derive(Debug)]
pub struct Staging {
    dir: TempDir,
    root: PathBuf,
}

impl Staging {
    pub fn new(options: &StagingOptions) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(&options.prefix);
        let dir = match &options.base_dir {
            Some(base) => builder.tempdir_in(base),
            None => builder.tempdir(),
        }
        .map_err(|source| Error::StagingFailed { source })?;

        let root = dir
            .path()
            .canonicalize()
            .map_err(|source| Error::StagingFailed { source })?;
        tracing::debug!("created staging directory '{}'", root.display());

        Ok(Self { dir, root })
    }

    /// Canonical absolute path of the staging directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Safely extract `archive` into this staging directory.
    pub fn extract(&self, archive: &Path) -> Result<ArchiveReport> {
        extract_archive(archive, &self.root)
    }

    /// Remove the directory now, surfacing any error.
    pub fn close(self) -> Result<()> {
        let root = self.root;
        self.dir.close()?;
        tracing::debug!("removed staging directory '{}'", root.display());
        Ok(())
    }
}
