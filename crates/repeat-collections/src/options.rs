use std::path::PathBuf;

use repeat_archive::StagingOptions;

/// Database file every collection archive carries.
pub const DEFAULT_COLLECTIONS_FILE: &str = "collections.db";

/// Name pattern of the top-level directory holding the database.
pub const DEFAULT_REPEAT_PATTERN: &str = "repeat-*";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    pub staging: StagingOptions,
    pub collections_file: String,
    pub repeat_pattern: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            staging: StagingOptions::default(),
            collections_file: DEFAULT_COLLECTIONS_FILE.to_string(),
            repeat_pattern: DEFAULT_REPEAT_PATTERN.to_string(),
        }
    }
}

impl LoadOptions {
    pub fn staging_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.staging = self.staging.prefix(prefix);
        self
    }

    /// Create staging directories under `dir` instead of the system temp dir.
    pub fn staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging = self.staging.base_dir(dir);
        self
    }

    pub fn collections_file(mut self, name: impl Into<String>) -> Self {
        self.collections_file = name.into();
        self
    }

    pub fn repeat_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.repeat_pattern = pattern.into();
        self
    }

    /// The lookup pattern relative to the archive root, for messages.
    pub fn database_pattern(&self) -> String {
        format!("{}/{}", self.repeat_pattern, self.collections_file)
    }
}
