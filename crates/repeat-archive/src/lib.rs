//! Tar archive extraction with path sanitization into scoped staging
//! directories.
//!
//! # Architecture
//!
//! - `format.rs` - Format detection and decompression
//! - `sanitize.rs` - Path sanitization (path traversal prevention)
//! - `extract.rs` - Two-pass validate-then-write extraction
//! - `staging.rs` - Self-removing extraction directories
//! - `entry.rs` - Shared entry and report types

pub use entry::{ArchiveReport, Entry, EntryKind};
pub use error::{Error, Result};
pub use extract::{extract_archive, extract_from_reader, validate_archive, validate_from_reader};
pub use format::{TarCompress, detect_format};
pub use sanitize::{SanitizedPath, is_within, sanitize_path, sanitize_symlink_target};
pub use staging::{DEFAULT_STAGING_PREFIX, Staging, StagingOptions};

pub mod entry;
mod error;
mod extract;
pub mod format;
mod sanitize;
mod staging;
