//! Load the result tables packaged in a repeat collection archive.
//!
//! A collection archive is a gzip tar file with one `repeat-*` directory
//! holding a SQLite database named `collections.db`. Loading extracts the
//! archive into a private staging directory, rejecting any member that would
//! land outside it, copies every table into memory, and removes the staging
//! directory again before returning.
//!
//! ```no_run
//! let collection = repeat_collections::load("repeat-report.tar.gz")?;
//! for (name, table) in &collection {
//!     println!("{name}: {} rows", table.row_count());
//! }
//! # Ok::<(), repeat_collections::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `loader.rs` - Staging, lookup and teardown around one load
//! - `locate.rs` - Finding `repeat-*/collections.db`
//! - `store.rs` - Read-only SQLite access
//! - `table.rs`, `collection.rs`, `value.rs` - In-memory result types

pub use collection::Collection;
pub use error::{Error, Result};
pub use loader::{Loader, list_tables, load, load_table};
pub use locate::locate_database;
pub use options::{DEFAULT_COLLECTIONS_FILE, DEFAULT_REPEAT_PATTERN, LoadOptions};
pub use store::CollectionStore;
pub use table::{Row, Table};
pub use value::Value;

mod collection;
mod error;
mod loader;
mod locate;
mod options;
mod store;
mod table;
mod value;
