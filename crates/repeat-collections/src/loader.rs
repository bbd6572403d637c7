use std::path::Path;
use std::time::Instant;

use repeat_archive::Staging;

use crate::collection::Collection;
use crate::error::{Error, Result};
use crate::locate::locate_database;
use crate::options::LoadOptions;
use crate::store::CollectionStore;
use crate::table::Table;

/// Loads collection archives with a fixed set of options.
///
/// Every call gets its own staging directory and connection; nothing is
/// shared between calls, so one `Loader` may serve several threads.
#[derive(Clone, Debug, Default)]
pub struct Loader {
    options: LoadOptions,
}

impl Loader {
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Load every table of the archive's collection database.
    pub fn load(&self, archive: impl AsRef<Path>) -> Result<Collection> {
        let archive = archive.as_ref();
        let started = Instant::now();
        let collection = self.with_store(archive, CollectionStore::read_all)?;
        tracing::info!(
            "loaded {} tables from '{}' in {:.2}s",
            collection.len(),
            archive.display(),
            started.elapsed().as_secs_f64()
        );
        Ok(collection)
    }

    /// Load a single named table.
    pub fn load_table(&self, archive: impl AsRef<Path>, table: &str) -> Result<Table> {
        let archive = archive.as_ref();
        let table = self.with_store(archive, |store| store.read_table(table))?;
        tracing::info!(
            "loaded table '{}' ({} rows) from '{}'",
            table.name(),
            table.row_count(),
            archive.display()
        );
        Ok(table)
    }

    /// Table names in the archive's database, without copying any rows.
    pub fn list_tables(&self, archive: impl AsRef<Path>) -> Result<Vec<String>> {
        self.with_store(archive.as_ref(), CollectionStore::table_names)
    }

    /// Stage the archive, open its database, run `read`, and tear down.
    ///
    /// The connection is closed before the staging directory goes away. On
    /// error paths the directory is removed when `staging` drops.
    fn with_store<T>(&self, archive: &Path, read: impl FnOnce(&CollectionStore) -> Result<T>) -> Result<T> {
        let staging = Staging::new(&self.options.staging).map_err(|source| Error::Staging { source })?;

        let report = staging
            .extract(archive)
            .map_err(|source| Error::from_archive(archive, source))?;
        tracing::debug!(
            "extracted {} entries ({} bytes) from '{}'",
            report.entry_count,
            report.total_bytes,
            archive.display()
        );

        let database = locate_database(staging.root(), &self.options)?;

        let value = {
            let store = CollectionStore::open(&database)?;
            read(&store)?
        };

        let root = staging.root().to_path_buf();
        if let Err(e) = staging.close() {
            tracing::warn!(
                "failed to remove staging directory '{}': {}",
                root.display(),
                e
            );
        }

        Ok(value)
    }
}

/// Load every table of `archive` with default options.
pub fn load(archive: impl AsRef<Path>) -> Result<Collection> {
    Loader::default().load(archive)
}

/// Load one table of `archive` with default options.
pub fn load_table(archive: impl AsRef<Path>, table: &str) -> Result<Table> {
    Loader::default().load_table(archive, table)
}

/// List the tables of `archive` with default options.
pub fn list_tables(archive: impl AsRef<Path>) -> Result<Vec<String>> {
    Loader::default().list_tables(archive)
}
