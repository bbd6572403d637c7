//! Read-only access to a collection database.
//!
//! # SQLite System Tables
//! - `sqlite_master`: one row per schema object; user tables have
//!   `type = 'table'` and a name outside the reserved `sqlite_` namespace.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};

use crate::collection::Collection;
use crate::error::{Error, Result};
use crate::table::Table;
use crate::value::Value;

const TABLE_NAMES_SQL: &str = "SELECT name FROM sqlite_master \
     WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' \
     ORDER BY name";

/// An open, read-only connection to one collection database.
pub struct CollectionStore {
    conn: Connection,
    path: PathBuf,
}

impl CollectionStore {
    /// Open `path` read-only and make sure it really is a SQLite database.
    pub fn open(path: &Path) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(|source| Error::DatabaseOpen {
            path: path.to_path_buf(),
            source,
        })?;

        // Opening is lazy; reading the schema forces the header check.
        conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
            .map_err(|source| Error::DatabaseOpen {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!("opened collection database '{}'", path.display());
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// User table names, sorted.
    pub fn table_names(&self) -> Result<Vec<String>> {
        let query_failed = |source: rusqlite::Error| Error::Query {
            table: "sqlite_master".to_string(),
            source,
        };
        let mut stmt = self.conn.prepare(TABLE_NAMES_SQL).map_err(query_failed)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(query_failed)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(query_failed)?;
        Ok(names)
    }

    /// Copy every row of `name`. Fails with `TableNotFound` if it is absent.
    pub fn read_table(&self, name: &str) -> Result<Table> {
        let names = self.table_names()?;
        if !names.iter().any(|n| n == name) {
            return Err(Error::TableNotFound {
                table: name.to_string(),
                available: names,
            });
        }
        self.copy_table(name)
    }

    /// Copy every user table.
    pub fn read_all(&self) -> Result<Collection> {
        let mut collection = Collection::new();
        for name in self.table_names()? {
            let table = self.copy_table(&name)?;
            tracing::debug!(
                "copied table '{}': {} rows, {} columns",
                name,
                table.row_count(),
                table.columns().len()
            );
            collection.insert(table);
        }
        Ok(collection)
    }

    fn copy_table(&self, name: &str) -> Result<Table> {
        let query_failed = |source: rusqlite::Error| Error::Query {
            table: name.to_string(),
            source,
        };

        let sql = format!("SELECT * FROM {}", quote_identifier(name));
        let mut stmt = self.conn.prepare(&sql).map_err(query_failed)?;

        // Names as declared in the schema, no case folding.
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();
        let mut table = Table::new(name, columns);

        let mut rows = stmt.query([]).map_err(query_failed)?;
        while let Some(row) = rows.next().map_err(query_failed)? {
            let values = (0..width)
                .map(|i| row.get_ref(i).map(Value::from))
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(query_failed)?;
            table.push_row(values);
        }

        Ok(table)
    }
}

/// Quote an SQL identifier, doubling embedded quotes.
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
