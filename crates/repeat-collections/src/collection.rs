use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::table::Table;

/// Every table of one collection database, keyed by table name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    tables: BTreeMap<String, Table>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table, replacing any table with the same name.
    pub fn insert(&mut self, table: Table) -> Option<Table> {
        self.tables.insert(table.name().to_string(), table)
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Table> {
        self.tables.remove(name)
    }

    /// Table names in sorted order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Table> {
        self.tables.iter()
    }

    pub fn into_tables(self) -> BTreeMap<String, Table> {
        self.tables
    }
}

impl FromIterator<Table> for Collection {
    fn from_iter<I: IntoIterator<Item = Table>>(iter: I) -> Self {
        let mut collection = Self::new();
        for table in iter {
            collection.insert(table);
        }
        collection
    }
}

impl IntoIterator for Collection {
    type Item = (String, Table);
    type IntoIter = btree_map::IntoIter<String, Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = (&'a String, &'a Table);
    type IntoIter = btree_map::Iter<'a, String, Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tables.len()))?;
        for (name, table) in &self.tables {
            map.serialize_entry(name, table)?;
        }
        map.end()
    }
}
