use repeat_collections::Table as CollectionTable;
use tabled::{
    Table, Tabled,
    builder::Builder,
    settings::{Panel, Style},
};

#[derive(Debug, Clone, Default)]
pub struct Formatter {
    pub header: Option<String>,
    pub footer: Option<String>,
}

impl Formatter {
    pub fn build<T: Tabled, I: IntoIterator<Item = T>>(self, data: I) -> Table {
        let table = Table::new(data);
        self.finish(table)
    }

    /// Render a loaded table with its stored column names as the header row.
    pub fn build_records(self, data: &CollectionTable) -> Table {
        let mut builder = Builder::default();
        builder.push_record(data.columns().iter().cloned());
        for row in data.rows() {
            builder.push_record(row.values().iter().map(ToString::to_string));
        }
        self.finish(builder.build())
    }

    fn finish(self, mut table: Table) -> Table {
        if let Some(header) = self.header {
            table.with(Panel::header(header));
        }
        if let Some(footer) = self.footer {
            table.with(Panel::footer(footer));
        }

        table.with(Style::blank());
        table
    }
}
