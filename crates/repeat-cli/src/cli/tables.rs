use std::path::PathBuf;

use anyhow::{Context, Result};
use repeat_collections::Loader;
use tabled::Tabled;

use crate::ui::table::Formatter;

#[derive(Clone, Debug, clap::Args)]
pub struct TablesArg {
    /// Collection archive (`.tar.gz`)
    pub archive: PathBuf,
}

#[derive(Tabled)]
struct TableLine {
    name: String,
    rows: usize,
    columns: usize,
}

impl TablesArg {
    pub fn run(self, loader: &Loader) -> Result<()> {
        let collection = loader
            .load(&self.archive)
            .with_context(|| format!("failed to load '{}'", self.archive.display()))?;

        let lines = collection.iter().map(|(name, table)| TableLine {
            name: name.clone(),
            rows: table.row_count(),
            columns: table.columns().len(),
        });
        let footer = format!("{} tables", collection.len());
        let table = Formatter {
            footer: Some(footer),
            ..Default::default()
        }
        .build(lines);

        println!("{table}");
        Ok(())
    }
}
