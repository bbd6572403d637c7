use std::path::PathBuf;

use anyhow::{Context, Result};
use repeat_collections::Loader;

use crate::ui::table::Formatter;

#[derive(Clone, Debug, clap::Args)]
pub struct ShowArg {
    /// Collection archive (`.tar.gz`)
    pub archive: PathBuf,
    /// Table name, matched exactly
    pub table: String,
    /// Print at most this many rows
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
    /// Print rows as JSON objects
    #[arg(long)]
    pub json: bool,
}

impl ShowArg {
    pub fn run(self, loader: &Loader) -> Result<()> {
        let mut table = loader
            .load_table(&self.archive, &self.table)
            .with_context(|| format!("failed to load '{}'", self.archive.display()))?;

        let total = table.row_count();
        if let Some(limit) = self.limit {
            table.truncate(limit);
        }

        if self.json {
            let out = serde_json::to_string_pretty(&table).context("failed to encode table")?;
            println!("{out}");
            return Ok(());
        }

        let footer = if table.row_count() < total {
            format!("{} of {} rows", table.row_count(), total)
        } else {
            format!("{total} rows")
        };
        let rendered = Formatter {
            header: Some(table.name().to_string()),
            footer: Some(footer),
        }
        .build_records(&table);

        println!("{rendered}");
        Ok(())
    }
}
