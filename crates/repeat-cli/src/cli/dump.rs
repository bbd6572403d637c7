use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use repeat_collections::Loader;

#[derive(Clone, Debug, clap::Args)]
pub struct DumpArg {
    /// Collection archive (`.tar.gz`)
    pub archive: PathBuf,
}

impl DumpArg {
    pub fn run(self, loader: &Loader) -> Result<()> {
        let collection = loader
            .load(&self.archive)
            .with_context(|| format!("failed to load '{}'", self.archive.display()))?;

        let mut out = io::stdout().lock();
        serde_json::to_writer_pretty(&mut out, &collection).context("failed to encode collection")?;
        writeln!(out)?;
        Ok(())
    }
}
