use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use repeat_collections::{LoadOptions, Loader};

use super::{dump, show, tables};

#[derive(Clone, Debug, Parser)]
#[command(name = "repeat", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    #[command(subcommand)]
    pub cmd: Commands,

    /// Log filter, e.g. `debug` or `repeat_collections=trace`
    #[arg(long, global = true, env = "REPEAT_LOG", default_value = "info")]
    pub log_level: String,

    /// Directory to create staging directories in
    #[arg(long, global = true, value_name = "DIR")]
    pub basedir: Option<PathBuf>,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "ls", name = "tables", about = "List the tables of a collection archive")]
    Tables(tables::TablesArg),
    #[command(alias = "s", name = "show", about = "Print one table")]
    Show(show::ShowArg),
    #[command(name = "dump", about = "Print every table as JSON")]
    Dump(dump::DumpArg),
}

impl App {
    pub fn loader(&self) -> Loader {
        let mut options = LoadOptions::default();
        if let Some(dir) = &self.basedir {
            options = options.staging_dir(dir);
        }
        Loader::new(options)
    }

    pub fn run(self) -> Result<()> {
        let loader = self.loader();
        match self.cmd {
            Commands::Tables(arg) => arg.run(&loader),
            Commands::Show(arg) => arg.run(&loader),
            Commands::Dump(arg) => arg.run(&loader),
        }
    }
}
