use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::app::App;

mod cli;
mod ui;

fn main() -> Result<()> {
    let app = App::parse();

    let filter = EnvFilter::try_new(&app.log_level)
        .with_context(|| format!("invalid log level '{}'", app.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("{:?}", app.cmd);
    app.run()
}
