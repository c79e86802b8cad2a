//! ppap CLI - creates password-protected ZIP archives.

mod cli;
mod commands;
mod console;
mod error;
mod logging;
mod output;
mod progress;
mod version;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    logging::init();

    let cli = cli::Cli::parse();
    let formatter = output::create_formatter();

    if cli.version {
        formatter.format_version(&version::current());
        return Ok(());
    }

    commands::create::execute(&cli, &*formatter)
}
