//! Command implementations

mod inspect;
mod matching;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    match cli.command {
        Commands::Match(args) => matching::execute(args, cli.config.as_deref(), &output),
        Commands::Inspect(args) => inspect::execute(args, cli.config.as_deref(), &output),
    }
}
