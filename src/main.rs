use anyhow::Result;
use clap::Parser;

use nutspatch::cli::{Cli, Commands};
use nutspatch::commands;

fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Patch(args) => commands::patch(&cli, args),
    }
}
