use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::config::NUTS_YEARS;

/// NUTS patcher CLI (argument schema only)
#[derive(Parser, Debug)]
#[command(name = "nutspatch", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add NUTS region columns to observation tables
    Patch(PatchArgs),
}

#[derive(Args, Debug)]
pub struct PatchArgs {
    /// Input CSV files, or directories to scan for them
    #[arg(required = true, value_hint = ValueHint::AnyPath)]
    pub inputs: Vec<PathBuf>,

    /// Directory for cached boundary downloads
    #[arg(long, default_value = "boundaries", value_hint = ValueHint::DirPath)]
    pub cache_dir: PathBuf,

    /// Maximum nearest-region match distance, in kilometres
    #[arg(long, default_value_t = 50.0)]
    pub max_distance_km: f64,

    /// Boundary vintages to combine, primary first
    #[arg(long, num_args = 1.., default_values_t = NUTS_YEARS)]
    pub years: Vec<u16>,
}
