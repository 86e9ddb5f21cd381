//! Defines command-line interface options using `clap` for the nchelpers binary.

use clap::Parser;
use std::path::PathBuf;

/// A CLI tool for deriving canonical metadata from CF NetCDF files
#[derive(Parser, Debug)]
#[command(
    version,
    name = "nchelpers",
    about = "Derive unique ids, time resolution and fingerprints from CF NetCDF files"
)]
pub struct Args {
    /// Path to the NetCDF file
    #[arg(short, long)]
    pub file: PathBuf,

    /// Print the report as a JSON object
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Enable verbose (debug) logging. `RUST_LOG` takes precedence when set.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
