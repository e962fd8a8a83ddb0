//! Command-line argument parsing for Ising simulation runs

use clap::Parser;

/// Metropolis Monte Carlo simulation of the Ising model
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a YAML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    pub config_file: Option<String>,

    /// Override lattice side length
    #[arg(long)]
    pub size: Option<usize>,

    /// Override lattice dimensionality (2 or 3)
    #[arg(long)]
    pub dimensions: Option<usize>,

    /// Override temperature (units of J/k_B)
    #[arg(short, long)]
    pub temperature: Option<f64>,

    /// Override update attempts between frames
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Stop after this many sweeps (one attempt per site on average)
    #[arg(long)]
    pub sweeps: Option<u64>,

    /// Stop after this many update attempts (takes precedence over sweeps)
    #[arg(long)]
    pub attempts: Option<u64>,

    /// Block-spin reductions applied to each frame (0 = raw lattice)
    #[arg(long)]
    pub block_levels: Option<usize>,

    /// Seed for the random number generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Do not print lattice frames
    #[arg(long)]
    pub no_render: bool,

    /// Log every batch at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Override output file: (default stdout)
    #[arg(short, long)]
    pub output: Option<String>,
}
