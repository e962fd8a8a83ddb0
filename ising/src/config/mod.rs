//! Configuration management for Ising simulation runs
//!
//! This module handles the YAML configuration structures, their defaults,
//! command-line overrides and validation into the settings the simulator
//! runs with.

mod args;

pub use args::Args;

use ising::driver::{DriverConfig, RunLength};
use ising::IsingError;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Largest side length for a square lattice with raw frames
pub const MAX_SIZE_2D: usize = 50;
/// Largest side length for a coarse-grained square lattice
pub const MAX_SIZE_COARSE_2D: usize = 120;
/// Largest side length for a cubic lattice
pub const MAX_SIZE_3D: usize = 20;

/// Main configuration structure for a simulation run
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub lattice: LatticeParams,
    pub temperature: Option<f64>,
    #[serde(default)]
    pub run: RunParams,
    pub seed: Option<u64>,
    pub render: Option<bool>,
}

/// How the lattice is filled before the first update
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InitialState {
    Random,
    Up,
    Down,
}

/// Lattice geometry parameters
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LatticeParams {
    pub size: Option<usize>,
    pub dimensions: Option<usize>,
    pub initial: Option<InitialState>,
}

impl Default for LatticeParams {
    fn default() -> Self {
        LatticeParams {
            size: Some(40),
            dimensions: Some(2),
            initial: Some(InitialState::Random),
        }
    }
}

impl LatticeParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.size.is_none() {
            self.size = defaults.size;
        }
        if self.dimensions.is_none() {
            self.dimensions = defaults.dimensions;
        }
        if self.initial.is_none() {
            self.initial = defaults.initial;
        }
        self
    }
}

/// Run length and frame parameters
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RunParams {
    pub batch_size: Option<usize>,
    /// Total attempts = sweeps * size^dimensions; run until Ctrl-C when unset
    pub sweeps: Option<u64>,
    /// Total attempts, takes precedence over `sweeps`
    pub attempts: Option<u64>,
    pub block_levels: Option<usize>,
}

impl Default for RunParams {
    fn default() -> Self {
        RunParams {
            batch_size: Some(ising::driver::INTERACTIVE_BATCH_SIZE),
            sweeps: None,
            attempts: None,
            block_levels: Some(0),
        }
    }
}

impl RunParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.batch_size.is_none() {
            self.batch_size = defaults.batch_size;
        }
        if self.block_levels.is_none() {
            self.block_levels = defaults.block_levels;
        }
        self
    }
}

/// Fully resolved and validated parameters for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub size: usize,
    pub dimensions: usize,
    pub initial: InitialState,
    pub temperature: f64,
    pub driver: DriverConfig,
    pub seed: Option<u64>,
    pub render: bool,
}

impl Config {
    /// Apply defaults to all configuration sections
    pub fn with_defaults(mut self) -> Self {
        self.lattice = self.lattice.with_defaults();
        self.run = self.run.with_defaults();
        if self.temperature.is_none() {
            self.temperature = Some(ising::critical_temperature_2d());
        }
        if self.render.is_none() {
            self.render = Some(true);
        }
        self
    }

    /// Override configuration values with command-line arguments
    pub fn with_overrides(mut self, args: &Args) -> Self {
        if let Some(size) = args.size {
            info!("Overriding size with: {}", size);
            self.lattice.size = Some(size);
        }
        if let Some(dimensions) = args.dimensions {
            info!("Overriding dimensions with: {}", dimensions);
            self.lattice.dimensions = Some(dimensions);
        }
        if let Some(temperature) = args.temperature {
            info!("Overriding temperature with: {}", temperature);
            self.temperature = Some(temperature);
        }
        if let Some(batch_size) = args.batch_size {
            info!("Overriding batch_size with: {}", batch_size);
            self.run.batch_size = Some(batch_size);
        }
        if let Some(sweeps) = args.sweeps {
            info!("Overriding sweeps with: {}", sweeps);
            self.run.sweeps = Some(sweeps);
        }
        if let Some(attempts) = args.attempts {
            info!("Overriding attempts with: {}", attempts);
            self.run.attempts = Some(attempts);
        }
        if let Some(block_levels) = args.block_levels {
            info!("Overriding block_levels with: {}", block_levels);
            self.run.block_levels = Some(block_levels);
        }
        if args.seed.is_some() {
            self.seed = args.seed;
        }
        if args.no_render {
            self.render = Some(false);
        }
        self
    }

    /// Validate the configuration and resolve it into run settings.
    ///
    /// Coarse-grained runs round the side length down to a multiple of
    /// `3^block_levels` before the size limits are checked.
    pub fn resolve(self) -> Result<Settings, IsingError> {
        let config = self.with_defaults();
        let dimensions = config.lattice.dimensions.unwrap_or(2);
        let block_levels = config.run.block_levels.unwrap_or(0);
        let mut size = config.lattice.size.unwrap_or(0);

        let max_size = match (dimensions, block_levels) {
            (2, 0) => MAX_SIZE_2D,
            (2, _) => MAX_SIZE_COARSE_2D,
            (3, _) => MAX_SIZE_3D,
            (other, _) => return Err(IsingError::InvalidDimensions(other)),
        };

        if block_levels > 0 {
            let block = 3usize.saturating_pow(block_levels as u32);
            let rounded = size - size % block;
            if rounded != size {
                warn!(
                    "Lattice size {} is not divisible by {}, using {}",
                    size, block, rounded
                );
                size = rounded;
            }
        }

        if size < 1 {
            return Err(IsingError::InvalidSize {
                size,
                reason: "side length must be at least 1".to_string(),
            });
        }
        if size > max_size {
            return Err(IsingError::InvalidSize {
                size,
                reason: format!("at most {} for a {}D lattice with these frames", max_size, dimensions),
            });
        }

        let temperature = config.temperature.unwrap_or_else(ising::critical_temperature_2d);
        let run_length = match (config.run.attempts, config.run.sweeps) {
            (Some(attempts), _) => RunLength::Attempts(attempts),
            (None, Some(sweeps)) => DriverConfig::sweeps(size, dimensions, sweeps)?.run_length,
            (None, None) => RunLength::UntilCancelled,
        };
        let driver = DriverConfig {
            batch_size: config
                .run
                .batch_size
                .unwrap_or(ising::driver::INTERACTIVE_BATCH_SIZE),
            run_length,
            block_levels,
        };

        Ok(Settings {
            size,
            dimensions,
            initial: config.lattice.initial.unwrap_or(InitialState::Random),
            temperature,
            driver,
            seed: config.seed,
            render: config.render.unwrap_or(true),
        })
    }
}
