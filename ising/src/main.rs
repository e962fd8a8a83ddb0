//! Ising Model Command-Line Interface
//!
//! Runs a Metropolis simulation configured from YAML and command-line flags,
//! printing a text frame after every batch until the run ends or Ctrl-C is
//! pressed.

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

use ising::{total_energy, IsingError, Lattice, Metropolis, SimulationDriver, Spin};

mod config;
mod io;

use config::{Args, Config, InitialState, Settings};
use io::{render_frame, setup_output};

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    setup_output(args.output.as_ref(), args.verbose);

    let config = match &args.config_file {
        Some(path) => {
            info!("Reading configuration from: {}", path);
            let content = fs::read_to_string(path)
                .wrap_err_with(|| format!("Unable to read configuration file: {}", path))?;
            serde_yml::from_str::<Config>(&content).wrap_err("Failed to parse configuration file")?
        }
        None => Config::default(),
    }
    .with_defaults()
    .with_overrides(&args);

    info!("Configuration loaded:\n{:?}", config);
    let settings = config.resolve().wrap_err("Invalid simulation configuration")?;

    let cancelled = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancelled);
    ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst))
        .wrap_err("Unable to install Ctrl-C handler")?;

    match settings.dimensions {
        2 => simulate::<2>(&settings, &cancelled),
        3 => simulate::<3>(&settings, &cancelled),
        other => Err(IsingError::InvalidDimensions(other).into()),
    }
}

/// Build the lattice and driver for `D` axes and run to completion
fn simulate<const D: usize>(settings: &Settings, cancelled: &AtomicBool) -> Result<()> {
    let mut rng = match settings.seed {
        Some(seed) => {
            info!("Using random seed: {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let lattice = match settings.initial {
        InitialState::Random => Lattice::<D>::random(settings.size, &mut rng),
        InitialState::Up => Lattice::<D>::uniform(settings.size, Spin::Up),
        InitialState::Down => Lattice::<D>::uniform(settings.size, Spin::Down),
    }
    .wrap_err("Unable to create lattice")?;

    let sampler = Metropolis::new(settings.temperature)?;
    let mut driver = SimulationDriver::new(lattice, sampler, rng, settings.driver)?;

    let render = settings.render;
    let mut frame = 0u64;
    let summary = driver.run(
        || cancelled.load(Ordering::SeqCst),
        |snapshot| {
            frame += 1;
            if render {
                println!("{}", render_frame(frame, snapshot));
            }
        },
    )?;

    let sites = driver.lattice().len() as f64;
    info!("Steps: {}", summary.steps);
    info!("Attempts: {}", summary.attempts);
    info!("Accepted flips: {}", summary.accepted);
    info!(
        "Final energy per site: {:.6}",
        total_energy(driver.lattice()) as f64 / sites
    );
    Ok(())
}
