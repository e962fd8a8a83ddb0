//! Metropolis Monte Carlo simulation of the Ising model on periodic square
//! and cubic lattices, with block-spin coarse-graining.

pub mod block_spin;
pub mod driver;
pub mod energy;
pub mod error;
pub mod lattice;
pub mod metropolis;

pub use block_spin::{block_sum, reduce, reduce_levels};
pub use driver::{DriverConfig, RunLength, RunSummary, SimulationDriver, Snapshot};
pub use energy::{energy_delta, local_field, total_energy};
pub use error::IsingError;
pub use lattice::{Lattice, Lattice2D, Lattice3D, Spin};
pub use metropolis::Metropolis;

/// Critical temperature of the square-lattice model (exact result)
/// T_c = 2J / (k_B * ln(1 + √2)) ≈ 2.269 J/k_B
pub fn critical_temperature_2d() -> f64 {
    2.0 / (1.0 + 2.0_f64.sqrt()).ln()
}
