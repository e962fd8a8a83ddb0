//! Error types shared by the lattice, sampler, reducer and driver.

use thiserror::Error;

/// Configuration errors detected when a simulation component is built.
///
/// None of these are transient: every operation in the core is a pure
/// function of the lattice, a coordinate and random draws, so the only
/// failures are invalid parameters rejected up front.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IsingError {
    /// The lattice side length cannot be used for the requested operation.
    #[error("invalid lattice size {size}: {reason}")]
    InvalidSize {
        /// The rejected side length (or batch size).
        size: usize,
        /// What the value failed to satisfy.
        reason: String,
    },

    /// Temperature must be strictly positive and finite.
    #[error("invalid temperature {0}: must be a positive finite number")]
    InvalidTemperature(f64),

    /// Only square (2D) and cubic (3D) lattices are supported.
    #[error("unsupported lattice dimensionality {0}, expected 2 or 3")]
    InvalidDimensions(usize),

    /// The attempts budget `sweeps * size^dimensions` does not fit in a `u64`.
    #[error("{sweeps} sweeps of a {dimensions}D lattice of size {size} overflow the attempts budget")]
    BudgetOverflow {
        sweeps: u64,
        size: usize,
        dimensions: usize,
    },
}

impl IsingError {
    pub(crate) fn invalid_size(size: usize, reason: impl Into<String>) -> Self {
        IsingError::InvalidSize {
            size,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IsingError>;
