use rand::Rng;
use tracing::{debug, info};

use crate::block_spin::{reduce_levels, BLOCK};
use crate::error::{IsingError, Result};
use crate::lattice::Lattice;
use crate::metropolis::Metropolis;

/// Attempts per batch for interactive runs
pub const INTERACTIVE_BATCH_SIZE: usize = 10_000;

/// How long a run lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunLength {
    /// Stop once this many update attempts have been made
    Attempts(u64),
    /// Keep going until the caller's cancellation callback fires
    UntilCancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Update attempts between two snapshots
    pub batch_size: usize,
    pub run_length: RunLength,
    /// Block-spin reductions applied to each snapshot (0 = raw lattice)
    pub block_levels: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::interactive()
    }
}

impl DriverConfig {
    /// Batches of 10,000 attempts until cancelled
    pub fn interactive() -> Self {
        DriverConfig {
            batch_size: INTERACTIVE_BATCH_SIZE,
            run_length: RunLength::UntilCancelled,
            block_levels: 0,
        }
    }

    /// A fixed budget of `sweeps * size^dimensions` attempts.
    ///
    /// One sweep is one attempt per site on average; 100 sweeps of a square
    /// lattice is the usual fixed-iteration run. Fails with `BudgetOverflow`
    /// when the product does not fit in a `u64`.
    pub fn sweeps(size: usize, dimensions: usize, sweeps: u64) -> Result<Self> {
        let total = u32::try_from(dimensions)
            .ok()
            .and_then(|dims| (size as u64).checked_pow(dims))
            .and_then(|sites| sites.checked_mul(sweeps))
            .ok_or(IsingError::BudgetOverflow {
                sweeps,
                size,
                dimensions,
            })?;
        Ok(DriverConfig {
            batch_size: INTERACTIVE_BATCH_SIZE,
            run_length: RunLength::Attempts(total),
            block_levels: 0,
        })
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_block_levels(mut self, block_levels: usize) -> Self {
        self.block_levels = block_levels;
        self
    }
}

/// A view of the lattice handed to the renderer after each step
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot<'a, const D: usize> {
    /// The live lattice, borrowed
    Raw(&'a Lattice<D>),
    /// A freshly computed block-spin reduction
    Coarse(Lattice<D>),
}

impl<const D: usize> Snapshot<'_, D> {
    pub fn lattice(&self) -> &Lattice<D> {
        match self {
            Snapshot::Raw(lattice) => lattice,
            Snapshot::Coarse(lattice) => lattice,
        }
    }

    pub fn is_coarse(&self) -> bool {
        matches!(self, Snapshot::Coarse(_))
    }
}

/// Totals reported when a run ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub steps: u64,
    pub attempts: u64,
    pub accepted: u64,
    /// True when the run was stopped by the cancellation callback
    pub cancelled: bool,
}

impl RunSummary {
    pub fn acceptance_ratio(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.accepted as f64 / self.attempts as f64
        }
    }
}

/// Owns the lattice and the random stream and sequences update batches.
#[derive(Debug)]
pub struct SimulationDriver<const D: usize, R> {
    lattice: Lattice<D>,
    sampler: Metropolis,
    rng: R,
    config: DriverConfig,
    steps: u64,
    attempts: u64,
    accepted: u64,
}

impl<const D: usize, R: Rng> SimulationDriver<D, R> {
    /// Validate the configuration against the lattice.
    ///
    /// Coarse-grained snapshots need the side length to be a multiple of
    /// `3^block_levels`.
    pub fn new(lattice: Lattice<D>, sampler: Metropolis, rng: R, config: DriverConfig) -> Result<Self> {
        if config.batch_size == 0 {
            return Err(IsingError::invalid_size(0, "batch size must be at least 1"));
        }
        if config.block_levels > 0 {
            let size = lattice.size();
            let block = BLOCK
                .checked_pow(config.block_levels as u32)
                .filter(|&block| block <= size)
                .ok_or_else(|| {
                    IsingError::invalid_size(
                        size,
                        format!("too small for {} block-spin levels", config.block_levels),
                    )
                })?;
            if size % block != 0 {
                return Err(IsingError::invalid_size(
                    size,
                    format!("must be divisible by {} for {} block-spin levels", block, config.block_levels),
                ));
            }
        }

        Ok(Self {
            lattice,
            sampler,
            rng,
            config,
            steps: 0,
            attempts: 0,
            accepted: 0,
        })
    }

    pub fn lattice(&self) -> &Lattice<D> {
        &self.lattice
    }

    pub fn into_lattice(self) -> Lattice<D> {
        self.lattice
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn sampler(&self) -> &Metropolis {
        &self.sampler
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// True once a fixed attempts budget is used up; never for open-ended runs
    pub fn is_finished(&self) -> bool {
        match self.config.run_length {
            RunLength::Attempts(total) => self.attempts >= total,
            RunLength::UntilCancelled => false,
        }
    }

    fn next_batch(&self) -> usize {
        match self.config.run_length {
            RunLength::Attempts(total) => {
                let remaining = total.saturating_sub(self.attempts);
                remaining.min(self.config.batch_size as u64) as usize
            }
            RunLength::UntilCancelled => self.config.batch_size,
        }
    }

    /// Run one batch of update attempts and return the resulting snapshot.
    ///
    /// The last batch of a fixed budget is shortened so the budget is never
    /// exceeded. Once the budget is used up no batch runs and the step
    /// counter stays put; the snapshot shows the final lattice.
    pub fn step(&mut self) -> Result<Snapshot<'_, D>> {
        if !self.is_finished() {
            let batch = self.next_batch();
            let accepted = self.sampler.run_batch(&mut self.lattice, batch, &mut self.rng);

            self.steps += 1;
            self.attempts += batch as u64;
            self.accepted += accepted as u64;
            debug!(
                "step {}: {} attempts, acceptance {:.4}",
                self.steps,
                batch,
                accepted as f64 / batch as f64
            );
        }

        if self.config.block_levels == 0 {
            Ok(Snapshot::Raw(&self.lattice))
        } else {
            reduce_levels(&self.lattice, self.config.block_levels).map(Snapshot::Coarse)
        }
    }

    /// Step until the budget is exhausted or `cancelled` returns true.
    ///
    /// `cancelled` is polled before every batch, never during one, so the
    /// lattice is always left in a consistent state.
    pub fn run<C, F>(&mut self, mut cancelled: C, mut on_snapshot: F) -> Result<RunSummary>
    where
        C: FnMut() -> bool,
        F: FnMut(&Snapshot<'_, D>),
    {
        info!(
            "Starting run: {}D lattice of size {}, T = {}, batch size {}, {:?}",
            D,
            self.lattice.size(),
            self.sampler.temperature(),
            self.config.batch_size,
            self.config.run_length
        );

        let mut was_cancelled = false;
        while !self.is_finished() {
            if cancelled() {
                was_cancelled = true;
                break;
            }
            let snapshot = self.step()?;
            on_snapshot(&snapshot);
        }

        let summary = self.summary(was_cancelled);
        info!(
            "Run {} after {} steps, {} attempts, acceptance ratio {:.4}",
            if was_cancelled { "cancelled" } else { "finished" },
            summary.steps,
            summary.attempts,
            summary.acceptance_ratio()
        );
        Ok(summary)
    }

    pub fn summary(&self, cancelled: bool) -> RunSummary {
        RunSummary {
            steps: self.steps,
            attempts: self.attempts,
            accepted: self.accepted,
            cancelled,
        }
    }
}
