use rand::Rng;

use crate::energy::energy_delta;
use crate::error::{IsingError, Result};
use crate::lattice::Lattice;

/// Single-spin-flip Metropolis sampler at a fixed temperature.
///
/// The sampler owns no random state: every call takes the random source
/// explicitly, so a seeded generator reproduces a run draw for draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metropolis {
    /// Temperature in units of J/k_B (reduced temperature)
    temperature: f64,
}

impl Metropolis {
    /// Create a sampler; the temperature must be strictly positive and finite.
    pub fn new(temperature: f64) -> Result<Self> {
        if !(temperature.is_finite() && temperature > 0.0) {
            return Err(IsingError::InvalidTemperature(temperature));
        }
        Ok(Self { temperature })
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Probability of accepting a move that changes the energy by `delta`:
    /// 1 for `delta <= 0`, `exp(-delta / T)` otherwise.
    pub fn acceptance_probability(&self, delta: i32) -> f64 {
        if delta <= 0 {
            1.0
        } else {
            (-(delta as f64) / self.temperature).exp()
        }
    }

    /// Propose flipping the spin at `coord` and apply the Metropolis rule.
    ///
    /// Moves that do not raise the energy are always accepted and consume no
    /// random draw. Otherwise one uniform draw in `[0, 1)` decides. Returns
    /// whether the spin was flipped.
    pub fn attempt_flip<const D: usize, R: Rng + ?Sized>(
        &self,
        lattice: &mut Lattice<D>,
        coord: [usize; D],
        rng: &mut R,
    ) -> bool {
        let delta_e = energy_delta(lattice, coord);

        let accept = delta_e <= 0 || rng.gen::<f64>() < self.acceptance_probability(delta_e);
        if accept {
            lattice.flip(coord);
        }
        accept
    }

    /// Perform `attempts` update attempts at uniformly random sites.
    ///
    /// Each attempt draws its coordinate axis by axis (axis 0 first), with
    /// replacement, then makes the acceptance draw if one is needed. Returns
    /// the number of accepted flips.
    pub fn run_batch<const D: usize, R: Rng + ?Sized>(
        &self,
        lattice: &mut Lattice<D>,
        attempts: usize,
        rng: &mut R,
    ) -> usize {
        let size = lattice.size();
        let mut accepted = 0;
        for _ in 0..attempts {
            let coord: [usize; D] = std::array::from_fn(|_| rng.gen_range(0..size));
            if self.attempt_flip(lattice, coord, rng) {
                accepted += 1;
            }
        }
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::{Lattice2D, Lattice3D, Spin};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    /// A random source that must never be touched
    struct NoDraws;

    impl RngCore for NoDraws {
        fn next_u32(&mut self) -> u32 {
            panic!("unexpected random draw")
        }
        fn next_u64(&mut self) -> u64 {
            panic!("unexpected random draw")
        }
        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            panic!("unexpected random draw")
        }
        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            panic!("unexpected random draw")
        }
    }

    /// Replays fixed 64-bit words; `u64::MAX` yields a uniform draw just below 1
    struct Scripted(Vec<u64>);

    impl RngCore for Scripted {
        fn next_u32(&mut self) -> u32 {
            (self.next_u64() >> 32) as u32
        }
        fn next_u64(&mut self) -> u64 {
            assert!(!self.0.is_empty(), "script exhausted");
            self.0.remove(0)
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(8) {
                let word = self.next_u64().to_le_bytes();
                chunk.copy_from_slice(&word[..chunk.len()]);
            }
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn test_temperature_validation() {
        assert!(Metropolis::new(2.269).is_ok());
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = Metropolis::new(bad).unwrap_err();
            assert!(matches!(err, IsingError::InvalidTemperature(_)));
        }
    }

    #[test]
    fn test_acceptance_probability() {
        let sampler = Metropolis::new(2.0).unwrap();
        assert_eq!(sampler.acceptance_probability(-8), 1.0);
        assert_eq!(sampler.acceptance_probability(0), 1.0);
        assert_relative_eq!(sampler.acceptance_probability(4), (-2.0f64).exp(), epsilon = 1e-12);

        // Underflows to zero rather than being special-cased
        let cold = Metropolis::new(1e-3).unwrap();
        assert_eq!(cold.acceptance_probability(24), 0.0);
    }

    #[test]
    fn test_downhill_move_always_flips_without_drawing() {
        let sampler = Metropolis::new(1.0).unwrap();
        let mut lattice = Lattice2D::uniform(4, Spin::Up).unwrap();
        lattice.set([1, 1], Spin::Down);

        assert!(sampler.attempt_flip(&mut lattice, [1, 1], &mut NoDraws));
        assert_eq!(lattice.get([1, 1]), Spin::Up);
    }

    #[test]
    fn test_zero_delta_always_flips() {
        let sampler = Metropolis::new(0.01).unwrap();
        let mut lattice = Lattice2D::uniform(4, Spin::Up).unwrap();
        // Two up and two down neighbors: ΔE = 0
        lattice.set([0, 1], Spin::Down);
        lattice.set([2, 1], Spin::Down);
        assert_eq!(energy_delta(&lattice, [1, 1]), 0);

        assert!(sampler.attempt_flip(&mut lattice, [1, 1], &mut NoDraws));
        assert_eq!(lattice.get([1, 1]), Spin::Down);
    }

    #[test]
    fn test_uphill_move_uses_one_draw() {
        // ΔE = 8 at T = 4: p = exp(-2) ~ 0.135
        let sampler = Metropolis::new(4.0).unwrap();
        let mut lattice = Lattice2D::uniform(3, Spin::Up).unwrap();

        let mut low = Scripted(vec![0]);
        assert!(sampler.attempt_flip(&mut lattice, [1, 1], &mut low));
        assert!(low.0.is_empty());
        assert_eq!(lattice.get([1, 1]), Spin::Down);

        lattice.flip([1, 1]);
        let mut high = Scripted(vec![u64::MAX]);
        assert!(!sampler.attempt_flip(&mut lattice, [1, 1], &mut high));
        assert!(high.0.is_empty());
        assert_eq!(lattice.get([1, 1]), Spin::Up);
    }

    fn acceptance_rate(temperature: f64, trials: usize) -> f64 {
        let sampler = Metropolis::new(temperature).unwrap();
        let mut lattice = Lattice2D::uniform(3, Spin::Up).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let mut accepted = 0;
        for _ in 0..trials {
            if sampler.attempt_flip(&mut lattice, [1, 1], &mut rng) {
                accepted += 1;
                // restore so every trial proposes the same ΔE = 8
                lattice.flip([1, 1]);
            }
        }
        accepted as f64 / trials as f64
    }

    #[test]
    fn test_acceptance_limits() {
        assert!(acceptance_rate(1e9, 2000) > 0.999);
        assert_eq!(acceptance_rate(1e-3, 2000), 0.0);
    }

    #[test]
    fn test_empirical_acceptance_matches_boltzmann_factor() {
        let rate = acceptance_rate(4.0, 20_000);
        assert_relative_eq!(rate, (-2.0f64).exp(), epsilon = 0.01);
    }

    #[test]
    fn test_cold_ordered_lattice_is_frozen() {
        let sampler = Metropolis::new(0.05).unwrap();
        let mut lattice = Lattice3D::uniform(4, Spin::Down).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let accepted = sampler.run_batch(&mut lattice, 5_000, &mut rng);
        assert_eq!(accepted, 0);
        assert!(lattice.spins().iter().all(|&s| s == Spin::Down));
    }

    #[test]
    fn test_batch_is_reproducible() {
        let sampler = Metropolis::new(2.5).unwrap();
        let mut first = Lattice2D::random(12, &mut StdRng::seed_from_u64(1)).unwrap();
        let mut second = first.clone();

        let a = sampler.run_batch(&mut first, 10_000, &mut StdRng::seed_from_u64(9));
        let b = sampler.run_batch(&mut second, 10_000, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
        assert_eq!(first, second);
        assert!(a > 0);
    }
}
