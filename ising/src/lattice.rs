use rand::distributions::{Distribution, Standard};
use rand::Rng;

use crate::error::{IsingError, Result};

/// A single Ising spin.
///
/// The lattice stores `Spin` values rather than raw integers, so a cell can
/// only ever hold -1 or +1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Spin {
    Down = -1,
    Up = 1,
}

impl Spin {
    /// Numeric value of the spin, -1 or +1
    #[inline]
    pub fn value(self) -> i32 {
        self as i8 as i32
    }

    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Spin::Up => Spin::Down,
            Spin::Down => Spin::Up,
        }
    }

    /// Sign of an integer sum, `None` for zero
    pub fn from_sign(sum: i32) -> Option<Self> {
        match sum.signum() {
            1 => Some(Spin::Up),
            -1 => Some(Spin::Down),
            _ => None,
        }
    }
}

impl Distribution<Spin> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Spin {
        if rng.gen_bool(0.5) {
            Spin::Up
        } else {
            Spin::Down
        }
    }
}

/// Hypercubic Ising lattice with periodic boundary conditions
///
/// `D` is the number of axes (2 for the square lattice, 3 for the cubic one)
/// and every axis has the same side length. Sites are stored flat in
/// row-major order: the last axis varies fastest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lattice<const D: usize> {
    /// Side length along every axis
    size: usize,
    /// Spin configuration, `size^D` entries
    spins: Vec<Spin>,
}

pub type Lattice2D = Lattice<2>;
pub type Lattice3D = Lattice<3>;

impl<const D: usize> Lattice<D> {
    /// Create a lattice with independent, uniformly random spins.
    ///
    /// One draw is taken from `rng` per site, in row-major order.
    pub fn random<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self> {
        Self::from_fn(size, |_| rng.gen())
    }

    /// Create a lattice with every spin set to `spin` (ordered state)
    pub fn uniform(size: usize, spin: Spin) -> Result<Self> {
        Self::from_fn(size, |_| spin)
    }

    /// Build a lattice by evaluating `f` at every coordinate in row-major order.
    pub fn from_fn<F>(size: usize, mut f: F) -> Result<Self>
    where
        F: FnMut([usize; D]) -> Spin,
    {
        if size < 1 {
            return Err(IsingError::invalid_size(size, "side length must be at least 1"));
        }
        let len = size.pow(D as u32);
        let spins = (0..len).map(|index| f(coord_of::<D>(size, index))).collect();
        Ok(Self { size, spins })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn dimensions(&self) -> usize {
        D
    }

    /// Number of sites, `size^D`
    #[inline]
    pub fn len(&self) -> usize {
        self.spins.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spins.is_empty()
    }

    /// Read-only view of the spins in row-major order
    pub fn spins(&self) -> &[Spin] {
        &self.spins
    }

    /// Get the spin at an in-range coordinate.
    ///
    /// Panics if any component is outside `[0, size)`; wrap neighbors with
    /// [`Lattice::neighbors`] first.
    #[inline]
    pub fn get(&self, coord: [usize; D]) -> Spin {
        self.spins[self.index(coord)]
    }

    #[inline]
    pub fn set(&mut self, coord: [usize; D], spin: Spin) {
        let index = self.index(coord);
        self.spins[index] = spin;
    }

    /// Reverse the spin at `coord` in place
    #[inline]
    pub fn flip(&mut self, coord: [usize; D]) {
        let index = self.index(coord);
        self.spins[index] = self.spins[index].flipped();
    }

    /// The `2 * D` nearest neighbors of `coord` under periodic boundaries.
    ///
    /// For each axis in order the backward neighbor comes first, then the
    /// forward one. Each axis wraps modulo `size` independently.
    #[inline]
    pub fn neighbors(&self, coord: [usize; D]) -> impl Iterator<Item = [usize; D]> {
        let size = self.size;
        (0..D).flat_map(move |axis| {
            let mut backward = coord;
            let mut forward = coord;
            backward[axis] = (coord[axis] + size - 1) % size;
            forward[axis] = (coord[axis] + 1) % size;
            [backward, forward]
        })
    }

    /// All coordinates in row-major order
    pub fn coords(&self) -> impl Iterator<Item = [usize; D]> {
        let size = self.size;
        (0..self.len()).map(move |index| coord_of::<D>(size, index))
    }

    #[inline]
    fn index(&self, coord: [usize; D]) -> usize {
        debug_assert!(
            coord.iter().all(|&c| c < self.size),
            "coordinate {:?} out of range for size {}",
            coord,
            self.size
        );
        coord.iter().fold(0, |acc, &c| acc * self.size + c)
    }
}

impl Lattice<2> {
    /// Rows of the square lattice, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Spin]> {
        self.spins.chunks(self.size)
    }
}

fn coord_of<const D: usize>(size: usize, index: usize) -> [usize; D] {
    let mut coord = [0; D];
    let mut rest = index;
    for axis in (0..D).rev() {
        coord[axis] = rest % size;
        rest /= size;
    }
    coord
}
