//! Nearest-neighbor Ising Hamiltonian with unit coupling, `H = -Σ s_i s_j`.

use crate::lattice::Lattice;

/// Sum of the neighboring spins of `coord` (periodic boundary conditions)
#[inline]
pub fn local_field<const D: usize>(lattice: &Lattice<D>, coord: [usize; D]) -> i32 {
    lattice
        .neighbors(coord)
        .map(|neighbor| lattice.get(neighbor).value())
        .sum()
}

/// Energy change if the spin at `coord` is flipped.
///
/// ΔE = 2 * s_i * Σ s_j over the nearest neighbors. The factor of 2 comes
/// from the spin going from s_i to -s_i. Only the `2 * D` neighbors are read,
/// so this is O(1) per proposal.
#[inline]
pub fn energy_delta<const D: usize>(lattice: &Lattice<D>, coord: [usize; D]) -> i32 {
    2 * lattice.get(coord).value() * local_field(lattice, coord)
}

/// Total energy of the configuration.
///
/// Each bond is counted once by only pairing a site with its forward
/// neighbor along every axis.
pub fn total_energy<const D: usize>(lattice: &Lattice<D>) -> i64 {
    let size = lattice.size();
    lattice
        .coords()
        .map(|coord| {
            let spin = lattice.get(coord).value() as i64;
            let forward: i64 = (0..D)
                .map(|axis| {
                    let mut next = coord;
                    next[axis] = (coord[axis] + 1) % size;
                    lattice.get(next).value() as i64
                })
                .sum();
            -spin * forward
        })
        .sum()
}
