//! Block-spin (majority rule) coarse-graining for renormalization-group views
//! of a lattice.

use itertools::Itertools;

use crate::error::{IsingError, Result};
use crate::lattice::{Lattice, Spin};

/// Side length of a block along every axis
pub const BLOCK: usize = 3;

/// Sum of the spins in the block centered at `center`.
///
/// The block spans `center ± 1` along every axis and must lie inside the
/// lattice; windows are never wrapped.
pub fn block_sum<const D: usize>(lattice: &Lattice<D>, center: [usize; D]) -> i32 {
    (0..D)
        .map(|_| 0..BLOCK)
        .multi_cartesian_product()
        .map(|offset| {
            let mut site = center;
            for (axis, step) in offset.into_iter().enumerate() {
                site[axis] = center[axis] + step - 1;
            }
            lattice.get(site).value()
        })
        .sum()
}

/// Replace every 3×3 (3×3×3 in 3D) block with the sign of its spin sum.
///
/// Block centers sit at 1, 4, 7, ... along each axis, so the output has side
/// `size / 3` and any trailing `size % 3` rows and columns are not visited.
/// A block holds an odd number of ±1 spins, so its sum is never zero.
pub fn reduce<const D: usize>(lattice: &Lattice<D>) -> Result<Lattice<D>> {
    let size = lattice.size();
    if size < BLOCK {
        return Err(IsingError::invalid_size(
            size,
            format!("block-spin reduction needs a side length of at least {}", BLOCK),
        ));
    }

    Lattice::from_fn(size / BLOCK, |block| {
        let center = block.map(|b| b * BLOCK + 1);
        let sum = block_sum(lattice, center);
        debug_assert_ne!(sum, 0, "block sum of an odd number of spins");
        Spin::from_sign(sum).unwrap_or(Spin::Up)
    })
}

/// Apply [`reduce`] `levels` times; zero levels returns a copy of the input.
pub fn reduce_levels<const D: usize>(lattice: &Lattice<D>, levels: usize) -> Result<Lattice<D>> {
    let mut current = lattice.clone();
    for _ in 0..levels {
        current = reduce(&current)?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::{Lattice2D, Lattice3D};

    /// 3×3 lattice with `down` sites set to Down in row-major order
    fn window_with_down(down: usize) -> Lattice2D {
        let mut count = 0;
        Lattice2D::from_fn(3, |_| {
            count += 1;
            if count <= down {
                Spin::Down
            } else {
                Spin::Up
            }
        })
        .unwrap()
    }

    #[test]
    fn test_majority_rule() {
        let all_up = window_with_down(0);
        assert_eq!(block_sum(&all_up, [1, 1]), 9);
        assert_eq!(reduce(&all_up).unwrap().get([0, 0]), Spin::Up);

        let one_down = window_with_down(1);
        assert_eq!(block_sum(&one_down, [1, 1]), 7);
        assert_eq!(reduce(&one_down).unwrap().get([0, 0]), Spin::Up);

        let five_down = window_with_down(5);
        assert_eq!(block_sum(&five_down, [1, 1]), -1);
        assert_eq!(reduce(&five_down).unwrap().get([0, 0]), Spin::Down);
    }

    #[test]
    fn test_minimal_input() {
        let lattice = Lattice2D::uniform(3, Spin::Up).unwrap();
        let coarse = reduce(&lattice).unwrap();
        assert_eq!(coarse.size(), 1);
        assert_eq!(coarse.spins(), &[Spin::Up]);
    }

    #[test]
    fn test_too_small_rejected() {
        let lattice = Lattice2D::uniform(2, Spin::Up).unwrap();
        assert!(matches!(
            reduce(&lattice),
            Err(IsingError::InvalidSize { size: 2, .. })
        ));
    }

    #[test]
    fn test_blocks_do_not_overlap() {
        // Left block mostly down, right block all up
        let lattice = Lattice2D::from_fn(6, |[i, j]| {
            if j < 3 && (i + j) % 4 != 0 {
                Spin::Down
            } else {
                Spin::Up
            }
        })
        .unwrap();
        let coarse = reduce(&lattice).unwrap();
        assert_eq!(coarse.size(), 2);
        assert_eq!(coarse.get([0, 0]), Spin::Down);
        assert_eq!(coarse.get([0, 1]), Spin::Up);
        assert_eq!(coarse.get([1, 0]), Spin::Down);
        assert_eq!(coarse.get([1, 1]), Spin::Up);
    }

    #[test]
    fn test_remainder_is_not_visited() {
        // Only the trailing row and column are down; no block reaches them
        let lattice = Lattice2D::from_fn(7, |[i, j]| {
            if i == 6 || j == 6 {
                Spin::Down
            } else {
                Spin::Up
            }
        })
        .unwrap();
        let coarse = reduce(&lattice).unwrap();
        assert_eq!(coarse.size(), 2);
        assert!(coarse.spins().iter().all(|&s| s == Spin::Up));
    }

    #[test]
    fn test_input_is_untouched() {
        let lattice = window_with_down(4);
        let copy = lattice.clone();
        let _ = reduce(&lattice).unwrap();
        assert_eq!(lattice, copy);
    }

    #[test]
    fn test_cubic_blocks() {
        let mut lattice = Lattice3D::uniform(3, Spin::Down).unwrap();
        for k in 0..3 {
            for j in 0..3 {
                lattice.set([0, j, k], Spin::Up);
            }
        }
        // 9 up, 18 down
        assert_eq!(block_sum(&lattice, [1, 1, 1]), -9);
        assert_eq!(reduce(&lattice).unwrap().spins(), &[Spin::Down]);
    }

    #[test]
    fn test_reduce_levels() {
        let lattice = Lattice2D::uniform(9, Spin::Down).unwrap();
        assert_eq!(reduce_levels(&lattice, 0).unwrap(), lattice);
        assert_eq!(reduce_levels(&lattice, 1).unwrap().size(), 3);

        let twice = reduce_levels(&lattice, 2).unwrap();
        assert_eq!(twice.size(), 1);
        assert_eq!(twice.get([0, 0]), Spin::Down);
    }
}
