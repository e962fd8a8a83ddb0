//! Text frames of lattice snapshots

use ising::{Lattice, Snapshot, Spin};
use std::fmt::Write;

fn glyph(spin: Spin) -> &'static str {
    match spin {
        Spin::Up => "↑",
        Spin::Down => "↓",
    }
}

/// Draw the face of the lattice where every axis after the first two is 0.
///
/// For a square lattice that is the whole lattice; for a cube it is the
/// front panel. Rows follow axis 0, columns axis 1.
pub fn front_face<const D: usize>(lattice: &Lattice<D>) -> String {
    let size = lattice.size();
    let mut out = String::new();
    let face = lattice
        .coords()
        .filter(|coord| coord.iter().skip(2).all(|&c| c == 0));
    for (n, coord) in face.enumerate() {
        let _ = write!(out, "{:2}", glyph(lattice.get(coord)));
        if (n + 1) % size == 0 {
            out.push('\n');
        }
    }
    out
}

/// A frame: a header line followed by the front face of the snapshot
pub fn render_frame<const D: usize>(frame: u64, snapshot: &Snapshot<'_, D>) -> String {
    let lattice = snapshot.lattice();
    let kind = if snapshot.is_coarse() { "block-spin" } else { "raw" };
    format!(
        "frame {} | {}D {} lattice, size {}\n{}",
        frame,
        D,
        kind,
        lattice.size(),
        front_face(lattice)
    )
}
