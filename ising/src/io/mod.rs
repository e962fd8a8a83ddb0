//! Input/Output for simulation runs
//!
//! This module handles logging setup and text rendering of lattice frames.

mod output;
mod render;

pub use output::setup_output;
pub use render::render_frame;
