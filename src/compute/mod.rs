//! Compute module - Rendering, fitness, and search for circle evolution.

mod raster;
mod renderer;

pub mod evolution;

pub use raster::*;
pub use renderer::*;
