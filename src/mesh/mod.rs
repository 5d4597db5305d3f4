//! Mesh synthesis - height grid to renderable geometry
//!
//! Converts a `GridModel` into three independent mesh groups (Floor, Walls,
//! Roof) of positions, triangle indices, and UVs. Geometry is crack-free for
//! arbitrary height grids: wall quads span exactly from the lower neighbor's
//! elevation up to the cell's own, and equal-height neighbors emit nothing.

mod tessellate;
mod synthesizer;

pub use synthesizer::*;
