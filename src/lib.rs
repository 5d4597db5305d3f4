//! GRIDFORGE: procedural level generation and geometry synthesis
//!
//! Everything revolves around a dense 2D grid of cells (floor elevation plus
//! four wall flags):
//! - Layout generators fill the grid with walkable layouts: rejection-sampled
//!   rooms and corridors, cellular-automata caves, or perfect mazes carved by
//!   recursive backtracking
//! - The mesh synthesizer converts a finished grid into crack-free
//!   floor/wall/roof geometry, with configurable tessellation, winding, and
//!   an inverted exterior roof for top-down views
//! - The light placer derives ceiling-light positions from a connectivity
//!   heuristic and keeps a host's light instances in sync across edits
//!
//! All components are synchronous and CPU-bound; a fixed seed always
//! reproduces the same grid. The crate produces in-memory data only - no
//! rendering, no file format, no scene graph.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod math;
mod grid;
mod layout;
mod mesh;
mod lights;

pub use math::{Vec2, Vec3};
pub use grid::{limits, Cell, GridError, GridModel};
pub use layout::{CellularSettings, LayoutSettings, MazeSettings, RoomCorridorSettings};
pub use mesh::{synthesize, MeshGroup, MeshSettings, WindingMode};
pub use lights::{
    place_lights, LightConfig, LightHost, LightPlacement, LightSet, Neighborhood, ParentFrame,
};
