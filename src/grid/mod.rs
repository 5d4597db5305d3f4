//! Grid module - dense cell grid shared by every pipeline stage
//!
//! The grid is the interchange format of the crate: layout generators write
//! into it, the mesh synthesizer and light placer read from it, and a host
//! editor mutates it cell by cell between regenerations.

mod model;

pub use model::*;
