//! Light placement - ceiling lights from a connectivity heuristic
//!
//! Classifies occupied cells as room-like or corridor-like by counting
//! occupied neighbors, then greedily accepts spaced candidates in row-major
//! order. A `LightSet` diffs successive passes by index so a host can reuse
//! its light instances instead of recreating them on every regeneration.

mod placer;

pub use placer::*;
