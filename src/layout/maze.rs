//! Perfect-maze generator
//!
//! A standalone configuration of the recursive-backtracker carve followed by
//! the shared post-processing pipeline. With loop count 0 and keep chance 1
//! the output stays a perfect maze; the knobs below trade that purity for
//! playability.

use log::debug;
use serde::{Serialize, Deserialize};

use crate::grid::GridModel;
use super::{cellular, post, seeded_rng};

fn default_floor_height() -> f32 { 1.0 }
fn default_keep_chance() -> f32 { 1.0 }

/// Settings for the maze generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeSettings {
    #[serde(default)]
    pub seed: i32,
    /// Elevation written into carved floor cells
    #[serde(default = "default_floor_height")]
    pub floor_height: f32,
    /// Extra wall-to-floor conversions to break the spanning tree
    #[serde(default)]
    pub loop_count: u32,
    /// 0 = prune all dead ends, 1 = keep all (the default for mazes)
    #[serde(default = "default_keep_chance")]
    pub dead_end_keep_chance: f32,
    /// Convert walls with 3+ floor neighbors into floor after pruning
    #[serde(default)]
    pub smooth_edges: bool,
}

impl Default for MazeSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            floor_height: default_floor_height(),
            loop_count: 0,
            dead_end_keep_chance: default_keep_chance(),
            smooth_edges: false,
        }
    }
}

pub(super) fn generate(settings: &MazeSettings, width: i32, height: i32) -> GridModel {
    let mut grid = GridModel::new(width, height);
    let mut rng = seeded_rng(settings.seed);

    cellular::carve_backtracker(&mut grid, &mut rng, settings.floor_height);
    post::apply(
        &mut grid,
        &mut rng,
        &post::PostSettings {
            loop_count: settings.loop_count,
            dead_end_keep_chance: settings.dead_end_keep_chance,
            smooth_edges: settings.smooth_edges,
            floor_height: settings.floor_height,
        },
    );

    debug!(
        "maze layout: {} floor cells ({}x{}, seed {})",
        grid.floor_count(),
        grid.width(),
        grid.height(),
        settings.seed
    );
    grid
}
