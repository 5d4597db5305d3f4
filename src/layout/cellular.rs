//! Cellular-automata dungeon generator with a recursive-backtracker option
//!
//! The cellular path seeds the interior with noise, smooths it with Moore
//! neighborhood automata steps, then keeps only the largest 4-connected floor
//! component so the result is guaranteed walkable end to end. The backtracker
//! path carves a perfect maze instead. Both feed the shared post-processing
//! pipeline (loop injection, dead-end handling, edge smoothing).

use log::debug;
use rand::Rng;
use rand::rngs::StdRng;
use serde::{Serialize, Deserialize};

use crate::grid::GridModel;
use super::{post, seeded_rng};

fn default_floor_height() -> f32 { 1.0 }
fn default_density() -> f32 { 0.45 }
fn default_iterations() -> u32 { 4 }
fn default_path_width() -> i32 { 1 }

/// Settings for the cellular/backtracker dungeon generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellularSettings {
    #[serde(default)]
    pub seed: i32,
    /// Elevation written into carved floor cells
    #[serde(default = "default_floor_height")]
    pub floor_height: f32,
    /// Probability that an interior cell starts as wall
    #[serde(default = "default_density")]
    pub density: f32,
    /// Synchronous automata smoothing passes
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Stamp size applied at every floor cell (1 = no widening)
    #[serde(default = "default_path_width")]
    pub path_width: i32,
    /// 0 = prune all dead ends, 1 = keep all, otherwise per-dead-end chance
    #[serde(default)]
    pub dead_end_keep_chance: f32,
    /// Extra wall-to-floor conversions to break up tree-like layouts
    #[serde(default)]
    pub loop_count: u32,
    /// Convert walls with 3+ floor neighbors into floor after pruning
    #[serde(default)]
    pub smooth_edges: bool,
    /// Carve a perfect maze instead of running the automata
    #[serde(default)]
    pub use_recursive_backtracker: bool,
}

impl Default for CellularSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            floor_height: default_floor_height(),
            density: default_density(),
            iterations: default_iterations(),
            path_width: default_path_width(),
            dead_end_keep_chance: 0.0,
            loop_count: 0,
            smooth_edges: false,
            use_recursive_backtracker: false,
        }
    }
}

pub(super) fn generate(settings: &CellularSettings, width: i32, height: i32) -> GridModel {
    let mut grid = GridModel::new(width, height);
    let mut rng = seeded_rng(settings.seed);
    let floor_height = settings.floor_height;

    if settings.use_recursive_backtracker {
        carve_backtracker(&mut grid, &mut rng, floor_height);
    } else {
        seed_noise(&mut grid, &mut rng, settings.density, floor_height);
        for _ in 0..settings.iterations {
            automata_step(&mut grid, floor_height);
        }
        keep_largest_component(&mut grid);
        if settings.path_width > 1 {
            widen_paths(&mut grid, settings.path_width, floor_height);
        }
    }

    post::apply(
        &mut grid,
        &mut rng,
        &post::PostSettings {
            loop_count: settings.loop_count,
            dead_end_keep_chance: settings.dead_end_keep_chance,
            smooth_edges: settings.smooth_edges,
            floor_height,
        },
    );

    debug!(
        "cellular layout: {} floor cells ({}x{}, seed {}, backtracker {})",
        grid.floor_count(),
        grid.width(),
        grid.height(),
        settings.seed,
        settings.use_recursive_backtracker
    );
    grid
}

/// Border forced to wall; interior cells roll against `density`
fn seed_noise(grid: &mut GridModel, rng: &mut StdRng, density: f32, floor_height: f32) {
    for y in 1..grid.height() - 1 {
        for x in 1..grid.width() - 1 {
            if rng.gen::<f32>() >= density {
                grid.set_height(x, y, floor_height);
            }
        }
    }
}

/// Count wall cells among the 8 Moore neighbors; off-grid counts as wall
fn wall_neighbors8(grid: &GridModel, x: i32, y: i32) -> u32 {
    let mut count = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            if !grid.is_floor(x + dx, y + dy) {
                count += 1;
            }
        }
    }
    count
}

/// One synchronous automata pass over the interior
fn automata_step(grid: &mut GridModel, floor_height: f32) {
    let snapshot = grid.clone();
    for y in 1..grid.height() - 1 {
        for x in 1..grid.width() - 1 {
            let walls = wall_neighbors8(&snapshot, x, y);
            if walls >= 5 {
                grid.set_height(x, y, 0.0);
            } else if walls <= 3 {
                grid.set_height(x, y, floor_height);
            }
        }
    }
}

/// Collect one 4-connected floor component starting at (x, y)
fn component_at(grid: &GridModel, x: i32, y: i32, seen: &mut [bool]) -> Vec<(i32, i32)> {
    let width = grid.width();
    let mut cells = Vec::new();
    let mut stack = vec![(x, y)];
    seen[(y * width + x) as usize] = true;
    while let Some((cx, cy)) = stack.pop() {
        cells.push((cx, cy));
        for (dx, dy) in [(0, -1), (1, 0), (0, 1), (-1, 0)] {
            let (nx, ny) = (cx + dx, cy + dy);
            if grid.is_floor(nx, ny) {
                let idx = (ny * width + nx) as usize;
                if !seen[idx] {
                    seen[idx] = true;
                    stack.push((nx, ny));
                }
            }
        }
    }
    cells
}

/// Zero out every floor component except the largest
fn keep_largest_component(grid: &mut GridModel) {
    let mut seen = vec![false; (grid.width() * grid.height()) as usize];
    let mut components: Vec<Vec<(i32, i32)>> = Vec::new();

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if grid.is_floor(x, y) && !seen[(y * grid.width() + x) as usize] {
                components.push(component_at(grid, x, y, &mut seen));
            }
        }
    }

    let largest = components
        .iter()
        .enumerate()
        .max_by_key(|(_, c)| c.len())
        .map(|(i, _)| i);

    for (i, component) in components.iter().enumerate() {
        if Some(i) != largest {
            for &(x, y) in component {
                grid.set_height(x, y, 0.0);
            }
        }
    }
}

/// Stamp a path_width x path_width block at every floor cell, clamped to
/// bounds; extends only toward +x/+y and may overwrite neighboring walls
fn widen_paths(grid: &mut GridModel, path_width: i32, floor_height: f32) {
    let floors: Vec<(i32, i32)> = grid
        .iter_cells()
        .filter(|(_, _, c)| c.is_floor())
        .map(|(x, y, _)| (x, y))
        .collect();
    for (x, y) in floors {
        for dy in 0..path_width {
            for dx in 0..path_width {
                let (nx, ny) = (x + dx, y + dy);
                if nx < grid.width() && ny < grid.height() {
                    grid.set_height(nx, ny, floor_height);
                }
            }
        }
    }
}

/// Depth-first carve from the grid center, stepping 2 cells and opening the
/// midpoint wall toward each newly visited cell. Produces a perfect maze
/// (spanning tree) before post-processing.
pub(super) fn carve_backtracker(grid: &mut GridModel, rng: &mut StdRng, floor_height: f32) {
    const DIRS: [(i32, i32); 4] = [(0, -2), (2, 0), (0, 2), (-2, 0)];
    let (width, height) = (grid.width(), grid.height());
    let start = (width / 2, height / 2);

    let mut visited = vec![false; (width * height) as usize];
    let mut stack = vec![start];
    visited[(start.1 * width + start.0) as usize] = true;
    grid.set_height(start.0, start.1, floor_height);

    while let Some(&(cx, cy)) = stack.last() {
        let mut candidates = [(0, 0); 4];
        let mut count = 0;
        for (dx, dy) in DIRS {
            let (nx, ny) = (cx + dx, cy + dy);
            if nx >= 0 && nx < width && ny >= 0 && ny < height
                && !visited[(ny * width + nx) as usize]
            {
                candidates[count] = (nx, ny);
                count += 1;
            }
        }

        if count == 0 {
            let _ = stack.pop();
            continue;
        }

        let (nx, ny) = candidates[rng.gen_range(0..count)];
        // Open the wall between current and target, then the target itself
        grid.set_height((cx + nx) / 2, (cy + ny) / 2, floor_height);
        grid.set_height(nx, ny, floor_height);
        visited[(ny * width + nx) as usize] = true;
        stack.push((nx, ny));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_settings(seed: i32) -> CellularSettings {
        CellularSettings { seed, ..Default::default() }
    }

    fn floor_cells(grid: &GridModel) -> Vec<(i32, i32)> {
        grid.iter_cells()
            .filter(|(_, _, c)| c.is_floor())
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let settings = CellularSettings { seed: 13, loop_count: 4, smooth_edges: true, ..Default::default() };
        let a = generate(&settings, 50, 40);
        let b = generate(&settings, 50, 40);
        assert_eq!(a.heights(), b.heights());
    }

    #[test]
    fn test_border_is_wall() {
        let grid = generate(&raw_settings(2), 40, 40);
        for x in 0..40 {
            assert!(!grid.is_floor(x, 0));
            assert!(!grid.is_floor(x, 39));
        }
        for y in 0..40 {
            assert!(!grid.is_floor(0, y));
            assert!(!grid.is_floor(39, y));
        }
    }

    #[test]
    fn test_single_connected_component() {
        let grid = generate(&raw_settings(11), 50, 50);
        let floors = floor_cells(&grid);
        assert!(!floors.is_empty());

        let mut seen = vec![false; (grid.width() * grid.height()) as usize];
        let component = component_at(&grid, floors[0].0, floors[0].1, &mut seen);
        assert_eq!(component.len(), floors.len());
    }

    #[test]
    fn test_path_width_widens_layout() {
        let narrow = generate(&raw_settings(4), 40, 40);
        let wide = generate(
            &CellularSettings { seed: 4, path_width: 2, ..Default::default() },
            40,
            40,
        );
        assert!(wide.floor_count() > narrow.floor_count());
    }

    #[test]
    fn test_backtracker_is_perfect_maze() {
        // Pre-post-processing carve: floor graph must be a spanning tree,
        // so cells == edges + 1 and one flood fill reaches everything
        let mut grid = GridModel::new(31, 31);
        let mut rng = seeded_rng(21);
        carve_backtracker(&mut grid, &mut rng, 1.0);

        let floors = floor_cells(&grid);
        assert!(!floors.is_empty());

        let mut edges = 0;
        for &(x, y) in &floors {
            // Count each adjacency once via +x/+y neighbors
            if grid.is_floor(x + 1, y) {
                edges += 1;
            }
            if grid.is_floor(x, y + 1) {
                edges += 1;
            }
        }
        assert_eq!(floors.len(), edges + 1);

        let mut seen = vec![false; (grid.width() * grid.height()) as usize];
        let component = component_at(&grid, floors[0].0, floors[0].1, &mut seen);
        assert_eq!(component.len(), floors.len());
    }

    #[test]
    fn test_backtracker_variant_is_deterministic() {
        let settings = CellularSettings {
            seed: 6,
            use_recursive_backtracker: true,
            dead_end_keep_chance: 0.5,
            loop_count: 3,
            ..Default::default()
        };
        let a = generate(&settings, 33, 27);
        let b = generate(&settings, 33, 27);
        assert_eq!(a.heights(), b.heights());
    }
}
