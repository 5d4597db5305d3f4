//! Shared layout post-processing
//!
//! Applied in a fixed order after carving: loop injection, dead-end
//! handling, then optional edge smoothing. All passes operate on 4-neighbor
//! floor counts.

use rand::Rng;
use rand::rngs::StdRng;

use crate::grid::GridModel;

pub(super) struct PostSettings {
    pub loop_count: u32,
    pub dead_end_keep_chance: f32,
    pub smooth_edges: bool,
    pub floor_height: f32,
}

pub(super) fn apply(grid: &mut GridModel, rng: &mut StdRng, settings: &PostSettings) {
    if settings.loop_count > 0 {
        inject_loops(grid, rng, settings.loop_count, settings.floor_height);
    }
    prune_dead_ends(grid, rng, settings.dead_end_keep_chance);
    if settings.smooth_edges {
        smooth_edges(grid, settings.floor_height);
    }
}

fn floor_neighbors4(grid: &GridModel, x: i32, y: i32) -> u32 {
    let mut count = 0;
    for (dx, dy) in [(0, -1), (1, 0), (0, 1), (-1, 0)] {
        if grid.is_floor(x + dx, y + dy) {
            count += 1;
        }
    }
    count
}

/// A floor cell with exactly one floor 4-neighbor
fn is_dead_end(grid: &GridModel, x: i32, y: i32) -> bool {
    grid.is_floor(x, y) && floor_neighbors4(grid, x, y) == 1
}

/// Convert up to `loop_count` wall cells with 2+ floor neighbors into floor.
/// Budget of 10x attempts, so sparse layouts degrade to fewer loops instead
/// of spinning.
fn inject_loops(grid: &mut GridModel, rng: &mut StdRng, loop_count: u32, floor_height: f32) {
    let mut placed = 0;
    for _ in 0..loop_count * 10 {
        if placed >= loop_count {
            break;
        }
        let x = rng.gen_range(0..grid.width());
        let y = rng.gen_range(0..grid.height());
        if !grid.is_floor(x, y) && floor_neighbors4(grid, x, y) >= 2 {
            grid.set_height(x, y, floor_height);
            placed += 1;
        }
    }
}

fn collect_dead_ends(grid: &GridModel) -> Vec<(i32, i32)> {
    grid.iter_cells()
        .filter(|&(x, y, _)| is_dead_end(grid, x, y))
        .map(|(x, y, _)| (x, y))
        .collect()
}

/// Dead-end handling:
/// - keep chance 0: iterate until no dead end remains (removal can expose
///   new dead ends further up the corridor)
/// - keep chance in (0, 1): one pass, each dead end independently removed
///   with probability 1 - keep chance; newly created dead ends stay
/// - keep chance >= 1: untouched
fn prune_dead_ends(grid: &mut GridModel, rng: &mut StdRng, keep_chance: f32) {
    if keep_chance >= 1.0 {
        return;
    }

    if keep_chance <= 0.0 {
        loop {
            let dead_ends = collect_dead_ends(grid);
            if dead_ends.is_empty() {
                break;
            }
            for (x, y) in dead_ends {
                grid.set_height(x, y, 0.0);
            }
        }
    } else {
        for (x, y) in collect_dead_ends(grid) {
            if rng.gen::<f32>() >= keep_chance {
                grid.set_height(x, y, 0.0);
            }
        }
    }
}

/// Single pass: any wall cell with 3+ floor 4-neighbors becomes floor
fn smooth_edges(grid: &mut GridModel, floor_height: f32) {
    let snapshot = grid.clone();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if !snapshot.is_floor(x, y) && floor_neighbors4(&snapshot, x, y) >= 3 {
                grid.set_height(x, y, floor_height);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::seeded_rng;

    fn grid_from_rows(rows: &[&str]) -> GridModel {
        let mut grid = GridModel::new(rows[0].len() as i32, rows.len() as i32);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    grid.set_height(x as i32, y as i32, 1.0);
                }
            }
        }
        grid
    }

    #[test]
    fn test_prune_removes_all_dead_ends_at_zero_keep_chance() {
        // A corridor stub hanging off a 2x2 block: the stub collapses one
        // cell per pass until only the block remains
        let mut grid = grid_from_rows(&[
            ".....",
            ".##..",
            ".##..",
            ".#...",
            ".#...",
        ]);
        let mut rng = seeded_rng(0);
        prune_dead_ends(&mut grid, &mut rng, 0.0);

        assert_eq!(grid.floor_count(), 4);
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                assert!(!is_dead_end(&grid, x, y));
            }
        }
    }

    #[test]
    fn test_prune_keeps_everything_at_full_keep_chance() {
        let mut grid = grid_from_rows(&[
            ".....",
            ".###.",
            ".....",
        ]);
        let before = grid.floor_count();
        let mut rng = seeded_rng(0);
        prune_dead_ends(&mut grid, &mut rng, 1.0);
        assert_eq!(grid.floor_count(), before);
    }

    #[test]
    fn test_partial_keep_chance_is_single_pass() {
        // Straight corridor: only the two end cells are dead ends, so even
        // at keep chance near zero at most two cells can vanish in one pass
        let mut grid = grid_from_rows(&[
            ".......",
            ".#####.",
            ".......",
        ]);
        let mut rng = seeded_rng(3);
        prune_dead_ends(&mut grid, &mut rng, 0.001);
        assert!(grid.floor_count() >= 3);
    }

    #[test]
    fn test_inject_loops_respects_budget_and_adjacency() {
        // U-shaped corridor: the gap cell has two floor neighbors and is the
        // only legal loop site
        let mut grid = grid_from_rows(&[
            ".....",
            ".#.#.",
            ".#.#.",
            ".###.",
            ".....",
        ]);
        let before = grid.floor_count();
        let mut rng = seeded_rng(7);
        inject_loops(&mut grid, &mut rng, 8, 1.0);
        // Two candidate cells exist ((2,1) and (2,2)); no more can be placed
        assert!(grid.floor_count() <= before + 2);
        for (x, y, cell) in grid.iter_cells() {
            if cell.is_floor() {
                assert!(floor_neighbors4(&grid, x, y) >= 1, "floor at ({}, {}) isolated", x, y);
            }
        }
    }

    #[test]
    fn test_smooth_edges_fills_notches() {
        // Wall cell surrounded on three sides becomes floor; single pass only
        let mut grid = grid_from_rows(&[
            ".....",
            ".###.",
            ".#.#.",
            ".###.",
            ".....",
        ]);
        smooth_edges(&mut grid, 1.0);
        assert!(grid.is_floor(2, 2));
    }
}
