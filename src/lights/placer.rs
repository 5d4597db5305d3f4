//! Light placer and instance bookkeeping

use log::debug;
use serde::{Serialize, Deserialize};

use crate::grid::GridModel;
use crate::math::Vec3;

/// Neighborhood shape used when counting occupied neighbors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Neighborhood {
    /// 4-connectivity (von Neumann)
    #[default]
    Orthogonal,
    /// 8-connectivity
    Moore,
}

impl Neighborhood {
    fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Neighborhood::Orthogonal => &[(0, -1), (1, 0), (0, 1), (-1, 0)],
            Neighborhood::Moore => &[
                (-1, -1), (0, -1), (1, -1),
                (-1, 0), (1, 0),
                (-1, 1), (0, 1), (1, 1),
            ],
        }
    }
}

fn default_room_min_neighbors() -> u32 { 4 }
fn default_corridor_min_neighbors() -> u32 { 1 }
fn default_corridor_max_neighbors() -> u32 { 2 }
fn default_room_spacing() -> f32 { 3.0 }
fn default_corridor_spacing() -> f32 { 2.0 }

/// Classification and spacing policy for the light placer
///
/// Thresholds and neighborhood shape are configuration, not constants: hosts
/// disagree on where "room" starts (3 vs 4 occupied neighbors, orthogonal vs
/// Moore counting), so both readings must be expressible.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LightConfig {
    #[serde(default)]
    pub neighborhood: Neighborhood,
    /// Cells with at least this many occupied neighbors are room-like
    #[serde(default = "default_room_min_neighbors")]
    pub room_min_neighbors: u32,
    /// Corridor classification lower bound (inclusive)
    #[serde(default = "default_corridor_min_neighbors")]
    pub corridor_min_neighbors: u32,
    /// Corridor classification upper bound (inclusive)
    #[serde(default = "default_corridor_max_neighbors")]
    pub corridor_max_neighbors: u32,
    /// Minimum world distance between a room light and earlier lights
    #[serde(default = "default_room_spacing")]
    pub room_spacing: f32,
    /// Minimum world distance between a corridor light and earlier lights
    #[serde(default = "default_corridor_spacing")]
    pub corridor_spacing: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            neighborhood: Neighborhood::Orthogonal,
            room_min_neighbors: default_room_min_neighbors(),
            corridor_min_neighbors: default_corridor_min_neighbors(),
            corridor_max_neighbors: default_corridor_max_neighbors(),
            room_spacing: default_room_spacing(),
            corridor_spacing: default_corridor_spacing(),
        }
    }
}

/// Reference frame of the mesh's parent: grid cells to world positions
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ParentFrame {
    pub origin: Vec3,
    pub cell_size: f32,
}

impl Default for ParentFrame {
    fn default() -> Self {
        Self { origin: Vec3::ZERO, cell_size: 1.0 }
    }
}

impl ParentFrame {
    /// World position of a cell's planar center at the given elevation
    pub fn cell_to_world(&self, x: i32, y: i32, elevation: f32) -> Vec3 {
        self.origin
            + Vec3::new(
                (x as f32 + 0.5) * self.cell_size,
                elevation,
                (y as f32 + 0.5) * self.cell_size,
            )
    }
}

/// One placed ceiling light
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightPlacement {
    pub position: Vec3,
    /// Room-like (true) vs corridor-like (false) classification
    pub is_room: bool,
}

/// Compute light placements for the current grid state
///
/// Deterministic, order-dependent greedy scan: cells are visited row-major,
/// and a candidate is accepted only if its distance to every already-accepted
/// candidate is at least the spacing threshold for its classification.
pub fn place_lights(grid: &GridModel, frame: &ParentFrame, config: &LightConfig) -> Vec<LightPlacement> {
    let mut accepted: Vec<LightPlacement> = Vec::new();

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let cell = grid.cell(x, y);
            if !cell.is_floor() {
                continue;
            }

            let neighbors = config
                .neighborhood
                .offsets()
                .iter()
                .filter(|(dx, dy)| grid.is_floor(x + dx, y + dy))
                .count() as u32;

            let is_room = if neighbors >= config.room_min_neighbors {
                true
            } else if neighbors >= config.corridor_min_neighbors
                && neighbors <= config.corridor_max_neighbors
            {
                false
            } else {
                continue;
            };

            let position = frame.cell_to_world(x, y, cell.height);
            let spacing = if is_room { config.room_spacing } else { config.corridor_spacing };
            if accepted.iter().all(|p| p.position.distance(position) >= spacing) {
                accepted.push(LightPlacement { position, is_room });
            }
        }
    }

    debug!(
        "light placement: {} lights ({} room-classified)",
        accepted.len(),
        accepted.iter().filter(|p| p.is_room).count()
    );
    accepted
}

/// Host-side instance operations the `LightSet` drives during a sync
pub trait LightHost {
    /// Handle the host uses to identify one light instance
    type Id;

    fn create(&mut self, placement: &LightPlacement) -> Self::Id;
    fn update(&mut self, id: &Self::Id, placement: &LightPlacement);
    fn destroy(&mut self, id: Self::Id);
}

/// Tracks placed light instances across regenerations
///
/// Successive placement lists are diffed by index: the first min(old, new)
/// instances are reused in place, extra instances are created, surplus ones
/// destroyed. The host never churns instances that merely moved.
#[derive(Debug, Default)]
pub struct LightSet<I> {
    ids: Vec<I>,
    placements: Vec<LightPlacement>,
}

impl<I> LightSet<I> {
    pub fn new() -> Self {
        Self { ids: Vec::new(), placements: Vec::new() }
    }

    /// Placements applied by the most recent sync
    pub fn placements(&self) -> &[LightPlacement] {
        &self.placements
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Apply a freshly computed placement list against the host
    pub fn sync<H: LightHost<Id = I>>(&mut self, new: Vec<LightPlacement>, host: &mut H) {
        let reused = self.ids.len().min(new.len());
        for (id, placement) in self.ids.iter().zip(&new) {
            host.update(id, placement);
        }
        for placement in &new[reused..] {
            self.ids.push(host.create(placement));
        }
        while self.ids.len() > new.len() {
            if let Some(id) = self.ids.pop() {
                host.destroy(id);
            }
        }
        self.placements = new;
    }

    /// Recompute placements for the grid and sync them in one step
    pub fn refresh<H: LightHost<Id = I>>(
        &mut self,
        grid: &GridModel,
        frame: &ParentFrame,
        config: &LightConfig,
        host: &mut H,
    ) {
        self.sync(place_lights(grid, frame, config), host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_room_grid() -> GridModel {
        // 6x6 open room with a corridor poking out to the east
        let mut grid = GridModel::new(12, 8);
        for y in 1..7 {
            for x in 1..7 {
                grid.set_height(x, y, 1.0);
            }
        }
        for x in 7..11 {
            grid.set_height(x, 4, 1.0);
        }
        grid
    }

    #[test]
    fn test_classification_splits_room_and_corridor() {
        let grid = open_room_grid();
        let lights = place_lights(&grid, &ParentFrame::default(), &LightConfig::default());
        assert!(lights.iter().any(|l| l.is_room));
        assert!(lights.iter().any(|l| !l.is_room));
    }

    #[test]
    fn test_spacing_invariant_per_classification() {
        let grid = open_room_grid();
        let config = LightConfig::default();
        let lights = place_lights(&grid, &ParentFrame::default(), &config);

        for (i, a) in lights.iter().enumerate() {
            for b in &lights[i + 1..] {
                if a.is_room == b.is_room {
                    let spacing = if a.is_room { config.room_spacing } else { config.corridor_spacing };
                    assert!(
                        a.position.distance(b.position) >= spacing - 0.001,
                        "placements too close: {:?} vs {:?}",
                        a,
                        b
                    );
                }
            }
        }
    }

    #[test]
    fn test_placement_is_deterministic() {
        let grid = open_room_grid();
        let a = place_lights(&grid, &ParentFrame::default(), &LightConfig::default());
        let b = place_lights(&grid, &ParentFrame::default(), &LightConfig::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_moore_neighborhood_is_configurable() {
        // A 3x3 blob: under Moore counting the center sees 8 neighbors,
        // under orthogonal only 4. A room threshold of 8 distinguishes them.
        let mut grid = GridModel::new(5, 5);
        for y in 1..4 {
            for x in 1..4 {
                grid.set_height(x, y, 1.0);
            }
        }
        let config = LightConfig {
            neighborhood: Neighborhood::Moore,
            room_min_neighbors: 8,
            ..Default::default()
        };
        let lights = place_lights(&grid, &ParentFrame::default(), &config);
        assert_eq!(lights.iter().filter(|l| l.is_room).count(), 1);

        let orthogonal = LightConfig { room_min_neighbors: 8, ..Default::default() };
        let lights = place_lights(&grid, &ParentFrame::default(), &orthogonal);
        assert_eq!(lights.iter().filter(|l| l.is_room).count(), 0);
    }

    #[test]
    fn test_frame_maps_cells_to_world() {
        let frame = ParentFrame { origin: Vec3::new(10.0, 0.0, -4.0), cell_size: 2.0 };
        let p = frame.cell_to_world(3, 1, 1.5);
        assert!((p.x - 17.0).abs() < 0.001);
        assert!((p.y - 1.5).abs() < 0.001);
        assert!((p.z + 1.0).abs() < 0.001);
    }

    /// Host double that records instance operations
    #[derive(Default)]
    struct CountingHost {
        next_id: u64,
        created: usize,
        updated: usize,
        destroyed: usize,
        alive: Vec<u64>,
    }

    impl LightHost for CountingHost {
        type Id = u64;

        fn create(&mut self, _placement: &LightPlacement) -> u64 {
            self.next_id += 1;
            self.created += 1;
            self.alive.push(self.next_id);
            self.next_id
        }

        fn update(&mut self, _id: &u64, _placement: &LightPlacement) {
            self.updated += 1;
        }

        fn destroy(&mut self, id: u64) {
            self.destroyed += 1;
            self.alive.retain(|&a| a != id);
        }
    }

    fn placements(n: usize) -> Vec<LightPlacement> {
        (0..n)
            .map(|i| LightPlacement {
                position: Vec3::new(i as f32 * 10.0, 0.0, 0.0),
                is_room: i % 2 == 0,
            })
            .collect()
    }

    #[test]
    fn test_sync_reuses_then_creates_then_destroys() {
        let mut host = CountingHost::default();
        let mut set = LightSet::new();

        set.sync(placements(3), &mut host);
        assert_eq!(host.created, 3);
        assert_eq!(host.alive.len(), 3);

        // Growing reuses all 3 and creates 2 more
        set.sync(placements(5), &mut host);
        assert_eq!(host.created, 5);
        assert_eq!(host.updated, 3);
        assert_eq!(host.alive.len(), 5);

        // Shrinking reuses 2 and destroys the surplus 3
        set.sync(placements(2), &mut host);
        assert_eq!(host.created, 5);
        assert_eq!(host.destroyed, 3);
        assert_eq!(host.alive.len(), 2);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_refresh_runs_placer_and_sync() {
        let grid = open_room_grid();
        let mut host = CountingHost::default();
        let mut set = LightSet::new();
        set.refresh(&grid, &ParentFrame::default(), &LightConfig::default(), &mut host);
        assert_eq!(set.len(), host.alive.len());
        assert!(!set.is_empty());
    }
}
