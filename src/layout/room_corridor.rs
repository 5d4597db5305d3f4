//! Rooms-and-corridors generator
//!
//! Rejection-sampled room packing: up to `max_rooms` placement attempts, one
//! sample each, rejecting any room that overlaps an accepted one. Accepted
//! rooms are then sorted by center and linked pairwise with L-shaped
//! corridors, so the result is always one connected layout.

use log::debug;
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::grid::GridModel;
use super::seeded_rng;

fn default_floor_height() -> f32 { 1.0 }
fn default_max_rooms() -> u32 { 8 }
fn default_min_room_size() -> i32 { 3 }
fn default_max_room_size() -> i32 { 7 }

/// Settings for the rooms-and-corridors generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomCorridorSettings {
    #[serde(default)]
    pub seed: i32,
    /// Elevation written into carved floor cells
    #[serde(default = "default_floor_height")]
    pub floor_height: f32,
    /// Placement attempts; fewer rooms may result after rejections
    #[serde(default = "default_max_rooms")]
    pub max_rooms: u32,
    #[serde(default = "default_min_room_size")]
    pub min_room_size: i32,
    #[serde(default = "default_max_room_size")]
    pub max_room_size: i32,
}

impl Default for RoomCorridorSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            floor_height: default_floor_height(),
            max_rooms: default_max_rooms(),
            min_room_size: default_min_room_size(),
            max_room_size: default_max_room_size(),
        }
    }
}

/// Candidate room, alive only for the duration of one generate call
#[derive(Debug, Clone, Copy)]
struct Room {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl Room {
    fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Overlap test; touching rooms count as intersecting so a wall survives
    fn intersects(&self, other: &Room) -> bool {
        self.x <= other.x + other.width
            && self.x + self.width >= other.x
            && self.y <= other.y + other.height
            && self.y + self.height >= other.y
    }
}

pub(super) fn generate(settings: &RoomCorridorSettings, width: i32, height: i32) -> GridModel {
    let mut grid = GridModel::new(width, height);
    let (width, height) = (grid.width(), grid.height());
    let mut rng = seeded_rng(settings.seed);

    // Room sizes must fit the grid with a 1-cell margin, max strictly above min
    let largest = width.min(height) - 2;
    if largest < 2 {
        // No distinct min/max room size fits; leave the grid empty
        return grid;
    }
    let min_size = settings.min_room_size.clamp(1, largest - 1);
    let max_size = settings.max_room_size.clamp(min_size + 1, largest);

    let mut rooms: Vec<Room> = Vec::new();
    for _ in 0..settings.max_rooms {
        let w = rng.gen_range(min_size..=max_size);
        let h = rng.gen_range(min_size..=max_size);
        let x = rng.gen_range(1..=width - w - 1);
        let y = rng.gen_range(1..=height - h - 1);
        let room = Room { x, y, width: w, height: h };

        // Reject and move on; no retry for this slot
        if rooms.iter().any(|r| r.intersects(&room)) {
            continue;
        }

        carve_room(&mut grid, &room, settings.floor_height);
        rooms.push(room);
    }

    rooms.sort_by_key(|r| r.center());
    for pair in rooms.windows(2) {
        let (ax, ay) = pair[0].center();
        let (bx, by) = pair[1].center();
        if rng.gen_bool(0.5) {
            carve_corridor_x(&mut grid, ax, bx, ay, settings.floor_height);
            carve_corridor_y(&mut grid, ay, by, bx, settings.floor_height);
        } else {
            carve_corridor_y(&mut grid, ay, by, ax, settings.floor_height);
            carve_corridor_x(&mut grid, ax, bx, by, settings.floor_height);
        }
    }

    debug!(
        "room-corridor layout: {} rooms, {} floor cells ({}x{}, seed {})",
        rooms.len(),
        grid.floor_count(),
        width,
        height,
        settings.seed
    );
    grid
}

fn carve_room(grid: &mut GridModel, room: &Room, floor_height: f32) {
    for y in room.y..room.y + room.height {
        for x in room.x..room.x + room.width {
            grid.set_height(x, y, floor_height);
        }
    }
}

/// Straight horizontal fill; overwrites whatever it passes through
fn carve_corridor_x(grid: &mut GridModel, x0: i32, x1: i32, y: i32, floor_height: f32) {
    for x in x0.min(x1)..=x0.max(x1) {
        grid.set_height(x, y, floor_height);
    }
}

fn carve_corridor_y(grid: &mut GridModel, y0: i32, y1: i32, x: i32, floor_height: f32) {
    for y in y0.min(y1)..=y0.max(y1) {
        grid.set_height(x, y, floor_height);
    }
}
