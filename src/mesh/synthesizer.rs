//! Grid-to-mesh synthesis
//!
//! Coordinate convention: grid (x, y) maps to world (x, z); elevation runs
//! along world +Y. Each cell spans the unit square [x, x+1] x [y, y+1].
//!
//! For every floor cell the synthesizer emits a floor quad at elevation 0, a
//! ceiling quad at the cell's height (unless inverted-roof mode is on), and
//! wall quads on every side where the neighbor sits strictly lower and the
//! cell's wall flag for that side is enabled. Inverted-roof mode instead
//! caps all empty cells with one flat lid at the grid's maximum height, for
//! exterior/top-down views.

use serde::{Serialize, Deserialize};

use crate::grid::{limits, GridModel};
use crate::math::Vec3;
use super::tessellate::{emit_quad, Quad};

/// Triangle winding emitted for every quad
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindingMode {
    /// Front faces only
    #[default]
    Default,
    /// Reversed winding (surfaces face the other way)
    Flipped,
    /// Front plus an independent back-facing copy of every sub-quad
    DoubleSided,
}

fn default_resolution() -> u32 { 1 }
fn default_uv_scale() -> f32 { 1.0 }

/// Settings for the mesh synthesizer
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MeshSettings {
    /// Sub-quads per quad axis; each quad becomes resolution^2 sub-quads
    #[serde(default = "default_resolution")]
    pub resolution: u32,
    /// Uniform multiplier on world-extent UVs
    #[serde(default = "default_uv_scale")]
    pub uv_scale: f32,
    #[serde(default)]
    pub winding: WindingMode,
    /// Cap empty cells at max height instead of per-cell ceilings
    #[serde(default)]
    pub invert_roof: bool,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            uv_scale: default_uv_scale(),
            winding: WindingMode::Default,
            invert_roof: false,
        }
    }
}

impl MeshSettings {
    fn normalized(self) -> Self {
        Self {
            resolution: self.resolution.clamp(1, limits::MAX_MESH_RESOLUTION),
            ..self
        }
    }
}

/// One named batch of geometry: positions, triangle index triples, UVs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshGroup {
    pub name: String,
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
    pub uvs: Vec<crate::math::Vec2>,
}

impl MeshGroup {
    pub(super) fn new(name: &str) -> Self {
        Self { name: name.to_string(), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Convert a grid into its mesh groups; groups with no geometry are omitted
pub fn synthesize(grid: &GridModel, settings: &MeshSettings) -> Vec<MeshGroup> {
    let settings = settings.normalized();
    let mut floor = MeshGroup::new("Floor");
    let mut walls = MeshGroup::new("Walls");
    let mut roof = MeshGroup::new("Roof");

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let cell = grid.cell(x, y);
            if !cell.is_floor() {
                continue;
            }

            emit_quad(&mut floor, &floor_quad(x, y, 0.0), &settings);
            if !settings.invert_roof {
                emit_quad(&mut roof, &ceiling_quad(x, y, cell.height), &settings);
            }

            for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
                let neighbor_height = grid.height_at(x + dx, y + dy);
                if neighbor_height < cell.height && cell.wall_toward(dx, dy) {
                    emit_quad(
                        &mut walls,
                        &wall_quad(x, y, dx, dy, neighbor_height, cell.height),
                        &settings,
                    );
                }
            }
        }
    }

    if settings.invert_roof {
        let lid_height = grid.max_height();
        if lid_height > 0.0 {
            for y in 0..grid.height() {
                for x in 0..grid.width() {
                    if !grid.is_floor(x, y) {
                        emit_quad(&mut roof, &floor_quad(x, y, lid_height), &settings);
                    }
                }
            }
        }
    }

    [floor, walls, roof]
        .into_iter()
        .filter(|group| !group.is_empty())
        .collect()
}

/// Up-facing unit quad at the given elevation (floor, or the inverted lid)
fn floor_quad(x: i32, y: i32, elevation: f32) -> Quad {
    let (fx, fz) = (x as f32, y as f32);
    Quad {
        corners: [
            Vec3::new(fx, elevation, fz + 1.0),
            Vec3::new(fx + 1.0, elevation, fz + 1.0),
            Vec3::new(fx + 1.0, elevation, fz),
            Vec3::new(fx, elevation, fz),
        ],
        u_extent: 1.0,
        v_extent: 1.0,
    }
}

/// Down-facing unit quad at the cell's height
fn ceiling_quad(x: i32, y: i32, elevation: f32) -> Quad {
    let (fx, fz) = (x as f32, y as f32);
    Quad {
        corners: [
            Vec3::new(fx, elevation, fz),
            Vec3::new(fx + 1.0, elevation, fz),
            Vec3::new(fx + 1.0, elevation, fz + 1.0),
            Vec3::new(fx, elevation, fz + 1.0),
        ],
        u_extent: 1.0,
        v_extent: 1.0,
    }
}

/// Wall quad on one side of a cell, spanning the lower neighbor's elevation
/// up to the cell's own. Faces outward, toward the lower neighbor.
fn wall_quad(x: i32, y: i32, dx: i32, dy: i32, y_bottom: f32, y_top: f32) -> Quad {
    let (fx, fz) = (x as f32, y as f32);
    let corners = match (dx, dy) {
        // Left edge (-X), facing -X
        (-1, 0) => [
            Vec3::new(fx, y_bottom, fz),
            Vec3::new(fx, y_bottom, fz + 1.0),
            Vec3::new(fx, y_top, fz + 1.0),
            Vec3::new(fx, y_top, fz),
        ],
        // Right edge (+X), facing +X
        (1, 0) => [
            Vec3::new(fx + 1.0, y_bottom, fz + 1.0),
            Vec3::new(fx + 1.0, y_bottom, fz),
            Vec3::new(fx + 1.0, y_top, fz),
            Vec3::new(fx + 1.0, y_top, fz + 1.0),
        ],
        // Back edge (-Z), facing -Z
        (0, -1) => [
            Vec3::new(fx + 1.0, y_bottom, fz),
            Vec3::new(fx, y_bottom, fz),
            Vec3::new(fx, y_top, fz),
            Vec3::new(fx + 1.0, y_top, fz),
        ],
        // Front edge (+Z), facing +Z
        _ => [
            Vec3::new(fx, y_bottom, fz + 1.0),
            Vec3::new(fx + 1.0, y_bottom, fz + 1.0),
            Vec3::new(fx + 1.0, y_top, fz + 1.0),
            Vec3::new(fx, y_top, fz + 1.0),
        ],
    };
    Quad {
        corners,
        u_extent: 1.0,
        v_extent: y_top - y_bottom,
    }
}
