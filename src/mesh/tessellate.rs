//! Quad tessellation
//!
//! Splits a quad into resolution^2 sub-quads by bilinear interpolation of the
//! four corners. This exists purely for finer UV granularity; the surface
//! stays planar. Every sub-quad gets four fresh vertices, so counts are
//! exactly 4r^2 vertices and 6r^2 indices per quad (doubled for
//! double-sided output).

use crate::math::{Vec2, Vec3};
use super::{MeshGroup, MeshSettings, WindingMode};

/// Corner order expected by the tessellator: bottom-left, bottom-right,
/// top-right, top-left in the quad's own (u, v) frame. With that order the
/// front face under `WindingMode::Default` is the side the caller oriented
/// the corners counter-clockwise on.
pub(super) struct Quad {
    pub corners: [Vec3; 4],
    /// Real-world extent along u, scales the U coordinate
    pub u_extent: f32,
    /// Real-world extent along v, scales the V coordinate
    pub v_extent: f32,
}

impl Quad {
    fn point_at(&self, u: f32, v: f32) -> Vec3 {
        let [bl, br, tr, tl] = self.corners;
        let bottom = bl + (br - bl) * u;
        let top = tl + (tr - tl) * u;
        bottom + (top - bottom) * v
    }
}

pub(super) fn emit_quad(group: &mut MeshGroup, quad: &Quad, settings: &MeshSettings) {
    let r = settings.resolution;
    let step = 1.0 / r as f32;

    for j in 0..r {
        for i in 0..r {
            let (u0, v0) = (i as f32 * step, j as f32 * step);
            let (u1, v1) = (u0 + step, v0 + step);
            let corners = [
                quad.point_at(u0, v0),
                quad.point_at(u1, v0),
                quad.point_at(u1, v1),
                quad.point_at(u0, v1),
            ];
            let uvs = [
                sub_uv(quad, settings, u0, v0),
                sub_uv(quad, settings, u1, v0),
                sub_uv(quad, settings, u1, v1),
                sub_uv(quad, settings, u0, v1),
            ];

            match settings.winding {
                WindingMode::Default => push_sub_quad(group, &corners, &uvs, false),
                WindingMode::Flipped => push_sub_quad(group, &corners, &uvs, true),
                WindingMode::DoubleSided => {
                    push_sub_quad(group, &corners, &uvs, false);
                    push_sub_quad(group, &corners, &uvs, true);
                }
            }
        }
    }
}

/// UVs scale with the quad's world extent, keeping texel density constant
/// regardless of cell height
fn sub_uv(quad: &Quad, settings: &MeshSettings, u: f32, v: f32) -> Vec2 {
    Vec2::new(
        u * quad.u_extent * settings.uv_scale,
        v * quad.v_extent * settings.uv_scale,
    )
}

/// One sub-quad: four vertices, two triangles. `reversed` flips the winding
/// so the copy faces the other way.
fn push_sub_quad(group: &mut MeshGroup, corners: &[Vec3; 4], uvs: &[Vec2; 4], reversed: bool) {
    let base = group.vertices.len() as u32;
    group.vertices.extend_from_slice(corners);
    group.uvs.extend_from_slice(uvs);
    if reversed {
        group.triangles.push([base, base + 2, base + 1]);
        group.triangles.push([base, base + 3, base + 2]);
    } else {
        group.triangles.push([base, base + 1, base + 2]);
        group.triangles.push([base, base + 2, base + 3]);
    }
}
