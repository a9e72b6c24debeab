//! Separating-axis overlap test between a triangle and an axis-aligned box.
//!
//! Used by the octree builder to decide which octants a triangle belongs to.

use glam::Vec3;

use crate::core::bounds::Aabb;

/// Tests the nine edge-cross-axis directions, the three box face normals and
/// finally the triangle plane. Touching counts as overlap.
pub fn tri_box_overlap(center: Vec3, half_size: Vec3, triangle: [Vec3; 3]) -> bool {
    let v = triangle.map(|p| p - center);
    let edges = [v[1] - v[0], v[2] - v[1], v[0] - v[2]];

    for edge in edges {
        for box_axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            let axis = box_axis.cross(edge);
            if separated_on_axis(axis, &v, half_size) {
                return false;
            }
        }
    }

    let min = v[0].min(v[1]).min(v[2]);
    let max = v[0].max(v[1]).max(v[2]);
    if min.cmpgt(half_size).any() || max.cmplt(-half_size).any() {
        return false;
    }

    let normal = edges[0].cross(edges[1]);
    plane_box_overlap(normal, v[0], half_size)
}

pub fn tri_aabb_overlap(bounds: &Aabb, triangle: [Vec3; 3]) -> bool {
    tri_box_overlap(bounds.center(), bounds.half_extents(), triangle)
}

fn separated_on_axis(axis: Vec3, v: &[Vec3; 3], half_size: Vec3) -> bool {
    let p = v.map(|vertex| vertex.dot(axis));
    let min = p[0].min(p[1]).min(p[2]);
    let max = p[0].max(p[1]).max(p[2]);
    let radius = half_size.dot(axis.abs());
    min > radius || max < -radius
}

/// Whether the plane through `vertex` with `normal` cuts the box centered at
/// the origin.
fn plane_box_overlap(normal: Vec3, vertex: Vec3, half_size: Vec3) -> bool {
    let mut vmin = Vec3::ZERO;
    let mut vmax = Vec3::ZERO;
    for axis in 0..3 {
        if normal[axis] > 0.0 {
            vmin[axis] = -half_size[axis] - vertex[axis];
            vmax[axis] = half_size[axis] - vertex[axis];
        } else {
            vmin[axis] = half_size[axis] - vertex[axis];
            vmax[axis] = -half_size[axis] - vertex[axis];
        }
    }
    if normal.dot(vmin) > 0.0 {
        return false;
    }
    normal.dot(vmax) >= 0.0
}
