use std::sync::Arc;

use glam::Vec3;

use super::{
    contact::Contact,
    intersection::{sphere_sphere, sphere_triangle},
    octree::QueryBuffer,
};
use crate::{
    config::PUSH_OUT_OVERSHOOT,
    core::{
        bounds::BoxShape,
        rigidbody::Body,
        shape::CollisionShape,
        triangle::Triangle,
        types::{Plane, Sphere},
    },
    utils::allocator::BodyId,
};

/// Called once per resolved sphere/sphere overlap.
pub type SphereSphereCallback = Box<dyn FnMut(BodyId, BodyId) + Send + Sync>;

/// Called once per resolved sphere/triangle contact with the sphere id, the
/// polygon body id and the touched triangle.
pub type SphereTriangleCallback = Box<dyn FnMut(BodyId, BodyId, &Triangle) + Send + Sync>;

/// Work done by one pair resolution.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PairStats {
    pub contacts_recorded: usize,
    pub triangles_tested: usize,
}

/// Pairwise contact resolution between bodies.
pub struct NarrowPhase;

impl NarrowPhase {
    /// Pushes two overlapping spheres apart symmetrically and removes the
    /// velocity component along the center axis from both.
    ///
    /// Returns `None` when the spheres do not overlap.
    pub fn sphere_sphere(
        id_a: BodyId,
        a: &mut Body,
        id_b: BodyId,
        b: &mut Body,
        callback: Option<&mut SphereSphereCallback>,
    ) -> Option<PairStats> {
        let (Some(radius_a), Some(radius_b)) = (a.shape().sphere_radius(), b.shape().sphere_radius())
        else {
            return None;
        };

        let depth = sphere_sphere(
            &Sphere::new(a.position, radius_a),
            &Sphere::new(b.position, radius_b),
        )?;

        let mut direction = (a.position - b.position).normalize_or_zero();
        if direction == Vec3::ZERO {
            direction = Vec3::Y;
        }

        let offset = direction * (depth * 0.5);
        a.position += offset;
        b.position -= offset;
        a.linear_velocity = Plane::project_vector(a.linear_velocity, direction);
        b.linear_velocity = Plane::project_vector(b.linear_velocity, direction);

        let touching_point = b.position + direction * radius_b;
        let mut stats = PairStats::default();
        if a.record_contact(Contact {
            normal: direction,
            triangle: None,
            other: id_b,
            position: touching_point,
        }) {
            stats.contacts_recorded += 1;
        }
        if b.record_contact(Contact {
            normal: -direction,
            triangle: None,
            other: id_a,
            position: touching_point,
        }) {
            stats.contacts_recorded += 1;
        }

        if let Some(callback) = callback {
            callback(id_a, id_b);
        }
        Some(stats)
    }

    /// Resolves a sphere against every triangle of a static polygon body the
    /// octree reports near it.
    ///
    /// Consecutive duplicate candidate indices are tested once. Each hit
    /// pushes the sphere out along the contact direction by the penetration
    /// depth plus a small overshoot and slides its velocity onto the
    /// triangle's plane.
    pub fn sphere_polygon(
        sphere_id: BodyId,
        sphere: &mut Body,
        polygon_id: BodyId,
        polygon: &mut Body,
        buffer: &mut QueryBuffer,
        mut callback: Option<&mut SphereTriangleCallback>,
    ) -> PairStats {
        let mut stats = PairStats::default();
        let Some(radius) = sphere.shape().sphere_radius() else {
            return stats;
        };
        let shape: Arc<CollisionShape> = Arc::clone(polygon.shape_handle());
        let Some(mesh) = shape.as_polygon() else {
            return stats;
        };

        mesh.octree()
            .sphere_candidates(&Sphere::new(sphere.position, radius), buffer);

        let mut last_index = None;
        for &index in buffer.indices() {
            if last_index == Some(index) {
                continue;
            }
            last_index = Some(index);

            let Some(triangle) = mesh.triangle(index as usize) else {
                continue;
            };
            stats.triangles_tested += 1;

            let Some(point) = sphere_triangle(&Sphere::new(sphere.position, radius), triangle)
            else {
                continue;
            };

            let offset = sphere.position - point;
            let distance = offset.length();
            let penetration = radius - distance;
            if penetration < 0.0 {
                continue;
            }
            let direction = if distance > f32::EPSILON {
                offset / distance
            } else {
                triangle.normal
            };

            sphere.position += direction * (penetration * PUSH_OUT_OVERSHOOT);
            sphere.linear_velocity = Plane::project_vector(sphere.linear_velocity, triangle.normal);

            if sphere.record_contact(Contact {
                normal: direction,
                triangle: Some(index as usize),
                other: polygon_id,
                position: point,
            }) {
                stats.contacts_recorded += 1;
            }
            polygon.record_touch();

            if let Some(callback) = callback.as_deref_mut() {
                callback(sphere_id, polygon_id, triangle);
            }
        }

        stats
    }

    /// Box against polygon: the box is placed in the world but no contact is
    /// generated.
    pub fn box_polygon(boxed: &Body, polygon_id: BodyId) {
        if let CollisionShape::Aabb { min, max } = boxed.shape() {
            let placed = BoxShape::new(*min, *max, boxed.position);
            log::trace!(
                "box/polygon pair ({:?}..{:?} vs {:?}) is not resolved",
                placed.min,
                placed.max,
                polygon_id
            );
        }
    }
}
