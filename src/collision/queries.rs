//! Ray tracing against polygon bodies.
//!
//! A [`StaticScene`] is the shared, read-only side of a trace: a snapshot of
//! every polygon body and its shape. A [`TraceScratch`] is the per-caller
//! mutable side holding the octree query buffer. Any number of threads can
//! trace the same scene as long as each owns its scratch.

use std::sync::Arc;

use glam::Vec3;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{intersection::ray_triangle, octree::QueryBuffer};
use crate::{
    config::NEAR_HIT_SQR_DISTANCE,
    core::{
        shape::{CollisionShape, PolygonShape},
        types::{Ray, RayKind},
    },
    utils::allocator::BodyId,
};

/// Nearest triangle hit found by a world trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub body: BodyId,
    pub position: Vec3,
    pub normal: Vec3,
    /// Index into the triangle array of the hit body's polygon shape.
    pub triangle: usize,
}

/// Per-caller output state for traces.
#[derive(Debug, Clone, Default)]
pub struct TraceScratch {
    buffer: QueryBuffer,
    candidates_tested: usize,
}

impl TraceScratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidate triangles tested by the most recent trace.
    pub fn candidates_tested(&self) -> usize {
        self.candidates_tested
    }
}

/// Running nearest-hit state of one trace across several bodies.
#[derive(Debug, Default)]
pub(crate) struct NearestHit {
    best: Option<(f32, RayHit)>,
}

impl NearestHit {
    pub(crate) fn into_hit(self) -> Option<RayHit> {
        self.best.map(|(_, hit)| hit)
    }
}

/// Scans the octree candidates of one polygon body, updating `nearest`.
///
/// The scan of this body stops at the first improving hit closer than
/// [`NEAR_HIT_SQR_DISTANCE`] to the ray origin, so the result is only
/// approximately nearest when such a hit exists.
pub(crate) fn trace_polygon(
    body: BodyId,
    polygon: &PolygonShape,
    ray: &Ray,
    scratch: &mut TraceScratch,
    nearest: &mut NearestHit,
) {
    polygon.octree().trace_ray(ray, &mut scratch.buffer);
    scratch.candidates_tested += scratch.buffer.len();

    for &index in scratch.buffer.indices() {
        let index = index as usize;
        let Some(triangle) = polygon.triangle(index) else {
            continue;
        };
        let Some(point) = ray_triangle(ray, triangle, RayKind::Infinite) else {
            continue;
        };

        let sqr_distance = point.distance_squared(ray.begin);
        let closer = nearest
            .best
            .as_ref()
            .map_or(true, |(best, _)| sqr_distance < *best);
        if closer {
            nearest.best = Some((
                sqr_distance,
                RayHit {
                    body,
                    position: point,
                    normal: triangle.normal,
                    triangle: index,
                },
            ));
            if sqr_distance < NEAR_HIT_SQR_DISTANCE {
                break;
            }
        }
    }
}

/// Traces `ray` against every polygon shape yielded by `bodies`.
pub(crate) fn trace_shapes<'a>(
    bodies: impl Iterator<Item = (BodyId, &'a CollisionShape)>,
    ray: &Ray,
    scratch: &mut TraceScratch,
) -> Option<RayHit> {
    scratch.candidates_tested = 0;
    let mut nearest = NearestHit::default();
    for (id, shape) in bodies {
        if let Some(polygon) = shape.as_polygon() {
            trace_polygon(id, polygon, ray, scratch, &mut nearest);
        }
    }
    nearest.into_hit()
}

/// Immutable snapshot of the polygon bodies of a world.
#[derive(Debug, Clone, Default)]
pub struct StaticScene {
    entries: Vec<(BodyId, Arc<CollisionShape>)>,
}

impl StaticScene {
    /// Keeps only polygon shapes, preserving the given order.
    pub fn new(entries: impl IntoIterator<Item = (BodyId, Arc<CollisionShape>)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .filter(|(_, shape)| shape.is_static())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn bodies(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    pub fn triangle_count(&self) -> usize {
        self.entries
            .iter()
            .filter_map(|(_, shape)| shape.as_polygon())
            .map(|polygon| polygon.triangles().len())
            .sum()
    }

    pub fn trace(&self, ray: &Ray, scratch: &mut TraceScratch) -> Option<RayHit> {
        trace_shapes(
            self.entries.iter().map(|(id, shape)| (*id, shape.as_ref())),
            ray,
            scratch,
        )
    }

    /// Traces every ray, one scratch per rayon worker. Results keep the
    /// order of `rays`.
    #[cfg(feature = "parallel")]
    pub fn trace_batch(&self, rays: &[Ray]) -> Vec<Option<RayHit>> {
        rays.par_iter()
            .map_init(TraceScratch::new, |scratch, ray| self.trace(ray, scratch))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    pub fn trace_batch(&self, rays: &[Ray]) -> Vec<Option<RayHit>> {
        let mut scratch = TraceScratch::new();
        rays.iter().map(|ray| self.trace(ray, &mut scratch)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::triangle::Triangle;

    fn floor(y: f32) -> Arc<CollisionShape> {
        Arc::new(CollisionShape::polygon(vec![Triangle::new(
            Vec3::new(-10.0, y, -10.0),
            Vec3::new(0.0, y, 10.0),
            Vec3::new(10.0, y, -10.0),
        )]))
    }

    #[test]
    fn nearest_of_two_floors_wins() {
        let scene = StaticScene::new([
            (BodyId::new(0, 0), floor(-4.0)),
            (BodyId::new(1, 0), floor(-1.0)),
        ]);
        let ray = Ray::segment(Vec3::ZERO, Vec3::new(0.0, -10.0, 0.0));
        let hit = scene.trace(&ray, &mut TraceScratch::new()).unwrap();
        assert_eq!(hit.body, BodyId::new(1, 0));
        assert!((hit.position.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn spheres_are_not_part_of_the_scene() {
        let scene = StaticScene::new([
            (BodyId::new(0, 0), Arc::new(CollisionShape::sphere(1.0))),
            (BodyId::new(1, 0), floor(0.0)),
        ]);
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.triangle_count(), 1);
    }

    #[test]
    fn ray_missing_all_leaves_reports_nothing() {
        let scene = StaticScene::new([(BodyId::new(0, 0), floor(0.0))]);
        let ray = Ray::segment(Vec3::new(50.0, 5.0, 50.0), Vec3::new(50.0, -5.0, 50.0));
        let mut scratch = TraceScratch::new();
        assert!(scene.trace(&ray, &mut scratch).is_none());
        assert_eq!(scratch.candidates_tested(), 0);
    }

    #[test]
    fn batch_matches_single_traces() {
        let scene = StaticScene::new([(BodyId::new(0, 0), floor(0.0))]);
        let rays: Vec<Ray> = (0..16)
            .map(|i| {
                let x = i as f32 - 8.0;
                Ray::segment(Vec3::new(x, 3.0, -2.0), Vec3::new(x, -3.0, -2.0))
            })
            .collect();
        let batch = scene.trace_batch(&rays);
        let mut scratch = TraceScratch::new();
        for (ray, hit) in rays.iter().zip(&batch) {
            assert_eq!(*hit, scene.trace(ray, &mut scratch));
        }
    }
}
