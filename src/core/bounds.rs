use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{triangle::Triangle, types::Ray};

/// Axis-aligned bounding box used for octree nodes and shape extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn extend(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut bounds = Self::empty();
        for p in points {
            bounds.extend(p);
        }
        bounds
    }

    pub fn from_triangles(triangles: &[Triangle]) -> Self {
        Self::from_points(triangles.iter().flat_map(Triangle::vertices))
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Inclusive on every face.
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Squared distance from `point` to the box; zero inside, infinite for
    /// an empty box.
    pub fn distance_squared(&self, point: Vec3) -> f32 {
        if self.is_empty() {
            return f32::INFINITY;
        }
        let clamped = point.clamp(self.min, self.max);
        (point - clamped).length_squared()
    }

    /// One of the eight octants around the center, indexed by bit: 1 = +X,
    /// 2 = +Z, 4 = +Y.
    pub fn octant(&self, index: usize) -> Aabb {
        let center = self.center();
        let pick = |bit: usize, axis_min: f32, axis_center: f32, axis_max: f32| {
            if index & bit == 0 {
                (axis_min, axis_center)
            } else {
                (axis_center, axis_max)
            }
        };
        let (x0, x1) = pick(1, self.min.x, center.x, self.max.x);
        let (z0, z1) = pick(2, self.min.z, center.z, self.max.z);
        let (y0, y1) = pick(4, self.min.y, center.y, self.max.y);
        Aabb::new(Vec3::new(x0, y0, z0), Vec3::new(x1, y1, z1))
    }

    /// Slab test of the parametric interval `[0, 1]` of `ray` against the box.
    ///
    /// A zero (or subnormal) direction component keeps the ray inside that slab only if its
    /// origin already is, so axis-parallel rays never divide by zero.
    pub fn intersects_ray(&self, ray: &Ray) -> bool {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let origin = ray.begin[axis];
            let dir = ray.dir[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if dir.abs() < f32::MIN_POSITIVE {
                if origin < lo || origin > hi {
                    return false;
                }
                continue;
            }

            let inv_dir = 1.0 / dir;
            let mut t0 = (lo - origin) * inv_dir;
            let mut t1 = (hi - origin) * inv_dir;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if t_min > t1 || t0 > t_max {
                return false;
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
        }

        t_min < 1.0 && t_max > 0.0
    }
}

/// Axis-aligned box placed in the world with its corners and edges
/// materialized for the edge-based intersection tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxShape {
    pub min: Vec3,
    pub max: Vec3,
    pub vertices: [Vec3; 8],
    pub edges: [Ray; 12],
}

impl BoxShape {
    /// Builds the box from local extents offset by `position`.
    pub fn new(min: Vec3, max: Vec3, position: Vec3) -> Self {
        let min = min + position;
        let max = max + position;

        let vertices = [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(min.x, max.y, max.z),
            Vec3::new(max.x, max.y, max.z),
            Vec3::new(max.x, max.y, min.z),
        ];

        const EDGES: [(usize, usize); 12] = [
            (0, 1),
            (1, 2),
            (0, 3),
            (2, 3),
            (4, 5),
            (5, 6),
            (4, 7),
            (6, 7),
            (0, 4),
            (1, 5),
            (2, 6),
            (3, 7),
        ];
        let edges = EDGES.map(|(from, to)| Ray::segment(vertices[from], vertices[to]));

        Self {
            min,
            max,
            vertices,
            edges,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octants_tile_parent() {
        let parent = Aabb::new(Vec3::ZERO, Vec3::splat(2.0));
        let volume: f32 = (0..8)
            .map(|i| {
                let size = parent.octant(i).max - parent.octant(i).min;
                size.x * size.y * size.z
            })
            .sum();
        assert!((volume - 8.0).abs() < 1e-6);
        assert_eq!(parent.octant(0).min, Vec3::ZERO);
        assert_eq!(parent.octant(7).max, Vec3::splat(2.0));
    }

    #[test]
    fn distance_squared_is_zero_inside() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert_eq!(aabb.distance_squared(Vec3::splat(0.5)), 0.0);
        assert!((aabb.distance_squared(Vec3::new(3.0, 0.5, 0.5)) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn axis_parallel_ray_uses_origin_for_flat_slabs() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let hit = Ray::segment(Vec3::new(0.5, 0.5, -1.0), Vec3::new(0.5, 0.5, 2.0));
        let miss = Ray::segment(Vec3::new(1.5, 0.5, -1.0), Vec3::new(1.5, 0.5, 2.0));
        assert!(aabb.intersects_ray(&hit));
        assert!(!aabb.intersects_ray(&miss));
    }

    #[test]
    fn short_segment_stops_before_box() {
        let aabb = Aabb::new(Vec3::splat(10.0), Vec3::splat(11.0));
        let ray = Ray::segment(Vec3::ZERO, Vec3::splat(5.0));
        assert!(!aabb.intersects_ray(&ray));
    }

    #[test]
    fn box_shape_edges_join_vertices() {
        let shape = BoxShape::new(Vec3::splat(-1.0), Vec3::ONE, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(shape.min, Vec3::new(-1.0, 4.0, -1.0));
        for edge in &shape.edges {
            assert!((edge.dir.length() - 2.0).abs() < 1e-6);
        }
    }
}
