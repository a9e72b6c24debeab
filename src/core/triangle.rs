use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::types::{MaterialId, Plane, Ray};

/// Static triangle with everything the point and ray tests need cached at
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    pub normal: Vec3,
    /// Plane offset, `-dot(a, normal)`.
    pub distance: f32,
    /// Edge vectors `a - b`, `b - c`, `c - a`.
    pub ab: Vec3,
    pub bc: Vec3,
    pub ca: Vec3,
    /// `b - a`; the second barycentric basis vector next to `ca`.
    pub ba: Vec3,
    pub ab_ray: Ray,
    pub bc_ray: Ray,
    pub ca_ray: Ray,
    ca_dot_ca: f32,
    ca_dot_ba: f32,
    ba_dot_ba: f32,
    inv_denom: f32,
    pub material: Option<MaterialId>,
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let ba = b - a;
        let ca = c - a;
        let normal = ba.cross(ca).normalize_or_zero();

        let ca_dot_ca = ca.dot(ca);
        let ca_dot_ba = ca.dot(ba);
        let ba_dot_ba = ba.dot(ba);
        let denom = ca_dot_ca * ba_dot_ba - ca_dot_ba * ca_dot_ba;
        // `denom` is |ba|²|ca|² sin²θ, so the cutoff is on the angle, not the
        // size. Zero-area triangles keep a zero inverse and contain nothing.
        let inv_denom = if denom > f32::EPSILON * ca_dot_ca * ba_dot_ba {
            1.0 / denom
        } else {
            0.0
        };

        Self {
            a,
            b,
            c,
            normal,
            distance: -a.dot(normal),
            ab: a - b,
            bc: b - c,
            ca,
            ba,
            ab_ray: Ray::segment(a, b),
            bc_ray: Ray::segment(b, c),
            ca_ray: Ray::segment(c, a),
            ca_dot_ca,
            ca_dot_ba,
            ba_dot_ba,
            inv_denom,
            material: None,
        }
    }

    pub fn with_material(mut self, material: Option<MaterialId>) -> Self {
        self.material = material;
        self
    }

    pub fn plane(&self) -> Plane {
        Plane::new(self.normal, self.distance)
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.a, self.b, self.c]
    }

    pub fn edges(&self) -> [&Ray; 3] {
        [&self.ab_ray, &self.bc_ray, &self.ca_ray]
    }

    pub fn is_degenerate(&self) -> bool {
        self.inv_denom == 0.0
    }

    /// Barycentric containment test for a point assumed to lie in the
    /// triangle's plane: `u >= 0`, `v >= 0`, `u + v < 1`.
    pub fn contains_point(&self, point: Vec3) -> bool {
        if self.is_degenerate() {
            return false;
        }
        let vp = point - self.a;
        let dot02 = self.ca.dot(vp);
        let dot12 = self.ba.dot(vp);

        let u = (self.ba_dot_ba * dot02 - self.ca_dot_ba * dot12) * self.inv_denom;
        let v = (self.ca_dot_ca * dot12 - self.ca_dot_ba * dot02) * self.inv_denom;

        u >= 0.0 && v >= 0.0 && u + v < 1.0
    }
}
