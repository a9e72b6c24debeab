use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How the parametric solution `t` of a ray query is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RayKind {
    /// Any `t >= 0`.
    Infinite,
    /// Only `t` in `[0, 1]`, i.e. between `begin` and `end`.
    Segment,
}

/// Ray described by an origin and an unnormalized direction.
///
/// For segment rays `dir = end - begin`, so `t = 1` lands on `end`. Rays built
/// with [`Ray::with_direction`] store the direction in both `end` and `dir`;
/// the octree still culls them to the parametric range `[0, 1]`, so the
/// direction length bounds the traced distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub begin: Vec3,
    pub end: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn segment(begin: Vec3, end: Vec3) -> Self {
        Self {
            begin,
            end,
            dir: end - begin,
        }
    }

    pub fn with_direction(begin: Vec3, direction: Vec3) -> Self {
        Self {
            begin,
            end: direction,
            dir: direction,
        }
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.begin + self.dir * t
    }
}

/// Plane `dot(normal, p) + dist = 0` with a unit normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vec3,
    pub dist: f32,
}

impl Plane {
    pub fn new(normal: Vec3, dist: f32) -> Self {
        Self { normal, dist }
    }

    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        Self {
            normal,
            dist: -point.dot(normal),
        }
    }

    /// Plane of one face of an axis-aligned box: +X, -X, +Y, -Y, +Z, -Z for
    /// `face` 0..=5. Any other face index yields a degenerate plane.
    pub fn from_box_face(min: Vec3, max: Vec3, face: usize) -> Self {
        let (normal, anchor) = match face {
            0 => (Vec3::X, max),
            1 => (Vec3::NEG_X, min),
            2 => (Vec3::Y, max),
            3 => (Vec3::NEG_Y, min),
            4 => (Vec3::Z, max),
            5 => (Vec3::NEG_Z, min),
            _ => return Self::new(Vec3::ZERO, 0.0),
        };
        Self::from_point_normal(anchor, normal)
    }

    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.dist
    }

    pub fn distance(&self, point: Vec3) -> f32 {
        self.signed_distance(point).abs()
    }

    /// Removes the component of `v` along `normal`. A degenerate normal
    /// projects everything to zero.
    pub fn project_vector(v: Vec3, normal: Vec3) -> Vec3 {
        let len_sq = normal.length_squared();
        if len_sq <= f32::MIN_POSITIVE {
            return Vec3::ZERO;
        }
        v - normal * (v.dot(normal) / len_sq)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Opaque token naming the surface material a triangle came from.
///
/// The core never interprets it; gameplay uses it to pick impact sounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub u32);
