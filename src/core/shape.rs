use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{
    mesh::{surfaces_extents, triangulate_surfaces, Surface},
    triangle::Triangle,
};
use crate::{
    collision::octree::Octree,
    config::OctreeConfig,
    error::{PhysicsError, Result},
};

/// Immutable triangle soup together with the octree indexing it.
///
/// Neither part can be changed after construction, which is what allows
/// concurrent read-only ray queries against a shared shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolygonShape {
    triangles: Vec<Triangle>,
    octree: Octree,
}

impl PolygonShape {
    pub fn new(triangles: Vec<Triangle>, config: &OctreeConfig) -> Self {
        let octree = Octree::build(&triangles, config);
        Self { triangles, octree }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle(&self, index: usize) -> Option<&Triangle> {
        self.triangles.get(index)
    }

    pub fn octree(&self) -> &Octree {
        &self.octree
    }
}

/// Discriminant of [`CollisionShape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Aabb,
    Sphere,
    Capsule,
    Polygon,
}

/// Collision geometry referenced by bodies.
///
/// Sphere and box extents are relative to the body position. Polygon
/// triangles are in world space and ignore the body position entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CollisionShape {
    Aabb {
        min: Vec3,
        max: Vec3,
    },
    Sphere {
        radius: f32,
    },
    /// Declared only: no collision pair or ray trace handles capsules.
    Capsule {
        radius: f32,
        height: f32,
    },
    Polygon(PolygonShape),
}

impl CollisionShape {
    pub fn sphere(radius: f32) -> Self {
        CollisionShape::Sphere { radius }
    }

    pub fn aabb(min: Vec3, max: Vec3) -> Self {
        CollisionShape::Aabb { min, max }
    }

    pub fn polygon(triangles: Vec<Triangle>) -> Self {
        Self::polygon_with(triangles, &OctreeConfig::default())
    }

    pub fn polygon_with(triangles: Vec<Triangle>, config: &OctreeConfig) -> Self {
        CollisionShape::Polygon(PolygonShape::new(triangles, config))
    }

    /// Sphere whose radius is a quarter of the surfaces' bounding diagonal.
    pub fn sphere_from_surfaces(surfaces: &[Surface]) -> Result<Self> {
        let bounds = surfaces_extents(surfaces).ok_or(PhysicsError::EmptyGeometry)?;
        Ok(Self::sphere((bounds.max - bounds.min).length() / 4.0))
    }

    pub fn aabb_from_surfaces(surfaces: &[Surface]) -> Result<Self> {
        let bounds = surfaces_extents(surfaces).ok_or(PhysicsError::EmptyGeometry)?;
        Ok(Self::aabb(bounds.min, bounds.max))
    }

    pub fn polygon_from_surfaces(surfaces: &[Surface]) -> Result<Self> {
        Self::polygon_from_surfaces_with(surfaces, &OctreeConfig::default())
    }

    /// Merges the faces of all surfaces into one triangle array and builds
    /// its octree in the same pass.
    pub fn polygon_from_surfaces_with(surfaces: &[Surface], config: &OctreeConfig) -> Result<Self> {
        config.validate()?;
        let triangles = triangulate_surfaces(surfaces)?;
        if triangles.is_empty() {
            return Err(PhysicsError::EmptyGeometry);
        }
        Ok(Self::polygon_with(triangles, config))
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            CollisionShape::Aabb { .. } => ShapeKind::Aabb,
            CollisionShape::Sphere { .. } => ShapeKind::Sphere,
            CollisionShape::Capsule { .. } => ShapeKind::Capsule,
            CollisionShape::Polygon(_) => ShapeKind::Polygon,
        }
    }

    pub fn as_polygon(&self) -> Option<&PolygonShape> {
        match self {
            CollisionShape::Polygon(polygon) => Some(polygon),
            _ => None,
        }
    }

    pub fn sphere_radius(&self) -> Option<f32> {
        match self {
            CollisionShape::Sphere { radius } => Some(*radius),
            _ => None,
        }
    }

    /// Polygon shapes never move; everything else is simulated.
    pub fn is_static(&self) -> bool {
        matches!(self, CollisionShape::Polygon(_))
    }
}
