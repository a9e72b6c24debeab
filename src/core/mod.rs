//! Geometry primitives, source meshes, collision shapes and bodies.

pub mod bounds;
pub mod constraints;
pub mod mesh;
pub mod rigidbody;
pub mod shape;
pub mod triangle;
pub mod types;

pub use bounds::{Aabb, BoxShape};
pub use constraints::DistanceConstraint;
pub use mesh::Surface;
pub use rigidbody::Body;
pub use shape::{CollisionShape, PolygonShape, ShapeKind};
pub use triangle::Triangle;
pub use types::{MaterialId, Plane, Ray, RayKind, Sphere};
