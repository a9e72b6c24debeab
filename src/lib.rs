//! Octree Dynamics – collision core for real-time 3D engines.
//!
//! The crate indexes static triangle geometry in an octree, answers ray and
//! sphere proximity queries against it, and runs a small fixed-step dynamics
//! loop that resolves sphere/sphere and sphere/polygon contacts together with
//! distance constraints.
//!
//! Built polygon shapes are immutable, so ray queries against them can run
//! on many threads at once. A [`StaticScene`] is the shared read-only view
//! and every thread brings its own [`TraceScratch`]; batch tracing through
//! rayon and the [`TracePool`] worker pool are both built on that split.

pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod utils;
pub mod world;

pub use glam::Vec3;

pub use collision::{
    contact::Contact,
    octree::{Octree, QueryBuffer},
    queries::{RayHit, StaticScene, TraceScratch},
};
pub use config::{OctreeConfig, WorldConfig};
pub use crate::core::{
    bounds::{Aabb, BoxShape},
    constraints::DistanceConstraint,
    mesh::Surface,
    rigidbody::Body,
    shape::{CollisionShape, PolygonShape, ShapeKind},
    triangle::Triangle,
    types::{MaterialId, Plane, Ray, RayKind, Sphere},
};
pub use dynamics::parallel::{TraceOutcome, TracePool};
pub use error::{PhysicsError, Result};
pub use utils::{
    allocator::{BodyArena, BodyId},
    profiling::StepProfile,
};
pub use world::DynamicsWorld;
