//! Collision detection: intersection tests, the triangle/box overlap test,
//! the octree index, pairwise resolution and world ray queries.

pub mod contact;
pub mod intersection;
pub mod narrowphase;
pub mod octree;
pub mod queries;
pub mod sat;

pub use contact::{Contact, ContactList};
pub use narrowphase::{NarrowPhase, PairStats, SphereSphereCallback, SphereTriangleCallback};
pub use octree::{NodeKind, Octree, OctreeNode, QueryBuffer};
pub use queries::{RayHit, StaticScene, TraceScratch};
