//! Utility helpers: the body arena and step profiling.

pub mod allocator;
pub mod profiling;

pub use allocator::{BodyArena, BodyId};
pub use profiling::StepProfile;
