//! Error type for the fallible construction and configuration surface.
//!
//! Geometric and spatial queries never fail; they report misses through
//! `bool` or `Option`. Only building shapes, validating configuration and
//! driving the trace pool can produce a [`PhysicsError`].

use thiserror::Error;

use crate::utils::allocator::BodyId;

#[derive(Debug, Error)]
pub enum PhysicsError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("source surfaces contain no vertices")]
    EmptyGeometry,

    #[error(
        "surface {surface} face {face} references vertex {index}, but the surface has {vertex_count} vertices"
    )]
    FaceIndexOutOfRange {
        surface: usize,
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("unknown body {0:?}")]
    UnknownBody(BodyId),

    #[error("trace pool is closed")]
    PoolClosed,

    #[error("failed to spawn trace worker: {0}")]
    WorkerSpawn(String),
}

pub type Result<T> = std::result::Result<T, PhysicsError>;
