//! Global configuration constants and tunables for the dynamics core.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};

/// Velocity delta applied to every dynamic body once per step (Y-up).
pub const DEFAULT_GRAVITY_STEP: [f32; 3] = [0.0, -0.00666, 0.0];

/// Default fixed timestep used by [`crate::DynamicsWorld::advance`] (in seconds).
pub const DEFAULT_TIME_STEP: f32 = 1.0 / 60.0;

/// Maximum number of contacts a body records during a single step.
pub const MAX_CONTACTS: usize = 16;

/// Leaf capacity above which an octree node is split into octants.
pub const DEFAULT_MAX_TRIANGLES_PER_NODE: usize = 64;

/// Hard recursion limit for octree construction.
pub const DEFAULT_MAX_OCTREE_DEPTH: u32 = 10;

/// Nominal query buffer budget, expressed as a multiple of the triangle count.
pub const SCRATCH_CAPACITY_FACTOR: usize = 10;

/// Squared distance under which a ray hit ends the candidate scan of a body.
pub const NEAR_HIT_SQR_DISTANCE: f32 = 0.025;

/// Push-out multiplier applied to sphere/triangle penetration depth.
pub const PUSH_OUT_OVERSHOOT: f32 = 1.01;

/// Elasticity assigned to new bodies. Stored only.
pub const DEFAULT_ELASTICITY: f32 = 0.5;

/// Rays whose direction makes a cosine below this with a plane normal count
/// as parallel to the plane.
pub const GEOMETRY_EPSILON: f32 = 1e-6;

/// Default bounded queue depth of [`crate::dynamics::parallel::TracePool`].
pub const DEFAULT_TRACE_QUEUE_DEPTH: usize = 64;

/// Octree construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    pub max_triangles_per_node: usize,
    pub max_depth: u32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_triangles_per_node: DEFAULT_MAX_TRIANGLES_PER_NODE,
            max_depth: DEFAULT_MAX_OCTREE_DEPTH,
        }
    }
}

impl OctreeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_triangles_per_node == 0 {
            return Err(PhysicsError::InvalidConfig(
                "max_triangles_per_node must be greater than zero".into(),
            ));
        }
        if self.max_depth == 0 {
            return Err(PhysicsError::InvalidConfig(
                "max_depth must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// World-level simulation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Velocity change per step, not an acceleration.
    pub gravity_step: Vec3,
    pub time_step: f32,
    pub octree: OctreeConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity_step: Vec3::from_array(DEFAULT_GRAVITY_STEP),
            time_step: DEFAULT_TIME_STEP,
            octree: OctreeConfig::default(),
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.gravity_step.is_finite() {
            return Err(PhysicsError::InvalidConfig(format!(
                "gravity_step must be finite, got {}",
                self.gravity_step
            )));
        }
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "time_step must be positive, got {}",
                self.time_step
            )));
        }
        self.octree.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(WorldConfig::default().validate().is_ok());
        assert_eq!(OctreeConfig::default().max_triangles_per_node, 64);
    }

    #[test]
    fn zero_leaf_capacity_is_rejected() {
        let config = OctreeConfig {
            max_triangles_per_node: 0,
            ..OctreeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PhysicsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn non_positive_time_step_is_rejected() {
        let config = WorldConfig {
            time_step: 0.0,
            ..WorldConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
