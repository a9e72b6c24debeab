use serde::{Deserialize, Serialize};

use crate::{
    error::{PhysicsError, Result},
    utils::allocator::BodyId,
};

/// Keeps two bodies `rest_length` apart.
///
/// Solved with one relaxation pass per step, so chains of constraints
/// under-correct and settle over several steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceConstraint {
    pub body_a: BodyId,
    pub body_b: BodyId,
    pub rest_length: f32,
    /// Fraction of the error removed per step, in `[0, 1]`.
    pub stiffness: f32,
}

impl DistanceConstraint {
    pub fn new(body_a: BodyId, body_b: BodyId, rest_length: f32, stiffness: f32) -> Self {
        Self {
            body_a,
            body_b,
            rest_length,
            stiffness,
        }
    }

    pub fn involves(&self, body: BodyId) -> bool {
        self.body_a == body || self.body_b == body
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.stiffness) {
            return Err(PhysicsError::InvalidConfig(format!(
                "constraint stiffness {} outside [0, 1]",
                self.stiffness
            )));
        }
        if !self.rest_length.is_finite() || self.rest_length < 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "constraint rest length {} must be finite and non-negative",
                self.rest_length
            )));
        }
        if self.body_a == self.body_b {
            return Err(PhysicsError::InvalidConfig(
                "constraint links a body to itself".into(),
            ));
        }
        Ok(())
    }
}
