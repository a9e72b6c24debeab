use glam::Vec3;

use crate::core::rigidbody::Body;

/// Applies the per-step gravity delta and advances positions by one step of
/// velocity. Every body starts the step with an empty contact list.
#[derive(Debug, Clone, Copy)]
pub struct Integrator {
    pub gravity_step: Vec3,
}

impl Integrator {
    pub fn new(gravity_step: Vec3) -> Self {
        Self { gravity_step }
    }

    pub fn integrate(&self, body: &mut Body) {
        body.begin_step();
        if body.is_static() {
            return;
        }
        body.apply_gravity(self.gravity_step);
        body.integrate();
    }

    /// Returns the number of bodies that moved.
    pub fn step<'a>(&self, bodies: impl Iterator<Item = &'a mut Body>) -> usize {
        let mut moved = 0;
        for body in bodies {
            self.integrate(body);
            if !body.is_static() {
                moved += 1;
            }
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{shape::CollisionShape, triangle::Triangle};
    use std::sync::Arc;

    #[test]
    fn polygon_bodies_stay_put() {
        let shape = CollisionShape::polygon(vec![Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Z)]);
        let mut ground = Body::new(Arc::new(shape));
        let mut ball = Body::new(Arc::new(CollisionShape::sphere(1.0)));

        let integrator = Integrator::new(Vec3::new(0.0, -1.0, 0.0));
        let moved = integrator.step([&mut ground, &mut ball].into_iter());

        assert_eq!(moved, 1);
        assert_eq!(ground.position, Vec3::ZERO);
        assert_eq!(ball.position, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(ball.linear_velocity, Vec3::new(0.0, -1.0, 0.0));
    }
}
