use glam::Vec3;

use crate::{
    core::{constraints::DistanceConstraint, rigidbody::Body},
    utils::allocator::{BodyArena, BodyId},
};

/// Single relaxation sweep over distance constraints.
///
/// Each constraint moves both bodies a `stiffness` fraction of the way toward
/// positions `rest_length` apart around their midpoint. Constraints are
/// visited once in order, so later constraints may undo part of the work of
/// earlier ones.
pub struct ConstraintSolver;

impl ConstraintSolver {
    /// Returns how many constraints were applied.
    pub fn solve(constraints: &[DistanceConstraint], bodies: &mut BodyArena<Body>) -> usize {
        let mut applied = 0;
        for constraint in constraints {
            if Self::relax(constraint, bodies) {
                applied += 1;
            }
        }
        applied
    }

    fn relax(constraint: &DistanceConstraint, bodies: &mut BodyArena<Body>) -> bool {
        let Some((a, b)) = bodies.get2_mut(constraint.body_a, constraint.body_b) else {
            return false;
        };

        let axis = (b.position - a.position).normalize_or_zero();
        if axis == Vec3::ZERO {
            log_degenerate(constraint.body_a, constraint.body_b);
        }
        let half = axis * (constraint.rest_length * 0.5);
        let middle = (a.position + b.position) * 0.5;
        let goal_a = middle - half;
        let goal_b = middle + half;

        a.position += (goal_a - a.position) * constraint.stiffness;
        b.position += (goal_b - b.position) * constraint.stiffness;
        true
    }
}

fn log_degenerate(a: BodyId, b: BodyId) {
    log::warn!(
        "distance constraint between {:?} and {:?} has coincident bodies; collapsing to midpoint",
        a,
        b
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shape::CollisionShape;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn arena_with(positions: &[Vec3]) -> (BodyArena<Body>, Vec<BodyId>) {
        let shape = Arc::new(CollisionShape::sphere(0.5));
        let mut arena = BodyArena::new();
        let ids = positions
            .iter()
            .map(|&p| arena.insert(Body::new(Arc::clone(&shape)).with_position(p)))
            .collect();
        (arena, ids)
    }

    #[test]
    fn rigid_constraint_restores_rest_length_in_one_pass() {
        let (mut arena, ids) = arena_with(&[Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)]);
        let constraint = DistanceConstraint::new(ids[0], ids[1], 2.0, 1.0);
        assert_eq!(ConstraintSolver::solve(&[constraint], &mut arena), 1);

        let a = arena.get(ids[0]).unwrap().position;
        let b = arena.get(ids[1]).unwrap().position;
        assert_relative_eq!(a.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(b.x, 3.0, epsilon = 1e-6);
    }

    #[test]
    fn soft_constraint_moves_a_fraction() {
        let (mut arena, ids) = arena_with(&[Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)]);
        let constraint = DistanceConstraint::new(ids[0], ids[1], 2.0, 0.5);
        ConstraintSolver::solve(&[constraint], &mut arena);

        let a = arena.get(ids[0]).unwrap().position;
        let b = arena.get(ids[1]).unwrap().position;
        assert_relative_eq!(a.distance(b), 3.0, epsilon = 1e-6);
    }

    #[test]
    fn chained_constraints_under_correct_in_a_single_sweep() {
        let (mut arena, ids) = arena_with(&[
            Vec3::ZERO,
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
        ]);
        let constraints = [
            DistanceConstraint::new(ids[0], ids[1], 1.0, 1.0),
            DistanceConstraint::new(ids[1], ids[2], 1.0, 1.0),
        ];
        ConstraintSolver::solve(&constraints, &mut arena);

        let p0 = arena.get(ids[0]).unwrap().position;
        let p1 = arena.get(ids[1]).unwrap().position;
        let p2 = arena.get(ids[2]).unwrap().position;
        assert_relative_eq!(p1.distance(p2), 1.0, epsilon = 1e-6);
        assert!(p0.distance(p1) > 1.0);
    }

    #[test]
    fn missing_body_skips_constraint() {
        let (mut arena, ids) = arena_with(&[Vec3::ZERO, Vec3::X]);
        arena.remove(ids[1]);
        let constraint = DistanceConstraint::new(ids[0], ids[1], 2.0, 1.0);
        assert_eq!(ConstraintSolver::solve(&[constraint], &mut arena), 0);
    }
}
