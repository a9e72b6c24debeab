use std::sync::Arc;

use approx::assert_relative_eq;
use octree_dynamics::{
    collision::intersection::ray_triangle, config::NEAR_HIT_SQR_DISTANCE, Body, CollisionShape,
    DynamicsWorld, Ray, RayKind, TraceScratch, Triangle, Vec3,
};

fn flat_triangle(y: f32) -> Triangle {
    Triangle::new(
        Vec3::new(-5.0, y, -5.0),
        Vec3::new(0.0, y, 5.0),
        Vec3::new(5.0, y, -5.0),
    )
}

fn polygon_body(triangles: Vec<Triangle>) -> Body {
    Body::new(Arc::new(CollisionShape::polygon(triangles)))
}

#[test]
fn test_trace_hits_centimetre_triangle() {
    let mut world = DynamicsWorld::new();
    let id = world.add_body(polygon_body(vec![Triangle::new(
        Vec3::ZERO,
        Vec3::new(0.0, 0.0, 0.015),
        Vec3::new(0.015, 0.0, 0.0),
    )]));

    let ray = Ray::segment(Vec3::new(0.004, 1.0, 0.004), Vec3::new(0.004, -1.0, 0.004));
    let hit = world.trace_ray(&ray).unwrap();
    assert_eq!(hit.body, id);
    assert_relative_eq!(hit.position.y, 0.0, epsilon = 1e-6);
}

#[test]
fn test_trace_matches_direct_triangle_test() {
    let triangle = Triangle::new(
        Vec3::new(-3.0, -1.0, 2.0),
        Vec3::new(1.0, 4.0, 2.5),
        Vec3::new(4.0, -2.0, 1.5),
    );
    let mut world = DynamicsWorld::new();
    let id = world.add_body(polygon_body(vec![triangle.clone()]));

    let ray = Ray::segment(Vec3::new(0.2, 0.3, -6.0), Vec3::new(0.4, 0.1, 8.0));
    let direct = ray_triangle(&ray, &triangle, RayKind::Infinite).unwrap();
    let hit = world.trace_ray(&ray).unwrap();

    assert_eq!(hit.body, id);
    assert_eq!(hit.triangle, 0);
    assert_eq!(hit.position, direct);
    assert_eq!(hit.normal, triangle.normal);
}

#[test]
fn test_nearest_body_wins() {
    let mut world = DynamicsWorld::new();
    world.add_body(polygon_body(vec![flat_triangle(-3.0)]));
    let near = world.add_body(polygon_body(vec![flat_triangle(-1.0)]));
    world.add_body(polygon_body(vec![flat_triangle(-2.0)]));

    let ray = Ray::segment(Vec3::ZERO, Vec3::new(0.0, -10.0, 0.0));
    let hit = world.trace_ray(&ray).unwrap();
    assert_eq!(hit.body, near);
    assert_relative_eq!(hit.position.y, -1.0, epsilon = 1e-6);
}

#[test]
fn test_miss_reports_none() {
    let mut world = DynamicsWorld::new();
    world.add_body(polygon_body(vec![flat_triangle(0.0)]));

    let upward = Ray::segment(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 10.0, 0.0));
    assert!(world.trace_ray(&upward).is_none());
    let beside = Ray::segment(Vec3::new(20.0, 1.0, 0.0), Vec3::new(20.0, -1.0, 0.0));
    assert!(world.trace_ray(&beside).is_none());
}

#[test]
fn test_spheres_do_not_block_rays() {
    let mut world = DynamicsWorld::new();
    let floor = world.add_body(polygon_body(vec![flat_triangle(0.0)]));
    world.add_body(
        Body::new(Arc::new(CollisionShape::sphere(1.0))).with_position(Vec3::new(0.0, 3.0, 0.0)),
    );

    let ray = Ray::segment(Vec3::new(0.0, 6.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
    assert_eq!(world.trace_ray(&ray).unwrap().body, floor);
    assert_eq!(world.trace_static(&ray).unwrap().body, floor);
}

#[test]
fn test_near_hit_ends_scan_of_body_early() {
    // Both hits lie within the early-exit radius; the first one scanned wins
    // even though the second is closer to the ray origin.
    assert!(0.1f32 * 0.1 < NEAR_HIT_SQR_DISTANCE);
    let mut world = DynamicsWorld::new();
    world.add_body(polygon_body(vec![flat_triangle(0.9), flat_triangle(0.95)]));

    let ray = Ray::segment(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
    let hit = world.trace_ray(&ray).unwrap();
    assert_eq!(hit.triangle, 0);
    assert_relative_eq!(hit.position.y, 0.9, epsilon = 1e-6);
}

#[test]
fn test_far_hits_are_compared_exhaustively() {
    let mut world = DynamicsWorld::new();
    world.add_body(polygon_body(vec![flat_triangle(-3.0), flat_triangle(-1.0)]));

    let ray = Ray::segment(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -5.0, 0.0));
    let hit = world.trace_ray(&ray).unwrap();
    assert_eq!(hit.triangle, 1);
}

#[test]
fn test_caller_scratch_reports_candidates() {
    let mut world = DynamicsWorld::new();
    world.add_body(polygon_body(vec![flat_triangle(0.0), flat_triangle(-1.0)]));

    let mut scratch = TraceScratch::new();
    let ray = Ray::segment(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, -2.0, 0.0));
    assert!(world.trace_ray_with(&ray, &mut scratch).is_some());
    assert_eq!(scratch.candidates_tested(), 2);
}
