//! Stateless pairwise intersection tests between the geometric primitives.
//!
//! Every test is total: a miss is `None`/`false`, never a panic or NaN leak.

use glam::Vec3;

use crate::{
    config::GEOMETRY_EPSILON,
    core::{
        bounds::BoxShape,
        triangle::Triangle,
        types::{Plane, Ray, RayKind, Sphere},
    },
};

/// Slack applied when checking that a computed point lies on a face or edge.
const ON_FEATURE_TOLERANCE: f32 = 1e-4;

/// Both roots of a ray/sphere intersection, `t_near <= t_far`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaySphereHit {
    pub t_near: f32,
    pub t_far: f32,
    pub near: Vec3,
    pub far: Vec3,
}

/// Solves `t = -(dot(begin, n) + d) / dot(dir, n)`.
///
/// Rays (nearly) parallel to the plane miss.
pub fn ray_plane(ray: &Ray, plane: &Plane, kind: RayKind) -> Option<Vec3> {
    let denom = ray.dir.dot(plane.normal);
    if denom.abs() <= GEOMETRY_EPSILON * ray.dir.length() {
        return None;
    }
    let t = -(ray.begin.dot(plane.normal) + plane.dist) / denom;
    if t < 0.0 {
        return None;
    }
    match kind {
        RayKind::Infinite => Some(ray.point_at(t)),
        RayKind::Segment if t <= 1.0 => Some(ray.point_at(t)),
        RayKind::Segment => None,
    }
}

pub fn ray_triangle(ray: &Ray, triangle: &Triangle, kind: RayKind) -> Option<Vec3> {
    let point = ray_plane(ray, &triangle.plane(), kind)?;
    triangle.contains_point(point).then_some(point)
}

/// Roots of `|begin + t * dir - center| = radius`.
///
/// Infinite rays accept any sphere not entirely behind `begin`; segment rays
/// need at least one root within `[0, 1]`.
pub fn ray_sphere(ray: &Ray, sphere: &Sphere, kind: RayKind) -> Option<RaySphereHit> {
    let d = ray.begin - sphere.center;
    let a = ray.dir.dot(ray.dir);
    if a <= f32::MIN_POSITIVE {
        return None;
    }
    let b = 2.0 * ray.dir.dot(d);
    let c = d.dot(d) - sphere.radius * sphere.radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let t_near = (-b - root) / (2.0 * a);
    let t_far = (-b + root) / (2.0 * a);

    let accepted = match kind {
        RayKind::Infinite => t_far >= 0.0,
        RayKind::Segment => (0.0..=1.0).contains(&t_near) || (0.0..=1.0).contains(&t_far),
    };

    accepted.then(|| RaySphereHit {
        t_near,
        t_far,
        near: ray.point_at(t_near),
        far: ray.point_at(t_far),
    })
}

/// Penetration depth `r1 + r2 - |c1 - c2|` of two overlapping spheres.
///
/// Touching spheres report `Some(0.0)`.
pub fn sphere_sphere(a: &Sphere, b: &Sphere) -> Option<f32> {
    let radii = a.radius + b.radius;
    let distance_sq = a.center.distance_squared(b.center);
    if distance_sq > radii * radii {
        return None;
    }
    Some((radii - distance_sq.sqrt()).max(0.0))
}

pub fn sphere_contains_point(sphere: &Sphere, point: Vec3) -> bool {
    sphere.center.distance_squared(point) <= sphere.radius * sphere.radius
}

/// Orthogonal projection of `point` onto the line through `a` and `b`.
///
/// A degenerate line (`a == b`) yields the zero vector.
pub fn project_point_on_line(point: Vec3, a: Vec3, b: Vec3) -> Vec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::MIN_POSITIVE {
        return Vec3::ZERO;
    }
    a + ab * ((point - a).dot(ab) / len_sq)
}

/// Whether a point already known to be on the line `ab` lies between `a` and
/// `b`, checked against the segment's bounding box.
pub fn point_on_segment(point: Vec3, a: Vec3, b: Vec3) -> bool {
    let slack = Vec3::splat(ON_FEATURE_TOLERANCE);
    let min = a.min(b) - slack;
    let max = a.max(b) + slack;
    point.cmpge(min).all() && point.cmple(max).all()
}

/// Closest point of an edge segment to the sphere center, if the sphere
/// reaches the edge there.
pub fn edge_sphere(edge: &Ray, sphere: &Sphere) -> Option<Vec3> {
    ray_sphere(edge, sphere, RayKind::Infinite)?;
    let closest = project_point_on_line(sphere.center, edge.begin, edge.end);
    point_on_segment(closest, edge.begin, edge.end).then_some(closest)
}

/// Contact point between a sphere and a triangle.
///
/// The center is projected onto the triangle's plane; if the projection falls
/// inside the triangle that is the contact, otherwise the first edge (ab, bc,
/// ca) reached by the sphere supplies it.
pub fn sphere_triangle(sphere: &Sphere, triangle: &Triangle) -> Option<Vec3> {
    let plane = triangle.plane();
    let signed = plane.signed_distance(sphere.center);
    if signed.abs() > sphere.radius {
        return None;
    }

    let projected = sphere.center - plane.normal * signed;
    if triangle.contains_point(projected) {
        return Some(projected);
    }

    triangle
        .edges()
        .into_iter()
        .find_map(|edge| edge_sphere(edge, sphere))
}

/// First box face crossed by the segment `ray`.
pub fn ray_box(ray: &Ray, shape: &BoxShape) -> Option<Vec3> {
    let bounds = shape.bounds();
    let slack = Vec3::splat(ON_FEATURE_TOLERANCE);
    (0..6).find_map(|face| {
        let plane = Plane::from_box_face(shape.min, shape.max, face);
        ray_plane(ray, &plane, RayKind::Segment).filter(|point| {
            point.cmpge(bounds.min - slack).all() && point.cmple(bounds.max + slack).all()
        })
    })
}

/// Edge-based box/triangle test: triangle edges against the box faces, then
/// all twelve box edges against the triangle plane. The first hit is
/// returned.
///
/// The step never resolves box/polygon pairs, so this result feeds no
/// simulation output.
pub fn box_triangle(shape: &BoxShape, triangle: &Triangle) -> Option<Vec3> {
    triangle
        .edges()
        .into_iter()
        .find_map(|edge| ray_box(edge, shape))
        .or_else(|| {
            shape
                .edges
                .iter()
                .find_map(|edge| ray_triangle(edge, triangle, RayKind::Segment))
        })
}
