use std::sync::Arc;

use octree_dynamics::*;

fn main() {
    let mut world = DynamicsWorld::new();

    let floor = Surface::new(
        vec![
            Vec3::new(-20.0, 0.0, -20.0),
            Vec3::new(20.0, 0.0, -20.0),
            Vec3::new(20.0, 0.0, 20.0),
            Vec3::new(-20.0, 0.0, 20.0),
        ],
        vec![[0, 2, 1], [0, 3, 2]],
    );
    let floor = world.polygon_shape(&[floor]).expect("floor surface is valid");
    world.add_body(Body::new(floor));

    let ball = Arc::new(CollisionShape::sphere(1.0));
    let first = world.add_body(Body::new(Arc::clone(&ball)).with_position(Vec3::new(0.0, 5.0, 0.0)));
    world.add_body(Body::new(Arc::clone(&ball)).with_position(Vec3::new(0.5, 8.0, 0.0)));

    world.set_sphere_triangle_callback(|sphere, _, triangle| {
        println!("{sphere:?} touched triangle with normal {}", triangle.normal);
    });

    for frame in 0..240 {
        world.advance(1.0 / 60.0);
        if frame % 40 == 0 {
            if let Some(body) = world.body(first) {
                println!(
                    "frame {frame}: y = {:.3}, contacts = {}",
                    body.position.y,
                    body.contact_count()
                );
            }
        }
    }
}
