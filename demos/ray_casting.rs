use octree_dynamics::*;

fn main() {
    let mut world = DynamicsWorld::new();

    let resolution = 32u32;
    let mut vertices = Vec::new();
    let mut faces = Vec::new();
    for z in 0..=resolution {
        for x in 0..=resolution {
            let height = (x as f32 * 0.5).sin() + (z as f32 * 0.3).cos();
            vertices.push(Vec3::new(x as f32, height, z as f32));
        }
    }
    let row = resolution + 1;
    for z in 0..resolution {
        for x in 0..resolution {
            let i = z * row + x;
            faces.push([i, i + row, i + 1]);
            faces.push([i + 1, i + row, i + row + 1]);
        }
    }
    let terrain = world
        .polygon_shape(&[Surface::new(vertices, faces).with_material(MaterialId(3))])
        .expect("terrain surface is valid");
    let octree = terrain.as_polygon().map(PolygonShape::octree);
    if let Some(octree) = octree {
        println!(
            "terrain octree: {} nodes, {} leaves, depth {}",
            octree.node_count(),
            octree.leaf_count(),
            octree.depth()
        );
    }
    world.add_body(Body::new(terrain));

    let ray = Ray::segment(Vec3::new(10.0, 10.0, 10.0), Vec3::new(14.0, -10.0, 12.0));
    match world.trace_ray(&ray) {
        Some(hit) => println!(
            "hit {:?} triangle {} at {} (normal {})",
            hit.body, hit.triangle, hit.position, hit.normal
        ),
        None => println!("ray missed the terrain"),
    }
}
