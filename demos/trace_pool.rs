use std::sync::Arc;

use octree_dynamics::*;

fn main() -> Result<()> {
    let mut world = DynamicsWorld::new();
    let room = Surface::new(
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(16.0, 0.0, 0.0),
            Vec3::new(16.0, 0.0, 16.0),
            Vec3::new(0.0, 0.0, 16.0),
            Vec3::new(4.0, 3.0, 4.0),
            Vec3::new(12.0, 3.0, 4.0),
            Vec3::new(12.0, 3.0, 12.0),
            Vec3::new(4.0, 3.0, 12.0),
        ],
        vec![[0, 2, 1], [0, 3, 2], [4, 6, 5], [4, 7, 6]],
    );
    let room = world.polygon_shape(&[room])?;
    world.add_body(Body::new(room));

    let scene = Arc::new(world.static_scene());
    let mut pool = TracePool::new(scene, 4, config::DEFAULT_TRACE_QUEUE_DEPTH)?;

    // One job per texel row: shadow rays from the floor towards a light.
    let light = Vec3::new(8.0, 10.0, 8.0);
    for row in 0..16u64 {
        let rays = (0..16)
            .map(|column| {
                let texel = Vec3::new(column as f32 + 0.5, 0.01, row as f32 + 0.5);
                Ray::segment(texel + Vec3::Y * 0.01, light)
            })
            .collect();
        pool.submit(row, rays)?;
    }

    let mut outcomes = pool.wait_idle();
    outcomes.sort_by_key(|outcome| outcome.job);
    for outcome in &outcomes {
        let line: String = outcome
            .hits
            .iter()
            .map(|hit| if hit.is_some() { '#' } else { '.' })
            .collect();
        println!("{line}");
    }
    pool.shutdown();
    Ok(())
}
