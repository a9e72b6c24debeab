use std::{sync::Arc, thread};

use octree_dynamics::{
    Body, DynamicsWorld, PhysicsError, Ray, RayHit, StaticScene, Surface, TracePool, TraceScratch,
    Vec3,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn terrain(resolution: u32, offset: Vec3) -> Surface {
    let mut vertices = Vec::new();
    for z in 0..=resolution {
        for x in 0..=resolution {
            let height = ((x as f32) * 0.7).sin() * ((z as f32) * 0.4).cos() * 2.0;
            vertices.push(offset + Vec3::new(x as f32, height, z as f32));
        }
    }
    let row = resolution + 1;
    let mut faces = Vec::new();
    for z in 0..resolution {
        for x in 0..resolution {
            let i = z * row + x;
            faces.push([i, i + row, i + 1]);
            faces.push([i + 1, i + row, i + row + 1]);
        }
    }
    Surface::new(vertices, faces)
}

fn terrain_world() -> DynamicsWorld {
    let mut world = DynamicsWorld::new();
    let ground = world.polygon_shape(&[terrain(24, Vec3::ZERO)]).unwrap();
    let ledge = world
        .polygon_shape(&[terrain(8, Vec3::new(4.0, 3.0, 4.0))])
        .unwrap();
    world.add_body(Body::new(ground));
    world.add_body(Body::new(ledge));
    world
}

fn downward_rays(count: usize, seed: u64) -> Vec<Ray> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let x = rng.gen_range(0.0..24.0);
            let z = rng.gen_range(0.0..24.0);
            let drift = Vec3::new(rng.gen_range(-2.0..2.0), 0.0, rng.gen_range(-2.0..2.0));
            Ray::segment(Vec3::new(x, 10.0, z), Vec3::new(x, -10.0, z) + drift)
        })
        .collect()
}

fn key(hit: &Option<RayHit>) -> Option<(octree_dynamics::BodyId, Vec3, usize)> {
    hit.map(|hit| (hit.body, hit.position, hit.triangle))
}

#[test]
fn test_world_and_scene_are_sync_and_send() {
    fn assert_sync_send<T: Sync + Send>() {}
    assert_sync_send::<DynamicsWorld>();
    assert_sync_send::<StaticScene>();
    assert_sync_send::<TracePool>();
}

#[test]
fn test_multithreaded_trace_matches_single_threaded() {
    let world = terrain_world();
    let rays = downward_rays(256, 42);
    let expected: Vec<_> = rays.iter().map(|ray| key(&world.trace_ray(ray))).collect();
    assert!(expected.iter().filter(|hit| hit.is_some()).count() > 200);

    let scene = world.static_scene();
    thread::scope(|scope| {
        for _ in 0..8 {
            let scene = &scene;
            let rays = &rays;
            let expected = &expected;
            scope.spawn(move || {
                let mut scratch = TraceScratch::new();
                for (ray, want) in rays.iter().zip(expected) {
                    assert_eq!(key(&scene.trace(ray, &mut scratch)), *want);
                }
            });
        }
    });
}

#[test]
fn test_more_workers_than_legacy_slots() {
    let world = terrain_world();
    let rays = downward_rays(64, 3);
    thread::scope(|scope| {
        for _ in 0..16 {
            let world = &world;
            let rays = &rays;
            scope.spawn(move || {
                let mut scratch = TraceScratch::new();
                for ray in rays {
                    assert_eq!(
                        key(&world.trace_ray_with(ray, &mut scratch)),
                        key(&world.trace_static(ray))
                    );
                }
            });
        }
    });
}

#[test]
fn test_batch_trace_keeps_input_order() {
    let world = terrain_world();
    let rays = downward_rays(512, 9);
    let batch = world.static_scene().trace_batch(&rays);

    assert_eq!(batch.len(), rays.len());
    for (ray, hit) in rays.iter().zip(&batch) {
        assert_eq!(key(hit), key(&world.trace_ray(ray)));
    }
}

#[test]
fn test_trace_pool_returns_every_job() {
    let world = terrain_world();
    let scene = Arc::new(world.static_scene());
    let mut pool = TracePool::new(Arc::clone(&scene), 4, 2).unwrap();

    let jobs: Vec<Vec<Ray>> = (0..12).map(|seed| downward_rays(32, seed)).collect();
    for (id, rays) in jobs.iter().enumerate() {
        pool.submit(id as u64, rays.clone()).unwrap();
    }

    let outcomes = pool.wait_idle();
    assert_eq!(outcomes.len(), jobs.len());

    let mut scratch = TraceScratch::new();
    for outcome in &outcomes {
        let rays = &jobs[outcome.job as usize];
        assert_eq!(outcome.hits.len(), rays.len());
        for (ray, hit) in rays.iter().zip(&outcome.hits) {
            assert_eq!(key(hit), key(&scene.trace(ray, &mut scratch)));
        }
    }

    pool.shutdown();
    assert!(matches!(
        pool.submit(99, Vec::new()),
        Err(PhysicsError::PoolClosed)
    ));
}
