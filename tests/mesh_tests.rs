use octree_dynamics::{
    CollisionShape, DynamicsWorld, MaterialId, OctreeConfig, PhysicsError, ShapeKind, Surface,
    Vec3, WorldConfig,
};

fn cube(size: f32, material: Option<MaterialId>) -> Surface {
    let h = size * 0.5;
    let vertices = vec![
        Vec3::new(-h, -h, -h),
        Vec3::new(h, -h, -h),
        Vec3::new(h, h, -h),
        Vec3::new(-h, h, -h),
        Vec3::new(-h, -h, h),
        Vec3::new(h, -h, h),
        Vec3::new(h, h, h),
        Vec3::new(-h, h, h),
    ];
    let faces = vec![
        [0, 2, 1],
        [0, 3, 2],
        [4, 5, 6],
        [4, 6, 7],
        [0, 1, 5],
        [0, 5, 4],
        [3, 6, 2],
        [3, 7, 6],
        [0, 4, 7],
        [0, 7, 3],
        [1, 2, 6],
        [1, 6, 5],
    ];
    let surface = Surface::new(vertices, faces);
    match material {
        Some(material) => surface.with_material(material),
        None => surface,
    }
}

#[test]
fn test_shapes_from_surfaces() {
    let surfaces = [cube(2.0, None)];

    let sphere = CollisionShape::sphere_from_surfaces(&surfaces).unwrap();
    assert_eq!(sphere.kind(), ShapeKind::Sphere);
    let expected = Vec3::splat(2.0).length() / 4.0;
    assert!((sphere.sphere_radius().unwrap() - expected).abs() < 1e-6);

    match CollisionShape::aabb_from_surfaces(&surfaces).unwrap() {
        CollisionShape::Aabb { min, max } => {
            assert_eq!(min, Vec3::splat(-1.0));
            assert_eq!(max, Vec3::splat(1.0));
        }
        other => panic!("expected a box, got {:?}", other.kind()),
    }

    let polygon = CollisionShape::polygon_from_surfaces(&surfaces).unwrap();
    let mesh = polygon.as_polygon().unwrap();
    assert_eq!(mesh.triangles().len(), 12);
    assert_eq!(mesh.octree().triangle_count(), 12);
    assert!(mesh.octree().root().is_leaf());
}

#[test]
fn test_merged_surfaces_keep_their_materials() {
    let stone = MaterialId(1);
    let metal = MaterialId(2);
    let shape =
        CollisionShape::polygon_from_surfaces(&[cube(1.0, Some(stone)), cube(4.0, Some(metal))])
            .unwrap();
    let triangles = shape.as_polygon().unwrap().triangles();

    assert_eq!(triangles.len(), 24);
    assert!(triangles[..12].iter().all(|t| t.material == Some(stone)));
    assert!(triangles[12..].iter().all(|t| t.material == Some(metal)));
}

#[test]
fn test_custom_octree_config_splits_small_meshes() {
    let config = OctreeConfig {
        max_triangles_per_node: 4,
        max_depth: 3,
    };
    let shape = CollisionShape::polygon_from_surfaces_with(&[cube(2.0, None)], &config).unwrap();
    let octree = shape.as_polygon().unwrap().octree();
    assert!(!octree.root().is_leaf());
    assert!(octree.depth() <= 3);
}

#[test]
fn test_world_builds_polygons_with_its_config() {
    let world = DynamicsWorld::with_config(WorldConfig {
        octree: OctreeConfig {
            max_triangles_per_node: 2,
            max_depth: 2,
        },
        ..WorldConfig::default()
    })
    .unwrap();
    let shape = world.polygon_shape(&[cube(2.0, None)]).unwrap();
    assert!(shape.as_polygon().unwrap().octree().node_count() > 1);
}

#[test]
fn test_bad_surfaces_are_reported() {
    assert!(matches!(
        CollisionShape::polygon_from_surfaces(&[]),
        Err(PhysicsError::EmptyGeometry)
    ));
    assert!(matches!(
        CollisionShape::aabb_from_surfaces(&[Surface::default()]),
        Err(PhysicsError::EmptyGeometry)
    ));

    let broken = Surface::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![[0, 1, 3]]);
    assert!(matches!(
        CollisionShape::polygon_from_surfaces(&[broken]),
        Err(PhysicsError::FaceIndexOutOfRange {
            surface: 0,
            face: 0,
            index: 3,
            vertex_count: 3
        })
    ));

    let invalid = OctreeConfig {
        max_triangles_per_node: 0,
        max_depth: 4,
    };
    assert!(matches!(
        CollisionShape::polygon_from_surfaces_with(&[cube(1.0, None)], &invalid),
        Err(PhysicsError::InvalidConfig(_))
    ));
}
