//! End-to-end tests: reference scene → sort → BVH → row buffers → dump.

use std::fs::File;
use std::io::{BufReader, BufWriter};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tempfile::NamedTempFile;

use tracebox::bvh::NO_NODE;
use tracebox::geom::{Mesh, Model};
use tracebox::gpu::{self, read_dump, read_node, read_object, write_dump, ObjectGeometry, TRIANGLE_ROWS};
use tracebox::prelude::*;
use tracebox::util::Vec3;

fn cube_model() -> Model {
    Model::new(vec![Mesh::cube(Vec3::new(0.0, 1.0, 0.0), 1.0)])
}

fn build(kind: SceneKind, seed: u64) -> (Scene, SceneBuffers) {
    let model = kind.uses_model().then(cube_model);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut scene = kind.build(model.as_ref(), &mut rng).expect("scene should build");
    let buffers = prepare_scene(&mut scene, model.as_ref(), &mut rng, Capacities::default())
        .expect("pipeline should succeed");
    (scene, buffers)
}

/// Walk every node in the buffer and check the structural invariants
/// the shader traversal relies on.
fn check_nodes(buffers: &SceneBuffers) {
    let n = buffers.object_count as usize;
    let node_count = buffers.node_count() as usize;
    assert_eq!(node_count, 2 * n - 1);
    assert_eq!(buffers.root_index as usize, 2 * n - 2);

    let mut seen = vec![false; n];
    for i in 0..node_count {
        let node = read_node(&buffers.nodes, i).unwrap();
        if i < n {
            assert!(node.is_leaf(), "node {i} should be a leaf");
            let h = node.object_index as usize;
            assert!(!seen[h], "primitive {h} referenced twice");
            seen[h] = true;
            let obj = ObjectType::from_discriminant(node.object_type).expect("valid object type");
            read_object(&buffers.objects, h, obj).unwrap();
        } else {
            assert_eq!(node.object_index, NO_NODE);
            assert_eq!(node.object_type, NO_NODE);
            let left = read_node(&buffers.nodes, node.left as usize).unwrap();
            let right = read_node(&buffers.nodes, node.right as usize).unwrap();
            assert!((node.left as usize) < i && (node.right as usize) < i);
            assert_eq!(left.parent, i as i32);
            assert_eq!(right.parent, i as i32);
            assert_eq!(node.aabb, Aabb::merge(&left.aabb, &right.aabb));
        }
        if i == buffers.root_index as usize {
            assert_eq!(node.parent, NO_NODE);
        } else {
            assert_ne!(node.parent, NO_NODE, "node {i} has no parent");
        }
    }
    assert!(seen.into_iter().all(|s| s), "every primitive must have a leaf");
}

#[test]
fn test_scene1_objects_decode_exactly() {
    let (scene, buffers) = build(SceneKind::Scene1, 7);
    assert_eq!(buffers.object_count, 4);
    assert_eq!(buffers.objects.len(), 12);
    assert_eq!(buffers.root_index, 6);
    assert_eq!(buffers.nodes.len(), 21);
    assert_eq!(buffers.triangle_count, 0);

    for (id, prim) in scene.iter() {
        let decoded = read_object(&buffers.objects, id.index(), prim.object_type()).unwrap();
        let expected = match prim.shape() {
            tracebox::geom::Shape::Sphere(s) => ObjectGeometry::Sphere(*s),
            other => panic!("scene1 holds only spheres, found {other:?}"),
        };
        assert_eq!(decoded.geometry, expected);
        assert_eq!(&decoded.material, scene.material(prim.material()).unwrap());
    }

    // Ground sphere keeps its handle regardless of the sort order
    assert_eq!(
        buffers.objects.rows()[0],
        [0.0, -100.5, -1.0, 100.0]
    );
}

#[test]
fn test_scene1_root_bounds_cover_scene() {
    let (scene, buffers) = build(SceneKind::Scene1, 0);
    check_nodes(&buffers);
    let root = read_node(&buffers.nodes, buffers.root_index as usize).unwrap();
    assert_eq!(root.aabb, scene.bounding_box().unwrap());
}

#[test]
fn test_same_seed_same_buffers() {
    for kind in SceneKind::ALL {
        let (_, a) = build(kind, 42);
        let (_, b) = build(kind, 42);
        assert_eq!(a, b, "{kind} differs between identical seeds");
    }
}

#[test]
fn test_reference_scenes_hold_invariants() {
    for kind in SceneKind::ALL {
        for seed in [0, 1, 99] {
            let (_, buffers) = build(kind, seed);
            check_nodes(&buffers);
        }
    }
}

#[test]
fn test_cornell_rects_decode() {
    let (scene, buffers) = build(SceneKind::Cornell, 3);
    assert_eq!(buffers.object_count, 6);
    check_nodes(&buffers);

    let light = read_object(&buffers.objects, 2, ObjectType::XzRect).unwrap();
    match light.geometry {
        ObjectGeometry::XzRect(r) => {
            assert_eq!((r.a0, r.a1, r.b0, r.b1, r.k), (213.0, 343.0, 227.0, 332.0, 554.0));
        }
        other => panic!("expected XZ rect, got {other:?}"),
    }
    assert_eq!(light.material.color, Vec3::splat(15.0));

    // Rect boxes are slabs, never flat
    for prim in scene.primitives() {
        assert!(prim.bounding_box().size().min_element() > 0.0);
    }
}

#[test]
fn test_display_scene_triangles() {
    let model = cube_model();
    let (scene, buffers) = build(SceneKind::Display, 5);
    check_nodes(&buffers);

    assert_eq!(buffers.triangle_count as usize, model.triangle_count());
    assert_eq!(buffers.triangles.len(), model.triangle_count() * TRIANGLE_ROWS);

    let (mesh_id, _) = scene
        .iter()
        .find(|(_, p)| p.object_type() == ObjectType::Mesh)
        .expect("display scene places the model");
    let decoded = read_object(&buffers.objects, mesh_id.index(), ObjectType::Mesh).unwrap();
    assert_eq!(
        decoded.geometry,
        ObjectGeometry::Mesh { first_triangle: 0, triangle_count: 12 }
    );

    let first = gpu::read_triangle(&buffers.triangles, 0).unwrap();
    let expected = model.meshes[0].triangles().next().unwrap();
    assert_eq!(first, expected);
}

#[test]
fn test_dump_roundtrip() {
    let (_, buffers) = build(SceneKind::Random, 11);
    let temp = NamedTempFile::new().expect("Failed to create temp file");

    {
        let file = File::create(temp.path()).unwrap();
        write_dump(&buffers, BufWriter::new(file)).unwrap();
    }

    let file = File::open(temp.path()).unwrap();
    let restored = read_dump(BufReader::new(file), Capacities::default()).unwrap();
    assert_eq!(restored, buffers);
    check_nodes(&restored);
}

#[test]
fn test_dump_respects_capacity() {
    let (_, buffers) = build(SceneKind::Scene1, 0);
    let mut bytes = Vec::new();
    write_dump(&buffers, &mut bytes).unwrap();

    let tight = Capacities {
        nodes: 20,
        ..Capacities::default()
    };
    let err = read_dump(&bytes[..], tight).unwrap_err();
    assert!(matches!(
        err,
        Error::CapacityExceeded { buffer: "nodes", required: 21, capacity: 20 }
    ));
}

#[test]
fn test_capacity_exceeded() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut scene = tracebox::scene::scene1().unwrap();
    let caps = Capacities {
        objects: 11,
        ..Capacities::default()
    };
    let err = prepare_scene(&mut scene, None, &mut rng, caps).unwrap_err();
    assert!(matches!(err, Error::CapacityExceeded { buffer: "objects", .. }));
    assert!(err.to_string().contains("objects"));
}

#[test]
fn test_empty_scene_errors() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut scene = Scene::new();
    let err = prepare_scene(&mut scene, None, &mut rng, Capacities::default()).unwrap_err();
    assert!(matches!(err, Error::EmptyScene));
}

#[test]
fn test_single_primitive_is_root() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut scene = Scene::new();
    let mat = scene.add_material(Material::default());
    scene.add_sphere(Vec3::new(1.0, 2.0, 3.0), 0.5, mat).unwrap();

    let buffers = prepare_scene(&mut scene, None, &mut rng, Capacities::default()).unwrap();
    assert_eq!(buffers.root_index, 0);
    let root = read_node(&buffers.nodes, 0).unwrap();
    assert!(root.is_leaf());
    assert_eq!(root.parent, NO_NODE);
    assert_eq!(root.object_type, ObjectType::Sphere.discriminant());
}
