//! Scene Integration Tests
//!
//! Tests for:
//! - Scene: add/remove nodes, attach/detach hierarchy
//! - World matrices and snapshots into parent-free collections
//! - Render packet and camera extraction from frames

use glam::{Vec3, Vec4, vec3};

use morphis::animation::{CollectionAnimation, Easing, Timing};
use morphis::geometry::{Mesh, Polygon};
use morphis::render::{extract, extract_camera};
use morphis::scene::{Camera, Collection, Material, Scene, TransformNode};

const EPSILON: f32 = 1e-4;

fn square(name: &str) -> TransformNode {
    TransformNode::polygon(name, Polygon::rectangle(2.0, 2.0))
        .with_material(Material::new(Vec4::ONE))
}

// ============================================================================
// Node Creation & Removal
// ============================================================================

#[test]
fn scene_add_node() {
    let mut scene = Scene::new();
    let key = scene.add_node(square("a"));
    assert_eq!(scene.get_node(key).map(|n| n.name.as_str()), Some("a"));
    assert_eq!(scene.root_nodes(), &[key]);
}

#[test]
fn scene_remove_node_removes_children() {
    let mut scene = Scene::new();
    let parent = scene.add_node(square("parent"));
    let child = scene.add_to_parent(square("child"), parent);
    let other = scene.add_node(square("other"));

    scene.remove_node(parent);
    assert!(scene.get_node(child).is_none());
    assert_eq!(scene.len(), 1);
    assert_eq!(scene.root_nodes(), &[other]);
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn attach_moves_node_out_of_roots() {
    let mut scene = Scene::new();
    let parent = scene.add_node(square("parent"));
    let child = scene.add_node(square("child"));

    scene.attach(child, parent);
    assert_eq!(scene.root_nodes(), &[parent]);
    assert_eq!(scene.children(parent), &[child]);
    assert_eq!(scene.ancestors(child).collect::<Vec<_>>(), vec![parent]);
}

#[test]
fn detach_returns_node_to_roots() {
    let mut scene = Scene::new();
    let parent = scene.add_node(square("parent"));
    let child = scene.add_to_parent(square("child"), parent);

    scene.detach(child);
    assert!(scene.children(parent).is_empty());
    assert_eq!(scene.root_nodes(), &[parent, child]);
    assert_eq!(scene.get_node(child).and_then(TransformNode::parent), None);
}

#[test]
fn reattach_switches_parent() {
    let mut scene = Scene::new();
    let a = scene.add_node(square("a"));
    let b = scene.add_node(square("b"));
    let child = scene.add_to_parent(square("child"), a);

    scene.attach(child, b);
    assert!(scene.children(a).is_empty());
    assert_eq!(scene.children(b), &[child]);
}

// ============================================================================
// World Matrix & Snapshot
// ============================================================================

#[test]
fn world_matrix_rotates_child_about_parent_center() {
    let mut scene = Scene::new();
    let mut parent = square("parent").with_position(vec3(1.0, 0.0, 0.0));
    parent.transform.rotation = Vec3::Z * 90.0;
    let parent = scene.add_node(parent);
    let child = scene.add_to_parent(square("child").with_position(vec3(2.0, 0.0, 0.0)), parent);

    // Parent center is its local origin, so the child's origin turns to +Y
    let world = scene.world_matrix(child).unwrap();
    let origin = world.transform_point3(Vec3::ZERO);
    assert!(origin.distance(vec3(1.0, 2.0, 0.0)) < EPSILON, "got {origin}");
}

#[test]
fn snapshot_matches_world_matrices() {
    let mut scene = Scene::new();
    let mut root = square("root").with_position(vec3(0.0, 3.0, 0.0));
    root.transform.rotation = Vec3::Z * 30.0;
    root.transform.scale = Vec3::splat(1.5);
    let root = scene.add_node(root);
    let mid = scene.add_to_parent(square("mid").with_position(Vec3::X), root);
    let leaf = scene.add_to_parent(square("leaf").with_position(Vec3::Y), mid);

    let snapshot = scene.snapshot(&[leaf, mid]);
    assert_eq!(snapshot.members.len(), 2);

    for ((matrix, node), key) in snapshot.flatten().into_iter().zip([leaf, mid]) {
        assert!(node.parent().is_none());
        let world = scene.world_matrix(key).unwrap();
        assert!(matrix.abs_diff_eq(world, EPSILON), "{}: {matrix:?} != {world:?}", node.name);
    }
}

#[test]
fn snapshot_skips_stale_keys() {
    let mut scene = Scene::new();
    let a = scene.add_node(square("a"));
    let b = scene.add_node(square("b"));
    scene.remove_node(b);
    assert_eq!(scene.snapshot(&[a, b]).members.len(), 1);
}

#[test]
fn snapshot_animates_like_any_collection() {
    let mut scene = Scene::new();
    let key = scene.add_node(square("a"));
    let before = scene.snapshot(&[key]);

    if let Some(node) = scene.get_node_mut(key) {
        node.transform.position = vec3(4.0, 0.0, 0.0);
    }
    let after = scene.snapshot(&[key]);

    let timing = Timing::new(100.0).with_easing(Easing::Linear);
    let animation = CollectionAnimation::new(before, after, timing).unwrap();
    let (matrix, _) = animation.frame(50.0).flatten()[0];
    assert!(matrix.transform_point3(Vec3::ZERO).distance(vec3(2.0, 0.0, 0.0)) < EPSILON);
}

// ============================================================================
// Render Extraction
// ============================================================================

#[test]
fn extract_emits_polygons_and_meshes_in_order() {
    let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y])
        .with_normals(vec![Vec3::Z; 3])
        .with_indices(vec![0, 1, 2]);
    let frame = Collection::default()
        .with_member(square("first").with_position(vec3(5.0, 0.0, 0.0)))
        .with_member(TransformNode::camera("cam", Camera::default()))
        .with_member(TransformNode::mesh("second", mesh));

    let items = extract(&frame);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "first");
    assert_eq!(items[1].name, "second");
    assert_eq!(items[1].indices.as_deref(), Some(&[0, 1, 2][..]));
    assert!(items[1].rings.is_empty());

    let origin = items[0].model_matrix.transform_point3(Vec3::ZERO);
    assert!(origin.distance(vec3(5.0, 0.0, 0.0)) < EPSILON);
}

#[test]
fn extract_carries_material_opacity() {
    let mut node = square("a");
    node.set_opacity(0.25);
    let items = extract(&Collection::default().with_member(node));
    assert!((items[0].material.opacity - 0.25).abs() < EPSILON);
}

#[test]
fn extract_camera_inverts_camera_placement() {
    let camera =
        TransformNode::camera("cam", Camera::default()).with_position(vec3(0.0, 0.0, 10.0));
    let frame = Collection::default().with_member(camera);

    let packet = extract_camera(&frame).unwrap();
    let eye = packet.view.transform_point3(vec3(0.0, 0.0, 10.0));
    assert!(eye.length() < EPSILON);
    assert!(packet.view_projection.abs_diff_eq(packet.projection * packet.view, EPSILON));
}

#[test]
fn extract_camera_follows_looking_at() {
    let camera = TransformNode::camera("cam", Camera::default())
        .with_position(vec3(10.0, 0.0, 0.0))
        .looking_at(Vec3::ZERO, Vec3::Y);
    let frame = Collection::default().with_member(camera);

    let packet = extract_camera(&frame).unwrap();
    let target = packet.view.transform_point3(Vec3::ZERO);
    assert!(target.distance(vec3(0.0, 0.0, -10.0)) < EPSILON, "got {target}");
    let eye = packet.view.transform_point3(vec3(10.0, 0.0, 0.0));
    assert!(eye.length() < EPSILON, "got {eye}");
}

#[test]
fn extract_camera_without_camera_is_none() {
    let frame = Collection::default().with_member(square("a"));
    assert!(extract_camera(&frame).is_none());
}
