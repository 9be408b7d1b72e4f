//! Animation System Tests
//!
//! Tests for:
//! - Progress, easing and backwards playback
//! - Node pairing by shape kind and mesh topology
//! - Transform, auxiliary transform and material channel blending
//! - Collection member padding and nested collections

use glam::{Vec3, Vec4, vec3};
use smallvec::smallvec;

use morphis::animation::{
    AnimationKind, CollectionAnimation, Easing, InterpolatedAnimation, MemberAnimation, Timing,
};
use morphis::errors::MorphError;
use morphis::geometry::{Mesh, Polygon};
use morphis::scene::{Camera, Collection, Material, Member, Shape, Transform, TransformNode};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_vec(a: Vec3, b: Vec3) -> bool {
    a.distance(b) < EPSILON
}

fn square(name: &str) -> TransformNode {
    TransformNode::polygon(name, Polygon::rectangle(1.0, 1.0))
        .with_material(Material::new(Vec4::ONE))
}

fn node_of(member: &Member) -> &TransformNode {
    match member {
        Member::Node(node) => node,
        Member::Collection(_) => panic!("Expected a node member"),
    }
}

// ============================================================================
// Progress & Easing
// ============================================================================

#[test]
fn progress_starts_at_zero_and_reaches_one() {
    for easing in [Easing::EaseInOut, Easing::Linear, Easing::Cubic] {
        let timing = Timing::new(750.0).with_easing(easing);
        assert!(approx(timing.progress(0.0), 0.0), "{easing:?}");
        assert!(timing.progress(750.0) >= 1.0, "{easing:?}");
        assert!(timing.progress(5000.0) >= 1.0, "{easing:?}");
    }
}

#[test]
fn zero_duration_reports_done() {
    let animation = InterpolatedAnimation::new(square("a"), square("a"), Timing::new(0.0)).unwrap();
    assert!(approx(animation.progress(0.0), 1.0));
    assert!(animation.done(0.0));
}

#[test]
fn custom_easing_is_used() {
    fn step(a: f32, b: f32, x: f32) -> f32 {
        if x < 0.5 { a } else { b }
    }
    let timing = Timing::new(100.0).with_easing(Easing::Custom(step));
    assert!(approx(timing.progress(40.0), 0.0));
    assert!(approx(timing.progress(60.0), 1.0));
}

#[test]
fn backwards_plays_from_after_to_before() {
    let before = square("a");
    let after = square("a").with_position(vec3(10.0, 0.0, 0.0));
    let timing = Timing::new(100.0).with_easing(Easing::Linear).reversed();
    let animation = InterpolatedAnimation::new(before, after, timing).unwrap();

    assert!(approx_vec(animation.frame(0.0).transform.position, vec3(10.0, 0.0, 0.0)));
    assert!(approx_vec(animation.frame(25.0).transform.position, vec3(7.5, 0.0, 0.0)));
    assert!(approx_vec(animation.frame(100.0).transform.position, Vec3::ZERO));
    assert!(animation.done(100.0));
}

#[test]
fn frame_does_not_mutate_endpoints() {
    let before = square("a");
    let after = square("a").with_position(Vec3::Y);
    let animation =
        InterpolatedAnimation::new(before.clone(), after.clone(), Timing::new(100.0)).unwrap();
    let _ = animation.frame(50.0);
    let _ = animation.frame(100.0);
    assert_eq!(animation.before(), &before);
    assert_eq!(animation.after(), &after);
}

// ============================================================================
// Node Pairing
// ============================================================================

#[test]
fn polygon_into_mesh_is_incompatible() {
    let mesh = TransformNode::mesh("a", Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y]));
    let err = InterpolatedAnimation::new(square("a"), mesh, Timing::default()).unwrap_err();
    assert!(matches!(
        err,
        MorphError::IncompatibleMembers {
            before: AnimationKind::Polygon,
            after: AnimationKind::Mesh,
            ..
        }
    ));
}

#[test]
fn meshes_with_different_vertex_counts_fail() {
    let a = TransformNode::mesh("m", Mesh::new(vec![Vec3::ZERO; 3]));
    let b = TransformNode::mesh("m", Mesh::new(vec![Vec3::ZERO; 4]));
    let err = InterpolatedAnimation::new(a, b, Timing::default()).unwrap_err();
    assert!(matches!(
        err,
        MorphError::MeshTopologyMismatch {
            before: 3,
            after: 4,
            ..
        }
    ));
}

#[test]
fn mesh_normals_stay_unit_length() {
    let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
    let a = Mesh::new(positions.clone()).with_normals(vec![Vec3::X; 3]);
    let b = Mesh::new(positions).with_normals(vec![Vec3::Y; 3]);
    let animation = InterpolatedAnimation::new(
        TransformNode::mesh("m", a),
        TransformNode::mesh("m", b),
        Timing::new(100.0).with_easing(Easing::Linear),
    )
    .unwrap();

    let Shape::Mesh(mesh) = animation.frame(50.0).shape else {
        panic!("Expected a mesh frame");
    };
    for normal in mesh.normals {
        assert!(approx(normal.length(), 1.0));
    }
}

#[test]
fn camera_animation_blends_projection() {
    let a = TransformNode::camera("cam", Camera::new_perspective(30.0, 1.0, 0.1, 100.0));
    let b = TransformNode::camera("cam", Camera::new_perspective(90.0, 1.0, 0.1, 100.0));
    let timing = Timing::new(100.0).with_easing(Easing::Linear);
    let animation = InterpolatedAnimation::new(a, b, timing).unwrap();

    let Shape::Camera(camera) = animation.frame(50.0).shape else {
        panic!("Expected a camera frame");
    };
    assert!(approx(camera.fov, 60.0));
}

// ============================================================================
// Transform Channels
// ============================================================================

#[test]
fn auxiliary_lists_are_padded_with_identity() {
    let pivot = vec3(5.0, 0.0, 0.0);
    let before = square("a");
    let mut after = square("a");
    after.auxiliary = smallvec![
        Transform::pivot_rotation(Vec3::Z * 90.0, pivot),
        Transform::pivot_rotation(Vec3::Z * 90.0, pivot),
    ];

    let animation = InterpolatedAnimation::new(before, after, Timing::new(100.0)).unwrap();
    let start = animation.resolved_before();
    assert_eq!(start.auxiliary.len(), 2);
    assert!(start.auxiliary.iter().all(Transform::is_identity));

    // Halfway through, each entry has turned half of its quarter turn
    let mid = animation.frame(50.0);
    assert!(approx(mid.auxiliary[0].rotation.z, 45.0));
}

#[test]
fn rotation_blends_through_full_turns() {
    let before = square("a");
    let mut after = square("a");
    after.transform.rotation = Vec3::Z * 720.0;
    let timing = Timing::new(100.0).with_easing(Easing::Linear);
    let animation = InterpolatedAnimation::new(before, after, timing).unwrap();
    assert!(approx(animation.frame(50.0).transform.rotation.z, 360.0));
}

#[test]
fn rotation_keeps_authored_center_at_end() {
    let before = square("a").with_position(vec3(3.0, 0.0, 0.0));
    let mut after = before.clone();
    after.transform.rotation = Vec3::Z * 90.0;

    let animation = InterpolatedAnimation::new(before, after.clone(), Timing::new(100.0)).unwrap();
    let end = animation.frame(100.0);
    let center = end.local_matrix().transform_point3(Vec3::ZERO);
    assert!(approx_vec(center, after.local_matrix().transform_point3(Vec3::ZERO)));
}

#[test]
fn material_channels_blend() {
    let before = square("a");
    let mut after = square("a");
    after.set_color(Vec4::new(0.0, 0.0, 1.0, 1.0));
    after.set_opacity(0.0);

    let timing = Timing::new(100.0).with_easing(Easing::Linear);
    let animation = InterpolatedAnimation::new(before, after, timing).unwrap();
    let mid = animation.frame(50.0);
    let material = mid.material.unwrap();
    assert!(approx(material.opacity, 0.5));
    assert!(approx(material.color.x, 0.5));
    assert!(approx(material.color.z, 1.0));
}

#[test]
fn missing_material_copies_the_other_side() {
    let before = TransformNode::polygon("a", Polygon::rectangle(1.0, 1.0));
    let after = square("a").with_material(Material::new(Vec4::ONE).with_opacity(0.2));
    let animation = InterpolatedAnimation::new(before, after, Timing::new(10.0)).unwrap();
    assert!(approx(animation.frame(0.0).opacity(), 0.2));
}

// ============================================================================
// Collection Animation
// ============================================================================

#[test]
fn shorter_member_list_duplicates_last_member() {
    let before = Collection::default().with_member(square("a"));
    let after = Collection::default()
        .with_member(square("a"))
        .with_member(square("b").with_position(Vec3::X))
        .with_member(square("c").with_position(Vec3::Y));

    let animation = CollectionAnimation::new(before, after, Timing::new(100.0)).unwrap();
    assert_eq!(animation.members().len(), 3);
    assert_eq!(animation.frame(0.0).members.len(), 3);
    assert!(animation.members().iter().all(|m| m.kind() == AnimationKind::Polygon));
}

#[test]
fn empty_side_fades_members_in() {
    let after = Collection::default().with_member(square("a")).with_member(square("b"));
    let animation =
        CollectionAnimation::new(Collection::default(), after, Timing::new(100.0)).unwrap();

    let start = animation.frame(0.0);
    assert_eq!(start.members.len(), 2);
    assert!(start.members.iter().all(|m| approx(node_of(m).opacity(), 0.0)));

    let end = animation.frame(100.0);
    assert!(end.members.iter().all(|m| approx(node_of(m).opacity(), 1.0)));
}

#[test]
fn node_and_nested_collection_do_not_pair() {
    let before = Collection::default().with_member(square("a"));
    let after = Collection::default().with_member(Collection::default().with_member(square("a")));
    let err = CollectionAnimation::new(before, after, Timing::default()).unwrap_err();
    assert!(matches!(
        err,
        MorphError::IncompatibleMembers {
            after: AnimationKind::Collection,
            ..
        }
    ));
}

#[test]
fn nested_collections_animate_recursively() {
    let inner_before = Collection::default().with_member(square("a"));
    let mut inner_after = inner_before.clone();
    inner_after.transform.position = vec3(0.0, 4.0, 0.0);

    let before = Collection::default().with_member(inner_before);
    let after = Collection::default().with_member(inner_after);
    let timing = Timing::new(100.0).with_easing(Easing::Linear);
    let animation = CollectionAnimation::new(before, after, timing).unwrap();

    assert!(matches!(animation.members()[0], MemberAnimation::Collection(_)));
    let mid = animation.frame(50.0);
    let flat = mid.flatten();
    assert_eq!(flat.len(), 1);
    assert!(approx_vec(flat[0].0.transform_point3(Vec3::ZERO), vec3(0.0, 2.0, 0.0)));
}

#[test]
fn collection_transform_applies_to_members() {
    let before = Collection::default().with_member(square("a"));
    let mut after = before.clone();
    after.transform.scale = Vec3::splat(2.0);

    let animation = CollectionAnimation::new(before, after, Timing::new(100.0)).unwrap();
    let end = animation.frame(100.0);
    let (matrix, _) = end.flatten()[0];
    let corner = matrix.transform_point3(vec3(0.5, 0.5, 0.0));
    assert!(approx_vec(corner, vec3(1.0, 1.0, 0.0)));
}
