//! Sequencer Tests
//!
//! Tests for:
//! - Sequential and concurrent appends (merge and overflow split)
//! - Duration bookkeeping
//! - frame(t) lookup, clamping and the empty-queue fallback
//! - Listeners and the one-shot finished notification
//! - Frame cache warm-up and nearest-time lookup

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Vec3, Vec4, vec3};

use morphis::animation::{AnimationSequencer, CollectionAnimation, Easing, SequencerEvent, Timing};
use morphis::geometry::Polygon;
use morphis::scene::{Collection, Material, Member, TransformNode};

const EPSILON: f32 = 1e-3;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn at(x: f32) -> Collection {
    Collection::default().with_member(
        TransformNode::polygon("dot", Polygon::rectangle(1.0, 1.0))
            .with_material(Material::new(Vec4::ONE))
            .with_position(vec3(x, 0.0, 0.0)),
    )
}

fn move_anim(from: f32, to: f32, duration: f32) -> CollectionAnimation {
    let timing = Timing::new(duration).with_easing(Easing::Linear);
    CollectionAnimation::new(at(from), at(to), timing).unwrap()
}

fn x_of(frame: &Collection) -> f32 {
    match &frame.members[0] {
        Member::Node(node) => node.transform.position.x,
        Member::Collection(_) => panic!("Expected a node member"),
    }
}

fn durations(sequencer: &AnimationSequencer) -> Vec<f32> {
    sequencer.entries().iter().map(CollectionAnimation::duration).collect()
}

// ============================================================================
// Appends & Duration
// ============================================================================

#[test]
fn sequential_appends_play_back_to_back() {
    let mut sequencer = AnimationSequencer::default();
    sequencer.append(move_anim(0.0, 1.0, 1000.0), false).unwrap();
    sequencer.append(move_anim(1.0, 3.0, 500.0), false).unwrap();

    assert_eq!(sequencer.len(), 2);
    assert!(approx(sequencer.duration(), 1500.0));
    assert!(approx(x_of(&sequencer.frame(500.0)), 0.5));
    assert!(approx(x_of(&sequencer.frame(1250.0)), 2.0));
}

#[test]
fn concurrent_overflow_splits_into_follow_up() {
    let mut sequencer = AnimationSequencer::default();
    sequencer.append(move_anim(0.0, 1.0, 1000.0), false).unwrap();
    sequencer.append(move_anim(1.0, 2.0, 500.0), true).unwrap();
    sequencer.append(move_anim(2.0, 14.0, 1200.0), false).unwrap();

    assert_eq!(durations(&sequencer), vec![1000.0, 500.0, 700.0]);
    let total: f32 = durations(&sequencer).iter().sum();
    assert!(approx(sequencer.duration(), total));
}

#[test]
fn concurrent_merge_of_shorter_animation_adds_no_entry() {
    let mut sequencer = AnimationSequencer::default();
    sequencer.append(move_anim(0.0, 1.0, 1000.0), true).unwrap();
    sequencer.append(move_anim(0.0, 5.0, 400.0), false).unwrap();

    assert_eq!(durations(&sequencer), vec![1000.0]);
    // The merged entry now ends where the second animation ended
    assert!(approx(x_of(&sequencer.frame(1000.0)), 5.0));
}

#[test]
fn merged_entry_ends_at_overlapping_frame() {
    let mut sequencer = AnimationSequencer::default();
    sequencer.append(move_anim(0.0, 1.0, 500.0), true).unwrap();
    sequencer.append(move_anim(0.0, 10.0, 1000.0), false).unwrap();

    assert_eq!(durations(&sequencer), vec![500.0, 500.0]);
    // First entry ends at the second animation's halfway state
    assert!(approx(x_of(&sequencer.entries()[0].frame(500.0)), 5.0));
    assert!(approx(x_of(&sequencer.frame(1000.0)), 10.0));
}

#[test]
fn duration_is_sum_after_mixed_appends() {
    let mut sequencer = AnimationSequencer::default();
    let plan = [
        (300.0, true),
        (800.0, false),
        (200.0, true),
        (100.0, true),
        (900.0, false),
        (50.0, false),
    ];
    for (duration, concurrent) in plan {
        sequencer.append(move_anim(0.0, 1.0, duration), concurrent).unwrap();
        let total: f32 = durations(&sequencer).iter().sum();
        assert!(approx(sequencer.duration(), total));
    }
}

// ============================================================================
// frame(t)
// ============================================================================

#[test]
fn empty_sequencer_returns_fallback() {
    let sequencer = AnimationSequencer::new(at(7.0));
    assert!(sequencer.done(0.0));
    assert!(approx(x_of(&sequencer.frame(123.0)), 7.0));
}

#[test]
fn frame_clamps_beyond_total() {
    let mut sequencer = AnimationSequencer::default();
    sequencer.append(move_anim(0.0, 4.0, 200.0), false).unwrap();
    assert!(approx(x_of(&sequencer.frame(10_000.0)), 4.0));
    assert!(approx(x_of(&sequencer.frame(-50.0)), 0.0));
    assert!(sequencer.done(200.0));
    assert!(!sequencer.done(199.0));
}

#[test]
fn fallback_follows_last_append() {
    let mut sequencer = AnimationSequencer::default();
    sequencer.append(move_anim(0.0, 4.0, 200.0), false).unwrap();
    assert!(approx(x_of(sequencer.fallback()), 4.0));
}

#[test]
fn replaced_fallback_shows_past_the_end() {
    let mut sequencer = AnimationSequencer::default();
    sequencer.append(move_anim(0.0, 4.0, 200.0), false).unwrap();
    sequencer.set_fallback(at(9.0));

    assert!(approx(x_of(&sequencer.frame(100.0)), 2.0));
    assert!(approx(x_of(&sequencer.frame(200.0)), 9.0));
    assert!(approx(x_of(&sequencer.frame(f32::MAX)), 9.0));
}

#[test]
fn frames_are_fresh_values() {
    let mut sequencer = AnimationSequencer::default();
    sequencer.append(move_anim(0.0, 4.0, 200.0), false).unwrap();
    let mut first = sequencer.frame(100.0);
    first.transform.position = Vec3::splat(99.0);
    assert!(approx(sequencer.frame(100.0).transform.position.x, 0.0));
}

// ============================================================================
// Listeners
// ============================================================================

#[test]
fn listeners_receive_appends_and_one_finish() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut sequencer = AnimationSequencer::default();
    let sink = Rc::clone(&log);
    let key = sequencer.on_event(move |event| {
        let entry = match event {
            SequencerEvent::Appended { concurrent, .. } => format!("appended:{concurrent}"),
            SequencerEvent::Finished { .. } => "finished".to_owned(),
        };
        sink.borrow_mut().push(entry);
    });

    sequencer.append(move_anim(0.0, 1.0, 100.0), true).unwrap();
    let _ = sequencer.advance(50.0);
    let _ = sequencer.advance(100.0);
    let _ = sequencer.advance(150.0);

    assert_eq!(*log.borrow(), vec!["appended:true", "finished"]);

    assert!(sequencer.remove_listener(key));
    sequencer.append(move_anim(1.0, 2.0, 100.0), false).unwrap();
    assert_eq!(log.borrow().len(), 2);
}

// ============================================================================
// Frame Cache
// ============================================================================

#[test]
fn warm_cache_serves_nearby_times() {
    let mut sequencer = AnimationSequencer::default();
    sequencer.append(move_anim(0.0, 10.0, 1000.0), false).unwrap();
    sequencer.warm_cache(100.0);

    // 530 ms is served by the 500 ms frame
    assert!(approx(x_of(&sequencer.cached_frame(530.0)), 5.0));
}

#[test]
fn append_invalidates_cache() {
    let mut sequencer = AnimationSequencer::default();
    sequencer.append(move_anim(0.0, 10.0, 1000.0), false).unwrap();
    sequencer.warm_cache(100.0);
    sequencer.append(move_anim(10.0, 0.0, 1000.0), false).unwrap();

    // A stale cache would answer with the 1000 ms frame (x = 10)
    assert!(approx(x_of(&sequencer.cached_frame(1040.0)), 9.6));
}
