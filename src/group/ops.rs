use glam::{Vec3, Vec4};

use crate::animation::{Easing, Timing};
use crate::scene::collection::Collection;
use crate::scene::transform::Transform;

/// Bulk operation applied to a group and every leaf below it.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupOp {
    FadeIn,
    FadeOut,
    MoveBy(Vec3),
    /// Moves the group's center to the given point.
    MoveTo(Vec3),
    /// Uniform scale. Without a pivot a leaf scales about its own center; a
    /// branch scales every leaf about the branch center.
    ScaleBy { factor: f32, pivot: Option<Vec3> },
    /// Per-axis degrees. The pivot rule is the same as for `ScaleBy`.
    Rotate { degrees: Vec3, pivot: Option<Vec3> },
    Recolor(Vec4),
    /// Animates into the given collection. For a branch the target must
    /// hold one nested collection per child, in child order.
    TransformInto(Collection),
    /// Holds the current state.
    Wait,
}

/// Timing of a group operation.
#[derive(Debug, Clone, Copy)]
pub struct OpTiming {
    /// Milliseconds; zero snaps the state without queuing anything.
    pub duration: f32,
    /// Whether the next operation on the same groups overlaps this one.
    pub concurrent: bool,
    /// Falls back to the stage's default easing.
    pub easing: Option<Easing>,
    pub backwards: bool,
}

impl OpTiming {
    #[must_use]
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            concurrent: false,
            easing: None,
            backwards: false,
        }
    }

    #[must_use]
    pub fn concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    #[must_use]
    pub fn reversed(mut self) -> Self {
        self.backwards = true;
        self
    }

    pub(crate) fn to_timing(self, default_easing: Easing) -> Timing {
        Timing {
            duration: self.duration,
            backwards: self.backwards,
            easing: self.easing.unwrap_or(default_easing),
        }
    }
}

impl Default for OpTiming {
    fn default() -> Self {
        Self::new(1000.0)
    }
}

/// Translates a collection in its parent space.
///
/// The offset lands on the outermost transform so that earlier pivot
/// rotations do not rotate it.
fn translate(collection: &mut Collection, delta: Vec3) {
    match collection.auxiliary.last_mut() {
        Some(outer) => outer.position += delta,
        None => collection.transform.position += delta,
    }
}

/// Start and end states of `op` applied to one leaf collection.
///
/// Pivots must already be resolved: `MoveTo` is measured from the leaf's
/// own center here.
pub(crate) fn leaf_states(current: &Collection, op: &GroupOp) -> (Collection, Collection) {
    let mut before = current.clone();
    let mut after = current.clone();

    match op {
        GroupOp::FadeIn => {
            before.set_opacity(0.0);
            after.set_opacity(1.0);
        }
        GroupOp::FadeOut => after.set_opacity(0.0),
        GroupOp::MoveBy(delta) => translate(&mut after, *delta),
        GroupOp::MoveTo(target) => translate(&mut after, *target - current.world_center()),
        GroupOp::ScaleBy { factor, pivot: None } => after.transform.scale *= *factor,
        GroupOp::ScaleBy {
            factor,
            pivot: Some(pivot),
        } => after.auxiliary.push(Transform {
            scale: Vec3::splat(*factor),
            rotation_center: Some(*pivot),
            ..Transform::IDENTITY
        }),
        GroupOp::Rotate { degrees, pivot: None } => after.transform.rotation += *degrees,
        GroupOp::Rotate {
            degrees,
            pivot: Some(pivot),
        } => after.auxiliary.push(Transform::pivot_rotation(*degrees, *pivot)),
        GroupOp::Recolor(color) => after.set_color(*color),
        GroupOp::TransformInto(target) => after = target.clone(),
        GroupOp::Wait => {}
    }

    (before, after)
}
