//! Chainable group operation wrapper.
//!
//! [`GroupHandle`] borrows a [`Stage`] mutably and queues operations on one
//! group fluently. The first failing operation is remembered and every
//! later one is skipped; [`GroupHandle::finish`] reports it.
//!
//! # Example
//!
//! ```rust,ignore
//! stage.group(key)
//!     .duration(500.0)
//!     .fade_in()
//!     .overlap_next()
//!     .move_by(Vec3::X * 2.0)
//!     .rotate(Vec3::Z * 90.0)
//!     .finish()?;
//! ```
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::must_use_candidate)]
use glam::{Vec3, Vec4};

use crate::animation::Easing;
use crate::errors::{MorphError, Result};
use crate::group::GroupKey;
use crate::group::ops::{GroupOp, OpTiming};
use crate::group::stage::Stage;
use crate::scene::collection::Collection;

/// Temporary mutable borrow of a stage group for chainable operations.
pub struct GroupHandle<'a> {
    stage: &'a mut Stage,
    key: GroupKey,
    timing: OpTiming,
    error: Option<MorphError>,
}

impl<'a> GroupHandle<'a> {
    #[inline]
    pub fn new(stage: &'a mut Stage, key: GroupKey) -> Self {
        Self {
            stage,
            key,
            timing: OpTiming::default(),
            error: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> GroupKey {
        self.key
    }

    // -- Timing (applies to every following operation) --

    /// Sets the duration, in milliseconds, of the following operations.
    #[inline]
    pub fn duration(mut self, ms: f32) -> Self {
        self.timing.duration = ms;
        self
    }

    #[inline]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.timing.easing = Some(easing);
        self
    }

    #[inline]
    pub fn backwards(mut self, backwards: bool) -> Self {
        self.timing.backwards = backwards;
        self
    }

    /// Makes the next operation overlap the one after it.
    #[inline]
    pub fn overlap_next(mut self) -> Self {
        self.timing.concurrent = true;
        self
    }

    // -- Operations (chainable) --

    fn run(mut self, op: GroupOp) -> Self {
        if self.error.is_none()
            && let Err(err) = self.stage.apply(self.key, op, self.timing)
        {
            self.error = Some(err);
        }
        self.timing.concurrent = false;
        self
    }

    pub fn fade_in(self) -> Self {
        self.run(GroupOp::FadeIn)
    }

    pub fn fade_out(self) -> Self {
        self.run(GroupOp::FadeOut)
    }

    pub fn move_by(self, delta: Vec3) -> Self {
        self.run(GroupOp::MoveBy(delta))
    }

    pub fn move_to(self, target: Vec3) -> Self {
        self.run(GroupOp::MoveTo(target))
    }

    pub fn scale_by(self, factor: f32) -> Self {
        self.run(GroupOp::ScaleBy { factor, pivot: None })
    }

    pub fn scale_about(self, factor: f32, pivot: Vec3) -> Self {
        self.run(GroupOp::ScaleBy {
            factor,
            pivot: Some(pivot),
        })
    }

    /// Rotates by per-axis degrees about the group's center.
    pub fn rotate(self, degrees: Vec3) -> Self {
        self.run(GroupOp::Rotate { degrees, pivot: None })
    }

    pub fn rotate_about(self, degrees: Vec3, pivot: Vec3) -> Self {
        self.run(GroupOp::Rotate {
            degrees,
            pivot: Some(pivot),
        })
    }

    pub fn recolor(self, color: Vec4) -> Self {
        self.run(GroupOp::Recolor(color))
    }

    pub fn transform_into(self, target: Collection) -> Self {
        self.run(GroupOp::TransformInto(target))
    }

    pub fn wait(self) -> Self {
        self.run(GroupOp::Wait)
    }

    /// Ends the chain, returning the first error encountered.
    pub fn finish(self) -> Result<()> {
        self.error.map_or(Ok(()), Err)
    }
}
