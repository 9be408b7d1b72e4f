use crate::animation::easing::Easing;
use crate::config::MorphSettings;
use crate::errors::Result;

/// Per-kind behaviour behind [`InterpolatedAnimation`].
pub trait Animatable: Clone {
    /// Makes two snapshots comparable for index-paired blending.
    ///
    /// Returns copies; the inputs are never modified. Pairs that cannot be
    /// made comparable are an error.
    fn reconcile(before: &Self, after: &Self, settings: &MorphSettings) -> Result<(Self, Self)>;

    /// Blends two reconciled snapshots. `weight` is already eased.
    fn blend(start: &Self, end: &Self, weight: f32) -> Self;
}

/// Duration, direction and easing of one animation.
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    /// Milliseconds
    pub duration: f32,
    pub backwards: bool,
    pub easing: Easing,
}

impl Timing {
    #[must_use]
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            backwards: false,
            easing: Easing::default(),
        }
    }

    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    #[must_use]
    pub fn reversed(mut self) -> Self {
        self.backwards = !self.backwards;
        self
    }

    /// `t / duration` clamped to `[0, 1]`. Zero or negative durations are
    /// always complete.
    #[inline]
    #[must_use]
    pub fn normalized(&self, t: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (t / self.duration).clamp(0.0, 1.0)
    }

    #[inline]
    #[must_use]
    pub fn progress(&self, t: f32) -> f32 {
        self.easing.apply(0.0, 1.0, self.normalized(t))
    }

    /// Eased blend weight; runs from 1 to 0 when playing backwards.
    #[inline]
    #[must_use]
    pub fn weight(&self, t: f32) -> f32 {
        let x = self.normalized(t);
        let x = if self.backwards { 1.0 - x } else { x };
        self.easing.apply(0.0, 1.0, x)
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new(1000.0)
    }
}

/// Time-parameterized blend between two snapshots of an animatable value.
///
/// The resolved pair is computed once at construction; `frame(t)` only
/// reads it, so sampling is pure and can happen in any order.
#[derive(Debug, Clone)]
pub struct InterpolatedAnimation<T> {
    before: T,
    after: T,
    resolved_before: T,
    resolved_after: T,
    timing: Timing,
}

impl<T: Animatable> InterpolatedAnimation<T> {
    pub fn new(before: T, after: T, timing: Timing) -> Result<Self> {
        Self::with_settings(before, after, timing, &MorphSettings::default())
    }

    pub fn with_settings(
        before: T,
        after: T,
        timing: Timing,
        settings: &MorphSettings,
    ) -> Result<Self> {
        let (resolved_before, resolved_after) = T::reconcile(&before, &after, settings)?;
        Ok(Self {
            before,
            after,
            resolved_before,
            resolved_after,
            timing,
        })
    }

    #[inline]
    #[must_use]
    pub fn before(&self) -> &T {
        &self.before
    }

    #[inline]
    #[must_use]
    pub fn after(&self) -> &T {
        &self.after
    }

    #[inline]
    #[must_use]
    pub fn resolved_before(&self) -> &T {
        &self.resolved_before
    }

    #[inline]
    #[must_use]
    pub fn resolved_after(&self) -> &T {
        &self.resolved_after
    }

    #[inline]
    #[must_use]
    pub fn timing(&self) -> Timing {
        self.timing
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.timing.duration
    }

    #[must_use]
    pub fn progress(&self, t: f32) -> f32 {
        self.timing.progress(t)
    }

    #[must_use]
    pub fn done(&self, t: f32) -> bool {
        self.progress(t) >= 1.0
    }

    #[must_use]
    pub fn weight(&self, t: f32) -> f32 {
        self.timing.weight(t)
    }

    /// Snapshot at `t` milliseconds.
    #[must_use]
    pub fn frame(&self, t: f32) -> T {
        T::blend(&self.resolved_before, &self.resolved_after, self.weight(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_duration_is_complete() {
        let timing = Timing::new(0.0);
        assert!((timing.progress(0.0) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn backwards_weight_runs_down() {
        let timing = Timing::new(100.0).with_easing(Easing::Linear).reversed();
        assert!((timing.weight(0.0) - 1.0).abs() < 1e-6);
        assert!((timing.weight(25.0) - 0.75).abs() < 1e-6);
        assert!(timing.weight(100.0).abs() < 1e-6);
        // Progress still counts up
        assert!((timing.progress(100.0) - 1.0).abs() < 1e-6);
    }
}
