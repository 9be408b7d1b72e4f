use glam::{Vec2, Vec3, Vec4};

/// A value that can be blended channel-by-channel between two endpoints.
///
/// `t` is the already-eased weight in `[0, 1]`; `0` yields `start` and `1`
/// yields `end`.
pub trait Interpolatable: Copy + Clone + Sized {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;
}

impl Interpolatable for f32 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl Interpolatable for Vec2 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

impl Interpolatable for Vec4 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

/// Blends two index-paired sequences.
///
/// Callers guarantee equal lengths; any surplus on the longer side is
/// ignored.
pub fn interpolate_slice<T: Interpolatable>(start: &[T], end: &[T], t: f32) -> Vec<T> {
    debug_assert_eq!(start.len(), end.len(), "index-paired blend on unequal lengths");
    start
        .iter()
        .zip(end)
        .map(|(&a, &b)| T::interpolate_linear(a, b, t))
        .collect()
}
