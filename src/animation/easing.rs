use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// Signature of a user-supplied easing curve: `(start, end, x) -> value`.
pub type EasingFn = fn(f32, f32, f32) -> f32;

/// Blend curve mapping normalized time to a value between two endpoints.
///
/// The three built-in curves are swappable strategies; `Custom` accepts any
/// function with the same `(a, b, x)` shape. Custom curves are not
/// serialized.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Half-cosine ease in and out.
    #[default]
    EaseInOut,
    Linear,
    /// `x³`, slow start.
    Cubic,
    #[serde(skip)]
    Custom(EasingFn),
}

impl Easing {
    /// Evaluates the curve between `a` and `b` at normalized time `x`.
    #[inline]
    #[must_use]
    pub fn apply(self, a: f32, b: f32, x: f32) -> f32 {
        match self {
            Easing::EaseInOut => ease_in_out(a, b, x),
            Easing::Linear => lerp(a, b, x),
            Easing::Cubic => cubic(a, b, x),
            Easing::Custom(f) => f(a, b, x),
        }
    }
}

#[inline]
#[must_use]
pub fn lerp(a: f32, b: f32, x: f32) -> f32 {
    a + (b - a) * x
}

#[inline]
#[must_use]
pub fn ease_in_out(a: f32, b: f32, x: f32) -> f32 {
    // Endpoints are returned exactly; cos(PI) is not bit-exact -1
    if x <= 0.0 {
        return a;
    }
    if x >= 1.0 {
        return b;
    }
    lerp(a, b, 0.5 * (1.0 - (PI * x).cos()))
}

#[inline]
#[must_use]
pub fn cubic(a: f32, b: f32, x: f32) -> f32 {
    lerp(a, b, x * x * x)
}
