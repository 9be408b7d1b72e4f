use std::time::Duration;

/// Accumulates host-supplied frame deltas into a sequencer time.
///
/// The engine has no clock of its own; the host feeds each frame's delta
/// and passes [`Playhead::elapsed_ms`] to `frame(t)`.
#[derive(Debug, Clone, Default)]
pub struct Playhead {
    /// Time since the last advance
    pub delta: Duration,
    /// Total accumulated time
    pub elapsed: Duration,
    /// Number of advances since the last reset
    pub frame_count: u64,
}

impl Playhead {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one host frame. Returns the new elapsed time in milliseconds.
    pub fn advance(&mut self, delta: Duration) -> f32 {
        self.delta = delta;
        self.elapsed = self.elapsed.saturating_add(delta);
        self.frame_count += 1;
        self.elapsed_ms()
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed.as_secs_f32() * 1000.0
    }

    #[must_use]
    pub fn dt_ms(&self) -> f32 {
        self.delta.as_secs_f32() * 1000.0
    }

    /// Jumps to `ms`; negative values clamp to zero and values too large
    /// for a `Duration` saturate.
    pub fn seek(&mut self, ms: f32) {
        self.elapsed = Duration::try_from_secs_f32(ms.max(0.0) / 1000.0).unwrap_or(Duration::MAX);
        self.delta = Duration::ZERO;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
