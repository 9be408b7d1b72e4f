//! Engine settings.
//!
//! [`MorphSettings`] groups the tunable constants of the resolver, the frame
//! cache and the animation defaults. Every field has a default, so a JSON
//! file only needs to list what it overrides:
//!
//! ```json
//! { "density_floor": 160, "default_easing": "Linear" }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::animation::Easing;
use crate::errors::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphSettings {
    /// Minimum number of points a resolved ring is resampled to.
    pub density_floor: usize,
    /// Divisor applied to the longer ring's length before flooring.
    pub density_divisor: usize,
    /// Half-width of the nearest-time window used by the frame cache.
    pub cache_tolerance_ms: f32,
    /// Upper bound on frames computed in parallel per warm-up batch.
    pub max_warmup_batch: usize,
    /// Easing used by group operations that do not specify one.
    pub default_easing: Easing,
}

impl Default for MorphSettings {
    fn default() -> Self {
        Self {
            density_floor: 100,
            density_divisor: 3,
            cache_tolerance_ms: 50.0,
            max_warmup_batch: 2,
            default_easing: Easing::EaseInOut,
        }
    }
}

impl MorphSettings {
    /// Parses settings from JSON text. Missing fields keep their defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(text)?;
        log::debug!("Loaded morph settings: {settings:?}");
        Ok(settings)
    }

    /// Reads and parses a JSON settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Number of points both rings are resampled to.
    ///
    /// `max(max(before, after) / density_divisor, density_floor)`, integer
    /// division. A zero divisor is treated as 1.
    #[must_use]
    pub fn target_point_count(&self, before_len: usize, after_len: usize) -> usize {
        let longest = before_len.max(after_len);
        (longest / self.density_divisor.max(1)).max(self.density_floor)
    }

    /// Frames computed per warm-up batch on this machine.
    #[must_use]
    pub fn warmup_batch_size(&self) -> usize {
        let available = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
        available.min(self.max_warmup_batch).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let settings = MorphSettings::from_json_str(r#"{ "density_floor": 12 }"#).unwrap();
        assert_eq!(settings.density_floor, 12);
        assert_eq!(settings.density_divisor, 3);
        assert!((settings.cache_tolerance_ms - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn target_count_floors_at_density() {
        let settings = MorphSettings::default();
        assert_eq!(settings.target_point_count(4, 7), 100);
        assert_eq!(settings.target_point_count(600, 30), 200);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(MorphSettings::from_json_str("{ density_floor: ").is_err());
    }
}
