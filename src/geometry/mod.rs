//! Geometry Module
//!
//! Shape data carried by scene nodes and the pure functions that make two
//! shapes comparable for index-paired blending:
//!
//! - [`Polygon`]: filled ring plus hole rings
//! - [`Mesh`]: imported vertex/normal/uv/joint buffers
//! - [`resolver`]: ring resampling, winding and hole reconciliation

pub mod mesh;
pub mod polygon;
pub mod resolver;

pub use mesh::Mesh;
pub use polygon::Polygon;
pub use resolver::{equalize_holes, resolve_polygons, resolve_ring, trace};

use glam::Vec3;

/// Center of the axis-aligned bounds of `points`, or `None` when empty.
#[must_use]
pub fn bounds_center(points: &[Vec3]) -> Option<Vec3> {
    let (first, rest) = points.split_first()?;
    let (min, max) = rest
        .iter()
        .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
    Some((min + max) * 0.5)
}
