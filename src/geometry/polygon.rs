use std::f32::consts::TAU;

use glam::{Vec3, vec3};

use crate::animation::values::interpolate_slice;
use crate::geometry::bounds_center;
use crate::geometry::resolver::{dominant_axis, newell_normal, signed_area};

/// A filled point ring with optional holes.
///
/// Rings are implicitly closed: the last point connects back to the first
/// without being repeated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    pub points: Vec<Vec3>,
    pub holes: Vec<Vec<Vec3>>,
}

impl Polygon {
    #[must_use]
    pub fn new(points: Vec<Vec3>) -> Self {
        Self {
            points,
            holes: Vec::new(),
        }
    }

    /// Regular polygon in the XY plane, counter-clockwise, first vertex on +X.
    #[must_use]
    pub fn regular(sides: usize, radius: f32) -> Self {
        let points = (0..sides)
            .map(|i| {
                let angle = TAU * i as f32 / sides as f32;
                vec3(angle.cos() * radius, angle.sin() * radius, 0.0)
            })
            .collect();
        Self::new(points)
    }

    /// Axis-aligned rectangle in the XY plane centered on the origin,
    /// counter-clockwise.
    #[must_use]
    pub fn rectangle(width: f32, height: f32) -> Self {
        let (w, h) = (width * 0.5, height * 0.5);
        Self::new(vec![
            vec3(-w, -h, 0.0),
            vec3(w, -h, 0.0),
            vec3(w, h, 0.0),
            vec3(-w, h, 0.0),
        ])
    }

    #[must_use]
    pub fn with_hole(mut self, hole: Vec<Vec3>) -> Self {
        self.holes.push(hole);
        self
    }

    /// Geometric center of the filled ring (bounds center).
    #[must_use]
    pub fn center(&self) -> Vec3 {
        bounds_center(&self.points).unwrap_or(Vec3::ZERO)
    }

    /// Unnormalized Newell normal of the filled ring.
    #[must_use]
    pub fn normal(&self) -> Vec3 {
        newell_normal(&self.points)
    }

    /// Signed area of the filled ring projected onto its own dominant plane.
    #[must_use]
    pub fn signed_area(&self) -> f32 {
        signed_area(&self.points, dominant_axis(self.normal()))
    }

    /// Filled ring followed by every hole ring.
    pub fn rings(&self) -> impl Iterator<Item = &[Vec3]> {
        std::iter::once(self.points.as_slice()).chain(self.holes.iter().map(Vec::as_slice))
    }

    /// Point-by-point blend of two resolved polygons.
    #[must_use]
    pub fn interpolate(start: &Self, end: &Self, t: f32) -> Self {
        Self {
            points: interpolate_slice(&start.points, &end.points, t),
            holes: start
                .holes
                .iter()
                .zip(&end.holes)
                .map(|(a, b)| interpolate_slice(a, b, t))
                .collect(),
        }
    }
}
