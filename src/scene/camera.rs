use glam::{Affine3A, Mat4};

use crate::animation::values::Interpolatable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionType {
    Perspective,
    Orthographic,
}

/// Camera projection parameters.
///
/// Placement comes from the owning node's transform; the camera itself only
/// carries the projection. Animating a camera blends `fov`, `aspect`,
/// `near`, `far` and `ortho_size`; the projection type switches over at the
/// end of the blend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub projection_type: ProjectionType,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub ortho_size: f32,
}

impl Camera {
    #[must_use]
    pub fn new_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            projection_type: ProjectionType::Perspective,
            fov,
            aspect,
            near,
            far,
            ortho_size: 10.0,
        }
    }

    #[must_use]
    pub fn new_orthographic(ortho_size: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            projection_type: ProjectionType::Orthographic,
            fov: 45.0,
            aspect,
            near,
            far,
            ortho_size,
        }
    }

    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection_type {
            // glam's perspective_rh targets a [0, 1] depth range
            ProjectionType::Perspective => {
                Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
            }
            ProjectionType::Orthographic => {
                let w = self.ortho_size * self.aspect;
                let h = self.ortho_size;
                Mat4::orthographic_rh(-w, w, -h, h, self.near, self.far)
            }
        }
    }

    /// View matrix = inverse of the camera's world matrix.
    #[must_use]
    pub fn view_matrix(world_transform: &Affine3A) -> Mat4 {
        Mat4::from(*world_transform).inverse()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new_perspective(45.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}

impl Interpolatable for Camera {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        Self {
            projection_type: if t >= 1.0 {
                end.projection_type
            } else {
                start.projection_type
            },
            fov: f32::interpolate_linear(start.fov, end.fov, t),
            aspect: f32::interpolate_linear(start.aspect, end.aspect, t),
            near: f32::interpolate_linear(start.near, end.near, t),
            far: f32::interpolate_linear(start.far, end.far, t),
            ortho_size: f32::interpolate_linear(start.ortho_size, end.ortho_size, t),
        }
    }
}
