use glam::{Affine3A, EulerRot, Mat3, Quat, Vec3};
use smallvec::SmallVec;

use crate::animation::values::Interpolatable;

/// Position/rotation/scale state of a transformable entity.
///
/// Rotation is stored as per-axis degrees (XYZ order) so that blending two
/// transforms blends the authored angles directly; a 0° → 720° animation
/// spins twice instead of collapsing to the shortest arc.
///
/// `rotation_center` is the point rotation and scale happen about. When it
/// is `None` the owning entity's geometric center is used, computed at read
/// time from the current geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub rotation_center: Option<Vec3>,
}

/// A transform applied after the primary one, typically a rotation about a
/// pivot other than the entity's own center.
pub type AuxiliaryTransform = Transform;

/// Ordered auxiliary transforms; order is application order.
pub type AuxiliaryList = SmallVec<[AuxiliaryTransform; 2]>;

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
        rotation_center: None,
    };

    #[must_use]
    pub fn new() -> Self {
        Self::IDENTITY
    }

    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// A pure rotation about `pivot`.
    #[must_use]
    pub fn pivot_rotation(degrees: Vec3, pivot: Vec3) -> Self {
        Self {
            rotation: degrees,
            rotation_center: Some(pivot),
            ..Self::IDENTITY
        }
    }

    /// Rotation as a quaternion (XYZ order).
    #[must_use]
    pub fn rotation_quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x.to_radians(),
            self.rotation.y.to_radians(),
            self.rotation.z.to_radians(),
        )
    }

    /// Rotation center, falling back to `default_center`.
    #[inline]
    #[must_use]
    pub fn center_or(&self, default_center: Vec3) -> Vec3 {
        self.rotation_center.unwrap_or(default_center)
    }

    /// `T(position) · T(c) · R · S · T(-c)` where `c` is the rotation center.
    #[must_use]
    pub fn matrix(&self, default_center: Vec3) -> Affine3A {
        let center = self.center_or(default_center);
        Affine3A::from_translation(self.position + center)
            * Affine3A::from_quat(self.rotation_quat())
            * Affine3A::from_scale(self.scale)
            * Affine3A::from_translation(-center)
    }

    /// Whether this transform leaves every point where it is.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.position == Vec3::ZERO && self.rotation == Vec3::ZERO && self.scale == Vec3::ONE
    }

    /// LookAt rotation
    ///
    /// `target` and `up` are expressed in the parent coordinate system.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let forward = (target - self.position).normalize();

        if forward.cross(up).length_squared() < 1e-4 {
            return;
        }

        let right = forward.cross(up).normalize();
        let new_up = right.cross(forward).normalize();

        let rot_mat = Mat3::from_cols(right, new_up, -forward);
        let (x, y, z) = Quat::from_mat3(&rot_mat).to_euler(EulerRot::XYZ);
        self.rotation = Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees());
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpolatable for Transform {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        let rotation_center = match (start.rotation_center, end.rotation_center) {
            (Some(a), Some(b)) => Some(a.lerp(b, t)),
            (a, b) => a.or(b),
        };
        Self {
            position: start.position.lerp(end.position, t),
            rotation: start.rotation.lerp(end.rotation, t),
            scale: start.scale.lerp(end.scale, t),
            rotation_center,
        }
    }
}

/// Composes the primary transform with its auxiliary list.
///
/// `M = A_n · … · A_1 · P`; auxiliary transforms without an explicit center
/// rotate about the same default center as the primary one.
#[must_use]
pub fn compose(
    primary: &Transform,
    auxiliary: &[AuxiliaryTransform],
    default_center: Vec3,
) -> Affine3A {
    auxiliary
        .iter()
        .fold(primary.matrix(default_center), |matrix, aux| {
            aux.matrix(default_center) * matrix
        })
}

/// Pads the shorter auxiliary list with identity transforms.
///
/// A padding entry borrows the rotation center of the entry it pairs with,
/// so blending it in is a pure rotation about that pivot.
pub fn pad_auxiliary(before: &mut AuxiliaryList, after: &mut AuxiliaryList) {
    let (short, long) = if before.len() < after.len() {
        (before, &*after)
    } else {
        (after, &*before)
    };
    for paired in &long[short.len()..] {
        short.push(Transform {
            rotation_center: paired.rotation_center,
            ..Transform::IDENTITY
        });
    }
}

/// Replaces every unset rotation center with `center`.
///
/// Resolved geometry is resampled, so its bounds center can drift from the
/// authored one. Pinning the authored center keeps the blend exact at both
/// endpoints and moves the pivot smoothly between two different centers.
pub fn pin_centers(transform: &mut Transform, auxiliary: &mut [AuxiliaryTransform], center: Vec3) {
    for t in std::iter::once(transform).chain(auxiliary.iter_mut()) {
        t.rotation_center.get_or_insert(center);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn padding_borrows_pivot() {
        let pivot = Vec3::new(3.0, 0.0, 0.0);
        let mut before: AuxiliaryList = SmallVec::new();
        let mut after: AuxiliaryList = smallvec![Transform::pivot_rotation(Vec3::Z * 90.0, pivot)];
        pad_auxiliary(&mut before, &mut after);

        assert_eq!(before.len(), 1);
        assert!(before[0].is_identity());
        assert_eq!(before[0].rotation_center, Some(pivot));
    }

    #[test]
    fn pinning_keeps_explicit_centers() {
        let mut primary = Transform::new();
        let mut aux = [Transform::pivot_rotation(Vec3::Z, Vec3::X), Transform::new()];
        pin_centers(&mut primary, &mut aux, Vec3::Y);

        assert_eq!(primary.rotation_center, Some(Vec3::Y));
        assert_eq!(aux[0].rotation_center, Some(Vec3::X));
        assert_eq!(aux[1].rotation_center, Some(Vec3::Y));
    }

    #[test]
    fn rotation_about_center_keeps_center_fixed() {
        let center = Vec3::new(1.0, 1.0, 0.0);
        let mut t = Transform::new();
        t.rotation = Vec3::new(0.0, 0.0, 90.0);
        let moved = t.matrix(center).transform_point3(center);
        assert!(moved.distance(center) < 1e-5);
    }
}
