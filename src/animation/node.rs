//! [`Animatable`] for single nodes: shape pairing and channel blending.

use crate::animation::interpolated::Animatable;
use crate::animation::values::Interpolatable;
use crate::config::MorphSettings;
use crate::errors::{MorphError, Result};
use crate::geometry::{Mesh, Polygon, resolve_polygons};
use crate::scene::camera::Camera;
use crate::scene::material::Material;
use crate::scene::node::{Shape, TransformNode};
use crate::scene::transform::{AuxiliaryList, Transform, pad_auxiliary, pin_centers};

/// Pairs two shapes, resolving polygons and checking mesh topology.
fn reconcile_shapes(
    name: &str,
    before: &Shape,
    after: &Shape,
    settings: &MorphSettings,
) -> Result<(Shape, Shape)> {
    match (before, after) {
        (Shape::Polygon(b), Shape::Polygon(a)) => {
            let (b, a) = resolve_polygons(b, a, settings)?;
            Ok((Shape::Polygon(b), Shape::Polygon(a)))
        }
        (Shape::Mesh(b), Shape::Mesh(a)) => {
            if b.vertex_count() != a.vertex_count() {
                log::error!(
                    "Mesh '{name}' cannot animate: {} vs {} vertices",
                    b.vertex_count(),
                    a.vertex_count()
                );
                return Err(MorphError::MeshTopologyMismatch {
                    name: name.to_owned(),
                    before: b.vertex_count(),
                    after: a.vertex_count(),
                });
            }
            Ok((before.clone(), after.clone()))
        }
        (Shape::Camera(_), Shape::Camera(_)) | (Shape::Empty, Shape::Empty) => {
            Ok((before.clone(), after.clone()))
        }
        (Shape::Polygon(_) | Shape::Mesh(_) | Shape::Camera(_) | Shape::Empty, _) => {
            log::error!(
                "Member '{name}': {:?} cannot animate into {:?}",
                before.kind(),
                after.kind()
            );
            Err(MorphError::IncompatibleMembers {
                name: name.to_owned(),
                before: before.kind(),
                after: after.kind(),
            })
        }
    }
}

fn blend_shapes(start: &Shape, end: &Shape, weight: f32) -> Shape {
    match (start, end) {
        (Shape::Polygon(a), Shape::Polygon(b)) => {
            Shape::Polygon(Polygon::interpolate(a, b, weight))
        }
        (Shape::Mesh(a), Shape::Mesh(b)) => Shape::Mesh(Mesh::interpolate(a, b, weight)),
        (Shape::Camera(a), Shape::Camera(b)) => {
            Shape::Camera(Camera::interpolate_linear(*a, *b, weight))
        }
        // Reconciled pairs never mix kinds
        _ if weight >= 1.0 => end.clone(),
        _ => start.clone(),
    }
}

/// Zips two padded auxiliary lists.
pub(crate) fn blend_auxiliary(
    start: &AuxiliaryList,
    end: &AuxiliaryList,
    weight: f32,
) -> AuxiliaryList {
    start
        .iter()
        .zip(end)
        .map(|(a, b)| Transform::interpolate_linear(*a, *b, weight))
        .collect()
}

impl Animatable for TransformNode {
    fn reconcile(before: &Self, after: &Self, settings: &MorphSettings) -> Result<(Self, Self)> {
        let (before_shape, after_shape) =
            reconcile_shapes(&before.name, &before.shape, &after.shape, settings)?;

        let mut resolved_before = before.clone();
        let mut resolved_after = after.clone();

        // Centers come from the authored shapes, not the resampled ones
        pin_centers(
            &mut resolved_before.transform,
            &mut resolved_before.auxiliary,
            before.center(),
        );
        pin_centers(&mut resolved_after.transform, &mut resolved_after.auxiliary, after.center());
        pad_auxiliary(&mut resolved_before.auxiliary, &mut resolved_after.auxiliary);

        resolved_before.shape = before_shape;
        resolved_after.shape = after_shape;

        match (before.material, after.material) {
            (Some(b), Some(a)) if !b.shading.same_model(&a.shading) => {
                log::warn!(
                    "Member '{}' switches shading model at the end of its animation",
                    before.name
                );
            }
            (None, Some(a)) => resolved_before.material = Some(a),
            (Some(b), None) => resolved_after.material = Some(b),
            _ => {}
        }

        resolved_before.parent = None;
        resolved_after.parent = None;
        Ok((resolved_before, resolved_after))
    }

    fn blend(start: &Self, end: &Self, weight: f32) -> Self {
        let discrete = if weight >= 1.0 { end } else { start };
        let material = match (start.material, end.material) {
            (Some(a), Some(b)) => Some(Material::interpolate_linear(a, b, weight)),
            _ => discrete.material,
        };

        Self {
            name: discrete.name.clone(),
            transform: Transform::interpolate_linear(start.transform, end.transform, weight),
            auxiliary: blend_auxiliary(&start.auxiliary, &end.auxiliary, weight),
            parent: None,
            material,
            shape: blend_shapes(&start.shape, &end.shape, weight),
        }
    }
}
