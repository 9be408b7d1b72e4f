use glam::{Affine3A, Vec3, Vec4};

use crate::animation::AnimationKind;
use crate::geometry::{Mesh, Polygon};
use crate::scene::NodeKey;
use crate::scene::camera::Camera;
use crate::scene::material::Material;
use crate::scene::transform::{AuxiliaryList, AuxiliaryTransform, Transform, compose};

/// Geometry (or projection) carried by a node.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Shape {
    /// Transform-only node.
    #[default]
    Empty,
    Polygon(Polygon),
    Mesh(Mesh),
    Camera(Camera),
}

impl Shape {
    /// Animation kind this shape animates as.
    #[must_use]
    pub fn kind(&self) -> AnimationKind {
        match self {
            Shape::Empty => AnimationKind::Transformable,
            Shape::Polygon(_) => AnimationKind::Polygon,
            Shape::Mesh(_) => AnimationKind::Mesh,
            Shape::Camera(_) => AnimationKind::Camera,
        }
    }

    /// Geometric center in local space; the origin for shapes without
    /// vertices.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        match self {
            Shape::Polygon(polygon) => polygon.center(),
            Shape::Mesh(mesh) => mesh.center(),
            Shape::Empty | Shape::Camera(_) => Vec3::ZERO,
        }
    }
}

/// A transformable scene entity.
///
/// # Hierarchy
///
/// `parent` is a non-owning key into a [`Scene`](crate::scene::Scene)
/// arena. It is only meaningful while the node lives in that arena;
/// [`Scene::snapshot`](crate::scene::Scene::snapshot) bakes the parent chain
/// into the auxiliary list and clears it, so nodes stored in a
/// [`Collection`](crate::scene::Collection) are self-contained values.
///
/// # Transform
///
/// The local matrix is `A_n · … · A_1 · P`, where `P` is the primary
/// transform about the shape's center (or the explicit rotation center) and
/// `A_i` are the auxiliary transforms in application order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformNode {
    pub name: String,
    pub transform: Transform,
    pub auxiliary: AuxiliaryList,
    pub(crate) parent: Option<NodeKey>,
    pub material: Option<Material>,
    pub shape: Shape,
}

impl TransformNode {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn polygon(name: impl Into<String>, polygon: Polygon) -> Self {
        Self::new(name).with_shape(Shape::Polygon(polygon))
    }

    #[must_use]
    pub fn mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self::new(name).with_shape(Shape::Mesh(mesh))
    }

    #[must_use]
    pub fn camera(name: impl Into<String>, camera: Camera) -> Self {
        Self::new(name).with_shape(Shape::Camera(camera))
    }

    #[must_use]
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    /// Turns the primary transform so local -Z faces `target`.
    #[must_use]
    pub fn looking_at(mut self, target: Vec3, up: Vec3) -> Self {
        self.transform.look_at(target, up);
        self
    }

    #[must_use]
    pub fn with_auxiliary(mut self, auxiliary: AuxiliaryTransform) -> Self {
        self.auxiliary.push(auxiliary);
        self
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> AnimationKind {
        self.shape.kind()
    }

    /// Local-space geometric center.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Vec3 {
        self.shape.center()
    }

    /// Primary transform composed with the auxiliary list.
    #[must_use]
    pub fn local_matrix(&self) -> Affine3A {
        compose(&self.transform, &self.auxiliary, self.center())
    }

    /// Sets opacity, creating a default material when none is present.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.material.get_or_insert_with(Material::default).opacity = opacity;
    }

    /// Sets base color, creating a default material when none is present.
    pub fn set_color(&mut self, color: Vec4) {
        self.material.get_or_insert_with(Material::default).color = color;
    }

    /// Current opacity; nodes without a material are fully opaque.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.material.map_or(1.0, |m| m.opacity)
    }
}
