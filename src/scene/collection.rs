use glam::{Affine3A, Vec3, Vec4};

use crate::animation::AnimationKind;
use crate::geometry::bounds_center;
use crate::scene::node::TransformNode;
use crate::scene::transform::{AuxiliaryList, Transform, compose};

/// One slot of a [`Collection`].
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Node(TransformNode),
    Collection(Collection),
}

impl Member {
    #[must_use]
    pub fn kind(&self) -> AnimationKind {
        match self {
            Member::Node(node) => node.kind(),
            Member::Collection(_) => AnimationKind::Collection,
        }
    }

    /// Label used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Member::Node(node) => &node.name,
            Member::Collection(_) => "<collection>",
        }
    }

    /// Matrix placing this member in its collection's space.
    #[must_use]
    pub fn local_matrix(&self) -> Affine3A {
        match self {
            Member::Node(node) => node.local_matrix(),
            Member::Collection(collection) => collection.local_matrix(),
        }
    }

    /// Geometric center expressed in the owning collection's space.
    #[must_use]
    pub fn placed_center(&self) -> Vec3 {
        let center = match self {
            Member::Node(node) => node.center(),
            Member::Collection(collection) => collection.center(),
        };
        self.local_matrix().transform_point3(center)
    }

    /// Applies `f` to every node in this member, depth first.
    pub fn for_each_node_mut(&mut self, f: &mut impl FnMut(&mut TransformNode)) {
        match self {
            Member::Node(node) => f(node),
            Member::Collection(collection) => collection.for_each_node_mut(f),
        }
    }
}

impl From<TransformNode> for Member {
    fn from(node: TransformNode) -> Self {
        Member::Node(node)
    }
}

impl From<Collection> for Member {
    fn from(collection: Collection) -> Self {
        Member::Collection(collection)
    }
}

/// Ordered group of members animated as one unit.
///
/// A collection is a value: animations and group operations clone it and
/// mutate the copy, so previously returned frames never change.
///
/// Its own transform applies on top of every member's local matrix, about
/// the collection's center (the bounds center of its placed member
/// centers) unless an explicit rotation center is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    pub transform: Transform,
    pub auxiliary: AuxiliaryList,
    pub members: Vec<Member>,
}

impl Collection {
    #[must_use]
    pub fn new(members: Vec<Member>) -> Self {
        Self {
            members,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_member(mut self, member: impl Into<Member>) -> Self {
        self.members.push(member.into());
        self
    }

    pub fn push(&mut self, member: impl Into<Member>) {
        self.members.push(member.into());
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Center of the collection in its own local space.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        let centers: Vec<Vec3> = self.members.iter().map(Member::placed_center).collect();
        bounds_center(&centers).unwrap_or(Vec3::ZERO)
    }

    /// Center after the collection's own transform is applied.
    #[must_use]
    pub fn world_center(&self) -> Vec3 {
        self.local_matrix().transform_point3(self.center())
    }

    #[must_use]
    pub fn local_matrix(&self) -> Affine3A {
        compose(&self.transform, &self.auxiliary, self.center())
    }

    /// Every node paired with its model matrix, in member order.
    #[must_use]
    pub fn flatten(&self) -> Vec<(Affine3A, &TransformNode)> {
        let mut out = Vec::new();
        self.flatten_into(Affine3A::IDENTITY, &mut out);
        out
    }

    fn flatten_into<'a>(&'a self, parent: Affine3A, out: &mut Vec<(Affine3A, &'a TransformNode)>) {
        let world = parent * self.local_matrix();
        for member in &self.members {
            match member {
                Member::Node(node) => out.push((world * node.local_matrix(), node)),
                Member::Collection(nested) => nested.flatten_into(world, out),
            }
        }
    }

    pub fn for_each_node_mut(&mut self, f: &mut impl FnMut(&mut TransformNode)) {
        for member in &mut self.members {
            member.for_each_node_mut(f);
        }
    }

    /// Number of nodes at any depth.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.members
            .iter()
            .map(|member| match member {
                Member::Node(_) => 1,
                Member::Collection(nested) => nested.node_count(),
            })
            .sum()
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.for_each_node_mut(&mut |node| node.set_opacity(opacity));
    }

    pub fn set_color(&mut self, color: Vec4) {
        self.for_each_node_mut(&mut |node| node.set_color(color));
    }
}
