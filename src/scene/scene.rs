use glam::Affine3A;
use slotmap::{SecondaryMap, SlotMap};

use crate::scene::NodeKey;
use crate::scene::collection::{Collection, Member};
use crate::scene::node::TransformNode;
use crate::scene::transform::Transform;

/// Authoring arena for live, parented nodes.
///
/// Nodes reference their parent by [`NodeKey`]; the children lists live in
/// a side table so that a [`TransformNode`] stays a plain value. Animations
/// never see the arena: [`Scene::snapshot`] bakes the hierarchy into a
/// self-contained [`Collection`].
#[derive(Debug, Default)]
pub struct Scene {
    nodes: SlotMap<NodeKey, TransformNode>,
    children: SecondaryMap<NodeKey, Vec<NodeKey>>,
    root_nodes: Vec<NodeKey>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node at the root level.
    pub fn add_node(&mut self, mut node: TransformNode) -> NodeKey {
        node.parent = None;
        let key = self.nodes.insert(node);
        self.children.insert(key, Vec::new());
        self.root_nodes.push(key);
        key
    }

    /// Adds a node under `parent`. A stale parent key adds it at the root.
    pub fn add_to_parent(&mut self, node: TransformNode, parent: NodeKey) -> NodeKey {
        let key = self.add_node(node);
        self.attach(key, parent);
        key
    }

    /// Removes a node and its whole subtree.
    pub fn remove_node(&mut self, key: NodeKey) {
        let Some(children) = self.children.remove(key) else {
            return;
        };
        for child in children {
            self.remove_node(child);
        }

        match self.nodes.get(key).and_then(|n| n.parent) {
            Some(parent) => {
                if let Some(siblings) = self.children.get_mut(parent) {
                    siblings.retain(|&k| k != key);
                }
            }
            None => self.root_nodes.retain(|&k| k != key),
        }

        self.nodes.remove(key);
    }

    /// Re-parents `child` under `parent`.
    ///
    /// Attaching a node to itself or to one of its own descendants would
    /// create a cycle and is ignored.
    pub fn attach(&mut self, child: NodeKey, parent: NodeKey) {
        if !self.nodes.contains_key(child) {
            log::warn!("Cannot attach a node that is not in the scene");
            return;
        }
        if !self.nodes.contains_key(parent) {
            log::error!("Parent node not found during attach");
            return;
        }
        if self.ancestors(parent).any(|k| k == child) || child == parent {
            log::warn!("Cannot attach a node under itself or its own descendant");
            return;
        }

        self.detach(child);
        self.root_nodes.retain(|&k| k != child);

        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
    }

    /// Moves `child` back to the root level.
    pub fn detach(&mut self, child: NodeKey) {
        let Some(node) = self.nodes.get_mut(child) else {
            return;
        };
        if let Some(old) = node.parent.take() {
            if let Some(siblings) = self.children.get_mut(old) {
                siblings.retain(|&k| k != child);
            }
            self.root_nodes.push(child);
        }
    }

    #[must_use]
    pub fn get_node(&self, key: NodeKey) -> Option<&TransformNode> {
        self.nodes.get(key)
    }

    #[must_use]
    pub fn get_node_mut(&mut self, key: NodeKey) -> Option<&mut TransformNode> {
        self.nodes.get_mut(key)
    }

    #[must_use]
    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.children.get(key).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn root_nodes(&self) -> &[NodeKey] {
        &self.root_nodes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parent keys from the nearest ancestor up to the root.
    pub fn ancestors(&self, key: NodeKey) -> impl Iterator<Item = NodeKey> + '_ {
        std::iter::successors(self.nodes.get(key).and_then(|n| n.parent), move |&k| {
            self.nodes.get(k).and_then(|n| n.parent)
        })
    }

    /// World matrix: every ancestor's local matrix composed over the node's.
    #[must_use]
    pub fn world_matrix(&self, key: NodeKey) -> Option<Affine3A> {
        let node = self.nodes.get(key)?;
        Some(
            self.ancestors(key)
                .filter_map(|k| self.nodes.get(k))
                .fold(node.local_matrix(), |matrix, ancestor| ancestor.local_matrix() * matrix),
        )
    }

    /// Copies the given nodes into a parent-free [`Collection`].
    ///
    /// Each ancestor's primary and auxiliary transforms are appended to the
    /// copy's auxiliary list with their centers made explicit, so the copy's
    /// local matrix equals the node's world matrix. Stale keys are skipped.
    #[must_use]
    pub fn snapshot(&self, keys: &[NodeKey]) -> Collection {
        let members = keys
            .iter()
            .filter_map(|&key| {
                let mut copy = self.nodes.get(key)?.clone();
                for ancestor in self.ancestors(key).filter_map(|k| self.nodes.get(k)) {
                    let center = ancestor.center();
                    let baked = std::iter::once(&ancestor.transform)
                        .chain(ancestor.auxiliary.iter())
                        .map(|t| Transform {
                            rotation_center: Some(t.center_or(center)),
                            ..*t
                        });
                    copy.auxiliary.extend(baked);
                }
                copy.parent = None;
                Some(Member::Node(copy))
            })
            .collect();
        Collection::new(members)
    }
}
