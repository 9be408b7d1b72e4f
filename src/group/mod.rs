//! Group hierarchy
//!
//! Named groups live in a [`Stage`] arena. A leaf group owns one collection
//! and one sequencer; a branch group owns named children and holds one
//! nested-collection slot per child. Bulk operations applied to any group
//! recurse to the leaves underneath it, animate each leaf, and propagate
//! the change back up so that every ancestor's sequencer replays it too.

pub mod ops;
pub mod stage;
pub mod wrapper;

pub use ops::{GroupOp, OpTiming};
pub use stage::Stage;
pub use wrapper::GroupHandle;

use rustc_hash::FxHashMap;
use slotmap::new_key_type;

use crate::animation::AnimationSequencer;
use crate::reactive::Reactive;
use crate::scene::collection::Collection;

new_key_type! {
    pub struct GroupKey;
}

#[derive(Debug)]
pub enum GroupContent {
    Leaf,
    Branch {
        children: Vec<GroupKey>,
        by_name: FxHashMap<String, GroupKey>,
    },
}

/// One group in the hierarchy.
#[derive(Debug)]
pub struct GroupNode {
    pub(crate) name: String,
    pub(crate) parent: Option<GroupKey>,
    pub(crate) content: GroupContent,
    pub(crate) collection: Reactive<Collection>,
    pub(crate) sequencer: AnimationSequencer,
}

impl GroupNode {
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<GroupKey> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.content, GroupContent::Leaf)
    }

    /// Child keys in slot order; empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[GroupKey] {
        match &self.content {
            GroupContent::Leaf => &[],
            GroupContent::Branch { children, .. } => children,
        }
    }

    #[must_use]
    pub fn child(&self, name: &str) -> Option<GroupKey> {
        match &self.content {
            GroupContent::Leaf => None,
            GroupContent::Branch { by_name, .. } => by_name.get(name).copied(),
        }
    }

    /// Current state, i.e. the state after every queued animation.
    #[inline]
    #[must_use]
    pub fn collection(&self) -> &Collection {
        self.collection.get()
    }

    #[inline]
    #[must_use]
    pub fn sequencer(&self) -> &AnimationSequencer {
        &self.sequencer
    }

    #[inline]
    pub fn sequencer_mut(&mut self) -> &mut AnimationSequencer {
        &mut self.sequencer
    }

    #[inline]
    pub fn reactive_mut(&mut self) -> &mut Reactive<Collection> {
        &mut self.collection
    }
}
