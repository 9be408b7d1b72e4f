use glam::{Vec3, Vec4};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::animation::{AnimationSequencer, CollectionAnimation, Timing};
use crate::config::MorphSettings;
use crate::errors::{MorphError, Result};
use crate::group::ops::{GroupOp, OpTiming, leaf_states};
use crate::group::wrapper::GroupHandle;
use crate::group::{GroupContent, GroupKey, GroupNode};
use crate::reactive::{ChangeSource, Reactive, SubscriptionKey};
use crate::scene::collection::{Collection, Member};

/// One group's share of an operation, built before anything is committed.
struct GroupStep {
    key: GroupKey,
    after: Collection,
    /// `None` for zero-duration operations, which only snap the state.
    animation: Option<CollectionAnimation>,
    concurrent: bool,
    source: ChangeSource,
}

/// Arena owning every group of a hierarchy.
#[derive(Debug, Default)]
pub struct Stage {
    groups: SlotMap<GroupKey, GroupNode>,
    roots: Vec<GroupKey>,
    root_names: FxHashMap<String, GroupKey>,
    settings: MorphSettings,
}

impl Stage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_settings(settings: MorphSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn settings(&self) -> &MorphSettings {
        &self.settings
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Adds a leaf group owning `collection`.
    pub fn add_leaf(
        &mut self,
        parent: Option<GroupKey>,
        name: &str,
        collection: Collection,
    ) -> Result<GroupKey> {
        self.insert(parent, name, GroupContent::Leaf, collection)
    }

    /// Adds an empty branch group.
    pub fn add_branch(&mut self, parent: Option<GroupKey>, name: &str) -> Result<GroupKey> {
        let content = GroupContent::Branch {
            children: Vec::new(),
            by_name: FxHashMap::default(),
        };
        self.insert(parent, name, content, Collection::default())
    }

    fn insert(
        &mut self,
        parent: Option<GroupKey>,
        name: &str,
        content: GroupContent,
        collection: Collection,
    ) -> Result<GroupKey> {
        let taken = match parent {
            None => self.root_names.contains_key(name),
            Some(parent_key) => {
                let parent_node = self.node(parent_key)?;
                match &parent_node.content {
                    GroupContent::Leaf => {
                        log::error!("Cannot add '{name}' under leaf group '{}'", parent_node.name);
                        return Err(MorphError::InvalidTarget(format!(
                            "group '{}' is a leaf and cannot hold children",
                            parent_node.name
                        )));
                    }
                    GroupContent::Branch { by_name, .. } => by_name.contains_key(name),
                }
            }
        };
        if taken {
            log::error!("Duplicate group name '{name}'");
            return Err(MorphError::InvalidTarget(format!("group name '{name}' is already used")));
        }

        let sequencer =
            AnimationSequencer::with_settings(collection.clone(), self.settings.clone());
        let key = self.groups.insert(GroupNode {
            name: name.to_owned(),
            parent,
            content,
            collection: Reactive::new(collection),
            sequencer,
        });

        match parent {
            None => {
                self.roots.push(key);
                self.root_names.insert(name.to_owned(), key);
            }
            Some(parent_key) => {
                if let Some(GroupNode {
                    content: GroupContent::Branch { children, by_name },
                    ..
                }) = self.groups.get_mut(parent_key)
                {
                    children.push(key);
                    by_name.insert(name.to_owned(), key);
                }
                self.refresh_ancestors(key);
            }
        }

        log::debug!("Added group '{name}'");
        Ok(key)
    }

    /// Rewrites the slot of `key` in every ancestor without animating.
    fn refresh_ancestors(&mut self, key: GroupKey) {
        let mut child = key;
        while let Some((parent, slot)) = self.slot_of(child) {
            let Some(child_collection) =
                self.groups.get(child).map(|g| g.collection.get().clone())
            else {
                return;
            };
            let Some(parent_node) = self.groups.get_mut(parent) else {
                return;
            };
            let updated = with_slot(parent_node.collection.get(), slot, child_collection);
            parent_node.sequencer.set_fallback(updated.clone());
            parent_node.collection.set(updated, ChangeSource::Propagated);
            child = parent;
        }
    }

    /// Parent key and slot index of `key` within that parent.
    fn slot_of(&self, key: GroupKey) -> Option<(GroupKey, usize)> {
        let parent = self.groups.get(key)?.parent?;
        let slot = self.groups.get(parent)?.children().iter().position(|&k| k == key)?;
        Some((parent, slot))
    }

    fn node(&self, key: GroupKey) -> Result<&GroupNode> {
        self.groups.get(key).ok_or_else(|| {
            log::error!("Stale group key {key:?}");
            MorphError::GroupNotFound(format!("{key:?}"))
        })
    }

    #[must_use]
    pub fn get(&self, key: GroupKey) -> Option<&GroupNode> {
        self.groups.get(key)
    }

    pub fn get_mut(&mut self, key: GroupKey) -> Option<&mut GroupNode> {
        self.groups.get_mut(key)
    }

    #[must_use]
    pub fn roots(&self) -> &[GroupKey] {
        &self.roots
    }

    /// Looks a group up by slash-separated path from a root, e.g.
    /// `"scene/left"`.
    pub fn find(&self, path: &str) -> Result<GroupKey> {
        let mut parts = path.split('/').filter(|p| !p.is_empty());
        let not_found = || MorphError::GroupNotFound(path.to_owned());

        let first = parts.next().ok_or_else(not_found)?;
        let mut key = *self.root_names.get(first).ok_or_else(not_found)?;
        for part in parts {
            key = self.node(key)?.child(part).ok_or_else(not_found)?;
        }
        Ok(key)
    }

    /// Subscribes to changes of a group's collection.
    pub fn subscribe(
        &mut self,
        key: GroupKey,
        subscriber: impl FnMut(&Collection, ChangeSource) + 'static,
    ) -> Result<SubscriptionKey> {
        let group = self
            .groups
            .get_mut(key)
            .ok_or_else(|| MorphError::GroupNotFound(format!("{key:?}")))?;
        Ok(group.collection.subscribe(subscriber))
    }

    /// Chainable operations on one group.
    pub fn group(&mut self, key: GroupKey) -> GroupHandle<'_> {
        GroupHandle::new(self, key)
    }

    // ========================================================================
    // Playback
    // ========================================================================

    pub fn frame(&self, key: GroupKey, t: f32) -> Result<Collection> {
        Ok(self.node(key)?.sequencer.frame(t))
    }

    pub fn duration(&self, key: GroupKey) -> Result<f32> {
        Ok(self.node(key)?.sequencer.duration())
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Applies `op` to every leaf under `key` and propagates the result up.
    ///
    /// Every leaf and ancestor animation is built before anything is
    /// committed, so an error leaves the whole hierarchy untouched.
    pub fn apply(&mut self, key: GroupKey, op: GroupOp, timing: OpTiming) -> Result<()> {
        let group = self.node(key)?;
        let center = group.collection.get().world_center();
        let is_branch = !group.is_leaf();

        // Pivots are shared by every leaf, so they are fixed here once
        let op = match op {
            GroupOp::MoveTo(target) => GroupOp::MoveBy(target - center),
            GroupOp::Rotate { degrees, pivot: None } if is_branch => GroupOp::Rotate {
                degrees,
                pivot: Some(center),
            },
            GroupOp::ScaleBy { factor, pivot: None } if is_branch => GroupOp::ScaleBy {
                factor,
                pivot: Some(center),
            },
            other => other,
        };

        let mut targets = Vec::new();
        self.expand(key, op, &mut targets)?;
        log::debug!(
            "Applying group op to '{}': {} leaf target(s), {} ms",
            group.name,
            targets.len(),
            timing.duration
        );

        let steps = self.plan(&targets, timing)?;
        self.commit(steps)
    }

    /// Collects `(leaf, op)` pairs under `key`, splitting transform-into
    /// targets per child.
    fn expand(&self, key: GroupKey, op: GroupOp, out: &mut Vec<(GroupKey, GroupOp)>) -> Result<()> {
        let group = self.node(key)?;
        let children = match &group.content {
            GroupContent::Leaf => {
                out.push((key, op));
                return Ok(());
            }
            GroupContent::Branch { children, .. } => children,
        };

        match op {
            GroupOp::TransformInto(target) => {
                if target.members.len() != children.len() {
                    log::error!(
                        "Transform target for '{}' has {} members, group has {} children",
                        group.name,
                        target.members.len(),
                        children.len()
                    );
                    return Err(MorphError::InvalidTarget(format!(
                        "'{}' expects {} nested collections, got {} members",
                        group.name,
                        children.len(),
                        target.members.len()
                    )));
                }
                for (&child, member) in children.iter().zip(target.members) {
                    let Member::Collection(part) = member else {
                        log::error!("Transform target for '{}' holds a bare node", group.name);
                        return Err(MorphError::InvalidTarget(format!(
                            "'{}' expects one nested collection per child",
                            group.name
                        )));
                    };
                    self.expand(child, GroupOp::TransformInto(part), out)?;
                }
            }
            op => {
                for &child in children {
                    self.expand(child, op.clone(), out)?;
                }
            }
        }
        Ok(())
    }

    /// Builds every leaf step and every ancestor step it propagates to.
    ///
    /// Ancestor states are tracked in `staged` so that a second leaf under
    /// the same ancestor builds on the first leaf's result. An ancestor
    /// that will receive another step of the same operation gets this one
    /// marked concurrent, so the whole operation collapses into a single
    /// overlapping entry there.
    fn plan(&self, targets: &[(GroupKey, GroupOp)], timing: OpTiming) -> Result<Vec<GroupStep>> {
        let anim_timing = timing.to_timing(self.settings.default_easing);

        let mut staged: FxHashMap<GroupKey, Collection> = FxHashMap::default();
        let mut steps = Vec::new();

        for (i, (leaf, op)) in targets.iter().enumerate() {
            let current = self.staged_collection(&staged, *leaf)?;
            let (mut child_before, mut child_after) = leaf_states(current, op);
            steps.push(GroupStep {
                key: *leaf,
                after: child_after.clone(),
                animation: self.build(&child_before, &child_after, anim_timing)?,
                concurrent: timing.concurrent,
                source: ChangeSource::Own,
            });
            staged.insert(*leaf, child_after.clone());

            let mut child = *leaf;
            while let Some((parent, slot)) = self.slot_of(child) {
                let shared = targets[i + 1..]
                    .iter()
                    .any(|(later, _)| self.descends_from(*later, parent));
                let current = self.staged_collection(&staged, parent)?;
                let before = with_slot(current, slot, child_before);
                let after = with_slot(current, slot, child_after);

                steps.push(GroupStep {
                    key: parent,
                    after: after.clone(),
                    animation: self.build(&before, &after, anim_timing)?,
                    concurrent: shared || timing.concurrent,
                    source: ChangeSource::Propagated,
                });
                staged.insert(parent, after.clone());

                child = parent;
                child_before = before;
                child_after = after;
            }
        }
        Ok(steps)
    }

    /// `None` for a zero-duration step, which snaps instead of queuing.
    fn build(
        &self,
        before: &Collection,
        after: &Collection,
        timing: Timing,
    ) -> Result<Option<CollectionAnimation>> {
        if timing.duration <= 0.0 {
            return Ok(None);
        }
        let animation = CollectionAnimation::with_settings(
            before.clone(),
            after.clone(),
            timing,
            &self.settings,
        )?;
        Ok(Some(animation))
    }

    /// Latest planned state of `key`, falling back to its committed one.
    fn staged_collection<'a>(
        &'a self,
        staged: &'a FxHashMap<GroupKey, Collection>,
        key: GroupKey,
    ) -> Result<&'a Collection> {
        match staged.get(&key) {
            Some(collection) => Ok(collection),
            None => Ok(self.node(key)?.collection.get()),
        }
    }

    /// Appends every planned step, then publishes the new states.
    ///
    /// A failed append (a concurrent merge that cannot be reconciled) rolls
    /// every touched sequencer back before returning the error, and no
    /// subscriber is notified.
    fn commit(&mut self, steps: Vec<GroupStep>) -> Result<()> {
        let mut checkpoints = FxHashMap::default();
        for step in &steps {
            if let Some(group) = self.groups.get(step.key) {
                checkpoints
                    .entry(step.key)
                    .or_insert_with(|| group.sequencer.checkpoint());
            }
        }

        let mut failure = None;
        for step in &steps {
            let Some(group) = self.groups.get_mut(step.key) else {
                continue;
            };
            match &step.animation {
                Some(animation) => {
                    if let Err(err) = group.sequencer.append(animation.clone(), step.concurrent) {
                        failure = Some(err);
                        break;
                    }
                }
                None => group.sequencer.set_fallback(step.after.clone()),
            }
        }

        if let Some(err) = failure {
            log::error!(
                "Group op failed while queuing; rolling back {} group(s)",
                checkpoints.len()
            );
            for (key, checkpoint) in checkpoints {
                if let Some(group) = self.groups.get_mut(key) {
                    group.sequencer.restore(checkpoint);
                }
            }
            return Err(err);
        }

        for step in steps {
            if let Some(group) = self.groups.get_mut(step.key) {
                group.collection.set(step.after, step.source);
            }
        }
        Ok(())
    }

    fn descends_from(&self, key: GroupKey, ancestor: GroupKey) -> bool {
        std::iter::successors(self.groups.get(key).and_then(|g| g.parent), |&k| {
            self.groups.get(k).and_then(|g| g.parent)
        })
        .any(|k| k == ancestor)
    }

    // ========================================================================
    // Convenience
    // ========================================================================

    pub fn fade_in(&mut self, key: GroupKey, duration: f32, concurrent: bool) -> Result<()> {
        self.apply(key, GroupOp::FadeIn, OpTiming::new(duration).concurrent(concurrent))
    }

    pub fn fade_out(&mut self, key: GroupKey, duration: f32, concurrent: bool) -> Result<()> {
        self.apply(key, GroupOp::FadeOut, OpTiming::new(duration).concurrent(concurrent))
    }

    pub fn move_by(
        &mut self,
        key: GroupKey,
        delta: Vec3,
        duration: f32,
        concurrent: bool,
    ) -> Result<()> {
        self.apply(key, GroupOp::MoveBy(delta), OpTiming::new(duration).concurrent(concurrent))
    }

    pub fn move_to(
        &mut self,
        key: GroupKey,
        target: Vec3,
        duration: f32,
        concurrent: bool,
    ) -> Result<()> {
        self.apply(key, GroupOp::MoveTo(target), OpTiming::new(duration).concurrent(concurrent))
    }

    pub fn scale_by(
        &mut self,
        key: GroupKey,
        factor: f32,
        duration: f32,
        concurrent: bool,
    ) -> Result<()> {
        let op = GroupOp::ScaleBy { factor, pivot: None };
        self.apply(key, op, OpTiming::new(duration).concurrent(concurrent))
    }

    pub fn rotate(
        &mut self,
        key: GroupKey,
        degrees: Vec3,
        pivot: Option<Vec3>,
        duration: f32,
        concurrent: bool,
    ) -> Result<()> {
        let op = GroupOp::Rotate { degrees, pivot };
        self.apply(key, op, OpTiming::new(duration).concurrent(concurrent))
    }

    pub fn recolor(
        &mut self,
        key: GroupKey,
        color: Vec4,
        duration: f32,
        concurrent: bool,
    ) -> Result<()> {
        self.apply(key, GroupOp::Recolor(color), OpTiming::new(duration).concurrent(concurrent))
    }

    pub fn transform_into(
        &mut self,
        key: GroupKey,
        target: Collection,
        duration: f32,
        concurrent: bool,
    ) -> Result<()> {
        let timing = OpTiming::new(duration).concurrent(concurrent);
        self.apply(key, GroupOp::TransformInto(target), timing)
    }

    pub fn wait(&mut self, key: GroupKey, duration: f32) -> Result<()> {
        self.apply(key, GroupOp::Wait, OpTiming::new(duration))
    }
}

/// Copy of `collection` with member `slot` replaced by `child`.
fn with_slot(collection: &Collection, slot: usize, child: Collection) -> Collection {
    let mut updated = collection.clone();
    match updated.members.get_mut(slot) {
        Some(member) => *member = Member::Collection(child),
        None => {
            updated
                .members
                .resize_with(slot, || Member::Collection(Collection::default()));
            updated.members.push(Member::Collection(child));
        }
    }
    updated
}
