use crate::animation::AnimationKind;
use crate::animation::collection::CollectionAnimation;
use crate::animation::interpolated::{InterpolatedAnimation, Timing};
use crate::config::MorphSettings;
use crate::errors::{MorphError, Result};
use crate::scene::collection::Member;
use crate::scene::node::TransformNode;

/// Animation of one collection slot.
#[derive(Debug, Clone)]
pub enum MemberAnimation {
    Node {
        kind: AnimationKind,
        animation: InterpolatedAnimation<TransformNode>,
    },
    Collection(Box<CollectionAnimation>),
}

impl MemberAnimation {
    /// Pairs two members of the same slot.
    ///
    /// A node cannot animate into a nested collection or back.
    pub fn new(
        before: &Member,
        after: &Member,
        timing: Timing,
        settings: &MorphSettings,
    ) -> Result<Self> {
        match (before, after) {
            (Member::Node(b), Member::Node(a)) => {
                let animation =
                    InterpolatedAnimation::with_settings(b.clone(), a.clone(), timing, settings)?;
                Ok(MemberAnimation::Node {
                    kind: b.kind(),
                    animation,
                })
            }
            (Member::Collection(b), Member::Collection(a)) => {
                let animation =
                    CollectionAnimation::with_settings(b.clone(), a.clone(), timing, settings)?;
                Ok(MemberAnimation::Collection(Box::new(animation)))
            }
            (Member::Node(_) | Member::Collection(_), _) => {
                log::error!(
                    "Member '{}': {:?} cannot animate into {:?}",
                    before.name(),
                    before.kind(),
                    after.kind()
                );
                Err(MorphError::IncompatibleMembers {
                    name: before.name().to_owned(),
                    before: before.kind(),
                    after: after.kind(),
                })
            }
        }
    }

    #[must_use]
    pub fn kind(&self) -> AnimationKind {
        match self {
            MemberAnimation::Node { kind, .. } => *kind,
            MemberAnimation::Collection(_) => AnimationKind::Collection,
        }
    }

    #[must_use]
    pub fn frame(&self, t: f32) -> Member {
        match self {
            MemberAnimation::Node { animation, .. } => Member::Node(animation.frame(t)),
            MemberAnimation::Collection(animation) => Member::Collection(animation.frame(t)),
        }
    }
}
