use crate::animation::interpolated::{Animatable, InterpolatedAnimation, Timing};
use crate::animation::member::MemberAnimation;
use crate::animation::node::blend_auxiliary;
use crate::animation::values::Interpolatable;
use crate::config::MorphSettings;
use crate::errors::Result;
use crate::scene::collection::{Collection, Member};
use crate::scene::transform::{Transform, pad_auxiliary, pin_centers};

/// Pads `short` up to the length of `long`.
///
/// A non-empty list repeats its own last member. An empty list takes fully
/// transparent copies of `long`, so members fade in or out of nothing.
fn pad_members(short: &mut Vec<Member>, long: &[Member]) {
    if short.len() >= long.len() {
        return;
    }
    match short.last().cloned() {
        Some(last) => short.resize(long.len(), last),
        None => {
            log::warn!("Animating from an empty collection; padding with transparent copies");
            short.extend(long.iter().cloned().map(|mut member| {
                member.for_each_node_mut(&mut |node| node.set_opacity(0.0));
                member
            }));
        }
    }
}

impl Animatable for Collection {
    /// Pads members and the auxiliary list and pins both centers.
    ///
    /// Members are paired, not resolved; [`CollectionAnimation`] resolves
    /// each pair separately.
    fn reconcile(before: &Self, after: &Self, _settings: &MorphSettings) -> Result<(Self, Self)> {
        let mut resolved_before = before.clone();
        let mut resolved_after = after.clone();

        pad_members(&mut resolved_before.members, &after.members);
        pad_members(&mut resolved_after.members, &before.members);

        pin_centers(
            &mut resolved_before.transform,
            &mut resolved_before.auxiliary,
            before.center(),
        );
        pin_centers(&mut resolved_after.transform, &mut resolved_after.auxiliary, after.center());
        pad_auxiliary(&mut resolved_before.auxiliary, &mut resolved_after.auxiliary);

        Ok((resolved_before, resolved_after))
    }

    /// Blends the collection's own channels; members come from the nearer
    /// endpoint.
    fn blend(start: &Self, end: &Self, weight: f32) -> Self {
        let discrete = if weight >= 1.0 { end } else { start };
        Self {
            transform: Transform::interpolate_linear(start.transform, end.transform, weight),
            auxiliary: blend_auxiliary(&start.auxiliary, &end.auxiliary, weight),
            members: discrete.members.clone(),
        }
    }
}

/// Animation of a whole collection: its own transform channels plus one
/// [`MemberAnimation`] per paired member slot.
#[derive(Debug, Clone)]
pub struct CollectionAnimation {
    header: InterpolatedAnimation<Collection>,
    members: Vec<MemberAnimation>,
}

impl CollectionAnimation {
    pub fn new(before: Collection, after: Collection, timing: Timing) -> Result<Self> {
        Self::with_settings(before, after, timing, &MorphSettings::default())
    }

    pub fn with_settings(
        before: Collection,
        after: Collection,
        timing: Timing,
        settings: &MorphSettings,
    ) -> Result<Self> {
        let header = InterpolatedAnimation::with_settings(before, after, timing, settings)?;
        let members = header
            .resolved_before()
            .members
            .iter()
            .zip(&header.resolved_after().members)
            .map(|(b, a)| MemberAnimation::new(b, a, timing, settings))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { header, members })
    }

    #[inline]
    #[must_use]
    pub fn before(&self) -> &Collection {
        self.header.before()
    }

    #[inline]
    #[must_use]
    pub fn after(&self) -> &Collection {
        self.header.after()
    }

    #[inline]
    #[must_use]
    pub fn timing(&self) -> Timing {
        self.header.timing()
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.header.duration()
    }

    #[must_use]
    pub fn progress(&self, t: f32) -> f32 {
        self.header.progress(t)
    }

    #[must_use]
    pub fn done(&self, t: f32) -> bool {
        self.header.done(t)
    }

    #[must_use]
    pub fn members(&self) -> &[MemberAnimation] {
        &self.members
    }

    /// Snapshot at `t`, same shape as the padded member list.
    #[must_use]
    pub fn frame(&self, t: f32) -> Collection {
        let weight = self.header.weight(t);
        let start = self.header.resolved_before();
        let end = self.header.resolved_after();
        Collection {
            transform: Transform::interpolate_linear(start.transform, end.transform, weight),
            auxiliary: blend_auxiliary(&start.auxiliary, &end.auxiliary, weight),
            members: self.members.iter().map(|m| m.frame(t)).collect(),
        }
    }
}
