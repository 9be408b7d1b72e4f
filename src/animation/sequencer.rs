//! Playback queue of collection animations.
//!
//! Entries play back to back. An append marked concurrent makes the *next*
//! append overlap it: the two are merged into one entry covering the
//! shorter span, plus a follow-up entry for whatever the newer animation
//! has left. The total duration is therefore always the sum of the entry
//! durations, and `frame(t)` is a plain scan over consecutive spans.

use std::fmt;

use slotmap::{SlotMap, new_key_type};

use crate::animation::cache::FrameCache;
use crate::animation::collection::CollectionAnimation;
use crate::animation::interpolated::Timing;
use crate::config::MorphSettings;
use crate::errors::Result;
use crate::scene::collection::Collection;

new_key_type! {
    pub struct ListenerKey;
}

/// Notification sent to sequencer listeners.
#[derive(Debug)]
pub enum SequencerEvent<'a> {
    /// An animation was queued.
    Appended {
        animation: &'a CollectionAnimation,
        concurrent: bool,
    },
    /// Playback reached the end of the queue.
    Finished { at: f32 },
}

type Listener = Box<dyn FnMut(&SequencerEvent<'_>)>;

pub struct AnimationSequencer {
    entries: Vec<CollectionAnimation>,
    next_concurrent: bool,
    fallback: Collection,
    listeners: SlotMap<ListenerKey, Listener>,
    settings: MorphSettings,
    cache: FrameCache<Collection>,
    finished_notified: bool,
}

impl fmt::Debug for AnimationSequencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationSequencer")
            .field("entries", &self.entries.len())
            .field("duration", &self.duration())
            .field("next_concurrent", &self.next_concurrent)
            .field("listeners", &self.listeners.len())
            .field("cached_frames", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl Default for AnimationSequencer {
    fn default() -> Self {
        Self::new(Collection::default())
    }
}

impl AnimationSequencer {
    /// Empty queue answering `frame(t)` with `fallback`.
    #[must_use]
    pub fn new(fallback: Collection) -> Self {
        Self::with_settings(fallback, MorphSettings::default())
    }

    #[must_use]
    pub fn with_settings(fallback: Collection, settings: MorphSettings) -> Self {
        Self {
            entries: Vec::new(),
            next_concurrent: false,
            fallback,
            listeners: SlotMap::with_key(),
            cache: FrameCache::new(settings.cache_tolerance_ms),
            settings,
            finished_notified: true,
        }
    }

    /// Queues `animation`.
    ///
    /// When the previous append was marked concurrent, `animation` is merged
    /// into the last entry instead of being pushed. `concurrent` marks this
    /// append so that the next one overlaps it.
    pub fn append(&mut self, animation: CollectionAnimation, concurrent: bool) -> Result<()> {
        let merge = self.next_concurrent && !self.entries.is_empty();

        if merge {
            self.merge_into_last(&animation)?;
        }

        self.next_concurrent = concurrent;
        self.fallback = animation.after().clone();
        self.cache.invalidate();
        self.finished_notified = false;

        let event = SequencerEvent::Appended {
            animation: &animation,
            concurrent,
        };
        for listener in self.listeners.values_mut() {
            listener(&event);
        }

        if !merge {
            self.entries.push(animation);
        }
        Ok(())
    }

    /// Rebuilds the last entry to end where `animation` is at the end of
    /// that entry, then queues the remainder of `animation` if it is longer.
    fn merge_into_last(&mut self, animation: &CollectionAnimation) -> Result<()> {
        let Some(last) = self.entries.last() else {
            return Ok(());
        };
        let span = last.duration();
        let joint = animation.frame(span);

        let merged = CollectionAnimation::with_settings(
            last.before().clone(),
            joint.clone(),
            last.timing(),
            &self.settings,
        )?;

        let follow_up = if animation.duration() > span {
            let remaining = animation.duration() - span;
            log::debug!(
                "Concurrent append outlasts last entry by {remaining} ms; splitting at {span} ms"
            );
            let timing = Timing {
                duration: remaining,
                ..animation.timing()
            };
            Some(CollectionAnimation::with_settings(
                joint,
                animation.frame(animation.duration()),
                timing,
                &self.settings,
            )?)
        } else {
            None
        };

        if let Some(slot) = self.entries.last_mut() {
            *slot = merged;
        }
        self.entries.extend(follow_up);
        Ok(())
    }

    /// Sum of entry durations.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.entries.iter().map(CollectionAnimation::duration).sum()
    }

    #[must_use]
    pub fn done(&self, t: f32) -> bool {
        let duration = self.duration();
        self.entries.is_empty() || duration <= 0.0 || t / duration >= 1.0
    }

    /// Snapshot at `t` milliseconds from the start of the queue.
    ///
    /// Past the total duration (or on an empty queue) this is the fallback
    /// snapshot, so a state set through [`set_fallback`](Self::set_fallback)
    /// after the last append shows up once playback ends.
    #[must_use]
    pub fn frame(&self, t: f32) -> Collection {
        sample(&self.entries, &self.fallback, t)
    }

    /// `frame(t)`, notifying listeners once when playback first reaches the
    /// end after an append.
    pub fn advance(&mut self, t: f32) -> Collection {
        let frame = self.frame(t);
        if !self.finished_notified && self.done(t) {
            self.finished_notified = true;
            let event = SequencerEvent::Finished { at: t };
            for listener in self.listeners.values_mut() {
                listener(&event);
            }
        }
        frame
    }

    /// `frame(t)` served from the frame cache when a frame lies within the
    /// configured tolerance; misses are computed and stored.
    pub fn cached_frame(&mut self, t: f32) -> Collection {
        if let Some(frame) = self.cache.lookup(t) {
            return frame.clone();
        }
        let frame = self.frame(t);
        self.cache.insert(t, frame.clone());
        frame
    }

    /// Precomputes frames every `step_ms` across the whole queue.
    pub fn warm_cache(&mut self, step_ms: f32) {
        let duration = self.duration();
        if step_ms <= 0.0 || duration <= 0.0 {
            return;
        }
        let steps = (duration / step_ms).ceil() as usize;
        let times: Vec<f32> = (0..=steps).map(|i| (i as f32 * step_ms).min(duration)).collect();

        let batch_size = self.settings.warmup_batch_size();
        let Self {
            entries,
            fallback,
            cache,
            ..
        } = self;
        let (entries, fallback) = (&*entries, &*fallback);
        cache.invalidate();
        cache.warm_up(&times, batch_size, |t| sample(entries, fallback, t));
    }

    /// Registers a listener; the key removes it again.
    pub fn on_event(&mut self, listener: impl FnMut(&SequencerEvent<'_>) + 'static) -> ListenerKey {
        self.listeners.insert(Box::new(listener))
    }

    pub fn remove_listener(&mut self, key: ListenerKey) -> bool {
        self.listeners.remove(key).is_some()
    }

    #[must_use]
    pub fn entries(&self) -> &[CollectionAnimation] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the next append will overlap the last entry.
    #[must_use]
    pub fn next_concurrent(&self) -> bool {
        self.next_concurrent
    }

    #[must_use]
    pub fn fallback(&self) -> &Collection {
        &self.fallback
    }

    pub fn set_fallback(&mut self, fallback: Collection) {
        self.fallback = fallback;
        self.cache.invalidate();
    }

    #[must_use]
    pub fn settings(&self) -> &MorphSettings {
        &self.settings
    }

    /// Playback state to roll back to if a multi-append step fails halfway.
    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            entries: self.entries.clone(),
            next_concurrent: self.next_concurrent,
            fallback: self.fallback.clone(),
            finished_notified: self.finished_notified,
        }
    }

    pub(crate) fn restore(&mut self, checkpoint: Checkpoint) {
        self.entries = checkpoint.entries;
        self.next_concurrent = checkpoint.next_concurrent;
        self.fallback = checkpoint.fallback;
        self.finished_notified = checkpoint.finished_notified;
        self.cache.invalidate();
    }
}

/// Saved queue state, see [`AnimationSequencer::checkpoint`].
#[derive(Debug, Clone)]
pub(crate) struct Checkpoint {
    entries: Vec<CollectionAnimation>,
    next_concurrent: bool,
    fallback: Collection,
    finished_notified: bool,
}

/// Entry covering `t`, or the fallback once `t` is past the queue.
///
/// The fallback is the last appended end state unless a snap replaced it
/// afterwards.
fn sample(entries: &[CollectionAnimation], fallback: &Collection, t: f32) -> Collection {
    let mut offset = 0.0;
    for entry in entries {
        let end = offset + entry.duration();
        if t < end {
            log::trace!("Sampling entry at local {} ms", t - offset);
            return entry.frame(t - offset);
        }
        offset = end;
    }
    fallback.clone()
}
