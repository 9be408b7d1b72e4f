//! Animation engine
//!
//! - [`InterpolatedAnimation`]: time → snapshot contract for one animatable
//!   value, driven by the [`Animatable`] trait
//! - [`CollectionAnimation`]: pairs the members of two collections
//! - [`AnimationSequencer`]: chains and overlaps collection animations
//! - [`FrameCache`] / [`Playhead`]: playback helpers for the host loop

pub mod cache;
pub mod collection;
pub mod easing;
pub mod interpolated;
pub mod member;
mod node;
pub mod playhead;
pub mod sequencer;
pub mod values;

pub use cache::FrameCache;
pub use collection::CollectionAnimation;
pub use easing::{Easing, EasingFn};
pub use interpolated::{Animatable, InterpolatedAnimation, Timing};
pub use member::MemberAnimation;
pub use playhead::Playhead;
pub use sequencer::{AnimationSequencer, ListenerKey, SequencerEvent};
pub use values::Interpolatable;

/// Closed set of animation kinds a member pair can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    /// Transform and material channels only.
    Transformable,
    Polygon,
    Mesh,
    Camera,
    /// Nested collection, animated recursively.
    Collection,
}
