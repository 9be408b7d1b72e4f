#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod animation;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod group;
pub mod reactive;
pub mod render;
pub mod scene;

pub use animation::{
    Animatable, AnimationKind, AnimationSequencer, CollectionAnimation, Easing, FrameCache,
    InterpolatedAnimation, MemberAnimation, Playhead, SequencerEvent, Timing,
};
pub use config::MorphSettings;
pub use errors::{MorphError, Result};
pub use geometry::{Mesh, Polygon};
pub use group::{GroupHandle, GroupKey, GroupOp, OpTiming, Stage};
pub use reactive::{ChangeSource, Reactive};
pub use render::{RenderItem, extract, extract_camera};
pub use scene::{Camera, Collection, Material, Member, Scene, Shape, Transform, TransformNode};
