//! Scene data model
//!
//! Value types the animation engine interpolates:
//! - Transform: position, rotation, scale and rotation center
//! - TransformNode: transform plus material and shape
//! - Collection: ordered group of nodes animated as one unit
//! - Camera / Material: projection and surface channels
//! - Scene: authoring arena with parent keys, baked into collections

pub mod camera;
pub mod collection;
pub mod material;
pub mod node;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;

pub use camera::{Camera, ProjectionType};
pub use collection::{Collection, Member};
pub use material::{Material, Shading};
pub use node::{Shape, TransformNode};
pub use scene::Scene;
pub use transform::{AuxiliaryList, AuxiliaryTransform, Transform};

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeKey;
}
