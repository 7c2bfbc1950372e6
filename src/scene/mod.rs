//! Scene Graph Module
//!
//! Everything composited into a frame:
//! - [`SceneNode`]: capability trait of attachable objects
//! - [`Transform`]: position, rotation and scale with cached matrices
//! - [`Scene`]: node container plus light sources
//! - [`Camera`]: perspective projection tracking the surface aspect
//! - [`Light`]: ambient and directional light sources

pub mod camera;
pub mod light;
pub mod node;
pub mod scene;
pub mod transform;

pub use camera::Camera;
pub use light::{Light, LightKind};
pub use node::{Group, SceneNode};
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    /// Key of a node attached to a [`Scene`].
    pub struct NodeKey;
}
