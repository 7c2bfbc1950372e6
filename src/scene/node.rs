use std::any::Any;

use crate::resources::mesh::Mesh;
use crate::scene::transform::Transform;

/// Capability interface of anything that can live in a [`Scene`](crate::Scene).
///
/// The engine treats nodes as opaque: it only attaches and detaches them,
/// and reads or mutates their [`Transform`]. Renderers query drawable content
/// through [`as_mesh`](Self::as_mesh); a node that returns `None` is kept in
/// the scene but draws nothing.
///
/// # Downcasting
///
/// Update callbacks receive `&mut dyn SceneNode`. Concrete types are
/// recovered with [`downcast_ref`](trait.SceneNode.html#method.downcast_ref)
/// and [`downcast_mut`](trait.SceneNode.html#method.downcast_mut):
///
/// ```
/// use glam::Vec4;
/// use myth_viz::{Mesh, SceneNode};
///
/// fn paint_red(node: &mut dyn SceneNode) {
///     if let Some(mesh) = node.downcast_mut::<Mesh>() {
///         mesh.material.color = Vec4::new(1.0, 0.0, 0.0, 1.0);
///     }
/// }
/// ```
pub trait SceneNode: Any {
    fn transform(&self) -> &Transform;

    fn transform_mut(&mut self) -> &mut Transform;

    /// Invisible nodes stay attached but are skipped when drawing.
    fn visible(&self) -> bool {
        true
    }

    /// Drawable content, if any.
    fn as_mesh(&self) -> Option<&Mesh> {
        None
    }

    /// Called right after the node has been attached to a scene.
    fn on_attach(&mut self) {}

    /// Called right after the node has been detached from a scene.
    fn on_detach(&mut self) {}

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn SceneNode {
    #[must_use]
    pub fn is<T: SceneNode>(&self) -> bool {
        self.as_any().is::<T>()
    }

    #[must_use]
    pub fn downcast_ref<T: SceneNode>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: SceneNode>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// An empty node with only a transform.
///
/// Useful as a pivot or as a placeholder while content is still loading.
#[derive(Debug, Clone, Default)]
pub struct Group {
    pub transform: Transform,
}

impl Group {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SceneNode for Group {
    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
