use std::any::Any;
use std::borrow::Cow;
use std::sync::Arc;

use crate::resources::geometry::Geometry;
use crate::resources::material::MeshMaterial;
use crate::scene::node::SceneNode;
use crate::scene::transform::Transform;

/// Drawable scene node: shared geometry + material + transform.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: Cow<'static, str>,
    pub geometry: Arc<Geometry>,
    pub material: MeshMaterial,
    pub transform: Transform,
    pub visible: bool,
}

impl Mesh {
    #[must_use]
    pub fn new(geometry: Arc<Geometry>, material: MeshMaterial) -> Self {
        Self {
            name: Cow::Borrowed("Mesh"),
            geometry,
            material,
            transform: Transform::new(),
            visible: true,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }
}

impl SceneNode for Mesh {
    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn as_mesh(&self) -> Option<&Mesh> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
