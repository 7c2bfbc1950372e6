use std::sync::atomic::{AtomicU32, Ordering};

use glam::Vec4;
use slotmap::SlotMap;

use crate::scene::NodeKey;
use crate::scene::light::{Light, LightKind};
use crate::scene::node::SceneNode;

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// Scene graph container.
///
/// Owns every attached node and the light sources composited into a frame.
/// Nodes are stored in a slot map so keys stay valid while other nodes come
/// and go; `root_nodes` keeps attachment order for drawing.
pub struct Scene {
    pub id: u32,

    nodes: SlotMap<NodeKey, Box<dyn SceneNode>>,
    root_nodes: Vec<NodeKey>,

    lights: Vec<Light>,

    /// Clear color. `None` leaves the surface's default.
    pub background: Option<Vec4>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed),
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            lights: Vec::new(),
            background: None,
        }
    }

    // ========================================================================
    // Node attachment
    // ========================================================================

    /// Attaches a node at the root of the scene and returns its key.
    pub fn attach(&mut self, mut node: Box<dyn SceneNode>) -> NodeKey {
        node.transform_mut().mark_dirty();
        node.on_attach();
        let key = self.nodes.insert(node);
        self.root_nodes.push(key);
        key
    }

    /// Detaches a node and hands it back to the caller.
    ///
    /// Returns `None` if the key is not (or no longer) attached.
    pub fn detach(&mut self, key: NodeKey) -> Option<Box<dyn SceneNode>> {
        let mut node = self.nodes.remove(key)?;
        if let Some(pos) = self.root_nodes.iter().position(|&k| k == key) {
            self.root_nodes.remove(pos);
        }
        node.on_detach();
        Some(node)
    }

    #[must_use]
    pub fn get(&self, key: NodeKey) -> Option<&dyn SceneNode> {
        self.nodes.get(key).map(|node| node.as_ref() as &dyn SceneNode)
    }

    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut dyn SceneNode> {
        self.nodes
            .get_mut(key)
            .map(|node| node.as_mut() as &mut dyn SceneNode)
    }

    #[must_use]
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Number of attached nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Attached nodes in attachment order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &dyn SceneNode)> {
        self.root_nodes
            .iter()
            .filter_map(|&key| {
                self.nodes
                    .get(key)
                    .map(|node| (key, node.as_ref() as &dyn SceneNode))
            })
    }

    /// Rebuilds dirty local matrices and copies them into the world matrices.
    ///
    /// Visualization nodes all hang off the scene root, so world == local.
    pub fn update_transforms(&mut self) {
        for node in self.nodes.values_mut() {
            let transform = node.transform_mut();
            if transform.update_local_matrix() {
                let local = transform.local_matrix;
                transform.set_world_matrix(local);
            }
        }
    }

    // ========================================================================
    // Lights
    // ========================================================================

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    #[must_use]
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Sum of all ambient light radiance.
    #[must_use]
    pub fn ambient_radiance(&self) -> glam::Vec3 {
        self.lights
            .iter()
            .filter(|light| light.kind == LightKind::Ambient)
            .map(Light::radiance)
            .sum()
    }

    /// First directional light, if any.
    #[must_use]
    pub fn main_directional_light(&self) -> Option<&Light> {
        self.lights
            .iter()
            .find(|light| light.kind == LightKind::Directional)
    }
}
