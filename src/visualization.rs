//! Visualization registry
//!
//! A [`Visualization`] pairs a scene node with an optional per-frame update
//! callback under a string id. The [`VisualizationRegistry`] keeps every
//! registered id attached to the [`Scene`] exactly once: inserting attaches,
//! removing detaches, and replacing an id detaches the previous node before
//! the new one goes in.

use rustc_hash::FxHashMap;

use crate::scene::{NodeKey, Scene, SceneNode};

/// Per-frame callback. Receives the node and the seconds elapsed since the
/// previous frame.
pub type UpdateFn = Box<dyn FnMut(&mut dyn SceneNode, f32)>;

/// A renderable object registered with the engine.
pub struct Visualization {
    pub id: String,
    pub node: Box<dyn SceneNode>,
    /// `None` for static objects.
    pub update: Option<UpdateFn>,
}

impl Visualization {
    pub fn new(id: impl Into<String>, node: impl SceneNode) -> Self {
        Self::from_boxed(id, Box::new(node))
    }

    pub fn from_boxed(id: impl Into<String>, node: Box<dyn SceneNode>) -> Self {
        Self {
            id: id.into(),
            node,
            update: None,
        }
    }

    /// Attaches a per-frame callback.
    #[must_use]
    pub fn with_update<F>(mut self, update: F) -> Self
    where
        F: FnMut(&mut dyn SceneNode, f32) + 'static,
    {
        self.update = Some(Box::new(update));
        self
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        self.update.is_none()
    }
}

impl std::fmt::Debug for Visualization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Visualization")
            .field("id", &self.id)
            .field("has_update", &self.update.is_some())
            .finish_non_exhaustive()
    }
}

struct RegistryEntry {
    key: NodeKey,
    update: Option<UpdateFn>,
}

/// Id → (scene node, update callback) map.
///
/// The registry never owns nodes itself; they live in the [`Scene`] while
/// registered and are handed back to the caller on removal.
#[derive(Default)]
pub struct VisualizationRegistry {
    entries: FxHashMap<String, RegistryEntry>,
}

impl VisualizationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `visualization`, attaching its node to `scene`.
    ///
    /// An existing entry with the same id is removed first (its node is
    /// detached) and returned.
    pub fn insert(
        &mut self,
        scene: &mut Scene,
        visualization: Visualization,
    ) -> Option<Visualization> {
        let Visualization { id, node, update } = visualization;

        let replaced = self.remove(scene, &id);
        let key = scene.attach(node);
        self.entries.insert(id, RegistryEntry { key, update });

        replaced
    }

    /// Unregisters `id` and detaches its node. Absent ids yield `None`.
    pub fn remove(&mut self, scene: &mut Scene, id: &str) -> Option<Visualization> {
        let (id, entry) = self.entries.remove_entry(id)?;
        let Some(node) = scene.detach(entry.key) else {
            log::warn!("Visualization '{id}' had no node attached to the scene");
            return None;
        };
        Some(Visualization {
            id,
            node,
            update: entry.update,
        })
    }

    /// Removes every entry, detaching all nodes.
    pub fn remove_all(&mut self, scene: &mut Scene) -> Vec<Visualization> {
        let ids: Vec<String> = self.entries.keys().cloned().collect();
        ids.iter()
            .filter_map(|id| self.remove(scene, id))
            .collect()
    }

    /// Invokes every update callback once with `dt`.
    ///
    /// Iteration order is unspecified.
    pub fn run_updates(&mut self, scene: &mut Scene, dt: f32) {
        for entry in self.entries.values_mut() {
            let Some(update) = entry.update.as_mut() else {
                continue;
            };
            if let Some(node) = scene.get_mut(entry.key) {
                update(node, dt);
            }
        }
    }

    #[must_use]
    pub fn node_key(&self, id: &str) -> Option<NodeKey> {
        self.entries.get(id).map(|entry| entry.key)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered ids, in unspecified order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
