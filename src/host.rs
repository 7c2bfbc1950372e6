//! Mount/unmount adapter for UI hosts
//!
//! [`EngineHost`] wraps the engine in the shape a component framework wants:
//! construct on mount, dispose on unmount, and forward registry calls as
//! no-ops while nothing is mounted.

use crate::engine::Engine;
use crate::errors::Result;
use crate::runtime::FrameScheduler;
use crate::scene::SceneNode;
use crate::settings::EngineSettings;
use crate::surface::Container;
use crate::visualization::Visualization;

/// Holds at most one [`Engine`] for the lifetime of a host component.
#[derive(Default)]
pub struct EngineHost {
    settings: EngineSettings,
    engine: Option<Engine>,
}

impl EngineHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_settings(settings: EngineSettings) -> Self {
        Self {
            settings,
            engine: None,
        }
    }

    /// Constructs the engine. A second mount while mounted returns `false`
    /// and leaves the existing engine in place.
    pub fn mount(
        &mut self,
        container: Box<dyn Container>,
        scheduler: Box<dyn FrameScheduler>,
    ) -> Result<bool> {
        if self.engine.is_some() {
            log::warn!("Engine already mounted; ignoring mount");
            return Ok(false);
        }
        self.engine = Some(Engine::new(container, scheduler, self.settings.clone())?);
        Ok(true)
    }

    /// Disposes and drops the engine. Returns whether one was mounted.
    pub fn unmount(&mut self) -> bool {
        match self.engine.take() {
            Some(mut engine) => {
                engine.dispose();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    #[must_use]
    pub fn engine(&self) -> Option<&Engine> {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut Engine> {
        self.engine.as_mut()
    }

    /// Forwards to [`Engine::add_visualization`]; dropped while unmounted.
    pub fn add_visualization(&mut self, visualization: Visualization) -> Result<()> {
        match self.engine.as_mut() {
            Some(engine) => engine.add_visualization(visualization).map(drop),
            None => {
                log::warn!(
                    "No engine mounted; dropping visualization '{}'",
                    visualization.id
                );
                Ok(())
            }
        }
    }

    /// Forwards to [`Engine::remove_visualization`]; no-op while unmounted.
    pub fn remove_visualization(&mut self, id: &str) -> Result<()> {
        match self.engine.as_mut() {
            Some(engine) => engine.remove_visualization(id).map(drop),
            None => Ok(()),
        }
    }

    /// Forwards to [`Engine::update_visualization`]; `false` while unmounted.
    pub fn update_visualization<F>(&mut self, id: &str, mutator: F) -> Result<bool>
    where
        F: FnOnce(&mut dyn SceneNode),
    {
        match self.engine.as_mut() {
            Some(engine) => engine.update_visualization(id, mutator),
            None => Ok(false),
        }
    }
}
