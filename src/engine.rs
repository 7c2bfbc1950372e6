//! Engine Core Module
//!
//! This module contains [`Engine`], the composition root of the visualization
//! engine. It owns the render surface, camera, scene, orbit controls, resize
//! watcher and the animation loop handle, and keeps a registry of
//! independently animated [`Visualization`]s.
//!
//! The engine never drives itself. The host supplies a [`Container`] to draw
//! into and a [`FrameScheduler`] to schedule frames with, then calls
//! [`Engine::frame`] whenever a scheduled frame is due.
//!
//! # Lifecycle
//!
//! 1. Create with [`Engine::new`]; the first frame is requested immediately
//! 2. Register content with [`Engine::add_visualization`]
//! 3. Drive frames with [`Engine::frame`]
//! 4. Tear down with [`Engine::dispose`] (or by dropping the engine)
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Instant;
//!
//! use myth_viz::{
//!     Engine, EngineSettings, HeadlessContainer, ManualScheduler, Mesh, MeshMaterial,
//!     Visualization, create_box,
//! };
//!
//! # fn main() -> myth_viz::Result<()> {
//! let container = HeadlessContainer::new(800, 600);
//! let scheduler = ManualScheduler::new();
//! let mut engine = Engine::new(
//!     Box::new(container),
//!     Box::new(scheduler.clone()),
//!     EngineSettings::default(),
//! )?;
//!
//! let mesh = Mesh::new(Arc::new(create_box(1.0, 1.0, 1.0)), MeshMaterial::default());
//! engine.add_visualization(
//!     Visualization::new("cube", mesh).with_update(|node, dt| node.transform_mut().rotate_y(dt)),
//! )?;
//!
//! for _ in 0..60 {
//!     if let Some(request) = scheduler.take_pending() {
//!         engine.frame(request, Instant::now())?;
//!     }
//! }
//! engine.dispose();
//! # Ok(())
//! # }
//! ```

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;

use glam::Vec3;

use crate::app::input::Input;
use crate::errors::{Result, VizError};
use crate::runtime::{AnimationLoop, FrameRequest, FrameScheduler, LoopState, ResizeObserver, ResizeWatcher};
use crate::scene::{Camera, Light, Scene, SceneNode};
use crate::settings::EngineSettings;
use crate::surface::{physical_size, Container, FrameView, RenderSurface};
use crate::utils::{OrbitControls, Timer};
use crate::visualization::{Visualization, VisualizationRegistry};

/// The visualization engine instance bound to one host container.
///
/// # Components
///
/// - `surface`: drawing target created by the container
/// - `camera`: perspective camera driven by `controls`
/// - `scene`: lights plus every registered visualization node
/// - `registry`: visualization id → node + update callback
/// - `animation`: frame state machine over the host scheduler
/// - `resize_watcher`: container size notifications
pub struct Engine {
    settings: EngineSettings,

    container: Box<dyn Container>,
    surface: Box<dyn RenderSurface>,

    scene: Scene,
    camera: Camera,
    controls: OrbitControls,
    input: Input,

    registry: VisualizationRegistry,
    animation: AnimationLoop,
    resize_watcher: ResizeWatcher,
    timer: Timer,

    time: f32,
    frame_count: u64,
    disposed: bool,
}

impl Engine {
    /// Builds the engine inside `container` and requests the first frame.
    ///
    /// The camera and the surface are fully initialized before the first
    /// frame is scheduled.
    ///
    /// # Errors
    ///
    /// - [`VizError::InvalidSettings`] if `settings` fail validation
    /// - [`VizError::Initialization`] if the container cannot provide a
    ///   render surface
    pub fn new(
        container: Box<dyn Container>,
        scheduler: Box<dyn FrameScheduler>,
        settings: EngineSettings,
    ) -> Result<Self> {
        settings.validate()?;

        let (width, height) = container.content_size();
        let (physical_width, physical_height) =
            physical_size((width, height), container.scale_factor());
        let surface = container.create_surface(physical_width, physical_height, &settings)?;

        let aspect = if width > 0 && height > 0 {
            width as f32 / height as f32
        } else {
            1.0
        };
        let mut camera = Camera::new_perspective(settings.fov, aspect, settings.near, settings.far);
        camera.transform.position = Vec3::new(0.0, 0.0, settings.camera_distance);
        camera.transform.look_at(Vec3::ZERO, Vec3::Y);
        camera.update_view_projection();

        let mut scene = Scene::new();
        scene.background = settings.background;
        scene.add_light(Light::new_ambient(
            settings.ambient.color,
            settings.ambient.intensity,
        ));
        scene.add_light(Light::new_directional(
            settings.directional.color,
            settings.directional.intensity,
            settings.directional.position,
        ));

        let controls =
            OrbitControls::from_settings(&settings.controls, Vec3::ZERO, camera.transform.position);

        let mut input = Input::new();
        input.inject_resize(width, height);

        let timer = Timer::with_max_delta(settings.max_frame_delta);

        let mut engine = Self {
            settings,
            container,
            surface,
            scene,
            camera,
            controls,
            input,
            registry: VisualizationRegistry::new(),
            animation: AnimationLoop::new(scheduler),
            resize_watcher: ResizeWatcher::connect(),
            timer,
            time: 0.0,
            frame_count: 0,
            disposed: false,
        };
        engine.animation.start();

        log::info!(
            "Visualization engine created ({width}x{height}, surface {physical_width}x{physical_height})"
        );
        Ok(engine)
    }

    // ========================================================================
    // Visualization registry
    // ========================================================================

    /// Registers a visualization and attaches its node to the scene.
    ///
    /// Re-registering an id replaces the previous entry: the old node is
    /// detached first and handed back.
    pub fn add_visualization(
        &mut self,
        visualization: Visualization,
    ) -> Result<Option<Visualization>> {
        self.ensure_live()?;

        let id = visualization.id.clone();
        let replaced = self.registry.insert(&mut self.scene, visualization);
        if replaced.is_some() {
            log::debug!("Replaced visualization '{id}'");
        } else {
            log::debug!("Added visualization '{id}'");
        }
        Ok(replaced)
    }

    /// Unregisters `id`, detaching its node. Absent ids yield `Ok(None)`.
    pub fn remove_visualization(&mut self, id: &str) -> Result<Option<Visualization>> {
        self.ensure_live()?;

        let removed = self.registry.remove(&mut self.scene, id);
        if removed.is_some() {
            log::debug!("Removed visualization '{id}'");
        }
        Ok(removed)
    }

    /// Applies a one-shot mutation to the node registered under `id`.
    ///
    /// Returns whether the id was found.
    pub fn update_visualization<F>(&mut self, id: &str, mutator: F) -> Result<bool>
    where
        F: FnOnce(&mut dyn SceneNode),
    {
        self.ensure_live()?;

        let Some(node) = self
            .registry
            .node_key(id)
            .and_then(|key| self.scene.get_mut(key))
        else {
            return Ok(false);
        };
        mutator(node);
        Ok(true)
    }

    /// Like [`update_visualization`](Self::update_visualization) for a
    /// concrete node type. Returns `false` on absent id or type mismatch.
    pub fn update_visualization_as<T, F>(&mut self, id: &str, mutator: F) -> Result<bool>
    where
        T: SceneNode,
        F: FnOnce(&mut T),
    {
        self.ensure_live()?;

        let Some(node) = self
            .registry
            .node_key(id)
            .and_then(|key| self.scene.get_mut(key))
            .and_then(|node| node.downcast_mut::<T>())
        else {
            return Ok(false);
        };
        mutator(node);
        Ok(true)
    }

    #[must_use]
    pub fn contains_visualization(&self, id: &str) -> bool {
        self.registry.contains(id)
    }

    #[must_use]
    pub fn visualization_count(&self) -> usize {
        self.registry.len()
    }

    /// Registered ids, in unspecified order.
    pub fn visualization_ids(&self) -> impl Iterator<Item = &str> {
        self.registry.ids()
    }

    /// The scene node registered under `id`.
    #[must_use]
    pub fn visualization_node(&self, id: &str) -> Option<&dyn SceneNode> {
        self.registry
            .node_key(id)
            .and_then(|key| self.scene.get(key))
    }

    // ========================================================================
    // Frame loop
    // ========================================================================

    /// Runs the scheduled frame identified by `request`.
    ///
    /// Frames that are not the loop's outstanding request (cancelled or
    /// superseded) are ignored and return `Ok(false)`. Otherwise pending
    /// resize notifications are applied, one tick runs with the time elapsed
    /// since the previous frame, and the next frame is requested if the loop
    /// is still running.
    pub fn frame(&mut self, request: FrameRequest, now: Instant) -> Result<bool> {
        self.ensure_live()?;

        if !self.animation.begin_frame(request) {
            log::warn!("Ignoring stale frame request {request:?}");
            return Ok(false);
        }

        let result = self.run_frame(now);
        self.animation.end_frame();
        result.map(|()| true)
    }

    fn run_frame(&mut self, now: Instant) -> Result<()> {
        self.process_resize_events()?;
        let dt = self.timer.tick_at(now);
        self.tick(dt)
    }

    /// Performs one update + render iteration without scheduling.
    ///
    /// Advances the controls, runs every update callback with `dt`, refreshes
    /// transforms and the camera, then renders through the surface.
    pub fn tick(&mut self, dt: f32) -> Result<()> {
        self.ensure_live()?;

        self.controls
            .update(&mut self.camera.transform, &self.input, self.camera.fov, dt);
        self.input.end_frame();

        self.registry.run_updates(&mut self.scene, dt);

        self.scene.update_transforms();
        self.camera.update_view_projection();

        self.time += dt;
        self.frame_count += 1;

        self.surface.render(&FrameView {
            scene: &self.scene,
            camera: &self.camera,
        })
    }

    // ========================================================================
    // Resize
    // ========================================================================

    /// Re-reads the container box and updates the camera and surface.
    ///
    /// A zero-sized box leaves the camera aspect untouched but is still
    /// forwarded to the surface.
    pub fn resize(&mut self) -> Result<()> {
        self.ensure_live()?;

        let (width, height) = self.container.content_size();
        let (physical_width, physical_height) =
            physical_size((width, height), self.container.scale_factor());

        if width > 0 && height > 0 {
            self.camera.set_aspect(width as f32 / height as f32);
        }
        self.surface.resize(physical_width, physical_height);
        self.input.inject_resize(width, height);

        log::debug!("Resized to {width}x{height} ({physical_width}x{physical_height} physical)");
        Ok(())
    }

    /// Applies pending resize notifications, calling [`resize`](Self::resize)
    /// once per batch. Returns whether a resize happened.
    pub fn process_resize_events(&mut self) -> Result<bool> {
        self.ensure_live()?;

        if self.resize_watcher.take_pending() {
            self.resize()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// A handle for reporting container size changes, `None` after dispose.
    #[must_use]
    pub fn resize_observer(&self) -> Option<ResizeObserver> {
        self.resize_watcher.observer()
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Stops the loop and releases everything the engine acquired.
    ///
    /// Cancels the pending frame, disconnects the resize watcher, removes
    /// every visualization and releases the controls and the surface.
    /// Calling it again is a no-op.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }

        self.animation.stop();
        self.resize_watcher.disconnect();

        let removed = self.registry.remove_all(&mut self.scene);
        let removed_count = removed.len();
        drop(removed);

        self.controls.release();
        self.input.reset();
        self.surface.release();

        self.disposed = true;
        log::info!(
            "Visualization engine disposed after {} frames ({removed_count} visualizations removed)",
            self.frame_count
        );
    }

    #[inline]
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn ensure_live(&self) -> Result<()> {
        if self.disposed {
            Err(VizError::Disposed)
        } else {
            Ok(())
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    #[must_use]
    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    #[inline]
    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    #[inline]
    #[must_use]
    pub fn input(&self) -> &Input {
        &self.input
    }

    /// Pointer state fed by the host's event handlers.
    #[inline]
    pub fn input_mut(&mut self) -> &mut Input {
        &mut self.input
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Surface size in physical pixels.
    #[inline]
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.surface.size()
    }

    /// Total seconds simulated across all ticks.
    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Number of ticks run since creation.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    #[must_use]
    pub fn loop_state(&self) -> LoopState {
        self.animation.state()
    }

    /// The outstanding frame token, if the loop is running.
    #[inline]
    #[must_use]
    pub fn pending_frame(&self) -> Option<FrameRequest> {
        self.animation.pending()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.dispose();
    }
}
