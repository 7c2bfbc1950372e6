#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Lifecycle-managed scene and render-loop engine for embedded 3D
//! visualizations.
//!
//! An [`Engine`] is mounted into a host [`Container`], draws a [`Scene`]
//! through a [`Camera`] on every frame its [`FrameScheduler`] delivers, and
//! keeps a registry of [`Visualization`]s, each a scene node with an optional
//! per-frame update callback.

pub mod app;
pub mod engine;
pub mod errors;
pub mod host;
pub mod resources;
pub mod runtime;
pub mod scene;
pub mod settings;
pub mod surface;
pub mod utils;
pub mod visualization;

pub use app::input::{ButtonState, Input, PointerButton};
pub use engine::Engine;
pub use errors::{Result, VizError};
pub use host::EngineHost;
pub use resources::primitives::*;
pub use resources::{BoundingSphere, Geometry, Mesh, MeshMaterial};
pub use runtime::{
    AnimationLoop, FrameRequest, FrameScheduler, LoopState, ManualScheduler, ResizeObserver,
    ResizeWatcher,
};
pub use scene::{Camera, Group, Light, LightKind, NodeKey, Scene, SceneNode, Transform};
pub use settings::{ControlSettings, DirectionalLightSettings, EngineSettings, LightSettings};
pub use surface::{Container, FrameView, HeadlessContainer, HeadlessSurface, RenderSurface, SurfaceStats};
pub use utils::{OrbitControls, Timer};
pub use visualization::{UpdateFn, Visualization, VisualizationRegistry};

#[cfg(feature = "winit")]
pub use app::App;
#[cfg(feature = "wgpu")]
pub use surface::WgpuSurface;
