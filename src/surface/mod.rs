//! Render surfaces and host containers
//!
//! The engine draws into a [`RenderSurface`] obtained from the host's
//! [`Container`]. Two backends ship with the crate:
//!
//! - [`HeadlessSurface`]: counts frames and draw calls, needs no GPU
//! - `WgpuSurface` (feature `wgpu`): forward Blinn-Phong renderer on a
//!   window surface

pub mod headless;
#[cfg(feature = "wgpu")]
pub mod wgpu_surface;

pub use headless::{HeadlessContainer, HeadlessSurface, SurfaceStats};
#[cfg(feature = "wgpu")]
pub use wgpu_surface::WgpuSurface;

use crate::errors::{Result, VizError};
use crate::scene::{Camera, Scene};
use crate::settings::EngineSettings;

/// Everything a surface needs to draw one frame.
#[derive(Clone, Copy)]
pub struct FrameView<'a> {
    pub scene: &'a Scene,
    pub camera: &'a Camera,
}

/// Drawing target owned by the engine.
pub trait RenderSurface {
    /// Current drawing buffer size in physical pixels.
    fn size(&self) -> (u32, u32);

    /// Resizes the drawing buffer. Zero-sized requests must be tolerated.
    fn resize(&mut self, width: u32, height: u32);

    /// Draws one frame.
    fn render(&mut self, frame: &FrameView<'_>) -> Result<()>;

    /// Releases every backend resource. Called once, on dispose.
    fn release(&mut self);
}

/// Host element the engine is mounted into.
pub trait Container {
    /// Content box size in logical pixels.
    fn content_size(&self) -> (u32, u32);

    /// Physical pixels per logical pixel.
    fn scale_factor(&self) -> f64 {
        1.0
    }

    /// Creates the drawing surface, sized in physical pixels.
    fn create_surface(
        &self,
        width: u32,
        height: u32,
        settings: &EngineSettings,
    ) -> Result<Box<dyn RenderSurface>> {
        let _ = (width, height, settings);
        Err(VizError::Initialization(
            "container has no renderable surface".to_string(),
        ))
    }
}

/// Scales a logical size to physical pixels.
#[must_use]
pub fn physical_size(logical: (u32, u32), scale_factor: f64) -> (u32, u32) {
    let scale = if scale_factor.is_finite() && scale_factor > 0.0 {
        scale_factor
    } else {
        1.0
    };
    (
        (f64::from(logical.0) * scale).round() as u32,
        (f64::from(logical.1) * scale).round() as u32,
    )
}
