use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec4;

use crate::errors::{Result, VizError};
use crate::settings::EngineSettings;
use crate::surface::{Container, FrameView, RenderSurface};

/// Observable state of a [`HeadlessSurface`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceStats {
    pub width: u32,
    pub height: u32,
    pub frames_rendered: u64,
    pub resize_count: u64,
    /// Visible meshes drawn by the last frame.
    pub objects_drawn_last_frame: usize,
    /// Visible nodes (drawable or not) seen by the last frame.
    pub nodes_last_frame: usize,
    pub last_clear_color: Option<Vec4>,
    pub released: bool,
}

#[derive(Debug)]
struct ContainerState {
    width: u32,
    height: u32,
    scale_factor: f64,
}

/// Container without a window, for tests and offscreen hosts.
///
/// Clones share the content box and the surface statistics, so a test can
/// keep one handle while the engine owns another.
///
/// ```
/// use myth_viz::{Engine, EngineSettings, HeadlessContainer, ManualScheduler};
///
/// # fn main() -> myth_viz::Result<()> {
/// let container = HeadlessContainer::new(800, 400);
/// let mut engine = Engine::new(
///     Box::new(container.clone()),
///     Box::new(ManualScheduler::new()),
///     EngineSettings::default(),
/// )?;
/// container.set_size(400, 400);
/// engine.resize()?;
/// assert_eq!(container.stats().width, 400);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HeadlessContainer {
    state: Rc<RefCell<ContainerState>>,
    stats: Rc<RefCell<SurfaceStats>>,
}

impl HeadlessContainer {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            state: Rc::new(RefCell::new(ContainerState {
                width,
                height,
                scale_factor: 1.0,
            })),
            stats: Rc::new(RefCell::new(SurfaceStats::default())),
        }
    }

    #[must_use]
    pub fn with_scale_factor(self, scale_factor: f64) -> Self {
        self.state.borrow_mut().scale_factor = scale_factor;
        self
    }

    /// Changes the content box. The engine picks it up on its next resize.
    pub fn set_size(&self, width: u32, height: u32) {
        let mut state = self.state.borrow_mut();
        state.width = width;
        state.height = height;
    }

    /// Snapshot of the surface statistics.
    #[must_use]
    pub fn stats(&self) -> SurfaceStats {
        self.stats.borrow().clone()
    }
}

impl Container for HeadlessContainer {
    fn content_size(&self) -> (u32, u32) {
        let state = self.state.borrow();
        (state.width, state.height)
    }

    fn scale_factor(&self) -> f64 {
        self.state.borrow().scale_factor
    }

    fn create_surface(
        &self,
        width: u32,
        height: u32,
        _settings: &EngineSettings,
    ) -> Result<Box<dyn RenderSurface>> {
        {
            let mut stats = self.stats.borrow_mut();
            *stats = SurfaceStats {
                width,
                height,
                ..SurfaceStats::default()
            };
        }
        Ok(Box::new(HeadlessSurface {
            stats: Rc::clone(&self.stats),
        }))
    }
}

/// Surface that records what it would have drawn.
#[derive(Debug)]
pub struct HeadlessSurface {
    stats: Rc<RefCell<SurfaceStats>>,
}

impl RenderSurface for HeadlessSurface {
    fn size(&self) -> (u32, u32) {
        let stats = self.stats.borrow();
        (stats.width, stats.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        let mut stats = self.stats.borrow_mut();
        stats.width = width;
        stats.height = height;
        stats.resize_count += 1;
    }

    fn render(&mut self, frame: &FrameView<'_>) -> Result<()> {
        let mut stats = self.stats.borrow_mut();
        if stats.released {
            return Err(VizError::Surface("surface already released".to_string()));
        }

        let mut nodes = 0;
        let mut drawn = 0;
        for (_, node) in frame.scene.iter().filter(|(_, node)| node.visible()) {
            nodes += 1;
            if node.as_mesh().is_some() {
                drawn += 1;
            }
        }

        stats.frames_rendered += 1;
        stats.nodes_last_frame = nodes;
        stats.objects_drawn_last_frame = drawn;
        stats.last_clear_color = frame.scene.background;
        Ok(())
    }

    fn release(&mut self) {
        self.stats.borrow_mut().released = true;
    }
}
