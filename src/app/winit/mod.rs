//! Winit-based Application Runner
//!
//! Hosts one [`Engine`] in a native window built with
//! [winit](https://crates.io/crates/winit) and rendered with `wgpu`.
//!
//! # Overview
//!
//! - [`App`]: builder for configuring and launching the window
//! - [`WindowContainer`]: [`Container`] backed by a winit window
//! - [`RedrawScheduler`]: [`FrameScheduler`] backed by `request_redraw`
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use myth_viz::app::winit::App;
//! use myth_viz::{Mesh, MeshMaterial, Visualization, create_box};
//!
//! fn main() -> myth_viz::errors::Result<()> {
//!     App::new()
//!         .with_title("Spinning Cube")
//!         .with_setup(|engine| {
//!             let cube = Mesh::new(Arc::new(create_box(1.0, 1.0, 1.0)), MeshMaterial::default());
//!             engine.add_visualization(Visualization::new("cube", cube))?;
//!             Ok(())
//!         })
//!         .run()
//! }
//! ```

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
pub use winit::window::{Window, WindowId};

use crate::engine::Engine;
use crate::errors::Result;
use crate::runtime::{FrameRequest, FrameScheduler, ResizeObserver};
use crate::settings::EngineSettings;
use crate::surface::{Container, RenderSurface, WgpuSurface};

pub mod input_adapter;

/// Called once after the engine has been created, to register content.
pub type SetupFn = Box<dyn FnOnce(&mut Engine) -> Result<()>>;

/// [`Container`] whose content box is the window's inner size.
pub struct WindowContainer {
    window: Arc<Window>,
}

impl WindowContainer {
    #[must_use]
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl Container for WindowContainer {
    fn content_size(&self) -> (u32, u32) {
        let logical = self
            .window
            .inner_size()
            .to_logical::<u32>(self.window.scale_factor());
        (logical.width, logical.height)
    }

    fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }

    fn create_surface(
        &self,
        width: u32,
        height: u32,
        settings: &EngineSettings,
    ) -> Result<Box<dyn RenderSurface>> {
        let surface = WgpuSurface::new_blocking(Arc::clone(&self.window), width, height, settings)?;
        Ok(Box::new(surface))
    }
}

/// [`FrameScheduler`] that turns frame requests into window redraws.
///
/// The outstanding request is shared with the runner, which hands it to
/// [`Engine::frame`] on the next `RedrawRequested`.
pub struct RedrawScheduler {
    window: Arc<Window>,
    next_id: u64,
    pending: Rc<Cell<Option<FrameRequest>>>,
}

impl RedrawScheduler {
    #[must_use]
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            next_id: 0,
            pending: Rc::new(Cell::new(None)),
        }
    }

    /// Shared slot holding the outstanding request.
    #[must_use]
    pub fn pending_slot(&self) -> Rc<Cell<Option<FrameRequest>>> {
        Rc::clone(&self.pending)
    }
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        self.next_id += 1;
        let request = FrameRequest(self.next_id);
        self.pending.set(Some(request));
        self.window.request_redraw();
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending.get() == Some(request) {
            self.pending.set(None);
        }
    }
}

/// Application builder.
///
/// ```no_run
/// use myth_viz::EngineSettings;
/// use myth_viz::app::winit::App;
///
/// # fn main() -> myth_viz::Result<()> {
/// App::new()
///     .with_title("My Visualization")
///     .with_settings(EngineSettings::default().with_fov(60.0))
///     .run()?;
/// # Ok(())
/// # }
/// ```
pub struct App {
    title: String,
    size: (u32, u32),
    settings: EngineSettings,
    setup: Option<SetupFn>,
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: "myth-viz".into(),
            size: (1280, 720),
            settings: EngineSettings::default(),
            setup: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Initial inner size in logical pixels.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_setup<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut Engine) -> Result<()> + 'static,
    {
        self.setup = Some(Box::new(setup));
        self
    }

    /// Runs the event loop until the window is closed.
    ///
    /// Initializes `env_logger` (default level `info`) unless a logger is
    /// already installed.
    pub fn run(self) -> Result<()> {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init();

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut runner = AppRunner::new(self);
        event_loop.run_app(&mut runner)?;
        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Internal event loop handler.
struct AppRunner {
    title: String,
    size: (u32, u32),
    settings: EngineSettings,
    setup: Option<SetupFn>,

    window: Option<Arc<Window>>,
    engine: Option<Engine>,
    pending: Option<Rc<Cell<Option<FrameRequest>>>>,
    resize_observer: Option<ResizeObserver>,
}

impl AppRunner {
    fn new(app: App) -> Self {
        Self {
            title: app.title,
            size: app.size,
            settings: app.settings,
            setup: app.setup,
            window: None,
            engine: None,
            pending: None,
            resize_observer: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(self.size.0, self.size.1));
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        log::info!("Initializing GPU surface...");

        let scheduler = RedrawScheduler::new(Arc::clone(&window));
        let pending = scheduler.pending_slot();
        let mut engine = Engine::new(
            Box::new(WindowContainer::new(Arc::clone(&window))),
            Box::new(scheduler),
            self.settings.clone(),
        )?;

        if let Some(setup) = self.setup.take() {
            setup(&mut engine)?;
        }

        self.resize_observer = engine.resize_observer();
        self.pending = Some(pending);
        self.engine = Some(engine);
        self.window = Some(window);
        Ok(())
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut engine) = self.engine.take() {
            engine.dispose();
        }
        self.resize_observer = None;
        self.pending = None;
        event_loop.exit();
    }
}

impl ApplicationHandler for AppRunner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("Fatal initialization error: {e}");
            self.shutdown(event_loop);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let (Some(window), Some(engine)) = (&self.window, &mut self.engine) else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(observer) = &self.resize_observer {
                    observer.notify();
                }
            }
            WindowEvent::RedrawRequested => {
                // Redraws the OS asks for on its own carry no frame request.
                let Some(request) = self.pending.as_ref().and_then(|slot| slot.take()) else {
                    return;
                };
                if let Err(e) = engine.frame(request, Instant::now()) {
                    log::error!("Frame error: {e}");
                    self.shutdown(event_loop);
                }
            }
            ref other => {
                input_adapter::process_window_event(
                    engine.input_mut(),
                    other,
                    window.scale_factor(),
                );
            }
        }
    }
}
