//! Frame loop runtime
//!
//! - [`AnimationLoop`]: Stopped → Running → Stopped frame state machine
//! - [`FrameScheduler`]: host frame primitive, with [`ManualScheduler`] for
//!   headless hosts
//! - [`ResizeWatcher`] / [`ResizeObserver`]: asynchronous container size
//!   notifications

pub mod animation_loop;
pub mod resize_watcher;
pub mod scheduler;

pub use animation_loop::{AnimationLoop, LoopState};
pub use resize_watcher::{ResizeObserver, ResizeWatcher};
pub use scheduler::{FrameRequest, FrameScheduler, ManualScheduler};
