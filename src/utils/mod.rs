//! Utility Module
//!
//! - [`OrbitControls`]: damped orbit/zoom/pan camera controller
//! - [`Timer`]: frame delta measurement with clamping

pub mod orbit_control;
pub mod time;

pub use orbit_control::OrbitControls;
pub use time::Timer;
