//! Host integration
//!
//! - [`input`]: platform-agnostic pointer state consumed by the orbit controls
//! - `winit` (feature `winit`): native window runner

pub mod input;
#[cfg(feature = "winit")]
pub mod winit;

#[cfg(feature = "winit")]
pub use self::winit::App;
