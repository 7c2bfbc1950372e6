//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! The main error type [`VizError`] covers:
//! - Initialization failures (missing render surface, GPU setup)
//! - Use of an engine after it has been disposed
//! - Settings validation and parsing
//! - Per-frame surface failures
//!
//! Removing or updating a visualization that is not registered is *not* an
//! error: those calls are defined as no-ops.
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for `std::result::Result<T, VizError>`.
//!
//! ```
//! use myth_viz::Engine;
//! use myth_viz::errors::{Result, VizError};
//!
//! fn refresh(engine: &mut Engine) -> Result<()> {
//!     match engine.resize() {
//!         Err(VizError::Disposed) => Ok(()),
//!         other => other,
//!     }
//! }
//! ```

use thiserror::Error;

/// The main error type for the visualization engine.
#[derive(Error, Debug)]
pub enum VizError {
    // ========================================================================
    // Lifecycle Errors
    // ========================================================================
    /// The engine could not be constructed, e.g. the container has no
    /// renderable surface or the GPU surface could not be configured.
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// A mutating call was made after [`Engine::dispose`](crate::Engine::dispose).
    #[error("Engine has been disposed")]
    Disposed,

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Engine settings failed validation.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ========================================================================
    // Rendering Errors
    // ========================================================================
    /// The render surface failed to produce or present a frame.
    #[error("Surface error: {0}")]
    Surface(String),

    /// Failed to create the GPU device.
    #[cfg(feature = "wgpu")]
    #[error("Failed to create WGPU device: {0}")]
    DeviceCreateFailed(#[from] wgpu::RequestDeviceError),

    /// Window handle error.
    #[cfg(feature = "wgpu")]
    #[error("Window system error: {0}")]
    WindowError(#[from] raw_window_handle::HandleError),

    // ========================================================================
    // Platform Errors
    // ========================================================================
    /// Event loop error (winit).
    #[cfg(feature = "winit")]
    #[error("Event loop error: {0}")]
    EventLoopError(#[from] winit::error::EventLoopError),

    /// Window creation error (winit).
    #[cfg(feature = "winit")]
    #[error("Window creation error: {0}")]
    OsError(#[from] winit::error::OsError),
}

/// Alias for `Result<T, VizError>`.
pub type Result<T> = std::result::Result<T, VizError>;
