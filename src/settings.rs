//! Engine Settings
//!
//! Construction-time configuration for [`Engine`](crate::Engine): camera
//! projection, default lighting, orbit controls and frame timing.
//!
//! Every field has a default matching the stock visualization view, so most
//! hosts never touch this type. Settings can also be loaded from JSON; missing
//! fields fall back to their defaults.
//!
//! ```
//! use myth_viz::EngineSettings;
//!
//! # fn main() -> myth_viz::Result<()> {
//! let settings = EngineSettings::default()
//!     .with_fov(60.0)
//!     .with_distance_bounds(2.0, 20.0);
//! settings.validate()?;
//!
//! let from_json = EngineSettings::from_json(r#"{ "camera_distance": 8.0 }"#)?;
//! assert_eq!(from_json.camera_distance, 8.0);
//! # Ok(())
//! # }
//! ```

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, VizError};

/// Converts a `0xRRGGBB` hex color into linear-ish RGB components in `[0, 1]`.
#[must_use]
pub fn color_from_hex(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Vec3::new(r, g, b)
}

/// Color and intensity of the ambient light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightSettings {
    pub color: Vec3,
    pub intensity: f32,
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 0.5,
        }
    }
}

/// Color, intensity and position of the directional light.
///
/// The light shines from `position` towards the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalLightSettings {
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
}

impl Default for DirectionalLightSettings {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 0.8,
            position: Vec3::ONE,
        }
    }
}

/// Orbit controls configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    pub enable_damping: bool,
    /// Fraction of the pending motion released per 60 Hz frame.
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 0.05,
            pan_speed: 1.0,
            min_distance: 1.0,
            max_distance: 50.0,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Initial camera distance from the origin along +Z.
    pub camera_distance: f32,
    /// Clear color (RGBA). `None` leaves the surface's default.
    pub background: Option<Vec4>,
    pub ambient: LightSettings,
    pub directional: DirectionalLightSettings,
    pub controls: ControlSettings,
    /// Upper bound for the per-frame delta in seconds.
    ///
    /// A host that suspends frame callbacks (hidden tab, minimized window)
    /// would otherwise hand a multi-second delta to every update callback on
    /// resume.
    pub max_frame_delta: f32,
    /// Present with vertical sync (GPU surfaces only).
    pub vsync: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            camera_distance: 5.0,
            background: Some(color_from_hex(0x00f0_f0f0).extend(1.0)),
            ambient: LightSettings::default(),
            directional: DirectionalLightSettings::default(),
            controls: ControlSettings::default(),
            max_frame_delta: 0.1,
            vsync: true,
        }
    }
}

impl EngineSettings {
    /// Parses settings from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks that the settings describe a usable camera and loop.
    pub fn validate(&self) -> Result<()> {
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(VizError::InvalidSettings(format!(
                "fov must be in (0, 180) degrees, got {}",
                self.fov
            )));
        }
        if !(self.near > 0.0 && self.far > self.near && self.far.is_finite()) {
            return Err(VizError::InvalidSettings(format!(
                "expected 0 < near < far, got near={} far={}",
                self.near, self.far
            )));
        }
        if !(self.camera_distance > 0.0 && self.camera_distance.is_finite()) {
            return Err(VizError::InvalidSettings(format!(
                "camera_distance must be positive and finite, got {}",
                self.camera_distance
            )));
        }
        let controls = &self.controls;
        if !(controls.min_distance > 0.0 && controls.max_distance >= controls.min_distance) {
            return Err(VizError::InvalidSettings(format!(
                "expected 0 < min_distance <= max_distance, got {}..{}",
                controls.min_distance, controls.max_distance
            )));
        }
        if !(0.0..=1.0).contains(&controls.damping_factor) {
            return Err(VizError::InvalidSettings(format!(
                "damping_factor must be in [0, 1], got {}",
                controls.damping_factor
            )));
        }
        if !(self.max_frame_delta > 0.0 && self.max_frame_delta.is_finite()) {
            return Err(VizError::InvalidSettings(format!(
                "max_frame_delta must be positive and finite, got {}",
                self.max_frame_delta
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_fov(mut self, fov_degrees: f32) -> Self {
        self.fov = fov_degrees;
        self
    }

    #[must_use]
    pub fn with_clip_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    #[must_use]
    pub fn with_camera_distance(mut self, distance: f32) -> Self {
        self.camera_distance = distance;
        self
    }

    #[must_use]
    pub fn with_background(mut self, background: Option<Vec4>) -> Self {
        self.background = background;
        self
    }

    #[must_use]
    pub fn with_damping(mut self, enabled: bool, factor: f32) -> Self {
        self.controls.enable_damping = enabled;
        self.controls.damping_factor = factor;
        self
    }

    #[must_use]
    pub fn with_distance_bounds(mut self, min: f32, max: f32) -> Self {
        self.controls.min_distance = min;
        self.controls.max_distance = max;
        self
    }

    #[must_use]
    pub fn with_max_frame_delta(mut self, seconds: f32) -> Self {
        self.max_frame_delta = seconds;
        self
    }
}
