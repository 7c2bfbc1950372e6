use glam::Vec4;

use crate::settings::color_from_hex;

/// Physically-inspired surface parameters of a [`Mesh`](super::Mesh).
///
/// Surfaces shade with ambient + directional lighting: `metalness` tints
/// the specular highlight with the base color, `roughness` widens and dims
/// it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshMaterial {
    /// Base color (RGBA, linear).
    pub color: Vec4,
    pub metalness: f32,
    pub roughness: f32,
}

impl Default for MeshMaterial {
    fn default() -> Self {
        Self {
            color: Vec4::ONE,
            metalness: 0.0,
            roughness: 1.0,
        }
    }
}

impl MeshMaterial {
    #[must_use]
    pub fn new(color: Vec4) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    /// Opaque material from a `0xRRGGBB` color.
    #[must_use]
    pub fn from_hex(hex: u32) -> Self {
        Self::new(color_from_hex(hex).extend(1.0))
    }

    #[must_use]
    pub fn with_metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }
}
