use glam::Vec3;
use uuid::Uuid;

/// Light kinds supported by the visualization scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Uniform light from every direction.
    Ambient,
    /// Parallel rays shining from the light's position towards the origin.
    Directional,
}

#[derive(Debug, Clone)]
pub struct Light {
    pub uuid: Uuid,
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,
    /// Only meaningful for directional lights.
    pub position: Vec3,
}

impl Light {
    #[must_use]
    pub fn new_ambient(color: Vec3, intensity: f32) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            color,
            intensity,
            kind: LightKind::Ambient,
            position: Vec3::ZERO,
        }
    }

    #[must_use]
    pub fn new_directional(color: Vec3, intensity: f32, position: Vec3) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            color,
            intensity,
            kind: LightKind::Directional,
            position,
        }
    }

    /// Unit vector pointing from the scene towards the light.
    ///
    /// Zero for ambient lights and for directional lights placed at the origin.
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        match self.kind {
            LightKind::Ambient => Vec3::ZERO,
            LightKind::Directional => self.position.normalize_or_zero(),
        }
    }

    /// Color premultiplied by intensity.
    #[inline]
    #[must_use]
    pub fn radiance(&self) -> Vec3 {
        self.color * self.intensity
    }
}
