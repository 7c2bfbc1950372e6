use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::app::input::{Input, PointerButton};
use crate::scene::transform::Transform;
use crate::settings::ControlSettings;

const POLE_EPS: f32 = 0.0001;
const MOTION_EPS: f32 = 1e-5;

/// Orbit camera controller.
///
/// Keeps the camera on a sphere around `center`:
/// - primary button drag orbits (`theta` around +Y, `phi` from +Y),
/// - secondary button drag pans `center` in the view plane,
/// - the wheel scales `radius`.
///
/// Input is accumulated into pending deltas. With damping enabled a
/// frame-rate independent fraction of each delta is released per update,
/// which gives the motion its inertia; otherwise deltas apply at once.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub enabled: bool,

    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub damping_factor: f32,
    pub enable_damping: bool,
    pub min_distance: f32,
    pub max_distance: f32,

    pub center: Vec3,
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,

    rotate_delta: Vec2,
    /// Pending change of `ln(radius)`
    zoom_delta: f32,
    pan_delta: Vec3,
}

impl OrbitControls {
    #[must_use]
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            enabled: true,

            rotate_speed: 1.0,
            zoom_speed: 0.05,
            pan_speed: 1.0,
            damping_factor: 0.05,
            enable_damping: true,
            min_distance: 1.0,
            max_distance: 1000.0,

            center,
            radius,
            theta: 0.0,
            phi: PI / 2.0,

            rotate_delta: Vec2::ZERO,
            zoom_delta: 0.0,
            pan_delta: Vec3::ZERO,
        }
    }

    /// Builds controls orbiting `center` from the current camera `position`.
    #[must_use]
    pub fn from_settings(settings: &ControlSettings, center: Vec3, position: Vec3) -> Self {
        let mut controls = Self::new(center, 1.0);
        controls.rotate_speed = settings.rotate_speed;
        controls.zoom_speed = settings.zoom_speed;
        controls.pan_speed = settings.pan_speed;
        controls.damping_factor = settings.damping_factor;
        controls.enable_damping = settings.enable_damping;
        controls.min_distance = settings.min_distance;
        controls.max_distance = settings.max_distance;
        controls.set_from_position(position);
        controls
    }

    /// Re-derives the spherical coordinates from a camera position.
    pub fn set_from_position(&mut self, position: Vec3) {
        let offset = position - self.center;
        let radius = offset.length();
        if radius > f32::EPSILON {
            self.theta = offset.x.atan2(offset.z);
            self.phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        }
        self.radius = radius.clamp(self.min_distance, self.max_distance);
    }

    /// Whether damped motion is still being released.
    #[must_use]
    pub fn is_settling(&self) -> bool {
        self.rotate_delta.length_squared() > MOTION_EPS * MOTION_EPS
            || self.zoom_delta.abs() > MOTION_EPS
            || self.pan_delta.length_squared() > MOTION_EPS * MOTION_EPS
    }

    /// Disables the controls and drops any pending motion.
    pub fn release(&mut self) {
        self.enabled = false;
        self.rotate_delta = Vec2::ZERO;
        self.zoom_delta = 0.0;
        self.pan_delta = Vec3::ZERO;
    }

    /// Integrates input and damping for one tick and writes the camera pose.
    ///
    /// `fov` is the camera's vertical field of view in radians; it converts
    /// pan distances from pixels to world units at the orbit radius.
    pub fn update(&mut self, transform: &mut Transform, input: &Input, fov: f32, dt: f32) {
        if !self.enabled {
            return;
        }

        let screen_height = input.screen_size.y.max(1.0);

        if input.is_button_pressed(PointerButton::Primary) {
            let rotate_per_pixel = 2.0 * PI / screen_height;
            self.rotate_delta -= input.cursor_delta * rotate_per_pixel * self.rotate_speed;
        }

        if input.scroll_delta.y != 0.0 {
            // (1 - zoom_speed)^lines per wheel step, positive scroll zooms in
            let step = -(1.0 - self.zoom_speed.clamp(0.0, 0.99)).ln();
            self.zoom_delta -= input.scroll_delta.y * step;
        }

        if input.is_button_pressed(PointerButton::Secondary) {
            let target_world_height = 2.0 * self.radius * (fov / 2.0).tan();
            let pixels_to_world = target_world_height / screen_height;

            let forward = -self.offset_direction();
            let right = forward.cross(Vec3::Y).normalize_or_zero();
            let up = right.cross(forward).normalize_or_zero();

            self.pan_delta += (right * -input.cursor_delta.x + up * input.cursor_delta.y)
                * pixels_to_world
                * self.pan_speed;
        }

        let applied = if self.enable_damping {
            let target_fps = 60.0;
            let retention = (1.0 - self.damping_factor).powf(dt * target_fps);
            1.0 - retention
        } else {
            1.0
        };

        self.theta += self.rotate_delta.x * applied;
        self.phi += self.rotate_delta.y * applied;
        self.rotate_delta *= 1.0 - applied;

        self.radius *= (self.zoom_delta * applied).exp();
        self.zoom_delta *= 1.0 - applied;

        self.center += self.pan_delta * applied;
        self.pan_delta *= 1.0 - applied;

        self.phi = self.phi.clamp(POLE_EPS, PI - POLE_EPS);
        self.radius = self.radius.clamp(self.min_distance, self.max_distance);

        transform.position = self.center + self.offset_direction() * self.radius;
        transform.look_at(self.center, Vec3::Y);
    }

    fn offset_direction(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta)
    }
}
