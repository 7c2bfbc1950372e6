//! Platform-agnostic pointer input
//!
//! Hosts translate their native pointer events into these calls; the orbit
//! controls read the accumulated state once per tick.

use glam::Vec2;
use rustc_hash::FxHashSet;

/// Pointer button (platform-agnostic).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Left mouse button / single touch. Orbits the camera.
    Primary,
    /// Right mouse button / two-finger drag. Pans the camera.
    Secondary,
    /// Middle mouse button.
    Auxiliary,
    Other(u16),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

#[derive(Default, Debug, Clone)]
pub struct Input {
    /// Current pointer position inside the container
    pub cursor_position: Vec2,
    /// Pointer motion accumulated since the last tick
    pub cursor_delta: Vec2,
    /// Wheel motion accumulated since the last tick, in lines
    pub scroll_delta: Vec2,
    /// Container size
    pub screen_size: Vec2,
    pressed: FxHashSet<PointerButton>,
    has_cursor: bool,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the per-tick deltas so motion is not applied twice.
    pub fn end_frame(&mut self) {
        self.cursor_delta = Vec2::ZERO;
        self.scroll_delta = Vec2::ZERO;
    }

    /// Drops every pressed button and pending delta.
    pub fn reset(&mut self) {
        self.end_frame();
        self.pressed.clear();
        self.has_cursor = false;
    }

    pub fn inject_resize(&mut self, width: u32, height: u32) {
        self.screen_size = Vec2::new(width as f32, height as f32);
    }

    pub fn inject_pointer_position(&mut self, x: f32, y: f32) {
        let new_pos = Vec2::new(x, y);
        // The first sample only establishes the reference position.
        if self.has_cursor {
            self.cursor_delta += new_pos - self.cursor_position;
        }
        self.cursor_position = new_pos;
        self.has_cursor = true;
    }

    /// Leaving the container ends the current drag reference.
    pub fn inject_pointer_left(&mut self) {
        self.has_cursor = false;
    }

    pub fn inject_button(&mut self, button: PointerButton, state: ButtonState) {
        match state {
            ButtonState::Pressed => {
                self.pressed.insert(button);
            }
            ButtonState::Released => {
                self.pressed.remove(&button);
            }
        }
    }

    /// Wheel motion in lines; positive `dy` zooms in.
    pub fn inject_scroll(&mut self, dx: f32, dy: f32) {
        self.scroll_delta += Vec2::new(dx, dy);
    }

    #[must_use]
    pub fn is_button_pressed(&self, button: PointerButton) -> bool {
        self.pressed.contains(&button)
    }
}
