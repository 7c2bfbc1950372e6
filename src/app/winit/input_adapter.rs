//! Winit input event adapter
//!
//! Translates winit pointer events into the engine's platform-independent
//! [`Input`]. Positions are converted to logical pixels so they share the
//! coordinate space of the container's content box.

use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use crate::app::input::{ButtonState, Input, PointerButton};

/// Pixel wheel deltas (touchpads) are scaled down to roughly one line.
const PIXEL_SCROLL_SCALE: f32 = 0.01;

#[must_use]
pub fn translate_pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Auxiliary,
        MouseButton::Back => PointerButton::Other(3),
        MouseButton::Forward => PointerButton::Other(4),
        MouseButton::Other(id) => PointerButton::Other(id),
    }
}

#[must_use]
pub fn translate_element_state(state: ElementState) -> ButtonState {
    match state {
        ElementState::Pressed => ButtonState::Pressed,
        ElementState::Released => ButtonState::Released,
    }
}

/// Feeds one window event into `input`. Non-pointer events are ignored.
pub fn process_window_event(input: &mut Input, event: &WindowEvent, scale_factor: f64) {
    match event {
        WindowEvent::CursorMoved { position, .. } => {
            let logical = position.to_logical::<f32>(scale_factor);
            input.inject_pointer_position(logical.x, logical.y);
        }

        WindowEvent::CursorLeft { .. } => {
            input.inject_pointer_left();
        }

        WindowEvent::MouseInput { state, button, .. } => {
            input.inject_button(
                translate_pointer_button(*button),
                translate_element_state(*state),
            );
        }

        WindowEvent::MouseWheel { delta, .. } => {
            let (dx, dy) = match delta {
                MouseScrollDelta::LineDelta(x, y) => (*x, *y),
                MouseScrollDelta::PixelDelta(pos) => (
                    pos.x as f32 * PIXEL_SCROLL_SCALE,
                    pos.y as f32 * PIXEL_SCROLL_SCALE,
                ),
            };
            input.inject_scroll(dx, dy);
        }

        _ => {}
    }
}
