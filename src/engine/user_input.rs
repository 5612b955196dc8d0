//! Input handling (winit -> control events).
//!
//! Keeps `Windowing` focused on window lifecycle + rendering. `UserInput` turns raw window
//! and device events into `ControlEvent`s, which the window loop feeds into the explorer
//! state in arrival order.

use glam::Vec3;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::engine::state::ControlEvent;

/// Maps a physical key to its control.
///
/// Mode and sensitivity keys fire once per physical press; everything else also fires on
/// auto-repeat, so holding a key keeps moving.
pub fn control_for_key(code: KeyCode, repeat: bool) -> Option<ControlEvent> {
    let once = match code {
        KeyCode::Escape => Some(ControlEvent::ToggleCapture),
        KeyCode::ArrowLeft => Some(ControlEvent::SensitivityDown),
        KeyCode::ArrowRight => Some(ControlEvent::SensitivityUp),
        _ => None,
    };
    if once.is_some() {
        return if repeat { None } else { once };
    }

    let event = match code {
        KeyCode::KeyW => ControlEvent::MoveForward,
        KeyCode::KeyS => ControlEvent::MoveBackward,
        KeyCode::KeyA => ControlEvent::StrafeLeft,
        KeyCode::KeyD => ControlEvent::StrafeRight,
        KeyCode::Equal => ControlEvent::ScaleUp,
        KeyCode::Minus => ControlEvent::ScaleDown,
        KeyCode::KeyQ => ControlEvent::ZoomIn,
        KeyCode::KeyE => ControlEvent::ZoomOut,
        KeyCode::KeyI => ControlEvent::Offset(Vec3::Y),
        KeyCode::KeyK => ControlEvent::Offset(Vec3::NEG_Y),
        KeyCode::KeyJ => ControlEvent::Offset(Vec3::NEG_X),
        KeyCode::KeyL => ControlEvent::Offset(Vec3::X),
        KeyCode::KeyU => ControlEvent::Offset(Vec3::NEG_Z),
        KeyCode::KeyO => ControlEvent::Offset(Vec3::Z),
        _ => return None,
    };
    Some(event)
}

/// Stateful input event processor.
#[derive(Default, Debug, Clone)]
pub struct UserInput {
    pending: Vec<ControlEvent>,
}

impl UserInput {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle_key_event(&mut self, event: &KeyEvent) -> bool {
        if event.state != ElementState::Pressed {
            return false;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return false;
        };
        match control_for_key(code, event.repeat) {
            Some(control) => {
                self.pending.push(control);
                true
            }
            None => false,
        }
    }

    /// Feed a winit window event into this input handler.
    ///
    /// Returns `true` if the event was recognized/consumed as input.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => self.handle_key_event(event),
            _ => false,
        }
    }

    /// Raw pointer motion from `DeviceEvent::MouseMotion`.
    pub fn handle_mouse_motion(&mut self, delta: (f64, f64)) {
        let (dx, dy) = (delta.0 as f32, delta.1 as f32);
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        self.pending.push(ControlEvent::Look { dx, dy });
    }

    /// Takes all events queued since the last call, oldest first.
    pub fn drain(&mut self) -> std::vec::Drain<'_, ControlEvent> {
        self.pending.drain(..)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
