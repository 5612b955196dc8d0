//! Explorer state and the control events that change it.
//!
//! The window layer owns one `ExplorerState` and replaces it with `state.apply(event)` for
//! every translated input event. Nothing else mutates it.

use glam::Vec3;

use crate::engine::camera::Camera;
use crate::engine::config::{ControlConfig, ExplorerConfig};
use crate::engine::fractal::FractalParams;

/// A user intent, already decoupled from the windowing library.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    /// Switch between mouse-look and free cursor.
    ToggleCapture,
    SensitivityDown,
    SensitivityUp,
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    ScaleUp,
    ScaleDown,
    ZoomIn,
    ZoomOut,
    /// Nudge `debug_offset` one step along this unit axis.
    Offset(Vec3),
    /// Raw mouse motion in device units (x right, y down).
    Look { dx: f32, dy: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplorerState {
    pub camera: Camera,
    pub fractal: FractalParams,
    pub controls: ControlConfig,
    pub sensitivity: f32,
    pub mouse_captured: bool,
}

impl ExplorerState {
    pub fn new(config: &ExplorerConfig) -> Self {
        let controls = config.controls;
        Self {
            camera: Camera::new(&config.camera, config.window.aspect()),
            fractal: config.fractal,
            controls,
            // max-then-min instead of clamp: unchecked bounds must not panic.
            sensitivity: controls
                .mouse_sensitivity
                .max(controls.min_sensitivity)
                .min(controls.max_sensitivity),
            mouse_captured: controls.capture_mouse,
        }
    }

    /// Returns the state after handling `event`.
    pub fn apply(mut self, event: ControlEvent) -> Self {
        let c = self.controls;
        match event {
            ControlEvent::ToggleCapture => self.mouse_captured = !self.mouse_captured,
            ControlEvent::SensitivityDown => {
                self.sensitivity = (self.sensitivity - c.sensitivity_step).max(c.min_sensitivity);
            }
            ControlEvent::SensitivityUp => {
                self.sensitivity = (self.sensitivity + c.sensitivity_step).min(c.max_sensitivity);
            }
            ControlEvent::MoveForward => self.camera.advance(1.0),
            ControlEvent::MoveBackward => self.camera.advance(-1.0),
            ControlEvent::StrafeLeft => self.camera.strafe(-1.0),
            ControlEvent::StrafeRight => self.camera.strafe(1.0),
            ControlEvent::ScaleUp => self.fractal.scale += c.scale_step,
            ControlEvent::ScaleDown => self.fractal.scale -= c.scale_step,
            ControlEvent::ZoomIn => self.fractal.debug_zoom *= c.zoom_in_factor,
            ControlEvent::ZoomOut => self.fractal.debug_zoom *= c.zoom_out_factor,
            ControlEvent::Offset(axis) => self.fractal.debug_offset += axis * c.offset_step,
            ControlEvent::Look { dx, dy } => {
                if self.mouse_captured {
                    // Screen y grows downwards, pitch grows upwards.
                    self.camera
                        .rotate(dx * self.sensitivity, -dy * self.sensitivity);
                }
            }
        }
        self
    }

    pub fn apply_all(self, events: impl IntoIterator<Item = ControlEvent>) -> Self {
        events.into_iter().fold(self, Self::apply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::camera::PITCH_LIMIT_DEGREES;

    fn state() -> ExplorerState {
        ExplorerState::new(&ExplorerConfig::default())
    }

    fn captured() -> ExplorerState {
        state().apply(ControlEvent::ToggleCapture)
    }

    #[test]
    fn starts_with_documented_defaults() {
        let s = state();
        assert!(!s.mouse_captured);
        assert_eq!(s.sensitivity, 0.05);
        assert_eq!(s.fractal, FractalParams::default());
        assert_eq!(s.camera.position, Vec3::ZERO);
    }

    #[test]
    fn inverted_sensitivity_bounds_do_not_panic() {
        let mut config = ExplorerConfig::default();
        config.controls.min_sensitivity = 0.6;
        let s = ExplorerState::new(&config)
            .apply(ControlEvent::SensitivityUp)
            .apply(ControlEvent::SensitivityDown);
        assert!(s.sensitivity.is_finite());
    }

    #[test]
    fn escape_toggles_capture_both_ways() {
        let s = state().apply(ControlEvent::ToggleCapture);
        assert!(s.mouse_captured);
        assert!(!s.apply(ControlEvent::ToggleCapture).mouse_captured);
    }

    #[test]
    fn mouse_is_ignored_while_free() {
        let before = state();
        let after = before.apply(ControlEvent::Look { dx: 500.0, dy: -300.0 });
        assert_eq!(before, after);
    }

    #[test]
    fn mouse_drives_pitch_to_upper_clamp() {
        // 0.05 deg per unit, 4000 units upward = +200 degrees requested.
        let s = captured().apply_all((0..40).map(|_| ControlEvent::Look { dx: 0.0, dy: -100.0 }));
        assert_eq!(s.camera.pitch, PITCH_LIMIT_DEGREES);
    }

    #[test]
    fn mouse_drives_pitch_to_lower_clamp() {
        let s = captured().apply_all((0..40).map(|_| ControlEvent::Look { dx: 0.0, dy: 100.0 }));
        assert_eq!(s.camera.pitch, -PITCH_LIMIT_DEGREES);
    }

    #[test]
    fn mouse_x_changes_yaw_by_sensitivity() {
        let s = captured().apply(ControlEvent::Look { dx: 100.0, dy: 0.0 });
        assert!((s.camera.yaw - (-90.0 + 5.0)).abs() < 1e-4);
    }

    #[test]
    fn sensitivity_stays_in_bounds() {
        let mut s = state();
        for _ in 0..100 {
            s = s.apply(ControlEvent::SensitivityDown);
            assert!(s.sensitivity >= 0.01 && s.sensitivity <= 0.5);
        }
        assert_eq!(s.sensitivity, 0.01);

        for _ in 0..100 {
            s = s.apply(ControlEvent::SensitivityUp);
            assert!(s.sensitivity >= 0.01 && s.sensitivity <= 0.5);
        }
        assert_eq!(s.sensitivity, 0.5);
    }

    #[test]
    fn movement_follows_front_and_right() {
        let s = state().apply(ControlEvent::MoveForward);
        assert!(s.camera.position.abs_diff_eq(Vec3::new(0.0, 0.0, -0.1), 1e-6));

        let s = s.apply(ControlEvent::MoveBackward).apply(ControlEvent::StrafeRight);
        assert!(s.camera.position.abs_diff_eq(Vec3::new(0.1, 0.0, 0.0), 1e-6));

        let s = s.apply(ControlEvent::StrafeLeft).apply(ControlEvent::StrafeLeft);
        assert!(s.camera.position.abs_diff_eq(Vec3::new(-0.1, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn fractal_parameter_keys() {
        let s = state()
            .apply(ControlEvent::ScaleUp)
            .apply(ControlEvent::ScaleUp)
            .apply(ControlEvent::ScaleDown);
        assert!((s.fractal.scale - 2.1).abs() < 1e-5);

        let s = s.apply(ControlEvent::ZoomIn);
        assert!((s.fractal.debug_zoom - 0.9).abs() < 1e-6);
        let s = s.apply(ControlEvent::ZoomOut);
        assert!((s.fractal.debug_zoom - 0.99).abs() < 1e-6);

        let s = s
            .apply(ControlEvent::Offset(Vec3::Y))
            .apply(ControlEvent::Offset(Vec3::NEG_X))
            .apply(ControlEvent::Offset(Vec3::Z))
            .apply(ControlEvent::Offset(Vec3::Z));
        assert!(s.fractal.debug_offset.abs_diff_eq(Vec3::new(-0.1, 0.1, 0.2), 1e-6));
    }

    #[test]
    fn max_iterations_is_never_touched() {
        let events = [
            ControlEvent::ScaleUp,
            ControlEvent::ZoomOut,
            ControlEvent::Offset(Vec3::X),
            ControlEvent::MoveForward,
        ];
        assert_eq!(state().apply_all(events).fractal.max_iterations, 100);
    }
}
