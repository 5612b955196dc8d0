use glam::{Mat4, Vec3};

use crate::engine::config::CameraConfig;
use crate::engine::fractal::reference::Viewpoint;

/// Pitch is kept shy of straight up/down so `front × up` never degenerates.
pub const PITCH_LIMIT_DEGREES: f32 = 89.0;

/// Free-flying camera driven by yaw/pitch (degrees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Derived from yaw/pitch; always normalized.
    pub front: Vec3,
    pub up: Vec3,
    /// Distance covered by one movement key event.
    pub move_step: f32,
    pub projection: Projection,
}

impl Camera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let pitch = config
            .pitch
            .clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);
        Self {
            position: config.position,
            yaw: config.yaw,
            pitch,
            front: front_from_angles(config.yaw, pitch),
            up: Vec3::Y,
            move_step: config.move_step,
            projection: Projection::new(
                config.fov_y_degrees.to_radians(),
                aspect,
                config.z_near,
                config.z_far,
            ),
        }
    }

    /// Applies an already sensitivity-scaled look delta and re-derives `front`.
    pub fn rotate(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw += yaw_delta;
        self.pitch = (self.pitch + pitch_delta).clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);
        self.front = front_from_angles(self.yaw, self.pitch);
    }

    pub fn right(&self) -> Vec3 {
        self.front.cross(self.up).normalize()
    }

    /// Moves along `front` by `steps` movement steps (negative moves backwards).
    pub fn advance(&mut self, steps: f32) {
        self.position += self.front * (self.move_step * steps);
    }

    /// Moves along the right vector by `steps` movement steps (negative strafes left).
    pub fn strafe(&mut self, steps: f32) {
        self.position += self.right() * (self.move_step * steps);
    }

    pub fn viewpoint(&self) -> Viewpoint {
        Viewpoint {
            position: self.position,
            front: self.front,
            up: self.up,
            inverse_projection: self.projection.inverse,
        }
    }
}

/// Unit look direction for yaw/pitch in degrees; yaw -90 looks down -Z.
pub fn front_from_angles(yaw: f32, pitch: f32) -> Vec3 {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    Vec3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
    .normalize()
}

/// Perspective projection, fixed once the explorer starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub matrix: Mat4,
    pub inverse: Mat4,
}

impl Projection {
    /// Right-handed, zero-to-one depth, camera looking down -Z.
    pub fn new(fov_y_radians: f32, aspect: f32, z_near: f32, z_far: f32) -> Self {
        let matrix = Mat4::perspective_rh(fov_y_radians, aspect, z_near, z_far);
        Self {
            matrix,
            inverse: matrix.inverse(),
        }
    }
}
