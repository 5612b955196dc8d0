use glam::{Vec3, Vec4};

use super::MarchResult;

const SATURATION: f32 = 0.8;
/// Iteration count mapped to one full turn of hue.
const HUE_PERIOD: f32 = 100.0;

/// HSV to RGB, branchless form shared with the fragment shader.
pub fn hsv_to_rgb(hsv: Vec3) -> Vec3 {
    let k = Vec4::new(1.0, 2.0 / 3.0, 1.0 / 3.0, 3.0);
    let h = Vec3::splat(hsv.x) + k.truncate();
    let p = ((h - h.floor()) * 6.0 - Vec3::splat(k.w)).abs();
    let chroma = (p - Vec3::splat(k.x)).clamp(Vec3::ZERO, Vec3::ONE);
    hsv.z * Vec3::splat(k.x).lerp(chroma, hsv.y)
}

/// Escape-time colour for a surface reached after `iterations` marching steps.
pub fn shade(iterations: u32) -> [f32; 3] {
    let i = iterations as f32;
    let hue = i / HUE_PERIOD;
    let value = 1.0 - i / HUE_PERIOD;
    let rgb = hsv_to_rgb(Vec3::new(hue, SATURATION, value));
    rgb.clamp(Vec3::ZERO, Vec3::ONE).to_array()
}

/// Colour for a marched ray; misses are black.
pub fn shade_result(result: &MarchResult) -> [f32; 3] {
    if result.hit {
        shade(result.iterations)
    } else {
        [0.0; 3]
    }
}
