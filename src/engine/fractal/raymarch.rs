use glam::{Mat4, Vec2, Vec3, Vec4};

use super::distance::scene_distance;
use super::{EPSILON, FractalParams, MAX_DISTANCE, MAX_STEPS};

/// Outcome of sphere tracing a single ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchResult {
    pub hit: bool,
    /// Step index at which the surface was reached, or the number of steps taken on a miss.
    pub iterations: u32,
    /// Last sampled point along the ray.
    pub point: Vec3,
    /// Distance travelled along the ray when marching stopped.
    pub traveled: f32,
}

/// Sphere-traces from `origin` along (normalized) `direction`.
///
/// Stops on the first sample closer than `EPSILON`, once the ray has travelled past
/// `MAX_DISTANCE`, or after `MAX_STEPS` samples.
pub fn march(origin: Vec3, direction: Vec3, params: &FractalParams) -> MarchResult {
    let mut t = 0.0f32;
    let mut p = origin;

    for i in 0..MAX_STEPS {
        p = origin + direction * t;
        let d = scene_distance(p, params);
        if d < EPSILON {
            return MarchResult {
                hit: true,
                iterations: i,
                point: p,
                traveled: t,
            };
        }

        t += d;
        if t > MAX_DISTANCE {
            return MarchResult {
                hit: false,
                iterations: i + 1,
                point: p,
                traveled: t,
            };
        }
    }

    MarchResult {
        hit: false,
        iterations: MAX_STEPS,
        point: p,
        traveled: t,
    }
}

/// World-space ray direction through normalized device coordinate `ndc` (y up, [-1, 1]).
///
/// The NDC point on the far plane is unprojected into view space (camera looks down -Z) and
/// then rotated into the camera basis spanned by `front` and `up`.
pub fn ray_direction(front: Vec3, up: Vec3, inverse_projection: &Mat4, ndc: Vec2) -> Vec3 {
    let clip = *inverse_projection * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
    let view = (clip.truncate() / clip.w).normalize();

    let right = front.cross(up).normalize();
    let camera_up = right.cross(front);

    (right * view.x + camera_up * view.y - front * view.z).normalize()
}
