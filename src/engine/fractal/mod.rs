//! Host-side Mandelbox evaluation.
//!
//! The fragment shader in `assets/shaders/mandelbox.frag` runs the same distance estimator,
//! sphere tracer and escape-time colouring per pixel. Everything here is plain CPU code so it
//! can be tested without a GPU and used for offline snapshots. Keep both sides in lockstep.

pub mod distance;
pub mod raymarch;
pub mod reference;
pub mod shading;

use glam::Vec3;
use serde::{Deserialize, Serialize};

pub use distance::{distance_estimate, scene_distance};
pub use raymarch::{MarchResult, march, ray_direction};
pub use shading::{shade, shade_result};

/// Surface hit threshold for the sphere tracer.
pub const EPSILON: f32 = 0.001;
/// Rays that travel further than this are misses.
pub const MAX_DISTANCE: f32 = 100.0;
/// Hard cap on sphere-tracing steps per ray.
pub const MAX_STEPS: u32 = 200;

/// User-tweakable fractal parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalParams {
    /// Folding scale factor.
    pub scale: f32,
    /// Iteration bound for the distance estimator. Fixed once the window is up.
    pub max_iterations: u32,
    /// Multiplicative zoom applied to sample points before folding.
    pub debug_zoom: f32,
    /// Additive offset applied to sample points before folding.
    pub debug_offset: Vec3,
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            scale: 2.0,
            max_iterations: 100,
            debug_zoom: 1.0,
            debug_offset: Vec3::ZERO,
        }
    }
}
