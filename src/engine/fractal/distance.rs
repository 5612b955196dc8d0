use glam::Vec3;

use super::{EPSILON, FractalParams};

/// Trajectories leaving this radius count as escaped.
pub const ESCAPE_RADIUS: f32 = 6.0;
/// Below this radius the sphere fold applies the constant inner scaling.
pub const MIN_RADIUS: f32 = 0.5;
/// Below this radius (and above `MIN_RADIUS`) the sphere fold inverts.
pub const FIXED_RADIUS: f32 = 1.0;
/// `FIXED_RADIUS² / MIN_RADIUS²`
const INNER_SCALE: f32 = 4.0;

/// Returned when the estimate is undefined (trajectory pinned at the origin).
///
/// Equal to the hit threshold, so the marcher treats the sample as "not hit yet" and
/// advances by the smallest step that still makes progress.
pub const MIN_STEP: f32 = EPSILON;

/// Box fold of a single component: reflects values outside [-1, 1] back inside.
#[inline]
pub fn box_fold(v: f32) -> f32 {
    v.clamp(-1.0, 1.0) * 2.0 - v
}

#[inline]
pub fn box_fold_vec(z: Vec3) -> Vec3 {
    Vec3::new(box_fold(z.x), box_fold(z.y), box_fold(z.z))
}

/// Sphere fold scaling for a trajectory point at radius `r`.
///
/// `r < 0.5` scales by 4, `0.5 <= r < 1` by `1/r²`, anything else is left alone. The two
/// inner branches agree at `r == 0.5`.
#[inline]
pub fn sphere_fold_factor(r: f32) -> f32 {
    if r < MIN_RADIUS {
        INNER_SCALE
    } else if r < FIXED_RADIUS {
        1.0 / (r * r)
    } else {
        1.0
    }
}

/// Mandelbox distance estimate for `point`, or `None` when it is undefined (trajectory
/// pinned at the origin, or the formula overflowed).
///
/// Note the sphere fold uses the radius measured before the box fold; the shader does the
/// same and both must agree.
fn try_distance_estimate(point: Vec3, params: &FractalParams) -> Option<f32> {
    let mut z = point;
    let mut dr = 1.0f32;
    let mut r = 0.0f32;

    for _ in 0..params.max_iterations {
        r = z.length();
        if r > ESCAPE_RADIUS {
            break;
        }

        z = box_fold_vec(z);

        let factor = sphere_fold_factor(r);
        z *= factor;
        dr *= factor;

        z = z * params.scale + point;
        dr = dr * params.scale.abs() + 1.0;
    }

    // ln(0) would poison the whole ray with NaN.
    if r <= 0.0 {
        return None;
    }

    let de = 0.5 * r.ln() * r / dr;
    de.is_finite().then_some(de)
}

/// Mandelbox distance estimate for `point`; `MIN_STEP` where the estimate is undefined.
pub fn distance_estimate(point: Vec3, params: &FractalParams) -> f32 {
    try_distance_estimate(point, params).unwrap_or(MIN_STEP)
}

/// Distance to the fractal as seen from world space, with the debug zoom/offset applied.
///
/// The sample point is mapped to `p * zoom + offset` and the estimate is divided by the
/// zoom again so the bound stays in world units. The `MIN_STEP` fallback is returned
/// unscaled: dividing it by a zoom above 1 would drop it under the hit threshold.
pub fn scene_distance(p: Vec3, params: &FractalParams) -> f32 {
    let q = p * params.debug_zoom + params.debug_offset;
    try_distance_estimate(q, params).map_or(MIN_STEP, |de| de / params.debug_zoom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_fold_samples() {
        assert_eq!(box_fold(0.5), 0.5);
        assert_eq!(box_fold(1.5), 0.5);
        // 2 * clamp(-2) - (-2) = -2 + 2
        assert_eq!(box_fold(-2.0), 0.0);
        assert_eq!(box_fold(-3.0), 1.0);
        assert_eq!(box_fold(-0.3), -0.3);
        assert_eq!(box_fold(1.0), 1.0);
        assert_eq!(box_fold(-1.0), -1.0);
    }

    #[test]
    fn box_fold_vec_is_componentwise() {
        let folded = box_fold_vec(Vec3::new(0.5, 1.5, -2.0));
        assert_eq!(folded, Vec3::new(box_fold(0.5), box_fold(1.5), box_fold(-2.0)));
    }

    #[test]
    fn box_fold_keeps_inner_components() {
        for i in -10..=10 {
            let v = i as f32 * 0.1;
            assert!((box_fold(v) - v).abs() < 1e-6, "v={v}");
        }
    }

    #[test]
    fn sphere_fold_branches_have_no_gap() {
        assert_eq!(sphere_fold_factor(0.0), 4.0);
        assert_eq!(sphere_fold_factor(0.49), 4.0);
        // Both inner branches give 4 at the boundary.
        assert_eq!(sphere_fold_factor(0.5), 4.0);
        assert!((sphere_fold_factor(0.8) - 1.0 / 0.64).abs() < 1e-6);
        assert!(sphere_fold_factor(0.999) > 1.0);
        assert_eq!(sphere_fold_factor(1.0), 1.0);
        assert_eq!(sphere_fold_factor(3.0), 1.0);
    }

    #[test]
    fn sphere_fold_is_continuous_at_fixed_radius() {
        let below = sphere_fold_factor(1.0 - 1e-4);
        assert!((below - 1.0).abs() < 1e-3);
    }

    #[test]
    fn origin_is_finite_minimum_step() {
        let params = FractalParams::default();
        let d = distance_estimate(Vec3::ZERO, &params);
        assert!(d.is_finite());
        assert_eq!(d, MIN_STEP);
    }

    #[test]
    fn zero_iterations_is_finite() {
        let params = FractalParams {
            max_iterations: 0,
            ..Default::default()
        };
        assert_eq!(distance_estimate(Vec3::new(3.0, 0.0, 0.0), &params), MIN_STEP);
    }

    #[test]
    fn far_points_are_positive() {
        let params = FractalParams::default();
        for p in [
            Vec3::new(20.0, 0.0, 0.0),
            Vec3::new(0.0, -15.0, 7.0),
            Vec3::splat(10.0),
        ] {
            let d = distance_estimate(p, &params);
            assert!(d.is_finite() && d > EPSILON, "p={p:?} d={d}");
        }
    }

    #[test]
    fn escape_on_first_iteration_matches_formula() {
        let params = FractalParams::default();
        let p = Vec3::new(0.0, 0.0, 20.0);
        let expected = 0.5 * 20.0f32.ln() * 20.0;
        assert!((distance_estimate(p, &params) - expected).abs() < 1e-4);
    }

    #[test]
    fn bounded_orbit_is_inside() {
        // The orbit of (0, 0, 3) bounces between z = 5 and z = -3 and never escapes.
        let params = FractalParams::default();
        let d = distance_estimate(Vec3::new(0.0, 0.0, 3.0), &params);
        assert!(d.is_finite());
        assert!(d < EPSILON);
    }

    #[test]
    fn default_debug_transform_is_identity() {
        let params = FractalParams::default();
        let p = Vec3::new(1.5, -0.25, 4.0);
        assert_eq!(scene_distance(p, &params), distance_estimate(p, &params));
    }

    #[test]
    fn debug_offset_shifts_sample_point() {
        let shifted = FractalParams {
            debug_offset: Vec3::new(0.0, 0.0, 17.0),
            ..Default::default()
        };
        let p = Vec3::new(0.0, 0.0, 3.0);
        let expected = distance_estimate(Vec3::new(0.0, 0.0, 20.0), &FractalParams::default());
        assert_eq!(scene_distance(p, &shifted), expected);
    }

    #[test]
    fn debug_zoom_rescales_distance() {
        let zoomed = FractalParams {
            debug_zoom: 2.0,
            ..Default::default()
        };
        let p = Vec3::new(0.0, 10.0, 0.0);
        let expected = distance_estimate(Vec3::new(0.0, 20.0, 0.0), &FractalParams::default()) / 2.0;
        assert!((scene_distance(p, &zoomed) - expected).abs() < 1e-5);
    }

    #[test]
    fn fallback_is_not_rescaled_by_zoom() {
        for debug_zoom in [0.5, 1.0, 1.1, 4.0] {
            let params = FractalParams {
                debug_zoom,
                ..Default::default()
            };
            assert_eq!(scene_distance(Vec3::ZERO, &params), MIN_STEP, "zoom={debug_zoom}");
        }
    }
}
