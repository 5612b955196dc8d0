//! CPU reference renderer.
//!
//! Produces the same picture the fragment shader would, one ray per pixel, so a frame can be
//! inspected or diffed without a GPU.

use glam::{Mat4, Vec2, Vec3};
use image::{Rgb, RgbImage};
use log::debug;

use super::{FractalParams, march, ray_direction, shade_result};

/// Everything needed to generate primary rays.
#[derive(Debug, Clone, Copy)]
pub struct Viewpoint {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub inverse_projection: Mat4,
}

/// NDC of the centre of pixel (`x`, `y`); rows run top to bottom, NDC y points up.
///
/// Mirrors the `gl_FragCoord` handling in the fragment shader.
pub fn pixel_ndc(x: u32, y: u32, width: u32, height: u32) -> Vec2 {
    let uv = Vec2::new(
        (x as f32 + 0.5) / width as f32,
        (y as f32 + 0.5) / height as f32,
    ) * 2.0
        - Vec2::ONE;
    Vec2::new(uv.x, -uv.y)
}

fn to_rgb8(color: [f32; 3]) -> Rgb<u8> {
    Rgb(color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
}

pub fn render_reference(
    view: &Viewpoint,
    params: &FractalParams,
    width: u32,
    height: u32,
) -> RgbImage {
    let mut hits = 0usize;
    let img = RgbImage::from_fn(width, height, |x, y| {
        let ndc = pixel_ndc(x, y, width, height);
        let dir = ray_direction(view.front, view.up, &view.inverse_projection, ndc);
        let result = march(view.position, dir, params);
        hits += result.hit as usize;
        to_rgb8(shade_result(&result))
    });

    debug!(
        "reference render {}x{}: {} of {} rays hit",
        width,
        height,
        hits,
        width as usize * height as usize
    );
    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fractal::shade;

    fn viewpoint(position: Vec3, front: Vec3) -> Viewpoint {
        Viewpoint {
            position,
            front,
            up: Vec3::Y,
            inverse_projection: Mat4::perspective_rh(90f32.to_radians(), 16.0 / 9.0, 0.1, 100.0)
                .inverse(),
        }
    }

    #[test]
    fn pixel_centres_span_ndc() {
        assert_eq!(pixel_ndc(0, 0, 2, 2), Vec2::new(-0.5, 0.5));
        assert_eq!(pixel_ndc(1, 1, 2, 2), Vec2::new(0.5, -0.5));
        assert_eq!(pixel_ndc(1, 1, 3, 3), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn image_has_requested_size() {
        let img = render_reference(
            &viewpoint(Vec3::ZERO, Vec3::NEG_Z),
            &FractalParams::default(),
            16,
            9,
        );
        assert_eq!(img.dimensions(), (16, 9));
    }

    #[test]
    fn pixels_match_single_ray_evaluation() {
        let view = viewpoint(Vec3::new(0.0, 0.0, 5.5), Vec3::NEG_Z);
        let params = FractalParams::default();
        let img = render_reference(&view, &params, 12, 8);

        for (x, y) in [(0, 0), (6, 4), (11, 7), (3, 5)] {
            let dir = ray_direction(
                view.front,
                view.up,
                &view.inverse_projection,
                pixel_ndc(x, y, 12, 8),
            );
            let expected = to_rgb8(shade_result(&march(view.position, dir, &params)));
            assert_eq!(*img.get_pixel(x, y), expected, "pixel ({x}, {y})");
        }
    }

    #[test]
    fn looking_away_from_the_fractal_is_black() {
        let img = render_reference(
            &viewpoint(Vec3::new(0.0, 0.0, 20.0), Vec3::Z),
            &FractalParams::default(),
            8,
            8,
        );
        assert!(img.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn colour_quantization_rounds() {
        assert_eq!(to_rgb8(shade(0)), Rgb([255, 51, 51]));
        assert_eq!(to_rgb8([2.0, -1.0, 0.5]), Rgb([255, 0, 128]));
    }
}
