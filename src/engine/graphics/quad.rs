//! Fullscreen quad geometry.
//!
//! The whole image is one triangle strip covering clip space; all the interesting work
//! happens per fragment.

use vulkano::buffer::BufferContents;
use vulkano::pipeline::graphics::vertex_input::Vertex;

/// Clip-space vertex of the fullscreen quad.
#[derive(BufferContents, Vertex, Debug, Clone, Copy, Default, PartialEq)]
#[repr(C)]
pub struct QuadVertex {
    #[format(R32G32_SFLOAT)]
    pub pos: [f32; 2],
}

/// Triangle-strip order: bottom-left, bottom-right, top-left, top-right.
pub const FULLSCREEN_QUAD: [QuadVertex; 4] = [
    QuadVertex { pos: [-1.0, -1.0] },
    QuadVertex { pos: [1.0, -1.0] },
    QuadVertex { pos: [-1.0, 1.0] },
    QuadVertex { pos: [1.0, 1.0] },
];
