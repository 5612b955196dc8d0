use vulkano::buffer::BufferContents;

use crate::engine::state::ExplorerState;

/// Per-frame shader inputs, `set = 0, binding = 0`.
///
/// Laid out to match the std140 `FrameUniforms` block in `mandelbox.frag`: vec3s are padded
/// to vec4 and the struct is rounded up to 16 bytes.
#[derive(BufferContents, Clone, Copy, Debug, Default, PartialEq)]
#[repr(C, align(16))]
pub struct FrameUniforms {
    pub projection: [[f32; 4]; 4],
    pub inverse_projection: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub camera_front: [f32; 4],
    pub camera_up: [f32; 4],
    pub debug_offset: [f32; 4],
    /// Swapchain extent in pixels.
    pub resolution: [f32; 2],
    pub scale: f32,
    pub debug_zoom: f32,
    pub max_iterations: i32,
    pub _pad0: [i32; 3],
}

impl FrameUniforms {
    pub fn from_state(state: &ExplorerState, extent: [u32; 2]) -> Self {
        let camera = &state.camera;
        let fractal = &state.fractal;
        Self {
            projection: camera.projection.matrix.to_cols_array_2d(),
            inverse_projection: camera.projection.inverse.to_cols_array_2d(),
            camera_pos: camera.position.extend(1.0).to_array(),
            camera_front: camera.front.extend(0.0).to_array(),
            camera_up: camera.up.extend(0.0).to_array(),
            debug_offset: fractal.debug_offset.extend(0.0).to_array(),
            resolution: [extent[0] as f32, extent[1] as f32],
            scale: fractal.scale,
            debug_zoom: fractal.debug_zoom,
            max_iterations: i32::try_from(fractal.max_iterations).unwrap_or(i32::MAX),
            _pad0: [0; 3],
        }
    }
}
