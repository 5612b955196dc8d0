use std::sync::Arc;

use crate::engine::graphics::vulkano_renderer::VulkanoRenderer;
use crate::engine::state::ExplorerState;
use crate::engine::{EngineError, EngineResult};
use winit::dpi::PhysicalSize;
use winit::window::Window;

/// Engine-facing renderer. Owns the Vulkan backend once a window exists.
pub struct Renderer {
    backend: VulkanoRenderer,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            backend: VulkanoRenderer::new(),
        }
    }

    pub fn init_for_window(&mut self, window: &Arc<Window>) -> EngineResult<()> {
        self.backend
            .init_for_window(window)
            .map_err(|e| EngineError::Renderer(e.to_string()))
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.backend.resize(new_size);
    }

    /// Draws one frame of the fractal as seen from `state`.
    pub fn draw_frame(&mut self, state: &ExplorerState) -> EngineResult<()> {
        if !self.backend.is_initialized() {
            return Err(EngineError::Renderer(
                "draw_frame called before init_for_window".to_string(),
            ));
        }
        self.backend
            .draw_frame(state)
            .map_err(|e| EngineError::Renderer(e.to_string()))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
