pub mod frame_uniforms;
pub mod pipeline_descriptor_set_layouts;
pub mod quad;
pub mod renderer;
pub mod vulkano_renderer;

pub use renderer::Renderer;
