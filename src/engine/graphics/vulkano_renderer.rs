use crate::engine::state::ExplorerState;
use std::sync::Arc;
use winit::window::Window;

mod vulkano_backend {
    use std::mem::size_of;
    use std::sync::Arc;

    use crate::engine::graphics::frame_uniforms::FrameUniforms;
    use crate::engine::graphics::pipeline_descriptor_set_layouts::PipelineDescriptorSetLayouts;
    use crate::engine::graphics::quad::{FULLSCREEN_QUAD, QuadVertex};
    use crate::engine::state::ExplorerState;
    use log::{debug, info, warn};
    use vulkano::buffer::{Buffer, BufferCreateInfo, BufferUsage, Subbuffer};
    use vulkano::command_buffer::{
        AutoCommandBufferBuilder, CommandBufferUsage, RenderPassBeginInfo, SubpassBeginInfo,
        SubpassEndInfo, allocator::StandardCommandBufferAllocator,
    };
    use vulkano::descriptor_set::allocator::StandardDescriptorSetAllocator;
    use vulkano::descriptor_set::{DescriptorSet, WriteDescriptorSet};
    use vulkano::format::{ClearValue, Format};
    use vulkano::image::view::ImageView;
    use vulkano::memory::allocator::{AllocationCreateInfo, MemoryTypeFilter};
    use vulkano::pipeline::graphics::color_blend::{ColorBlendAttachmentState, ColorBlendState};
    use vulkano::pipeline::graphics::input_assembly::{InputAssemblyState, PrimitiveTopology};
    use vulkano::pipeline::graphics::multisample::MultisampleState;
    use vulkano::pipeline::graphics::rasterization::RasterizationState;
    use vulkano::pipeline::graphics::subpass::PipelineSubpassType;
    use vulkano::pipeline::graphics::vertex_input::{
        VertexInputAttributeDescription, VertexInputBindingDescription, VertexInputRate,
        VertexInputState,
    };
    use vulkano::pipeline::graphics::viewport::{Scissor, Viewport, ViewportState};
    use vulkano::pipeline::layout::{PipelineLayout, PipelineLayoutCreateInfo};
    use vulkano::pipeline::{
        DynamicState, GraphicsPipeline, Pipeline, PipelineBindPoint, PipelineShaderStageCreateInfo,
    };
    use vulkano::render_pass::{Framebuffer, FramebufferCreateInfo, RenderPass, Subpass};
    use vulkano::swapchain::{self, Surface, Swapchain, SwapchainCreateInfo, SwapchainPresentInfo};
    use vulkano::sync::{self, GpuFuture};
    use vulkano::{Validated, VulkanError};
    use vulkano_util::context::{VulkanoConfig, VulkanoContext};
    use winit::window::Window;

    mod fullscreen_vs {
        vulkano_shaders::shader! {
            ty: "vertex",
            path: "assets/shaders/fullscreen.vert",
        }
    }

    mod mandelbox_fs {
        vulkano_shaders::shader! {
            ty: "fragment",
            path: "assets/shaders/mandelbox.frag",
        }
    }

    /// Swapchain formats the shader output is written to without an sRGB conversion.
    const PREFERRED_FORMATS: [Format; 2] = [Format::B8G8R8A8_UNORM, Format::R8G8B8A8_UNORM];

    pub struct VulkanoState {
        pub context: VulkanoContext,
        pub window: Arc<Window>,
        #[allow(dead_code)]
        pub surface: Arc<Surface>,
        pub swapchain: Arc<Swapchain>,
        #[allow(dead_code)]
        pub swapchain_views: Vec<Arc<ImageView>>,
        pub render_pass: Arc<RenderPass>,
        pub framebuffers: Vec<Arc<Framebuffer>>,

        pub command_buffer_allocator: Arc<StandardCommandBufferAllocator>,
        pub descriptor_set_allocator: Arc<StandardDescriptorSetAllocator>,

        pub set_layouts: PipelineDescriptorSetLayouts,

        pub quad: Subbuffer<[QuadVertex]>,
        pub pipeline_mandelbox: Arc<GraphicsPipeline>,

        pub window_resized: bool,
        pub recreate_swapchain: bool,
        pub previous_frame_end: Option<Box<dyn GpuFuture>>,
    }

    fn create_framebuffers(
        render_pass: &Arc<RenderPass>,
        views: &[Arc<ImageView>],
    ) -> Result<Vec<Arc<Framebuffer>>, Box<dyn std::error::Error>> {
        views
            .iter()
            .map(|view| {
                Framebuffer::new(
                    render_pass.clone(),
                    FramebufferCreateInfo {
                        attachments: vec![view.clone()],
                        ..Default::default()
                    },
                )
                .map_err(|e| e.into())
            })
            .collect()
    }

    impl VulkanoState {
        pub fn new(window: Arc<Window>) -> Result<Self, Box<dyn std::error::Error>> {
            // The helper context enables surface extensions and sets up queues and allocators.
            let context = VulkanoContext::new(VulkanoConfig::default());
            let device = context.device().clone();
            info!(
                "using device {} ({:?})",
                device.physical_device().properties().device_name,
                device.physical_device().properties().device_type,
            );

            let surface = Surface::from_window(device.instance().clone(), window.clone())?;

            let surface_capabilities = device
                .physical_device()
                .surface_capabilities(&surface, Default::default())?;
            let surface_formats = device
                .physical_device()
                .surface_formats(&surface, Default::default())?;
            let image_format = surface_formats
                .iter()
                .map(|(format, _)| *format)
                .find(|format| PREFERRED_FORMATS.contains(format))
                .or_else(|| surface_formats.first().map(|(format, _)| *format))
                .ok_or("no supported surface formats")?;

            let mut min_image_count = 2u32.max(surface_capabilities.min_image_count);
            if let Some(max_image_count) = surface_capabilities.max_image_count {
                min_image_count = min_image_count.min(max_image_count);
            }

            let (swapchain, images) = Swapchain::new(
                device.clone(),
                surface.clone(),
                SwapchainCreateInfo {
                    min_image_count,
                    image_format,
                    image_extent: window.inner_size().into(),
                    image_usage: vulkano::image::ImageUsage::COLOR_ATTACHMENT,
                    composite_alpha: surface_capabilities
                        .supported_composite_alpha
                        .into_iter()
                        .next()
                        .ok_or("no supported composite alpha")?,
                    ..Default::default()
                },
            )?;
            info!(
                "swapchain {:?} {}x{} ({} images)",
                image_format,
                swapchain.image_extent()[0],
                swapchain.image_extent()[1],
                images.len()
            );

            let swapchain_views = images
                .into_iter()
                .map(|image| ImageView::new_default(image).map_err(|e| e.into()))
                .collect::<Result<Vec<_>, Box<dyn std::error::Error>>>()?;

            let render_pass = vulkano::single_pass_renderpass!(
                device.clone(),
                attachments: {
                    color: {
                        format: swapchain.image_format(),
                        samples: 1,
                        load_op: Clear,
                        store_op: Store,
                    },
                },
                pass: {
                    color: [color],
                    depth_stencil: {},
                }
            )?;

            let framebuffers = create_framebuffers(&render_pass, &swapchain_views)?;

            let set_layouts = PipelineDescriptorSetLayouts::new(device.clone())?;

            let vs = fullscreen_vs::load(device.clone())?;
            let fs = mandelbox_fs::load(device.clone())?;

            let stages = vec![
                PipelineShaderStageCreateInfo::new(
                    vs.entry_point("main")
                        .ok_or("missing fullscreen.vert entry point")?,
                ),
                PipelineShaderStageCreateInfo::new(
                    fs.entry_point("main")
                        .ok_or("missing mandelbox.frag entry point")?,
                ),
            ];

            let layout = PipelineLayout::new(
                device.clone(),
                PipelineLayoutCreateInfo {
                    set_layouts: vec![set_layouts.frame.clone()],
                    ..Default::default()
                },
            )?;

            let vertex_input_state = VertexInputState::new()
                .binding(
                    0,
                    VertexInputBindingDescription {
                        stride: size_of::<QuadVertex>() as u32,
                        input_rate: VertexInputRate::Vertex,
                        ..Default::default()
                    },
                )
                .attribute(
                    0,
                    VertexInputAttributeDescription {
                        binding: 0,
                        format: Format::R32G32_SFLOAT,
                        offset: 0,
                        ..Default::default()
                    },
                );

            let subpass = Subpass::from(render_pass.clone(), 0).ok_or("missing subpass 0")?;
            let mut pipeline_ci =
                vulkano::pipeline::graphics::GraphicsPipelineCreateInfo::layout(layout);
            pipeline_ci.stages = stages.into();
            pipeline_ci.vertex_input_state = Some(vertex_input_state);
            pipeline_ci.input_assembly_state = Some(InputAssemblyState {
                topology: PrimitiveTopology::TriangleStrip,
                ..Default::default()
            });
            pipeline_ci.viewport_state = Some(ViewportState::default());
            pipeline_ci.rasterization_state = Some(RasterizationState::default());
            pipeline_ci.multisample_state = Some(MultisampleState::default());
            pipeline_ci.depth_stencil_state = None;
            pipeline_ci.color_blend_state = Some(ColorBlendState::with_attachment_states(
                1,
                ColorBlendAttachmentState::default(),
            ));
            pipeline_ci.dynamic_state = [DynamicState::Viewport, DynamicState::Scissor]
                .into_iter()
                .collect();
            pipeline_ci.subpass = Some(PipelineSubpassType::BeginRenderPass(subpass));

            let pipeline_mandelbox = GraphicsPipeline::new(device.clone(), None, pipeline_ci)?;

            let quad = Buffer::from_iter(
                context.memory_allocator().clone(),
                BufferCreateInfo {
                    usage: BufferUsage::VERTEX_BUFFER,
                    ..Default::default()
                },
                AllocationCreateInfo {
                    memory_type_filter: MemoryTypeFilter::PREFER_DEVICE
                        | MemoryTypeFilter::HOST_SEQUENTIAL_WRITE,
                    ..Default::default()
                },
                FULLSCREEN_QUAD,
            )?;

            let command_buffer_allocator = Arc::new(StandardCommandBufferAllocator::new(
                device.clone(),
                Default::default(),
            ));

            let descriptor_set_allocator = Arc::new(StandardDescriptorSetAllocator::new(
                device.clone(),
                Default::default(),
            ));

            Ok(Self {
                context,
                window,
                surface,
                swapchain,
                swapchain_views,
                render_pass,
                framebuffers,

                command_buffer_allocator,
                descriptor_set_allocator,

                set_layouts,

                quad,
                pipeline_mandelbox,

                window_resized: false,
                recreate_swapchain: false,
                previous_frame_end: Some(sync::now(device).boxed()),
            })
        }

        fn recreate_swapchain_if_needed(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            if !(self.window_resized || self.recreate_swapchain) {
                return Ok(());
            }

            self.recreate_swapchain = false;
            let new_dimensions = self.window.inner_size();
            if new_dimensions.width == 0 || new_dimensions.height == 0 {
                // Minimized; try again once the window has a size.
                return Ok(());
            }

            let (new_swapchain, new_images) = match self.swapchain.recreate(SwapchainCreateInfo {
                image_extent: new_dimensions.into(),
                ..self.swapchain.create_info()
            }) {
                Ok(r) => r,
                Err(e) => {
                    self.recreate_swapchain = true;
                    warn!("failed to recreate swapchain: {}", Validated::unwrap(e));
                    return Ok(());
                }
            };
            debug!(
                "swapchain recreated at {}x{}",
                new_dimensions.width, new_dimensions.height
            );

            self.swapchain = new_swapchain;
            self.swapchain_views = new_images
                .into_iter()
                .map(|image| ImageView::new_default(image).map_err(|e| e.into()))
                .collect::<Result<Vec<_>, Box<dyn std::error::Error>>>()?;
            self.framebuffers = create_framebuffers(&self.render_pass, &self.swapchain_views)?;

            self.window_resized = false;
            Ok(())
        }

        pub fn render_frame(
            &mut self,
            state: &ExplorerState,
        ) -> Result<(), Box<dyn std::error::Error>> {
            self.recreate_swapchain_if_needed()?;

            let device = self.context.device().clone();
            let queue = self.context.graphics_queue().clone();

            if let Some(previous_frame_end) = self.previous_frame_end.as_mut() {
                previous_frame_end.cleanup_finished();
            }

            let (image_i, suboptimal, acquire_future) =
                match swapchain::acquire_next_image(self.swapchain.clone(), None)
                    .map_err(Validated::unwrap)
                {
                    Ok(r) => r,
                    Err(VulkanError::OutOfDate) => {
                        self.recreate_swapchain = true;
                        return Ok(());
                    }
                    Err(e) => return Err(Box::new(e)),
                };

            if suboptimal {
                self.recreate_swapchain = true;
            }

            let extent = self.swapchain.image_extent();
            let viewport = Viewport {
                offset: [0.0, 0.0],
                extent: [extent[0] as f32, extent[1] as f32],
                depth_range: 0.0..=1.0,
                ..Default::default()
            };

            let frame_buffer: Subbuffer<FrameUniforms> = Buffer::from_data(
                self.context.memory_allocator().clone(),
                BufferCreateInfo {
                    usage: BufferUsage::UNIFORM_BUFFER,
                    ..Default::default()
                },
                AllocationCreateInfo {
                    memory_type_filter: MemoryTypeFilter::PREFER_HOST
                        | MemoryTypeFilter::HOST_SEQUENTIAL_WRITE,
                    ..Default::default()
                },
                FrameUniforms::from_state(state, extent),
            )?;

            let frame_set = DescriptorSet::new(
                self.descriptor_set_allocator.clone(),
                self.set_layouts.frame.clone(),
                [WriteDescriptorSet::buffer(0, frame_buffer)],
                [],
            )?;

            let framebuffer = self.framebuffers[image_i as usize].clone();
            let mut render_pass_begin = RenderPassBeginInfo::framebuffer(framebuffer);
            render_pass_begin.clear_values = vec![Some(ClearValue::from([0.0f32, 0.0, 0.0, 1.0]))];

            let mut cbb = AutoCommandBufferBuilder::primary(
                self.command_buffer_allocator.clone(),
                queue.queue_family_index(),
                CommandBufferUsage::OneTimeSubmit,
            )?;

            cbb.begin_render_pass(render_pass_begin, SubpassBeginInfo::default())?;

            cbb.set_viewport(0, vec![viewport].into())?;
            cbb.set_scissor(
                0,
                vec![Scissor {
                    offset: [0, 0],
                    extent: [extent[0], extent[1]],
                    ..Default::default()
                }]
                .into(),
            )?;

            cbb.bind_pipeline_graphics(self.pipeline_mandelbox.clone())?;
            cbb.bind_descriptor_sets(
                PipelineBindPoint::Graphics,
                self.pipeline_mandelbox.layout().clone(),
                0,
                frame_set,
            )?;
            cbb.bind_vertex_buffers(0, self.quad.clone())?;

            unsafe {
                cbb.draw(self.quad.len() as u32, 1, 0, 0)?;
            }

            cbb.end_render_pass(SubpassEndInfo::default())?;

            let cb = cbb.build()?;

            let start_future: Box<dyn GpuFuture> = self
                .previous_frame_end
                .take()
                .unwrap_or_else(|| sync::now(device.clone()).boxed());

            let execution = start_future
                .join(acquire_future)
                .then_execute(queue.clone(), cb)?
                .then_swapchain_present(
                    queue.clone(),
                    SwapchainPresentInfo::swapchain_image_index(self.swapchain.clone(), image_i),
                )
                .then_signal_fence_and_flush();

            match execution.map_err(Validated::unwrap) {
                Ok(future) => {
                    // Keep the future so resources can be cleaned up incrementally.
                    self.previous_frame_end = Some(future.boxed());
                }
                Err(e) if needs_swapchain_recreate(&e) => {
                    self.recreate_swapchain = true;
                    self.previous_frame_end = Some(sync::now(device).boxed());
                }
                Err(e) => {
                    self.previous_frame_end = Some(sync::now(device).boxed());
                    return Err(format!("failed to flush frame: {e}").into());
                }
            }

            Ok(())
        }
    }

    /// Present/flush errors that a swapchain rebuild fixes; anything else is fatal.
    fn needs_swapchain_recreate(err: &VulkanError) -> bool {
        matches!(err, VulkanError::OutOfDate)
    }

}

/// Vulkano fullscreen-quad renderer.
pub struct VulkanoRenderer {
    vulkano: Option<vulkano_backend::VulkanoState>,
}

impl VulkanoRenderer {
    pub fn new() -> Self {
        Self {
            vulkano: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.vulkano.is_some()
    }

    pub fn init_for_window(
        &mut self,
        window: &Arc<Window>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if self.vulkano.is_none() {
            self.vulkano = Some(vulkano_backend::VulkanoState::new(window.clone())?);
            log::info!("swapchain/render-pass initialized");
        }

        Ok(())
    }

    pub fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if let Some(vulkano) = self.vulkano.as_mut() {
            log::debug!("window resized to {}x{}", size.width, size.height);
            vulkano.window_resized = true;
        }
    }

    pub fn draw_frame(&mut self, state: &ExplorerState) -> Result<(), Box<dyn std::error::Error>> {
        let Some(vulkano) = self.vulkano.as_mut() else {
            return Err("VulkanoRenderer not initialized (call init_for_window first)".into());
        };

        vulkano.render_frame(state)
    }
}

impl Default for VulkanoRenderer {
    fn default() -> Self {
        Self::new()
    }
}
