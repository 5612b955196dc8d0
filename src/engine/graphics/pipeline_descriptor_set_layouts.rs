use std::collections::BTreeMap;
use std::sync::Arc;

use vulkano::descriptor_set::layout::{
    DescriptorSetLayout, DescriptorSetLayoutBinding, DescriptorSetLayoutCreateInfo, DescriptorType,
};
use vulkano::device::Device;
use vulkano::shader::ShaderStages;

pub struct PipelineDescriptorSetLayouts {
    /// Set 0: per-frame data (camera, projection, fractal parameters).
    pub frame: Arc<DescriptorSetLayout>,
}

impl PipelineDescriptorSetLayouts {
    /// `set=0,binding=0` uniform buffer (`FrameUniforms`), read by the fragment stage only.
    pub fn new(device: Arc<Device>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut bindings = BTreeMap::new();

        let mut frame_binding =
            DescriptorSetLayoutBinding::descriptor_type(DescriptorType::UniformBuffer);
        frame_binding.descriptor_count = 1;
        frame_binding.stages = ShaderStages::FRAGMENT;
        bindings.insert(0, frame_binding);

        let frame = DescriptorSetLayout::new(
            device,
            DescriptorSetLayoutCreateInfo {
                bindings,
                ..Default::default()
            },
        )?;

        Ok(Self { frame })
    }
}
