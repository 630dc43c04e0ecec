//! wgpu accumulation backend.
//!
//! One fullscreen shader does all the work: it samples a texture and raises
//! it to a power. Accumulation draws it into the float target with a
//! constant blend factor (`src * c + dst * (1 - c)`); presentation draws it
//! into the output view without blending.

use wgpu::util::DeviceExt;

use super::accumulator::{AccumulationBackend, Resolve};
use crate::error::VistaError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, nearest_sampler, non_filtering_sampler,
    texture_2d_unfilterable, uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::{choose_accumulation_format, RenderTarget};

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct PowerParams {
    power: f32,
    _pad: [f32; 3],
}

impl PowerParams {
    fn new(power: f32) -> Self {
        Self {
            power,
            _pad: [0.0; 3],
        }
    }
}

const ACCUMULATE_BLEND: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::Constant,
        dst_factor: wgpu::BlendFactor::OneMinusConstant,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::Constant,
        dst_factor: wgpu::BlendFactor::OneMinusConstant,
        operation: wgpu::BlendOperation::Add,
    },
};

/// Accumulates [`RenderTarget`] frames on the GPU and presents into a
/// texture view of the output format.
pub struct GpuAccumulator {
    device: wgpu::Device,
    queue: wgpu::Queue,
    format: wgpu::TextureFormat,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    accumulate_pipeline: wgpu::RenderPipeline,
    present_pipeline: wgpu::RenderPipeline,
    accumulate_params: wgpu::Buffer,
    present_params: wgpu::Buffer,
}

impl GpuAccumulator {
    /// Build the accumulation and presentation pipelines. Presentation
    /// targets `output_format`; the accumulation format is the most precise
    /// blendable float format the device offers.
    #[must_use]
    pub fn new(context: &RenderContext, output_format: wgpu::TextureFormat) -> Self {
        let device = &context.device;
        let format = choose_accumulation_format(device.features());
        log::info!("multiframe accumulation format: {format:?}");

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Multiframe Bind Group Layout"),
                entries: &[
                    texture_2d_unfilterable(0),
                    non_filtering_sampler(1),
                    uniform_buffer(2, wgpu::ShaderStages::FRAGMENT),
                ],
            });
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Multiframe Shader"),
            source: wgpu::ShaderSource::Wgsl(
                include_str!("../../assets/shaders/screen/multiframe.wgsl").into(),
            ),
        });
        let accumulate_pipeline = create_screen_space_pipeline(
            device,
            "Multiframe Accumulate",
            &shader,
            format,
            Some(ACCUMULATE_BLEND),
            &[&bind_group_layout],
        );
        let present_pipeline = create_screen_space_pipeline(
            device,
            "Multiframe Present",
            &shader,
            output_format,
            None,
            &[&bind_group_layout],
        );
        let params = |label: &str| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::bytes_of(&PowerParams::new(1.0)),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
        };

        Self {
            device: context.device.clone(),
            queue: context.queue.clone(),
            format,
            bind_group_layout,
            sampler: nearest_sampler(device, "Multiframe Sampler"),
            accumulate_pipeline,
            accumulate_params: params("Multiframe Accumulate Params"),
            present_pipeline,
            present_params: params("Multiframe Present Params"),
        }
    }

    /// Texel format of accumulation targets.
    #[must_use]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    fn draw(
        &self,
        label: &str,
        pipeline: &wgpu::RenderPipeline,
        params: &wgpu::Buffer,
        input: &wgpu::TextureView,
        output: &wgpu::TextureView,
        blend: Option<f32>,
    ) {
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(input),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: params.as_entire_binding(),
                },
            ],
        });

        let mut encoder =
            self.device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some(label),
                });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(label),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: output,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: if blend.is_some() {
                            wgpu::LoadOp::Load
                        } else {
                            wgpu::LoadOp::Clear(wgpu::Color::BLACK)
                        },
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            if let Some(blend) = blend {
                let c = f64::from(blend);
                pass.set_blend_constant(wgpu::Color {
                    r: c,
                    g: c,
                    b: c,
                    a: c,
                });
            }
            pass.draw(0..3, 0..1);
        }
        let _ = self.queue.submit(std::iter::once(encoder.finish()));
    }
}

impl AccumulationBackend for GpuAccumulator {
    type Source = RenderTarget;
    type Target = RenderTarget;
    type Output = wgpu::TextureView;

    fn source_size(&self, source: &RenderTarget) -> (u32, u32) {
        (source.width(), source.height())
    }

    fn target_size(&self, target: &RenderTarget) -> (u32, u32) {
        (target.width(), target.height())
    }

    fn create_target(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<RenderTarget, VistaError> {
        RenderTarget::new(
            &self.device,
            "Multiframe Accumulation",
            (width, height),
            self.format,
            RenderTarget::COLOR_USAGE,
        )
    }

    fn blend(
        &mut self,
        target: &mut RenderTarget,
        source: &RenderTarget,
        blend: f32,
        power: f32,
    ) {
        self.queue.write_buffer(
            &self.accumulate_params,
            0,
            bytemuck::bytes_of(&PowerParams::new(power)),
        );
        self.draw(
            "Multiframe Accumulate",
            &self.accumulate_pipeline,
            &self.accumulate_params,
            &source.view,
            &target.view,
            Some(blend),
        );
    }

    fn resolve(
        &mut self,
        input: Resolve<'_, RenderTarget, RenderTarget>,
        power: f32,
        output: &mut wgpu::TextureView,
    ) {
        let input = match input {
            Resolve::Source(target) | Resolve::Accumulated(target) => target,
        };
        self.queue.write_buffer(
            &self.present_params,
            0,
            bytemuck::bytes_of(&PowerParams::new(power)),
        );
        self.draw(
            "Multiframe Present",
            &self.present_pipeline,
            &self.present_params,
            &input.view,
            output,
            None,
        );
    }
}
