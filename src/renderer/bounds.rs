//! Shaded-box rendering of scene mesh bounds.

use glam::Vec3;
use wgpu::util::DeviceExt;

use super::pipeline_util::{
    depth_stencil_state, scene_fragment_targets, SCENE_COLOR_FORMAT,
    SCENE_DEPTH_FORMAT,
};
use crate::camera::CameraUniform;
use crate::error::VistaError;
use crate::gpu::pipeline_helpers::uniform_buffer;
use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::RenderTarget;
use crate::scene::{Aabb, SceneGraph};

/// Per-vertex data for box faces.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BoxVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Outward face normal.
    pub normal: [f32; 3],
    /// Linear RGB color.
    pub color: [f32; 3],
}

impl BoxVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x3];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

const PALETTE: [[f32; 3]; 6] = [
    [0.85, 0.33, 0.24],
    [0.27, 0.55, 0.85],
    [0.40, 0.75, 0.38],
    [0.90, 0.72, 0.25],
    [0.62, 0.42, 0.80],
    [0.30, 0.75, 0.75],
];

/// Triangulate boxes: 4 vertices and 2 counter-clockwise triangles per
/// face, 6 faces per box, colored by box index.
#[must_use]
pub fn box_mesh(boxes: &[Aabb]) -> (Vec<BoxVertex>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(boxes.len() * 24);
    let mut indices = Vec::with_capacity(boxes.len() * 36);

    for (i, aabb) in boxes.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        let center = aabb.center();
        let h = aabb.half_extents();
        for a in 0..3 {
            let (ua, va) = ((a + 1) % 3, (a + 2) % 3);
            let u = Vec3::AXES[ua] * h[ua];
            let v = Vec3::AXES[va] * h[va];
            for sign in [1.0_f32, -1.0] {
                let normal = Vec3::AXES[a] * sign;
                let face = center + normal * h[a];
                let base = vertices.len() as u32;
                for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                    vertices.push(BoxVertex {
                        position: (face + u * su + v * sv).to_array(),
                        normal: normal.to_array(),
                        color,
                    });
                }
                let winding: [u32; 6] = if sign > 0.0 {
                    [0, 1, 2, 0, 2, 3]
                } else {
                    [0, 2, 1, 0, 3, 2]
                };
                indices.extend(winding.iter().map(|k| base + k));
            }
        }
    }
    (vertices, indices)
}

/// Offscreen color and depth targets the scene renders into.
pub struct SceneTargets {
    /// Scene color; the multiframe accumulation source.
    pub color: RenderTarget,
    /// Scene depth.
    pub depth: RenderTarget,
}

impl SceneTargets {
    /// Allocate targets of the given size.
    ///
    /// # Errors
    ///
    /// Returns [`VistaError::TargetCreation`] if either texture cannot be
    /// allocated.
    pub fn new(device: &wgpu::Device, size: (u32, u32)) -> Result<Self, VistaError> {
        Ok(Self {
            color: RenderTarget::new(
                device,
                "Scene Color",
                size,
                SCENE_COLOR_FORMAT,
                RenderTarget::COLOR_USAGE,
            )?,
            depth: RenderTarget::new(
                device,
                "Scene Depth",
                size,
                SCENE_DEPTH_FORMAT,
                wgpu::TextureUsages::RENDER_ATTACHMENT,
            )?,
        })
    }

    /// Target size in pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.color.width(), self.color.height())
    }
}

/// Draws every mesh bound of a scene as a shaded box with a headlight.
pub struct BoundsRenderer {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,
    clear_color: wgpu::Color,
}

impl BoundsRenderer {
    /// Build the pipeline and camera uniform.
    #[must_use]
    pub fn new(context: &RenderContext, clear_color: [f32; 4]) -> Self {
        let device = &context.device;
        let camera_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::bytes_of(&CameraUniform::new()),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[uniform_buffer(
                    0,
                    wgpu::ShaderStages::VERTEX_FRAGMENT,
                )],
            });
        let camera_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Camera Bind Group"),
                layout: &camera_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                }],
            });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Bounds Shader"),
            source: wgpu::ShaderSource::Wgsl(
                include_str!("../../assets/shaders/raster/bounds.wgsl").into(),
            ),
        });
        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Bounds Pipeline Layout"),
                bind_group_layouts: &[&camera_layout],
                push_constant_ranges: &[],
            });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Bounds Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[BoxVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &scene_fragment_targets(),
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(depth_stencil_state()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let [r, g, b, a] = clear_color.map(f64::from);
        Self {
            pipeline,
            camera_buffer,
            camera_bind_group,
            vertex_buffer: None,
            index_buffer: None,
            index_count: 0,
            clear_color: wgpu::Color { r, g, b, a },
        }
    }

    /// Rebuild geometry from every mesh bound in `scene`.
    pub fn upload(&mut self, device: &wgpu::Device, scene: &SceneGraph) {
        let boxes: Vec<Aabb> = scene.meshes().copied().collect();
        let (vertices, indices) = box_mesh(&boxes);
        log::info!("uploading {} boxes ({} indices)", boxes.len(), indices.len());
        if indices.is_empty() {
            self.vertex_buffer = None;
            self.index_buffer = None;
            self.index_count = 0;
            return;
        }
        self.vertex_buffer = Some(device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Bounds Vertices"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
        self.index_buffer = Some(device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Bounds Indices"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        ));
        self.index_count = indices.len() as u32;
    }

    /// Set the background color.
    pub fn set_clear_color(&mut self, clear_color: [f32; 4]) {
        let [r, g, b, a] = clear_color.map(f64::from);
        self.clear_color = wgpu::Color { r, g, b, a };
    }

    /// Clear the targets and draw the boxes with the given camera.
    pub fn render(
        &self,
        context: &RenderContext,
        targets: &SceneTargets,
        camera: &CameraUniform,
    ) {
        context
            .queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(camera));

        let mut encoder = context.create_encoder();
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Bounds Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &targets.color.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(
                    wgpu::RenderPassDepthStencilAttachment {
                        view: &targets.depth.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    },
                ),
                ..Default::default()
            });
            if let (Some(vertices), Some(indices)) =
                (&self.vertex_buffer, &self.index_buffer)
            {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.camera_bind_group, &[]);
                pass.set_vertex_buffer(0, vertices.slice(..));
                pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..self.index_count, 0, 0..1);
            }
        }
        context.submit(encoder);
    }
}
