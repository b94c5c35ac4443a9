use crate::ping_pong::PingPong;
use crate::quad::QuadGeometry;
use crate::shader_utils::{create_shader_module, ShaderSources};
use crate::state_buffers::{self, StateBuffers};
use wgpu::util::DeviceExt;

// This should match the `Locals` struct in rendering.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RenderUniforms {
    pub time: f32,
    _padding: [f32; 3],
}

impl RenderUniforms {
    pub fn new(time: f32) -> Self {
        RenderUniforms {
            time,
            ..Default::default()
        }
    }
}

// Composites the latest simulation state over the background image.
pub struct RenderStage {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    // Bind group `i` samples state slot `i`.
    bind_groups: PingPong<wgpu::BindGroup>,
}

impl RenderStage {
    pub fn init(
        device: &wgpu::Device,
        shaders: &ShaderSources,
        states: &StateBuffers,
        background: &wgpu::TextureView,
        output_format: wgpu::TextureFormat,
    ) -> Self {
        let vs_module = create_shader_module(device, "Quad vertex shader", &shaders.vertex);
        let fs_module = create_shader_module(device, "Rendering shader", &shaders.rendering);

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Render uniform buffer"),
            contents: bytemuck::bytes_of(&RenderUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let sampler = state_buffers::make_state_sampler(device);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Latest state.
                state_buffers::texture_entry(1),
                // Background image.
                state_buffers::texture_entry(2),
                state_buffers::sampler_entry(3),
            ],
            label: Some("Render bind group layout"),
        });

        let bind_groups = PingPong::from_fn(|index| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("Render reading state {}", index)),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&states.slots()[index].view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(background),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                ],
            })
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vs_module,
                entry_point: "vs_main",
                buffers: &[QuadGeometry::layout()],
            },
            primitive: QuadGeometry::primitive(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &fs_module,
                entry_point: "fs_main",
                targets: &[output_format.into()],
            }),
            multiview: None,
        });

        RenderStage {
            pipeline,
            uniform_buffer,
            bind_groups,
        }
    }

    pub fn set_uniforms(&self, queue: &wgpu::Queue, uniforms: &RenderUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    // Reads `states.current(mode)`, the slot the simulation just wrote.
    pub fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        mode: bool,
        output_view: &wgpu::TextureView,
        quad: &QuadGeometry,
    ) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render"),
            color_attachments: &[wgpu::RenderPassColorAttachment {
                view: output_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: true,
                },
            }],
            depth_stencil_attachment: None,
        });
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, self.bind_groups.current(mode), &[]);
        quad.render(&mut rpass);
    }
}
