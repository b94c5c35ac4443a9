use crate::ping_pong::PingPong;
use crate::quad::QuadGeometry;
use crate::shader_utils::{create_shader_module, ShaderSources};
use crate::splat::Sample;
use crate::splat_slots::MAX_SPLATS;
use crate::state_buffers::{self, StateBuffers, STATE_FORMAT};
use wgpu::util::DeviceExt;

// This should match the `Seeds` struct in simulation.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SimulationUniforms {
    pub time: f32,
    pub decay: f32,
    pub scatter: [f32; MAX_SPLATS],
    pub size: [f32; MAX_SPLATS],
    // Interleaved x, y.
    pub position: [f32; 2 * MAX_SPLATS],
    pub amount: [f32; MAX_SPLATS],
}

impl SimulationUniforms {
    // Marshals one tick of samples into the shader's fixed arrays. Slots past
    // the end of `samples` stay zero.
    pub fn new(time: f32, decay: f32, samples: &[Sample]) -> Self {
        debug_assert!(samples.len() <= MAX_SPLATS);
        let mut uniforms = SimulationUniforms {
            time,
            decay,
            ..bytemuck::Zeroable::zeroed()
        };
        for (i, sample) in samples.iter().take(MAX_SPLATS).enumerate() {
            uniforms.scatter[i] = sample.scatter;
            uniforms.size[i] = sample.size;
            uniforms.position[2 * i] = sample.position[0];
            uniforms.position[2 * i + 1] = sample.position[1];
            uniforms.amount[i] = sample.amount;
        }
        uniforms
    }
}

// Runs the simulation shader from the previous state slot into the current
// one.
pub struct SimulationStage {
    pipeline: wgpu::RenderPipeline,
    seed_buffer: wgpu::Buffer,
    // Bind group `i` samples state slot `i`.
    bind_groups: PingPong<wgpu::BindGroup>,
}

impl SimulationStage {
    pub fn init(
        device: &wgpu::Device,
        shaders: &ShaderSources,
        states: &StateBuffers,
        reference: &wgpu::TextureView,
    ) -> Self {
        let vs_module = create_shader_module(device, "Quad vertex shader", &shaders.vertex);
        let fs_module = create_shader_module(device, "Simulation shader", &shaders.simulation);

        let seed_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Seed buffer"),
            contents: bytemuck::bytes_of(&SimulationUniforms::new(0.0, 0.0, &[])),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });

        let state_sampler = state_buffers::make_state_sampler(device);
        let reference_sampler =
            crate::load_image::make_image_sampler(device, "Reference sampler");

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                // Splat seeds, time and decay.
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Previous state.
                state_buffers::texture_entry(1),
                // Reference image.
                state_buffers::texture_entry(2),
                state_buffers::sampler_entry(3),
                state_buffers::sampler_entry(4),
            ],
            label: Some("Simulation bind group layout"),
        });

        let bind_groups = PingPong::from_fn(|index| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("Simulation reading state {}", index)),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: seed_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&states.slots()[index].view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(reference),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::Sampler(&state_sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 4,
                        resource: wgpu::BindingResource::Sampler(&reference_sampler),
                    },
                ],
            })
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Simulation pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Simulation pipeline"),
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
                targets: &[STATE_FORMAT.into()],
            }),
            multiview: None,
        });

        SimulationStage {
            pipeline,
            seed_buffer,
            bind_groups,
        }
    }

    pub fn set_uniforms(&self, queue: &wgpu::Queue, uniforms: &SimulationUniforms) {
        queue.write_buffer(&self.seed_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    // Reads `states.previous(mode)`, writes `states.current(mode)`.
    pub fn advance(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        mode: bool,
        states: &StateBuffers,
        quad: &QuadGeometry,
    ) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Simulation"),
            color_attachments: &[wgpu::RenderPassColorAttachment {
                view: &states.current(mode).view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: true,
                },
            }],
            depth_stencil_attachment: None,
        });
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, self.bind_groups.previous(mode), &[]);
        quad.render(&mut rpass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(i: usize) -> Sample {
        Sample {
            scatter: 500.0,
            size: 0.01 * i as f32,
            position: [i as f32, -(i as f32)],
            amount: 0.1 * i as f32,
        }
    }

    #[test]
    fn layout_is_tightly_packed() {
        assert_eq!(
            std::mem::size_of::<SimulationUniforms>(),
            (2 + 5 * MAX_SPLATS) * std::mem::size_of::<f32>()
        );
    }

    #[test]
    fn marshals_samples_in_slot_order() {
        let samples: Vec<Sample> = (1..=3).map(sample).collect();
        let uniforms = SimulationUniforms::new(1.5, 0.25, &samples);
        assert_eq!(uniforms.time, 1.5);
        assert_eq!(uniforms.decay, 0.25);
        for i in 0..3 {
            let expected = sample(i + 1);
            assert_eq!(uniforms.scatter[i], expected.scatter);
            assert_eq!(uniforms.size[i], expected.size);
            assert_eq!(uniforms.position[2 * i], expected.position[0]);
            assert_eq!(uniforms.position[2 * i + 1], expected.position[1]);
            assert_eq!(uniforms.amount[i], expected.amount);
        }
        for i in 3..MAX_SPLATS {
            assert_eq!(uniforms.scatter[i], 0.0);
            assert_eq!(uniforms.size[i], 0.0);
            assert_eq!(uniforms.position[2 * i], 0.0);
            assert_eq!(uniforms.position[2 * i + 1], 0.0);
            assert_eq!(uniforms.amount[i], 0.0);
        }
    }

    #[test]
    fn bytes_start_with_time_and_decay() {
        let uniforms = SimulationUniforms::new(2.0, 0.5, &[sample(1)]);
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&uniforms));
        assert_eq!(floats[0], 2.0);
        assert_eq!(floats[1], 0.5);
        // scatter[0]
        assert_eq!(floats[2], 500.0);
        // position[0] follows scatter and size.
        assert_eq!(floats[2 + 2 * MAX_SPLATS], 1.0);
    }
}
