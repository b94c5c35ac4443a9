use crate::assets::Assets;
use crate::director::{Director, DirectorHandle};
use crate::effect_params::EffectParams;
use crate::error::Result;
use crate::fps_estimator::FpsEstimator;
use crate::frame_scheduler::{FrameOutcome, FrameScheduler, FrameStages};
use crate::load_image::create_image_texture;
use crate::quad::QuadGeometry;
use crate::render::{RenderStage, RenderUniforms};
use crate::shutdown::Shutdown;
use crate::simulation::{SimulationStage, SimulationUniforms};
use crate::splat::Splat;
use crate::splat_field::SplatField;
use crate::state_buffers::{create_state_buffers, StateBuffers};
use crossbeam_channel::Receiver;
use log::{info, trace};
use std::time::Duration;

// Owns every GPU resource and both timing domains of the effect.
pub struct SplatEffect {
    field: SplatField,
    inbox: Receiver<Splat>,
    director: DirectorHandle,
    shutdown: Shutdown,
    scheduler: FrameScheduler,
    fps: FpsEstimator,

    // GPU interface cruft
    states: StateBuffers,
    quad: QuadGeometry,
    simulation: SimulationStage,
    rendering: RenderStage,
    _reference: wgpu::TextureView,
    _background: wgpu::TextureView,
}

// Per-frame view of the effect handed to the scheduler.
struct FramePass<'a> {
    encoder: &'a mut wgpu::CommandEncoder,
    queue: &'a wgpu::Queue,
    output_view: &'a wgpu::TextureView,
    field: &'a mut SplatField,
    inbox: &'a Receiver<Splat>,
    states: &'a StateBuffers,
    quad: &'a QuadGeometry,
    simulation: &'a SimulationStage,
    rendering: &'a RenderStage,
}

impl<'a> FramePass<'a> {
    // The director is the only producer, this is the only consumer.
    fn drain_inbox(&mut self) {
        for splat in self.inbox.try_iter() {
            self.field.splat(splat);
        }
    }
}

impl<'a> FrameStages for FramePass<'a> {
    fn advance(&mut self, mode: bool, time: f32) {
        self.drain_inbox();
        let samples = self.field.emit();
        trace!("{} splats in the field", self.field.len());
        let uniforms = SimulationUniforms::new(time, self.field.decay(), &samples);
        self.simulation.set_uniforms(self.queue, &uniforms);
        self.simulation
            .advance(self.encoder, mode, self.states, self.quad);
    }

    fn draw(&mut self, mode: bool, time: f32) {
        self.rendering
            .set_uniforms(self.queue, &RenderUniforms::new(time));
        self.rendering
            .draw(self.encoder, mode, self.output_view, self.quad);
    }
}

impl SplatEffect {
    /// Builds the pipeline from fully resolved assets and starts the director.
    /// Errors if the director parameters are invalid or its thread cannot start.
    pub fn init(
        params: &EffectParams,
        assets: &Assets,
        output_format: wgpu::TextureFormat,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<Self> {
        let states = create_state_buffers(device, params.width, params.height);
        let quad = QuadGeometry::init(device);
        let reference = create_image_texture(device, queue, &assets.reference, "Reference image");
        let background =
            create_image_texture(device, queue, &assets.background, "Background image");
        let simulation = SimulationStage::init(device, &assets.shaders, &states, &reference);
        let rendering = RenderStage::init(
            device,
            &assets.shaders,
            &states,
            &background,
            output_format,
        );

        let shutdown = Shutdown::new();
        let (sender, inbox) = crossbeam_channel::unbounded();
        let director = Director::from_entropy(params.director)?.start(sender, shutdown.signal())?;
        info!(
            "Effect ready: {} seed slots, decay {}",
            params.capacity, params.decay
        );

        Ok(SplatEffect {
            field: SplatField::with_decay(params.capacity, params.decay),
            inbox,
            director,
            scheduler: FrameScheduler::new(params.time_step, shutdown.signal()),
            shutdown,
            fps: FpsEstimator::new(60.0, Duration::from_secs(5)),
            states,
            quad,
            simulation,
            rendering,
            _reference: reference,
            _background: background,
        })
    }

    pub fn render(
        &mut self,
        output_view: &wgpu::TextureView,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> FrameOutcome {
        if self.scheduler.is_stopped() {
            return FrameOutcome::Stopped;
        }
        let mut encoder =
            device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        let outcome = {
            let mut pass = FramePass {
                encoder: &mut encoder,
                queue,
                output_view,
                field: &mut self.field,
                inbox: &self.inbox,
                states: &self.states,
                quad: &self.quad,
                simulation: &self.simulation,
                rendering: &self.rendering,
            };
            self.scheduler.step(&mut pass)
        };
        if outcome == FrameOutcome::Presented {
            queue.submit(Some(encoder.finish()));
            self.fps.tick();
        }
        outcome
    }

    pub fn frame(&self) -> u64 {
        self.scheduler.frame()
    }

    // Stops both the frame loop and the director, then waits for the director.
    pub fn shutdown(&mut self) {
        self.shutdown.trigger();
        self.director.join();
    }
}

impl Drop for SplatEffect {
    fn drop(&mut self) {
        self.shutdown();
    }
}
