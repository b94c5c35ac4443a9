use anyhow::Context;
use log::{error, info};
use splatter::assets::{load_assets_blocking, Assets};
use splatter::effect::SplatEffect;
use splatter::effect_params::{get_effect_config, EffectParams};
use splatter::frame_scheduler::FrameOutcome;
use splatter::framework;

gflags::define! {
    --config: &str = "splatter.toml"
}
gflags::define! {
    --log_filter: &str = "warn,splatter=info"
}
gflags::define! {
    -h, --help = false
}

struct Splatter {
    effect: SplatEffect,
}

impl framework::Scene for Splatter {
    type Params = (EffectParams, Assets);

    fn init(
        (params, assets): Self::Params,
        config: &wgpu::SurfaceConfiguration,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> anyhow::Result<Self> {
        info!("Running!");
        let effect = SplatEffect::init(&params, &assets, config.format, device, queue)
            .context("failed to start the effect")?;
        Ok(Splatter { effect })
    }

    fn resize(
        &mut self,
        config: &wgpu::SurfaceConfiguration,
        _device: &wgpu::Device,
        _queue: &wgpu::Queue,
    ) {
        // The simulation keeps its own resolution, only the output is rescaled.
        info!("Resizing: ({}, {})", config.width, config.height);
    }

    fn handle_event(&mut self, _event: winit::event::WindowEvent) {}

    fn render(
        &mut self,
        view: &wgpu::TextureView,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> FrameOutcome {
        self.effect.render(view, device, queue)
    }

    fn shutdown(&mut self) {
        info!("Stopping after {} frames", self.effect.frame());
        self.effect.shutdown();
    }
}

fn load_config() -> anyhow::Result<EffectParams> {
    let params = get_effect_config(CONFIG.flag);
    params
        .validate()
        .with_context(|| format!("invalid config in {}", CONFIG.flag))?;
    Ok(params)
}

fn run() -> anyhow::Result<()> {
    let params = load_config()?;
    let assets = load_assets_blocking(&params).context("failed to resolve resources")?;
    let (width, height) = (params.width, params.height);
    framework::run::<Splatter>("Splatter", width, height, (params, assets))
}

fn main() {
    gflags::parse();
    if HELP.flag {
        gflags::print_help_and_exit(0);
    }
    if let Err(e) = scrub_log::init_with_filter_string(LOG_FILTER.flag) {
        eprintln!("Failed to initialize logging: {:?}", e);
    }
    if let Err(e) = run() {
        error!("Startup failed: {:#}", e);
        std::process::exit(1);
    }
}
