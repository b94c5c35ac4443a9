use crate::error::EffectError;
use crate::frame_scheduler::FrameOutcome;
use log::{error, info, warn};
use winit::event::WindowEvent;

// "Framework" for a windowed executable.
pub trait Scene: 'static + Sized {
    type Params;

    fn init(
        params: Self::Params,
        config: &wgpu::SurfaceConfiguration,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> anyhow::Result<Self>;
    fn resize(
        &mut self,
        config: &wgpu::SurfaceConfiguration,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    );
    fn handle_event(&mut self, event: WindowEvent);
    fn render(
        &mut self,
        view: &wgpu::TextureView,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> FrameOutcome;
    fn shutdown(&mut self);
}

struct Setup {
    instance: wgpu::Instance,
    surface: wgpu::Surface,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
}

async fn setup(window: &winit::window::Window) -> anyhow::Result<Setup> {
    let size = window.inner_size();
    let instance = wgpu::Instance::new(wgpu::Backends::PRIMARY);
    let surface = unsafe { instance.create_surface(window) };
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        })
        .await
        .ok_or(EffectError::NoAdapter)?;
    info!("Using adapter: {:?}", adapter.get_info());

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: None,
                features: wgpu::Features::empty(),
                limits: wgpu::Limits::default(),
            },
            None,
        )
        .await
        .map_err(EffectError::from)?;

    let format = surface
        .get_preferred_format(&adapter)
        .ok_or(EffectError::NoAdapter)?;
    // Fifo waits for vertical sync, which paces the frame loop.
    let config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: wgpu::PresentMode::Fifo,
    };
    surface.configure(&device, &config);
    Ok(Setup {
        instance,
        surface,
        adapter,
        device,
        queue,
        config,
    })
}

pub fn run<S: Scene>(title: &str, width: u32, height: u32, params: S::Params) -> anyhow::Result<()> {
    use winit::{
        event::{self, Event},
        event_loop::{ControlFlow, EventLoop},
    };

    let event_loop = EventLoop::new();
    log::info!("Initializing the window...");
    let window = winit::window::WindowBuilder::new()
        .with_title(title)
        .with_inner_size(winit::dpi::LogicalSize::new(width, height))
        .build(&event_loop)?;

    let Setup {
        instance,
        surface,
        adapter,
        device,
        queue,
        mut config,
    } = futures::executor::block_on(setup(&window))?;

    log::info!("Initializing the scene...");
    let mut scene = S::init(params, &config, &device, &queue)?;

    log::info!("Entering render loop...");
    event_loop.run(move |event, _, control_flow| {
        // Keep the instance and adapter alive for as long as the surface.
        let _ = (&instance, &adapter);
        *control_flow = ControlFlow::Poll;
        match event {
            Event::WindowEvent {
                event: WindowEvent::Resized(size),
                ..
            } => {
                log::info!("Resizing to {:?}", size);
                config.width = size.width.max(1);
                config.height = size.height.max(1);
                surface.configure(&device, &config);
                scene.resize(&config, &device, &queue);
            }
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::KeyboardInput {
                    input:
                        event::KeyboardInput {
                            virtual_keycode:
                                Some(event::VirtualKeyCode::Q | event::VirtualKeyCode::Escape),
                            state: event::ElementState::Pressed,
                            ..
                        },
                    ..
                }
                | WindowEvent::CloseRequested => {
                    scene.shutdown();
                    *control_flow = ControlFlow::Exit;
                }
                _ => {
                    scene.handle_event(event);
                }
            },
            Event::MainEventsCleared => window.request_redraw(),
            Event::RedrawRequested(_) => {
                let frame = match surface.get_current_texture() {
                    Ok(frame) => frame,
                    Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                        warn!("Surface lost, reconfiguring and skipping the frame");
                        surface.configure(&device, &config);
                        return;
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        error!("Out of memory acquiring a frame, exiting");
                        scene.shutdown();
                        *control_flow = ControlFlow::Exit;
                        return;
                    }
                    Err(e) => {
                        warn!("Skipping frame: {:?}", e);
                        return;
                    }
                };
                let view = frame
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                match scene.render(&view, &device, &queue) {
                    FrameOutcome::Presented => frame.present(),
                    FrameOutcome::Stopped => *control_flow = ControlFlow::Exit,
                }
            }
            Event::LoopDestroyed => scene.shutdown(),
            _ => (),
        }
    })
}
