use crate::ping_pong::PingPong;
use log::info;

// Float state keeps slow fades from quantizing away.
pub const STATE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

// One persistent simulation state target.
pub struct StateSlot {
    // Kept alive for the view.
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

pub type StateBuffers = PingPong<StateSlot>;

fn make_state_slot(device: &wgpu::Device, width: u32, height: u32, index: usize) -> StateSlot {
    let label = format!("Simulation state {}", index);
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: STATE_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::RENDER_ATTACHMENT,
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    StateSlot {
        _texture: texture,
        view,
    }
}

// Allocates both state slots up front. New textures start zeroed, which is the
// empty simulation state.
pub fn create_state_buffers(device: &wgpu::Device, width: u32, height: u32) -> StateBuffers {
    info!("Allocating simulation state: {}x{}", width, height);
    PingPong::from_fn(|index| make_state_slot(device, width, height, index))
}

pub fn make_state_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("State sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}

pub fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

pub fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}
