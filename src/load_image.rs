use crate::error::{EffectError, Result};
use log::info;

// RGBA8 pixels, rows top to bottom.
#[derive(Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

pub fn decode_image(path: &str) -> Result<DecodedImage> {
    let image = image::open(path)
        .map_err(|source| EffectError::Image {
            path: path.into(),
            source,
        })?
        .into_rgba8();
    let width = image.width();
    let height = image.height();
    info!(
        "Loaded image {} with (width, height) = ({}, {})",
        path, width, height
    );
    Ok(DecodedImage {
        width,
        height,
        data: image.into_raw(),
    })
}

// Uploads a decoded image into a sampled texture and returns its view.
pub fn create_image_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: &DecodedImage,
    label: &str,
) -> wgpu::TextureView {
    let texture_extent = wgpu::Extent3d {
        width: image.width,
        height: image.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        size: texture_extent,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        label: Some(label),
    });
    let data_layout = wgpu::ImageDataLayout {
        offset: 0,
        bytes_per_row: std::num::NonZeroU32::new(4 * image.width),
        rows_per_image: None,
    };
    queue.write_texture(
        texture.as_image_copy(),
        &image.data,
        data_layout,
        texture_extent,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

// Static images are sampled texel for texel.
pub fn make_image_sampler(device: &wgpu::Device, label: &str) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Nearest,
        min_filter: wgpu::FilterMode::Nearest,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}
