use crate::error::{EffectError, Result};
use log::info;
use std::borrow::Cow;

// WGSL rendered by build.rs into the output directory.
#[derive(rust_embed::RustEmbed)]
#[folder = "$OUT_DIR/shaders"]
pub struct Shaders;

pub const VERTEX_SHADER: &str = "quad.wgsl";
pub const SIMULATION_SHADER: &str = "simulation.wgsl";
pub const RENDERING_SHADER: &str = "rendering.wgsl";

pub fn list_shaders() {
    for entry in Shaders::iter() {
        info!("Found shader: {}", entry);
    }
}

pub fn shader_source(name: &str) -> Result<String> {
    let bytes = Shaders::get(name).ok_or_else(|| EffectError::MissingShader(name.into()))?;
    String::from_utf8(bytes.into_owned()).map_err(|_| EffectError::ShaderEncoding(name.into()))
}

// The three programs the pipeline needs. Loading is all or nothing.
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub vertex: String,
    pub simulation: String,
    pub rendering: String,
}

impl ShaderSources {
    pub fn load() -> Result<Self> {
        list_shaders();
        Ok(ShaderSources {
            vertex: shader_source(VERTEX_SHADER)?,
            simulation: shader_source(SIMULATION_SHADER)?,
            rendering: shader_source(RENDERING_SHADER)?,
        })
    }
}

pub fn create_shader_module(device: &wgpu::Device, label: &str, source: &str) -> wgpu::ShaderModule {
    device.create_shader_module(&wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(source)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splat_slots::MAX_SPLATS;

    #[test]
    fn internal() {
        list_shaders();
        let sources = ShaderSources::load().unwrap();
        assert!(sources.vertex.contains("vs_main"));
        assert!(sources.simulation.contains("fs_main"));
        assert!(sources.rendering.contains("fs_main"));
    }

    #[test]
    fn slot_count_is_templated() {
        let simulation = shader_source(SIMULATION_SHADER).unwrap();
        assert!(!simulation.contains("{{"));
        assert!(simulation.contains(&format!("array<f32, {}>", MAX_SPLATS)));
        assert!(simulation.contains(&format!("array<f32, {}>", 2 * MAX_SPLATS)));
    }

    #[test]
    fn missing_shader_is_an_error() {
        match shader_source("nope.wgsl") {
            Err(EffectError::MissingShader(name)) => assert_eq!(name, "nope.wgsl"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
