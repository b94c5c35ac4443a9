use crate::effect_params::EffectParams;
use crate::error::{EffectError, Result};
use crate::load_image::{decode_image, DecodedImage};
use crate::shader_utils::ShaderSources;
use futures::executor::ThreadPool;
use futures::task::SpawnExt;
use log::info;

// Everything that has to be resolved before the effect can be built.
#[derive(Debug)]
pub struct Assets {
    pub shaders: ShaderSources,
    pub reference: DecodedImage,
    pub background: DecodedImage,
}

/// Decodes both images on `pool` while the shaders are resolved. Any failure
/// fails the whole load and cancels outstanding work.
pub async fn load_assets(pool: &ThreadPool, params: &EffectParams) -> Result<Assets> {
    let spawn_decode = |path: String| {
        pool.spawn_with_handle(async move { decode_image(&path) })
            .map_err(|e| EffectError::Loader(e.to_string()))
    };
    let reference = spawn_decode(params.reference_image.clone())?;
    let background = spawn_decode(params.background_image.clone())?;
    let shaders = ShaderSources::load()?;
    let (reference, background) = futures::future::try_join(reference, background).await?;
    info!("All resources resolved");
    Ok(Assets {
        shaders,
        reference,
        background,
    })
}

pub fn load_assets_blocking(params: &EffectParams) -> Result<Assets> {
    let pool = ThreadPool::new()?;
    futures::executor::block_on(load_assets(&pool, params))
}
