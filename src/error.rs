use thiserror::Error;

#[derive(Error, Debug)]
pub enum EffectError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("failed to load image '{path}': {source}")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("missing shader source '{0}'")]
    MissingShader(String),
    #[error("shader '{0}' is not valid utf-8")]
    ShaderEncoding(String),
    #[error("resource loader failed: {0}")]
    Loader(String),
    #[error("failed to start the director thread: {0}")]
    DirectorSpawn(#[source] std::io::Error),
    #[error("no compatible graphics adapter found")]
    NoAdapter,
    #[error("failed to acquire graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

pub type Result<T> = std::result::Result<T, EffectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_failure_keeps_its_cause() {
        let err = EffectError::DirectorSpawn(std::io::Error::new(
            std::io::ErrorKind::WouldBlock,
            "out of threads",
        ));
        assert!(err.to_string().contains("out of threads"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
