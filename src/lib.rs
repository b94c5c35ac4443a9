pub mod assets;
pub mod director;
pub mod effect;
pub mod effect_params;
pub mod error;
pub mod fps_estimator;
pub mod frame_scheduler;
pub mod framework;
pub mod load_image;
pub mod ping_pong;
pub mod quad;
pub mod render;
pub mod shader_utils;
pub mod shutdown;
pub mod simulation;
pub mod splat;
pub mod splat_field;
pub mod state_buffers;

// Generated by build.rs, shared with the shader templates.
pub mod splat_slots {
    include!(concat!(env!("OUT_DIR"), "/splat_slots.rs"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal() {
        shader_utils::list_shaders();
        assert!(shader_utils::Shaders::get(shader_utils::VERTEX_SHADER).is_some());
        assert!(splat_slots::MAX_SPLATS > 0);
    }
}
