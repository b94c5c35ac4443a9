use crate::error::EffectError;
use crate::splat_slots::MAX_SPLATS;
use serde::{Deserialize, Serialize};

// Parameters that define the effect. These don't change at runtime.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EffectParams {
    // Resolution of the simulation state textures.
    pub width: u32,
    pub height: u32,

    // Simulation clock increment per frame.
    pub time_step: f32,
    // Number of seed slots used each frame, at most the shader's slot count.
    pub capacity: usize,
    // Trail fade per frame, 0 keeps trails forever.
    pub decay: f32,

    pub reference_image: String,
    pub background_image: String,

    #[serde(default)]
    pub director: DirectorParams,
}

// Uniform sampling ranges for new splats, as [min, max).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct DirectorParams {
    pub period_ms: u64,
    // Inclusive range of ticks.
    pub duration: [u32; 2],
    pub size: [f32; 2],
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub total_amount: [f32; 2],
    pub scatter: f32,
}

impl Default for DirectorParams {
    fn default() -> Self {
        DirectorParams {
            period_ms: 200,
            duration: [1, 20],
            size: [0.0, 0.1],
            position: [0.0, 1.0],
            velocity: [-0.05, 0.05],
            total_amount: [0.3, 1.0],
            scatter: crate::splat::DEFAULT_SCATTER,
        }
    }
}

impl DirectorParams {
    pub fn period(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.period_ms)
    }

    pub fn validate(&self) -> Result<(), EffectError> {
        if self.period_ms == 0 {
            return Err(EffectError::InvalidConfig(
                "director.period_ms must be positive".into(),
            ));
        }
        if self.duration[0] < 1 || self.duration[0] > self.duration[1] {
            return Err(EffectError::InvalidConfig(format!(
                "director.duration must satisfy 1 <= min <= max, got {:?}",
                self.duration
            )));
        }
        let ranges = [
            ("size", self.size),
            ("position", self.position),
            ("velocity", self.velocity),
            ("total_amount", self.total_amount),
        ];
        for (name, [min, max]) in ranges.iter() {
            if !(min <= max) {
                return Err(EffectError::InvalidConfig(format!(
                    "director.{} must satisfy min <= max, got [{}, {}]",
                    name, min, max
                )));
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for EffectParams {
    type Err = toml::de::Error;
    fn from_str(serialized: &str) -> Result<Self, Self::Err> {
        let params = toml::from_str(serialized)?;
        Ok(params)
    }
}

impl Default for EffectParams {
    fn default() -> Self {
        EffectParams {
            width: 640,
            height: 360,
            time_step: 0.01,
            capacity: MAX_SPLATS,
            decay: 0.0,
            reference_image: "assets/reference.png".into(),
            background_image: "assets/background.png".into(),
            director: DirectorParams::default(),
        }
    }
}

impl EffectParams {
    pub fn validate(&self) -> Result<(), EffectError> {
        if self.width == 0 || self.height == 0 {
            return Err(EffectError::InvalidConfig(format!(
                "resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.capacity == 0 || self.capacity > MAX_SPLATS {
            return Err(EffectError::InvalidConfig(format!(
                "capacity must be in 1..={}, got {}",
                MAX_SPLATS, self.capacity
            )));
        }
        if !(0.0..1.0).contains(&self.decay) {
            return Err(EffectError::InvalidConfig(format!(
                "decay must be in [0, 1), got {}",
                self.decay
            )));
        }
        if !(self.time_step > 0.0) {
            return Err(EffectError::InvalidConfig(format!(
                "time_step must be positive, got {}",
                self.time_step
            )));
        }
        self.director.validate()
    }
}

pub fn read_config_from_file(path: &str) -> Result<EffectParams, EffectError> {
    let params = std::fs::read_to_string(path)?.parse()?;
    Ok(params)
}

// Falls back to the defaults when the file is missing or does not parse.
pub fn get_effect_config(path: &str) -> EffectParams {
    match read_config_from_file(path) {
        Ok(params) => params,
        Err(e) => {
            log::error!("Failed to parse config file({}): {}", path, e);
            EffectParams::default()
        }
    }
}
