//! Built-in scenarios
//!
//! - `plot2d`: 300 particles in a flat ring around a heavy attractor, no
//!   horizon, 1000 frames at 50 fps, single colour
//! - `orbit3d`: 80 particles in a spherical shell, event horizon of radius
//!   0.5, distance-banded colours and trails, 100 fps until closed

use super::config::{
    AttractorConfig, BandsConfig, EngineConfig, InitialConfig, ParametersConfig, ScenarioConfig,
};
use super::error::{ConfigError, ConfigResult};

pub const PRESET_NAMES: &str = "plot2d, orbit3d";

pub fn plot2d() -> ScenarioConfig {
    ScenarioConfig {
        engine: EngineConfig {
            dimension: 2,
            frames: Some(1000),
            seconds: None,
            rate: Some(50.0),
            trail: 0,
            ball_radius: 0.1,
            view_extent: 15.0,
        },
        attractor: AttractorConfig {
            G: 10.0,
            mass: 1000.0,
        },
        parameters: ParametersConfig {
            dt: 0.01,
            eps: 1.0e-3,
            absorption_radius: None,
        },
        bands: None,
        initial: InitialConfig::Annulus {
            count: 300,
            radius: 10.0,
            spin: 0.3,
            noise: 0.05,
            seed: None,
        },
    }
}

pub fn orbit3d() -> ScenarioConfig {
    ScenarioConfig {
        engine: EngineConfig {
            dimension: 3,
            frames: None,
            seconds: None,
            rate: Some(100.0),
            trail: 200,
            ball_radius: 0.2,
            view_extent: 15.0,
        },
        attractor: AttractorConfig {
            G: 10.0,
            mass: 100.0,
        },
        parameters: ParametersConfig {
            dt: 0.01,
            eps: 1.0e-6,
            absorption_radius: Some(0.5),
        },
        bands: Some(BandsConfig {
            far: 5.0,
            near: 2.0,
        }),
        initial: InitialConfig::Shell {
            count: 80,
            extent: 15.0,
            spin: 0.3,
            noise: 0.05,
            seed: None,
        },
    }
}

/// Look up a preset by name
pub fn preset(name: &str) -> ConfigResult<ScenarioConfig> {
    match name {
        "plot2d" => Ok(plot2d()),
        "orbit3d" => Ok(orbit3d()),
        other => Err(ConfigError::UnknownPreset(other.to_string(), PRESET_NAMES)),
    }
}
