//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – dimension, run limits and viewer options
//! - [`AttractorConfig`]  – mass and gravitational constant of the central body
//! - [`ParametersConfig`] – step size, softening and absorption radius
//! - [`BandsConfig`]      – optional distance bands used for colouring
//! - [`InitialConfig`]    – how the initial particle set is produced
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example 3D scenario matching these types:
//!
//! ```yaml
//! engine:
//!   dimension: 3            # 2 or 3
//!   frames: 5000            # optional frame budget
//!   rate: 100.0             # optional frames per second
//!   trail: 200              # trail length in the 3D viewer
//!
//! attractor:
//!   G: 10.0
//!   mass: 100.0
//!
//! parameters:
//!   dt: 0.01
//!   eps: 1.0e-6             # added to r^3 in the force law
//!   absorption_radius: 0.5  # optional event horizon
//!
//! bands:                    # optional, omitted -> single colour
//!   far: 5.0
//!   near: 2.0
//!
//! initial:
//!   kind: shell             # annulus | shell | explicit
//!   count: 80
//!   extent: 15.0
//!   seed: 42                # optional, omitted -> random seed
//! ```
//!
//! The scenario builder maps this configuration onto the runtime types in
//! [`crate::simulation`].

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use super::error::{ConfigError, ConfigResult};

fn default_trail() -> usize {
    200
}
fn default_ball_radius() -> f64 {
    0.2
}
fn default_view_extent() -> f64 {
    15.0
}
fn default_annulus_radius() -> f64 {
    10.0
}
fn default_shell_extent() -> f64 {
    15.0
}
fn default_spin() -> f64 {
    0.3
}
fn default_noise() -> f64 {
    0.05
}

/// Engine-level options: dimension, run limits and viewer settings
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub dimension: usize,     // 2 or 3
    pub frames: Option<u64>,  // frame budget, None = unbounded
    pub seconds: Option<f64>, // wall-clock budget, None = unbounded
    pub rate: Option<f64>,    // frames per second
    #[serde(default = "default_trail")]
    pub trail: usize, // positions kept per particle trail (3D viewer), 0 disables
    #[serde(default = "default_ball_radius")]
    pub ball_radius: f64, // drawn particle radius, also keeps generated particles clear of the horizon
    #[serde(default = "default_view_extent")]
    pub view_extent: f64, // half-width of the visible region
}

/// The central body
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AttractorConfig {
    pub G: f64,    // gravitational constant
    pub mass: f64, // mass of the attractor
}

/// Integration parameters
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ParametersConfig {
    pub dt: f64,                        // fixed time step
    pub eps: f64,                       // softening added to r^3
    pub absorption_radius: Option<f64>, // event horizon, None disables absorption
}

/// Distance thresholds for colouring, `far > near`
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BandsConfig {
    pub far: f64,
    pub near: f64,
}

/// One explicitly placed particle
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ParticleConfig {
    pub x: Vec<f64>, // initial position, one entry per dimension
    pub v: Vec<f64>, // initial velocity, one entry per dimension
}

/// How the initial particle set is produced
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InitialConfig {
    /// Flat ring around the attractor (2D)
    Annulus {
        count: usize,
        #[serde(default = "default_annulus_radius")]
        radius: f64,
        #[serde(default = "default_spin")]
        spin: f64,
        #[serde(default = "default_noise")]
        noise: f64,
        seed: Option<u64>,
    },
    /// Thick spherical shell around the attractor (3D)
    Shell {
        count: usize,
        #[serde(default = "default_shell_extent")]
        extent: f64,
        #[serde(default = "default_spin")]
        spin: f64,
        #[serde(default = "default_noise")]
        noise: f64,
        seed: Option<u64>,
    },
    /// Hand-placed particles, any dimension
    Explicit { particles: Vec<ParticleConfig> },
}

impl InitialConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            InitialConfig::Annulus { .. } => "annulus",
            InitialConfig::Shell { .. } => "shell",
            InitialConfig::Explicit { .. } => "explicit",
        }
    }

    pub fn seed(&self) -> Option<u64> {
        match self {
            InitialConfig::Annulus { seed, .. } | InitialConfig::Shell { seed, .. } => *seed,
            InitialConfig::Explicit { .. } => None,
        }
    }

    /// Override the seed of a generated set; explicit sets ignore it
    pub fn set_seed(&mut self, value: u64) {
        match self {
            InitialConfig::Annulus { seed, .. } | InitialConfig::Shell { seed, .. } => {
                *seed = Some(value)
            }
            InitialConfig::Explicit { .. } => {}
        }
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,
    pub attractor: AttractorConfig,
    pub parameters: ParametersConfig,
    pub bands: Option<BandsConfig>,
    pub initial: InitialConfig,
}

fn finite(name: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        })
    }
}

fn positive(name: &'static str, value: f64) -> ConfigResult<()> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value,
            reason: "must be greater than zero",
        })
    }
}

fn non_negative(name: &'static str, value: f64) -> ConfigResult<()> {
    finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value,
            reason: "must not be negative",
        })
    }
}

/// Seconds as a `Duration`, rejecting values `Duration` cannot hold
pub(crate) fn duration(name: &'static str, seconds: f64) -> ConfigResult<Duration> {
    positive(name, seconds)?;
    Duration::try_from_secs_f64(seconds).map_err(|_| ConfigError::InvalidParameter {
        name,
        value: seconds,
        reason: "does not fit in a duration",
    })
}

impl ScenarioConfig {
    /// Parse and validate a scenario from YAML text
    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        let cfg: ScenarioConfig = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a scenario from any reader
    pub fn from_reader<R: Read>(reader: R) -> ConfigResult<Self> {
        let cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a scenario file
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Reject values the integrator or the generators cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        let dimension = self.engine.dimension;
        if dimension != 2 && dimension != 3 {
            return Err(ConfigError::Dimension(dimension));
        }
        if let Some(seconds) = self.engine.seconds {
            duration("engine.seconds", seconds)?;
        }
        if let Some(rate) = self.engine.rate {
            positive("engine.rate", rate)?;
            // the frame period must fit a Duration and not round down to zero
            match duration("engine.rate", 1.0 / rate) {
                Ok(period) if !period.is_zero() => {}
                _ => {
                    return Err(ConfigError::InvalidParameter {
                        name: "engine.rate",
                        value: rate,
                        reason: "frame period does not fit in a duration",
                    })
                }
            }
        }
        positive("engine.ball_radius", self.engine.ball_radius)?;
        positive("engine.view_extent", self.engine.view_extent)?;

        positive("attractor.G", self.attractor.G)?;
        positive("attractor.mass", self.attractor.mass)?;

        positive("parameters.dt", self.parameters.dt)?;
        // eps > 0 keeps r^3 + eps away from zero at the attractor itself
        positive("parameters.eps", self.parameters.eps)?;
        if let Some(radius) = self.parameters.absorption_radius {
            positive("parameters.absorption_radius", radius)?;
        }

        if let Some(bands) = &self.bands {
            positive("bands.far", bands.far)?;
            non_negative("bands.near", bands.near)?;
            if bands.near > bands.far {
                return Err(ConfigError::InvalidParameter {
                    name: "bands.near",
                    value: bands.near,
                    reason: "must not exceed bands.far",
                });
            }
        }

        match &self.initial {
            InitialConfig::Annulus {
                count,
                radius,
                spin,
                noise,
                ..
            } => {
                if dimension != 2 {
                    return Err(ConfigError::InitialKind {
                        kind: self.initial.kind(),
                        dimension,
                    });
                }
                positive("initial.count", *count as f64)?;
                positive("initial.radius", *radius)?;
                finite("initial.spin", *spin)?;
                non_negative("initial.noise", *noise)?;
            }
            InitialConfig::Shell {
                count,
                extent,
                spin,
                noise,
                ..
            } => {
                if dimension != 3 {
                    return Err(ConfigError::InitialKind {
                        kind: self.initial.kind(),
                        dimension,
                    });
                }
                positive("initial.count", *count as f64)?;
                positive("initial.extent", *extent)?;
                finite("initial.spin", *spin)?;
                non_negative("initial.noise", *noise)?;
                let exclusion =
                    self.parameters.absorption_radius.unwrap_or(0.0) + self.engine.ball_radius;
                if 0.6 * extent <= exclusion {
                    return Err(ConfigError::InvalidParameter {
                        name: "initial.extent",
                        value: *extent,
                        reason: "shell lies entirely inside the absorption radius",
                    });
                }
            }
            InitialConfig::Explicit { particles } => {
                for (index, p) in particles.iter().enumerate() {
                    for found in [p.x.len(), p.v.len()] {
                        if found != dimension {
                            return Err(ConfigError::ParticleShape {
                                index,
                                expected: dimension,
                                found,
                            });
                        }
                    }
                    for value in p.x.iter().chain(p.v.iter()) {
                        finite("initial.particles", *value)?;
                    }
                }
            }
        }

        Ok(())
    }
}
