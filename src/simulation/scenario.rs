//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime bundle
//! (`Scenario<2>` or `Scenario<3>`) containing:
//! - viewer settings (`ViewSettings`)
//! - the simulation driver with its state at t = 0, integrator and limits
//! - the seed the initial particles were drawn with
//!
//! Scenarios are inserted into Bevy as `Resource`s and consumed by the
//! stepping and drawing systems, or run directly in headless mode.

use bevy::prelude::Resource;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::configuration::config::{duration, InitialConfig, ParticleConfig, ScenarioConfig};
use crate::configuration::error::{ConfigError, ConfigResult};
use crate::simulation::bands::DistanceBands;
use crate::simulation::engine::{RunLimits, Simulation};
use crate::simulation::initial::{Annulus, Shell};
use crate::simulation::integrator::GravityIntegrator;
use crate::simulation::params::{Attractor, Parameters};
use crate::simulation::states::{Particle, SimulationState, Vector};

/// Presentation settings handed to the viewers
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSettings {
    pub bands: Option<DistanceBands>, // None -> every particle drawn in one colour
    pub trail: usize,
    pub ball_radius: f64,
    pub view_extent: f64,
    pub rate: Option<f64>,
}

/// Bevy resource representing a fully-initialized scenario of dimension `D`
#[derive(Resource)]
pub struct Scenario<const D: usize> {
    pub view: ViewSettings,
    pub simulation: Simulation<D>,
    pub seed: Option<u64>, // None for explicit particle sets
}

impl<const D: usize> Scenario<D> {
    /// Attractor, parameters and limits shared by both dimensions
    fn assemble(
        cfg: &ScenarioConfig,
        particles: Vec<Particle<D>>,
        seed: Option<u64>,
    ) -> ConfigResult<Self> {
        let attractor = Attractor::<D>::at_origin(cfg.attractor.mass, cfg.attractor.G);
        let parameters = Parameters {
            dt: cfg.parameters.dt,
            eps: cfg.parameters.eps,
            absorption_radius: cfg.parameters.absorption_radius,
        };

        let limits = RunLimits {
            frames: cfg.engine.frames,
            wall_clock: cfg
                .engine
                .seconds
                .map(|s| duration("engine.seconds", s))
                .transpose()?,
            rate: cfg.engine.rate,
        };

        let view = ViewSettings {
            bands: cfg.bands.as_ref().map(|b| DistanceBands {
                far: b.far,
                near: b.near,
            }),
            trail: cfg.engine.trail,
            ball_radius: cfg.engine.ball_radius,
            view_extent: cfg.engine.view_extent,
            rate: cfg.engine.rate,
        };

        info!(
            "built {}D scenario: {} particles, G = {}, M = {}, dt = {}, eps = {}, horizon = {:?}",
            D,
            particles.len(),
            attractor.G,
            attractor.mass,
            parameters.dt,
            parameters.eps,
            parameters.absorption_radius
        );

        let state = SimulationState::new(particles);
        let integrator = GravityIntegrator::new(attractor, parameters);

        Ok(Self {
            view,
            simulation: Simulation::new(state, integrator, limits),
            seed,
        })
    }
}

/// Seed from the config, or a fresh random one so the run can be reproduced
/// from the logs
fn resolve_seed(initial: &InitialConfig) -> u64 {
    let seed = initial.seed().unwrap_or_else(rand::random);
    info!("initial conditions seed: {seed}");
    seed
}

/// Map explicit `ParticleConfig`s onto runtime particles of dimension `D`
fn explicit_particles<const D: usize>(particles: &[ParticleConfig]) -> ConfigResult<Vec<Particle<D>>> {
    particles
        .iter()
        .enumerate()
        .map(|(index, pc)| {
            for found in [pc.x.len(), pc.v.len()] {
                if found != D {
                    return Err(ConfigError::ParticleShape {
                        index,
                        expected: D,
                        found,
                    });
                }
            }
            Ok(Particle::new(
                Vector::<D>::from_column_slice(&pc.x),
                Vector::<D>::from_column_slice(&pc.v),
            ))
        })
        .collect()
}

impl Scenario<2> {
    pub fn build_scenario(cfg: &ScenarioConfig) -> ConfigResult<Self> {
        cfg.validate()?;
        if cfg.engine.dimension != 2 {
            return Err(ConfigError::Dimension(cfg.engine.dimension));
        }

        let (particles, seed) = match &cfg.initial {
            InitialConfig::Annulus {
                count,
                radius,
                spin,
                noise,
                ..
            } => {
                let seed = resolve_seed(&cfg.initial);
                let mut rng = StdRng::seed_from_u64(seed);
                let annulus = Annulus {
                    count: *count,
                    radius: *radius,
                    spin: *spin,
                    noise: *noise,
                };
                (annulus.generate(&mut rng), Some(seed))
            }
            InitialConfig::Explicit { particles } => (explicit_particles(particles)?, None),
            InitialConfig::Shell { .. } => {
                return Err(ConfigError::InitialKind {
                    kind: cfg.initial.kind(),
                    dimension: 2,
                })
            }
        };

        Self::assemble(cfg, particles, seed)
    }
}

// =========================================================================================
// 3d stuff below
// =========================================================================================

impl Scenario<3> {
    pub fn build_scenario_3d(cfg: &ScenarioConfig) -> ConfigResult<Self> {
        cfg.validate()?;
        if cfg.engine.dimension != 3 {
            return Err(ConfigError::Dimension(cfg.engine.dimension));
        }

        let (particles, seed) = match &cfg.initial {
            InitialConfig::Shell {
                count,
                extent,
                spin,
                noise,
                ..
            } => {
                let seed = resolve_seed(&cfg.initial);
                let mut rng = StdRng::seed_from_u64(seed);
                // keep fresh particles clear of the horizon by one drawn radius
                let exclusion =
                    cfg.parameters.absorption_radius.unwrap_or(0.0) + cfg.engine.ball_radius;
                let shell = Shell {
                    count: *count,
                    extent: *extent,
                    spin: *spin,
                    noise: *noise,
                    exclusion,
                };
                (shell.generate(&mut rng), Some(seed))
            }
            InitialConfig::Explicit { particles } => (explicit_particles(particles)?, None),
            InitialConfig::Annulus { .. } => {
                return Err(ConfigError::InitialKind {
                    kind: cfg.initial.kind(),
                    dimension: 3,
                })
            }
        };

        Self::assemble(cfg, particles, seed)
    }
}

pub type Scenario2D = Scenario<2>;
pub type Scenario3D = Scenario<3>;
