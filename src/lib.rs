pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use simulation::states::{Particle, Particle2, Particle3, SimulationState, State2, State3, Status, NVec2, NVec3, Vector};
pub use simulation::params::{Attractor, Parameters};
pub use simulation::forces::{Acceleration, AccelSet, CentralGravity};
pub use simulation::integrator::{euler_integrator, GravityIntegrator, StepReport};
pub use simulation::bands::{Band, DistanceBands};
pub use simulation::initial::{Annulus, Shell};
pub use simulation::diagnostics::{measure, Diagnostics};
pub use simulation::engine::{CancelToken, RunLimits, RunState, Simulation, StopReason};
pub use simulation::scenario::{Scenario, Scenario2D, Scenario3D, ViewSettings};

pub use configuration::config::{AttractorConfig, BandsConfig, EngineConfig, InitialConfig, ParametersConfig, ParticleConfig, ScenarioConfig};
pub use configuration::error::{ConfigError, ConfigResult};
pub use configuration::presets::preset;

pub use visualization::{vis2d::run_2d, vis3d::run_3d};

pub use benchmark::benchmark::{bench_step, bench_step_curve};
