//! Fixed-step time integrator for particles around a central attractor
//!
//! Forward Euler in the velocity-first form used by all the scenarios:
//! the velocity is kicked with the acceleration at the current position, then
//! the position drifts with the *new* velocity. No randomness and no
//! allocation happen inside a step.

use super::forces::{AccelSet, Acceleration};
use super::params::{Attractor, Parameters};
use super::states::{SimulationState, Status};

/// What a single step did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub advanced: usize, // particles integrated this step
    pub absorbed: usize, // particles that crossed the absorption radius this step
}

/// Advance every live particle by one step of `params.dt`
///
/// For each live particle the distance `r` to the attractor is taken from the
/// position at the start of the step. If absorption is enabled and
/// `r <= absorption_radius` the particle is marked absorbed and left where it
/// is; otherwise
/// - v_n+1 = v_n + dt * a(x_n)
/// - x_n+1 = x_n + dt * v_n+1
///
/// `sys.t` and `sys.step` advance even when no particle is alive.
pub fn euler_integrator<const D: usize>(
    sys: &mut SimulationState<D>,
    forces: &AccelSet<D>,
    attractor: &Attractor<D>,
    params: &Parameters,
) -> StepReport {
    let dt = params.dt;
    let t = sys.t;
    let step = sys.step;
    let mut report = StepReport::default();

    for p in sys.particles.iter_mut() {
        if !p.is_alive() {
            continue;
        }

        let r = p.distance_to(&attractor.position);
        if let Some(horizon) = params.absorption_radius {
            if r <= horizon {
                p.status = Status::Absorbed { step, t };
                report.absorbed += 1;
                continue;
            }
        }

        // Kick: v_n+1 = v_n + dt * a_n
        let a = forces.accumulate(t, &p.x);
        p.v += a * dt;

        // Drift with the updated velocity
        p.x += p.v * dt;

        report.advanced += 1;
    }

    sys.t += dt;
    sys.step += 1;

    report
}

/// The attractor, its force terms and the stepping parameters, bundled so a
/// driver only has to hand over the state each frame
pub struct GravityIntegrator<const D: usize> {
    pub attractor: Attractor<D>,
    pub forces: AccelSet<D>,
    pub params: Parameters,
}

impl<const D: usize> GravityIntegrator<D> {
    /// Integrator with softened central gravity as its only force term
    pub fn new(attractor: Attractor<D>, params: Parameters) -> Self {
        let forces = AccelSet::new().with(attractor.gravity(params.eps));
        Self {
            attractor,
            forces,
            params,
        }
    }

    /// Add an extra acceleration term on top of central gravity
    pub fn with_term<T>(mut self, term: T) -> Self
    where
        T: Acceleration<D> + Send + Sync + 'static,
    {
        self.forces = self.forces.with(term);
        self
    }

    pub fn step(&self, sys: &mut SimulationState<D>) -> StepReport {
        euler_integrator(sys, &self.forces, &self.attractor, &self.params)
    }
}
