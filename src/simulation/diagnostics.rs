//! Run diagnostics: particle counts and conserved-in-theory quantities
//!
//! Euler stepping does not conserve energy or angular momentum, so these are
//! for watching drift, not for correcting it. All quantities are per unit
//! particle mass and summed over live particles only.

use nalgebra::SMatrix;

use super::params::Attractor;
use super::states::SimulationState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnostics {
    pub alive: usize,
    pub absorbed: usize,
    pub kinetic: f64,
    pub potential: f64,
    pub angular_momentum: f64, // magnitude of the total x ^ v
}

impl Diagnostics {
    pub fn total_energy(&self) -> f64 {
        self.kinetic + self.potential
    }
}

/// Measure the live particles of `sys` around `attractor`, flooring distances by `eps`
pub fn measure<const D: usize>(
    sys: &SimulationState<D>,
    attractor: &Attractor<D>,
    eps: f64,
) -> Diagnostics {
    let mut kinetic = 0.0;
    let mut potential = 0.0;
    // Antisymmetric x v^T - v x^T holds the wedge product in any dimension
    let mut wedge = SMatrix::<f64, D, D>::zeros();

    for (_, p) in sys.active() {
        kinetic += 0.5 * p.v.norm_squared();
        potential += attractor.potential(&p.x, eps);

        let rel = p.x - attractor.position;
        wedge += rel * p.v.transpose() - p.v * rel.transpose();
    }

    let alive = sys.alive_count();
    Diagnostics {
        alive,
        absorbed: sys.particles.len() - alive,
        kinetic,
        potential,
        angular_momentum: wedge.norm() / std::f64::consts::SQRT_2,
    }
}
