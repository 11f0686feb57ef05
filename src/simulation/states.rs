//! Core state types for the particle simulation.
//!
//! Particles and the simulation state are generic over the spatial dimension
//! `D` (2 or 3) and use nalgebra fixed-size vectors:
//! - `Particle<D>`        position, velocity and liveness of one particle
//! - `SimulationState<D>` all particles plus elapsed time and step count
//!
//! Absorbed particles stay in the buffer so indices remain stable for the
//! viewers, but they are skipped by the integrator and by [`SimulationState::active`].

use nalgebra::SVector;

pub type Vector<const D: usize> = SVector<f64, D>;
pub type NVec2 = Vector<2>;
pub type NVec3 = Vector<3>;

/// Liveness of a particle. `Absorbed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Status {
    Alive,
    /// Crossed the absorption radius during step `step` (0-based) at time `t`
    Absorbed { step: u64, t: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle<const D: usize> {
    pub x: Vector<D>, // position
    pub v: Vector<D>, // velocity
    pub status: Status,
}

impl<const D: usize> Particle<D> {
    pub fn new(x: Vector<D>, v: Vector<D>) -> Self {
        Self {
            x,
            v,
            status: Status::Alive,
        }
    }

    pub fn is_alive(&self) -> bool {
        matches!(self.status, Status::Alive)
    }

    /// Distance from `point` to this particle's current position
    pub fn distance_to(&self, point: &Vector<D>) -> f64 {
        (self.x - point).norm()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState<const D: usize> {
    pub particles: Vec<Particle<D>>, // every particle ever created, alive or absorbed
    pub t: f64,                      // elapsed simulation time
    pub step: u64,                   // number of completed steps
}

impl<const D: usize> SimulationState<D> {
    /// Initial state at t = 0
    pub fn new(particles: Vec<Particle<D>>) -> Self {
        Self {
            particles,
            t: 0.0,
            step: 0,
        }
    }

    /// Live particles with their stable indices
    pub fn active(&self) -> impl Iterator<Item = (usize, &Particle<D>)> + '_ {
        self.particles
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_alive())
    }

    pub fn alive_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_alive()).count()
    }

    pub fn absorbed_count(&self) -> usize {
        self.particles.len() - self.alive_count()
    }

    pub fn is_depleted(&self) -> bool {
        self.alive_count() == 0
    }
}

pub type Particle2 = Particle<2>;
pub type Particle3 = Particle<3>;
pub type State2 = SimulationState<2>;
pub type State3 = SimulationState<3>;
