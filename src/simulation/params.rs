//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds the stepping settings:
//! - fixed step size `dt`,
//! - additive softening `eps` in the force denominator,
//! - optional absorption (event horizon) radius.
//!
//! `Attractor` is the fixed central mass every particle falls towards.

use super::forces::CentralGravity;
use super::states::Vector;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub dt: f64,                        // step size
    pub eps: f64,                       // softening, added to r^3
    pub absorption_radius: Option<f64>, // None disables absorption
}

#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attractor<const D: usize> {
    pub position: Vector<D>, // fixed for the whole run
    pub mass: f64,
    pub G: f64, // gravitational constant
}

#[allow(non_snake_case)]
impl<const D: usize> Attractor<D> {
    pub fn at_origin(mass: f64, G: f64) -> Self {
        Self {
            position: Vector::<D>::zeros(),
            mass,
            G,
        }
    }

    /// G * M
    pub fn mu(&self) -> f64 {
        self.G * self.mass
    }

    /// Softened gravity term pulling towards this attractor
    pub fn gravity(&self, eps: f64) -> CentralGravity<D> {
        CentralGravity {
            center: self.position,
            G: self.G,
            mass: self.mass,
            eps,
        }
    }

    /// Newtonian potential per unit particle mass, -G*M/r, with r floored by `eps`
    pub fn potential(&self, x: &Vector<D>, eps: f64) -> f64 {
        let r = (x - self.position).norm().max(eps);
        -self.mu() / r
    }
}
