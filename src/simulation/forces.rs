//! Acceleration contributors for the particle engine
//!
//! Particles are test masses: they feel the attractor but not each other, so
//! every term is evaluated per particle from its position alone.

use super::states::Vector;

/// Collection of acceleration terms (central gravity, drag, etc.)
/// Each term implements [`Acceleration`] and their contributions are summed
/// into a single acceleration vector per particle
pub struct AccelSet<const D: usize> {
    terms: Vec<Box<dyn Acceleration<D> + Send + Sync>>,
}

impl<const D: usize> AccelSet<D> {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add an acceleration term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Acceleration<D> + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    /// Total acceleration at time `t` on a particle at `x`
    pub fn accumulate(&self, t: f64, x: &Vector<D>) -> Vector<D> {
        self.terms
            .iter()
            .fold(Vector::<D>::zeros(), |acc, term| acc + term.acceleration(t, x))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl<const D: usize> Default for AccelSet<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Acceleration source evaluated at a single particle position
pub trait Acceleration<const D: usize> {
    fn acceleration(&self, t: f64, x: &Vector<D>) -> Vector<D>;
}

/// Softened inverse-square pull towards a fixed center:
/// `a = -G * M * d / (|d|^3 + eps)` with `d = x - center`
///
/// `eps` is added to the cube rather than to `|d|^2`, so the magnitude peaks
/// near the center and falls to zero at it instead of diverging.
#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy)]
pub struct CentralGravity<const D: usize> {
    pub center: Vector<D>,
    pub G: f64,
    pub mass: f64,
    pub eps: f64,
}

impl<const D: usize> Acceleration<D> for CentralGravity<D> {
    fn acceleration(&self, _t: f64, x: &Vector<D>) -> Vector<D> {
        let d = x - self.center;
        let r = d.norm();
        let denom = r * r * r + self.eps;
        d * (-self.G * self.mass / denom)
    }
}
