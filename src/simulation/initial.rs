//! Initial-condition generators
//!
//! Randomness lives here and nowhere else: stepping is deterministic, so a
//! run is reproducible from its seed. Both generators give orbit-biased
//! velocities, `v = spin * (-y, x)` plus a little noise, so particles swirl
//! around the attractor instead of falling straight in.

use std::f64::consts::{PI, TAU};

use log::warn;
use rand::Rng;
use rand_distr::StandardNormal;

use super::states::{NVec2, NVec3, Particle2, Particle3};

/// Flat ring of particles around the origin.
///
/// Radii are `radius * (0.8 + 0.4 * u)` with `u` uniform in [0, 1), velocity
/// noise is Gaussian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annulus {
    pub count: usize,
    pub radius: f64,
    pub spin: f64,
    pub noise: f64,
}

impl Default for Annulus {
    fn default() -> Self {
        Self {
            count: 300,
            radius: 10.0,
            spin: 0.3,
            noise: 0.05,
        }
    }
}

impl Annulus {
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Vec<Particle2> {
        (0..self.count)
            .map(|_| {
                let angle = rng.random::<f64>() * TAU;
                let r = self.radius * (0.8 + 0.4 * rng.random::<f64>());
                let x = NVec2::new(r * angle.cos(), r * angle.sin());

                let nx: f64 = rng.sample(StandardNormal);
                let ny: f64 = rng.sample(StandardNormal);
                let v = NVec2::new(
                    -self.spin * x.y + self.noise * nx,
                    self.spin * x.x + self.noise * ny,
                );
                Particle2::new(x, v)
            })
            .collect()
    }
}

/// Thick spherical shell between `0.4 * extent` and `0.6 * extent`.
///
/// Angles are drawn uniformly in (theta, phi), not uniformly over the sphere
/// surface, so particles bunch up near the poles. Radii are uniform over the
/// part of the shell strictly outside `exclusion` (horizon plus ball radius).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shell {
    pub count: usize,
    pub extent: f64,
    pub spin: f64,
    pub noise: f64,
    pub exclusion: f64,
}

impl Default for Shell {
    fn default() -> Self {
        Self {
            count: 80,
            extent: 15.0,
            spin: 0.3,
            noise: 0.05,
            exclusion: 0.7,
        }
    }
}

impl Shell {
    pub fn inner(&self) -> f64 {
        0.4 * self.extent
    }

    pub fn outer(&self) -> f64 {
        0.6 * self.extent
    }

    /// Returns no particles if the whole shell lies inside the exclusion radius
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Vec<Particle3> {
        if self.exclusion >= self.outer() {
            warn!(
                "shell [{}, {}] lies inside exclusion radius {}, no particles generated",
                self.inner(),
                self.outer(),
                self.exclusion
            );
            return Vec::new();
        }

        let outer = self.outer();
        let width = outer - self.inner().max(self.exclusion);

        (0..self.count)
            .map(|_| {
                let theta = rng.random_range(0.0..TAU);
                let phi = rng.random_range(0.0..=PI);
                // r in (max(inner, exclusion), outer]
                let r = outer - width * rng.random::<f64>();

                let x = NVec3::new(
                    r * phi.sin() * theta.cos(),
                    r * phi.sin() * theta.sin(),
                    r * phi.cos(),
                );
                let v = NVec3::new(
                    -self.spin * x.y + self.noise * rng.random_range(-1.0..=1.0),
                    self.spin * x.x + self.noise * rng.random_range(-1.0..=1.0),
                    self.noise * rng.random_range(-1.0..=1.0),
                );
                Particle3::new(x, v)
            })
            .collect()
    }
}
