//! Distance bands: a presentation-only classification of how close a particle
//! is to the attractor. Viewers use it to pick colours; the physics never
//! reads it.

/// Which band a particle currently falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    Far,
    Mid,
    NearHorizon,
}

impl Band {
    /// sRGB colour for this band (orange, red, yellow)
    pub fn rgb(self) -> [f32; 3] {
        match self {
            Band::Far => [1.0, 0.6, 0.0],
            Band::Mid => [1.0, 0.0, 0.0],
            Band::NearHorizon => [1.0, 1.0, 0.0],
        }
    }
}

/// Thresholds separating the bands: `r > far` is far, `r > near` is mid,
/// anything closer is near the horizon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceBands {
    pub far: f64,
    pub near: f64,
}

impl Default for DistanceBands {
    fn default() -> Self {
        Self {
            far: 5.0,
            near: 2.0,
        }
    }
}

impl DistanceBands {
    /// Classify distance `r`, floored by `eps` first
    pub fn classify(&self, r: f64, eps: f64) -> Band {
        let r = r.max(eps);
        if r > self.far {
            Band::Far
        } else if r > self.near {
            Band::Mid
        } else {
            Band::NearHorizon
        }
    }
}
