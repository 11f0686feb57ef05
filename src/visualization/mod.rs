//! Bevy viewers: the rendering side of the per-frame contract.
//!
//! Each fixed tick a viewer asks the simulation for exactly one step, then
//! copies positions onto entities, hides absorbed particles and recolours
//! the rest by distance band.

pub mod trail;
pub mod vis2d;
pub mod vis3d;

use bevy::prelude::Color;

use crate::simulation::bands::Band;
use crate::simulation::scenario::ViewSettings;

/// Fixed-step rate used when a scenario does not set one
pub(crate) const DEFAULT_RATE: f64 = 60.0;

/// Colour for a particle at distance `r`; without bands everything is drawn
/// in the far colour
pub(crate) fn particle_color(view: &ViewSettings, r: f64, eps: f64) -> Color {
    let band = view
        .bands
        .map(|bands| bands.classify(r, eps))
        .unwrap_or(Band::Far);
    let [red, green, blue] = band.rgb();
    Color::srgb(red, green, blue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::bands::DistanceBands;

    fn view(bands: Option<DistanceBands>) -> ViewSettings {
        ViewSettings {
            bands,
            trail: 0,
            ball_radius: 0.2,
            view_extent: 15.0,
            rate: None,
        }
    }

    #[test]
    fn colour_follows_the_drawn_distance() {
        let banded = view(Some(DistanceBands::default()));
        let [r, g, b] = Band::Mid.rgb();
        assert_eq!(particle_color(&banded, 3.0, 1e-6), Color::srgb(r, g, b));

        // just outside the far threshold is back to the far colour
        let [r, g, b] = Band::Far.rgb();
        assert_eq!(particle_color(&banded, 5.001, 1e-6), Color::srgb(r, g, b));

        // without bands the distance is ignored
        assert_eq!(particle_color(&view(None), 0.1, 1e-6), Color::srgb(r, g, b));
    }
}
