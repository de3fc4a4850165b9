//! Gravity and wind.
//!
//! The wind is a pure function of `(time, x_pos, scale)`: the caller owns the
//! simulation clock and passes it in, so identical inputs always produce the
//! same force and runs replay bit-for-bit.

use std::f64::consts::PI;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use vexillum_types::{VexillumError, VexillumResult};

use crate::config::ClothConfig;
use crate::state::ParticleGrid;

/// Wind field coefficients.
///
/// Every term is scaled by `scale * strength * x_pos`, so the wind vanishes at
/// the pole and is strongest at the free edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    /// Converts the UI wind slider into force units.
    pub strength: f32,
    /// Fraction of the horizontal push that never gusts away (0..=1).
    pub gust_floor: f32,
    /// Angular frequency of the horizontal gust (rad/s).
    pub gust_frequency: f32,
    /// Vertical flutter amplitude relative to the horizontal push.
    pub flutter_amplitude: f32,
    /// Angular frequency of the vertical flutter (rad/s).
    pub flutter_frequency: f32,
    /// Out-of-plane ripple amplitude relative to the horizontal push.
    pub ripple_amplitude: f32,
    /// Angular frequency of the out-of-plane ripple (rad/s).
    pub ripple_frequency: f32,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            strength: 8.0,
            gust_floor: 0.85,
            gust_frequency: 0.7,
            flutter_amplitude: 0.25,
            flutter_frequency: 1.5,
            ripple_amplitude: 0.1,
            ripple_frequency: 2.3,
        }
    }
}

impl WindConfig {
    /// Steady horizontal wind with no flutter or ripple.
    pub fn steady() -> Self {
        Self {
            gust_floor: 1.0,
            flutter_amplitude: 0.0,
            ripple_amplitude: 0.0,
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> VexillumResult<()> {
        if !(self.strength.is_finite() && self.strength >= 0.0) {
            return Err(VexillumError::InvalidConfig(format!(
                "wind strength must be non-negative, got {}",
                self.strength
            )));
        }
        if !(0.0..=1.0).contains(&self.gust_floor) {
            return Err(VexillumError::InvalidConfig(format!(
                "wind gust_floor must be in [0, 1], got {}",
                self.gust_floor
            )));
        }
        Ok(())
    }
}

/// Per-particle external forces: constant gravity plus wind.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceField {
    /// Gravity magnitude.
    pub gravity: f32,
    /// Particle mass (gravity scales with it, wind does not).
    pub mass: f32,
    /// Wind coefficients.
    pub wind: WindConfig,
}

impl ForceField {
    pub fn new(gravity: f32, mass: f32, wind: WindConfig) -> Self {
        Self { gravity, mass, wind }
    }

    /// Builds the field described by a cloth configuration.
    pub fn from_config(config: &ClothConfig) -> Self {
        Self::new(config.gravity, config.mass, config.wind.clone())
    }

    /// Gravity force on one particle: `(0, -g * mass, 0)`.
    #[inline]
    pub fn gravity_force(&self) -> Vec3 {
        Vec3::new(0.0, -self.gravity * self.mass, 0.0)
    }

    /// Wind force at normalized horizontal position `x_pos` and simulation
    /// time `time` (seconds), for a wind slider value of `scale`.
    ///
    /// X (downwind) dominates; Y flutters and Z ripples on their own
    /// frequencies and phase offsets so the free edge moves out of step
    /// with the rest of the sheet.
    pub fn wind_force(&self, time: f64, x_pos: f32, scale: f32) -> Vec3 {
        let w = &self.wind;
        let amplitude = scale * w.strength * x_pos;
        if amplitude == 0.0 {
            return Vec3::ZERO;
        }

        // Phases are evaluated in f64 so long sessions keep their precision.
        let x = x_pos as f64;
        let wave = |frequency: f32, phase: f64| (frequency as f64 * time + phase).sin() as f32;

        let gust = 0.5 + 0.5 * wave(w.gust_frequency, PI * x);
        let horizontal = amplitude * (w.gust_floor + (1.0 - w.gust_floor) * gust);
        let flutter = amplitude * w.flutter_amplitude * wave(w.flutter_frequency, 2.0 * PI * x);
        let ripple = amplitude * w.ripple_amplitude * wave(w.ripple_frequency, 3.0 * PI * x);

        Vec3::new(horizontal, flutter, ripple)
    }

    /// Accumulate gravity and wind into every unpinned particle.
    pub fn apply(&self, grid: &mut ParticleGrid, time: f64, wind_scale: f32) {
        let gravity = self.gravity_force();
        for i in 0..grid.particle_count {
            if grid.is_pinned(i) {
                continue;
            }
            let x_pos = grid.normalized_x(i);
            grid.apply_force(i, gravity);
            grid.apply_force(i, self.wind_force(time, x_pos, wind_scale));
        }
    }
}
