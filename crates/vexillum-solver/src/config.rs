//! Cloth configuration.
//!
//! Parameters that control the flag's geometry, its material response and
//! the solver: grid resolution, mass, damping, relaxation passes, pole and
//! wind tuning.

use serde::{Deserialize, Serialize};
use vexillum_types::constants::{self, MAX_PARTICLES};
use vexillum_types::{VexillumError, VexillumResult};

use crate::forces::WindConfig;
use crate::pole::{KinematicHistory, PoleConfig};
use crate::state::DampingProfile;

/// Configuration for one flag simulation.
///
/// Changing any of `width`, `height`, `segments_x` or `segments_y` requires
/// a full rebuild of the grid, its constraints and its mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClothConfig {
    /// Flag width in meters (along X, away from the pole).
    pub width: f32,

    /// Flag height in meters (along the pole).
    pub height: f32,

    /// Number of cells along X (particle columns = segments_x + 1).
    pub segments_x: usize,

    /// Number of cells along Y (particle rows = segments_y + 1).
    pub segments_y: usize,

    /// Per-particle mass.
    pub mass: f32,

    /// Gravity magnitude; the applied force is `(0, -gravity * mass, 0)`.
    pub gravity: f32,

    /// Base velocity damping (0.0 = none, 1.0 = velocity fully removed).
    pub damping: f32,

    /// Gauss–Seidel relaxation passes per step.
    pub constraint_iterations: u32,

    /// Constraint stiffness; each pass closes `stiffness / 2` of the error per endpoint.
    pub stiffness: f32,

    /// Rest-length multiplier for shear (diagonal) constraints.
    pub shear_slack: f32,

    /// Whether kinematic writes to the pinned column also reset Verlet history.
    pub kinematic_history: KinematicHistory,

    /// How damping varies from the pinned edge to the free edge.
    pub damping_profile: DampingProfile,

    /// Pole geometry relative to the flag.
    pub pole: PoleConfig,

    /// Wind field coefficients.
    pub wind: WindConfig,
}

impl Default for ClothConfig {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 0.6,
            segments_x: 20,
            segments_y: 15,
            mass: constants::DEFAULT_PARTICLE_MASS,
            gravity: constants::DEFAULT_GRAVITY,
            damping: constants::DEFAULT_DAMPING,
            constraint_iterations: constants::DEFAULT_CONSTRAINT_ITERATIONS,
            stiffness: 1.0,
            shear_slack: constants::DEFAULT_SHEAR_SLACK,
            kinematic_history: KinematicHistory::default(),
            damping_profile: DampingProfile::default(),
            pole: PoleConfig::default(),
            wind: WindConfig::default(),
        }
    }
}

impl ClothConfig {
    /// A long, narrow pennant.
    pub fn banner() -> Self {
        Self {
            width: 1.5,
            height: 0.5,
            segments_x: 30,
            segments_y: 10,
            ..Default::default()
        }
    }

    /// A denser grid with an extra relaxation pass.
    pub fn high_resolution() -> Self {
        Self {
            segments_x: 40,
            segments_y: 24,
            constraint_iterations: 5,
            ..Default::default()
        }
    }

    /// Number of particles (and mesh vertices) this configuration produces.
    ///
    /// Fails if the grid would exceed the `u32` index range.
    pub fn particle_count(&self) -> VexillumResult<usize> {
        checked_particle_count(self.segments_x, self.segments_y)
    }

    /// Validates every parameter. Construction of a grid from an invalid
    /// config never happens; callers see the first offending field.
    pub fn validate(&self) -> VexillumResult<()> {
        validate_dimensions(self.width, self.height, self.segments_x, self.segments_y)?;

        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(VexillumError::InvalidConfig(format!(
                "mass must be positive, got {}",
                self.mass
            )));
        }
        if !(self.gravity.is_finite() && self.gravity >= 0.0) {
            return Err(VexillumError::InvalidConfig(format!(
                "gravity must be non-negative, got {}",
                self.gravity
            )));
        }
        if !(0.0..1.0).contains(&self.damping) {
            return Err(VexillumError::InvalidConfig(format!(
                "damping must be in [0, 1), got {}",
                self.damping
            )));
        }
        self.damping_profile.validate()?;
        if self.constraint_iterations == 0 {
            return Err(VexillumError::InvalidConfig(
                "constraint_iterations must be >= 1".into(),
            ));
        }
        if !(self.stiffness > 0.0 && self.stiffness <= 2.0) {
            return Err(VexillumError::InvalidConfig(format!(
                "stiffness must be in (0, 2], got {}",
                self.stiffness
            )));
        }
        if !(self.shear_slack.is_finite() && self.shear_slack >= 1.0) {
            return Err(VexillumError::InvalidConfig(format!(
                "shear_slack must be >= 1.0, got {}",
                self.shear_slack
            )));
        }
        self.pole.validate()?;
        self.wind.validate()?;

        Ok(())
    }
}

/// Checks the parameters that determine grid topology.
pub(crate) fn validate_dimensions(
    width: f32,
    height: f32,
    segments_x: usize,
    segments_y: usize,
) -> VexillumResult<usize> {
    if !(width.is_finite() && width > 0.0) {
        return Err(VexillumError::InvalidConfig(format!(
            "width must be positive, got {width}"
        )));
    }
    if !(height.is_finite() && height > 0.0) {
        return Err(VexillumError::InvalidConfig(format!(
            "height must be positive, got {height}"
        )));
    }
    if segments_x == 0 || segments_y == 0 {
        return Err(VexillumError::InvalidConfig(format!(
            "segment counts must be >= 1, got {segments_x}x{segments_y}"
        )));
    }
    checked_particle_count(segments_x, segments_y)
}

/// `(segments_x + 1) * (segments_y + 1)`, provided every particle and mesh
/// index fits in a `u32`.
fn checked_particle_count(segments_x: usize, segments_y: usize) -> VexillumResult<usize> {
    segments_x
        .checked_add(1)
        .zip(segments_y.checked_add(1))
        .and_then(|(cols, rows)| cols.checked_mul(rows))
        .filter(|&n| n <= MAX_PARTICLES)
        .ok_or_else(|| {
            VexillumError::InvalidConfig(format!(
                "grid of {segments_x}x{segments_y} segments exceeds {MAX_PARTICLES} particles"
            ))
        })
}
