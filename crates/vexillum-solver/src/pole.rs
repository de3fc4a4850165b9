//! Pole geometry and kinematic anchoring of the pinned column.
//!
//! The pole is a straight segment rising from its base along +Y. Rotating it
//! swings that segment rigidly about `hinge` through the base. Row `y` of the
//! pinned column always sits at `base + axis(angle) * rest_distance(y)`, a
//! pure function of the angle; nothing accumulates between rotations.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use vexillum_types::constants::DEFAULT_POLE_RADIUS;
use vexillum_types::{VexillumError, VexillumResult};

use crate::state::ParticleGrid;

/// What a kinematic write does to the pinned particle's Verlet history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KinematicHistory {
    /// Leave `previous` untouched; the jump shows up as implicit velocity.
    #[default]
    PreserveHistory,
    /// Set `previous = current` after every write.
    ResetHistory,
}

/// Pole proportions relative to the flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoleConfig {
    /// Pole radius (meters).
    pub radius: f32,
    /// Pole length as a multiple of the flag height.
    pub height_ratio: f32,
    /// Distance of the pole base below the flag center, as a multiple of the flag height.
    pub base_ratio: f32,
    /// Axis the pole swings about when rotated.
    pub hinge: Vec3,
}

impl Default for PoleConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_POLE_RADIUS,
            height_ratio: 1.2,
            base_ratio: 0.6,
            hinge: Vec3::X,
        }
    }
}

impl PoleConfig {
    pub(crate) fn validate(&self) -> VexillumResult<()> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(VexillumError::InvalidConfig(format!(
                "pole radius must be positive, got {}",
                self.radius
            )));
        }
        if !(self.height_ratio.is_finite() && self.height_ratio > 0.0) {
            return Err(VexillumError::InvalidConfig(format!(
                "pole height_ratio must be positive, got {}",
                self.height_ratio
            )));
        }
        if !self.base_ratio.is_finite() {
            return Err(VexillumError::InvalidConfig("pole base_ratio must be finite".into()));
        }
        if self.hinge.length_squared() < 1e-12 || !self.hinge.is_finite() {
            return Err(VexillumError::InvalidConfig(format!(
                "pole hinge axis must be a non-zero vector, got {}",
                self.hinge
            )));
        }
        Ok(())
    }
}

/// World-space pole for one flag size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoleGeometry {
    /// Bottom of the pole; the rotation pivot.
    pub base: Vec3,
    /// Pole length.
    pub length: f32,
    pub radius: f32,
    /// Unit hinge axis.
    pub hinge: Vec3,
    /// Flag height the rows are spread over.
    flag_height: f32,
    segments_y: usize,
}

impl PoleGeometry {
    /// Pole for a `width × height` flag split into `segments_y` rows of cells.
    ///
    /// The base sits at `(-width/2, -base_ratio * height, 0)`, on the flag's
    /// pinned edge.
    pub fn for_flag(width: f32, height: f32, segments_y: usize, config: &PoleConfig) -> Self {
        Self {
            base: Vec3::new(-width / 2.0, -config.base_ratio * height, 0.0),
            length: config.height_ratio * height,
            radius: config.radius,
            hinge: config.hinge.normalize(),
            flag_height: height,
            segments_y,
        }
    }

    /// Unit pole direction after rotating `degrees` about the hinge.
    pub fn axis(&self, degrees: f32) -> Vec3 {
        Quat::from_axis_angle(self.hinge, degrees.to_radians()) * Vec3::Y
    }

    /// Distance of row `row` from the base, measured along the pole.
    #[inline]
    pub fn rest_distance(&self, row: usize) -> f32 {
        let y = (row as f32 / self.segments_y as f32 - 0.5) * self.flag_height;
        y - self.base.y
    }

    /// World position of the pinned particle in row `row`.
    #[inline]
    pub fn anchor(&self, row: usize, degrees: f32) -> Vec3 {
        self.base + self.axis(degrees) * self.rest_distance(row)
    }

    /// Base and tip of the pole, for drawing.
    pub fn endpoints(&self, degrees: f32) -> (Vec3, Vec3) {
        (self.base, self.base + self.axis(degrees) * self.length)
    }
}

/// Writes the pinned column from the pole's rotation.
pub struct PoleKinematics;

impl PoleKinematics {
    /// Place every pinned particle on the pole rotated by `degrees`.
    ///
    /// This is the only code path that moves pinned particles.
    pub fn apply(
        pole: &PoleGeometry,
        degrees: f32,
        grid: &mut ParticleGrid,
        history: KinematicHistory,
    ) {
        let axis = pole.axis(degrees);
        for row in 0..grid.rows() {
            let index = grid.index_at(0, row);
            grid.update_position(index, pole.base + axis * pole.rest_distance(row));
            if history == KinematicHistory::ResetHistory {
                grid.reset_history(index);
            }
        }
    }
}
