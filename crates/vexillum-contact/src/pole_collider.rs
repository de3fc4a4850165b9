//! Analytical vertical cylinder around the pole.
//!
//! The exclusion zone is an infinite cylinder of radius `clearance * radius`
//! whose axis runs along +Y through the pole base. It stays vertical even
//! when the pole is rotated; only the pinned column follows the rotation.

use glam::Vec3;
use vexillum_solver::pole::PoleGeometry;
use vexillum_solver::state::ParticleGrid;
use vexillum_types::constants::{CONTACT_EPSILON, EPSILON, POLE_CLEARANCE};

use crate::response::ContactResult;

/// Vertical cylinder collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoleCollider {
    /// X coordinate of the axis.
    pub center_x: f32,
    /// Z coordinate of the axis.
    pub center_z: f32,
    /// Pole radius.
    pub radius: f32,
    /// Exclusion radius as a multiple of `radius`.
    pub clearance: f32,
}

impl PoleCollider {
    pub fn new(center_x: f32, center_z: f32, radius: f32) -> Self {
        Self {
            center_x,
            center_z,
            radius,
            clearance: POLE_CLEARANCE,
        }
    }

    /// Collider for a pole, centered on its base.
    pub fn from_geometry(pole: &PoleGeometry) -> Self {
        Self::new(pole.base.x, pole.base.z, pole.radius)
    }

    /// Distance from the axis inside which particles are pushed out.
    #[inline]
    pub fn exclusion_radius(&self) -> f32 {
        self.radius * self.clearance
    }

    /// Project every free particle inside the exclusion radius onto it.
    ///
    /// The Y coordinate is never touched, and neither is Verlet history.
    /// Penetrations up to [`CONTACT_EPSILON`] are tolerated, so running this
    /// twice in a row moves nothing the second time. A particle on the axis
    /// itself is pushed along +X.
    pub fn resolve(&self, grid: &mut ParticleGrid) -> ContactResult {
        let exclusion = self.exclusion_radius();
        let mut result = ContactResult::default();

        for i in 0..grid.particle_count {
            if grid.is_pinned(i) {
                continue;
            }

            let dx = grid.pos_x[i] - self.center_x;
            let dz = grid.pos_z[i] - self.center_z;
            let dist = (dx * dx + dz * dz).sqrt();
            let depth = exclusion - dist;
            if depth <= CONTACT_EPSILON {
                continue;
            }

            let (nx, nz) = if dist > EPSILON {
                (dx / dist, dz / dist)
            } else {
                (1.0, 0.0)
            };
            let target_x = self.center_x + nx * exclusion;
            let target_z = self.center_z + nz * exclusion;
            let delta = Vec3::new(target_x - grid.pos_x[i], 0.0, target_z - grid.pos_z[i]);
            grid.translate(i, delta);

            result.resolved_count += 1;
            result.max_penetration = result.max_penetration.max(depth);
            result.total_correction += delta.length();
        }

        result
    }
}
