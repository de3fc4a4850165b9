//! Particle grid: SoA buffers for every per-particle quantity.
//!
//! This is the primary mutable data structure during simulation. Each stage
//! of a step (forces, integration, relaxation, collision, kinematics)
//! receives it by exclusive reference in turn; nothing else holds a copy.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use vexillum_mesh::generators::grid_point;
use vexillum_types::{VexillumError, VexillumResult};

use crate::config::validate_dimensions;

/// Damping multiplier as a linear function of normalized horizontal position.
///
/// `factor(0.0) == pinned_edge`, `factor(1.0) == free_edge`. The defaults damp
/// the anchored side more than the flying end, which keeps the edge near the
/// pole calm while the tip stays lively.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DampingProfile {
    /// Multiplier at the pinned column (`x_pos = 0`).
    pub pinned_edge: f32,
    /// Multiplier at the free edge (`x_pos = 1`).
    pub free_edge: f32,
}

impl Default for DampingProfile {
    fn default() -> Self {
        Self {
            pinned_edge: 1.2,
            free_edge: 0.8,
        }
    }
}

impl DampingProfile {
    /// Uniform damping everywhere.
    pub fn uniform() -> Self {
        Self {
            pinned_edge: 1.0,
            free_edge: 1.0,
        }
    }

    /// Multiplier at normalized horizontal position `x_pos ∈ [0, 1]`.
    #[inline]
    pub fn factor(&self, x_pos: f32) -> f32 {
        self.pinned_edge + (self.free_edge - self.pinned_edge) * x_pos
    }

    pub(crate) fn validate(&self) -> VexillumResult<()> {
        if !(self.pinned_edge >= 0.0 && self.free_edge >= 0.0) {
            return Err(VexillumError::InvalidConfig(format!(
                "damping profile multipliers must be non-negative, got {} / {}",
                self.pinned_edge, self.free_edge
            )));
        }
        Ok(())
    }
}

/// SoA particle buffers for a `(segments_x + 1) × (segments_y + 1)` grid.
///
/// # Layout
///
/// Particles are row-major, `i = y * (segments_x + 1) + x`. Column `x = 0` is
/// pinned to the pole. All arrays have length `particle_count`:
/// ```text
/// pos_x: [x0, x1, x2, ...]
/// pos_y: [y0, y1, y2, ...]
/// ...
/// ```
///
/// Pinned particles are only ever written through
/// [`update_position`](Self::update_position) (by pole kinematics); integration,
/// relaxation and collision skip them.
#[derive(Debug, Clone)]
pub struct ParticleGrid {
    /// Number of particles.
    pub particle_count: usize,
    /// Cells along X.
    pub segments_x: usize,
    /// Cells along Y.
    pub segments_y: usize,
    /// Flag width at construction.
    pub width: f32,
    /// Flag height at construction.
    pub height: f32,
    /// Per-particle mass.
    pub mass: f32,

    // ─── Position (current) ───
    pub pos_x: Vec<f32>,
    pub pos_y: Vec<f32>,
    pub pos_z: Vec<f32>,

    // ─── Previous position (Verlet history) ───
    pub prev_x: Vec<f32>,
    pub prev_y: Vec<f32>,
    pub prev_z: Vec<f32>,

    // ─── Accumulated force (zeroed every step) ───
    pub force_x: Vec<f32>,
    pub force_y: Vec<f32>,
    pub force_z: Vec<f32>,

    /// `true` for the pole column.
    pub pinned: Vec<bool>,

    damping_profile: DampingProfile,
}

impl ParticleGrid {
    /// Lay out a flat grid centered at the origin in the Z=0 plane.
    ///
    /// Fails with [`VexillumError::InvalidConfig`] if `width`, `height` or
    /// `mass` is non-positive, either segment count is zero, or the grid
    /// would hold more than [`MAX_PARTICLES`](vexillum_types::constants::MAX_PARTICLES)
    /// particles.
    pub fn new(
        width: f32,
        height: f32,
        segments_x: usize,
        segments_y: usize,
        mass: f32,
    ) -> VexillumResult<Self> {
        let n = validate_dimensions(width, height, segments_x, segments_y)?;
        if !(mass.is_finite() && mass > 0.0) {
            return Err(VexillumError::InvalidConfig(format!(
                "mass must be positive, got {mass}"
            )));
        }

        let cols = segments_x + 1;

        let mut pos_x = Vec::with_capacity(n);
        let mut pos_y = Vec::with_capacity(n);
        let mut pos_z = Vec::with_capacity(n);
        let mut pinned = Vec::with_capacity(n);

        for y in 0..=segments_y {
            for x in 0..cols {
                let [px, py, pz] = grid_point(x, y, segments_x, segments_y, width, height);
                pos_x.push(px);
                pos_y.push(py);
                pos_z.push(pz);
                pinned.push(x == 0);
            }
        }

        Ok(Self {
            particle_count: n,
            segments_x,
            segments_y,
            width,
            height,
            mass,
            prev_x: pos_x.clone(),
            prev_y: pos_y.clone(),
            prev_z: pos_z.clone(),
            pos_x,
            pos_y,
            pos_z,
            force_x: vec![0.0; n],
            force_y: vec![0.0; n],
            force_z: vec![0.0; n],
            pinned,
            damping_profile: DampingProfile::default(),
        })
    }

    /// Replace the damping profile used by [`integrate`](Self::integrate).
    pub fn with_damping_profile(mut self, profile: DampingProfile) -> Self {
        self.damping_profile = profile;
        self
    }

    /// The active damping profile.
    pub fn damping_profile(&self) -> DampingProfile {
        self.damping_profile
    }

    /// Particles per row.
    #[inline]
    pub fn columns(&self) -> usize {
        self.segments_x + 1
    }

    /// Particles per column.
    #[inline]
    pub fn rows(&self) -> usize {
        self.segments_y + 1
    }

    /// Row-major index of grid point `(x, y)`.
    #[inline]
    pub fn index_at(&self, x: usize, y: usize) -> usize {
        y * self.columns() + x
    }

    /// Grid coordinates `(x, y)` of particle `index`.
    #[inline]
    pub fn grid_coords(&self, index: usize) -> (usize, usize) {
        (index % self.columns(), index / self.columns())
    }

    /// Horizontal position normalized to `[0, 1]` (0 at the pole).
    #[inline]
    pub fn normalized_x(&self, index: usize) -> f32 {
        (index % self.columns()) as f32 / self.segments_x as f32
    }

    #[inline]
    pub fn is_pinned(&self, index: usize) -> bool {
        self.pinned[index]
    }

    /// Indices of the pole column, bottom row first.
    pub fn pinned_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.rows()).map(move |y| self.index_at(0, y))
    }

    #[inline]
    pub fn position(&self, index: usize) -> Vec3 {
        Vec3::new(self.pos_x[index], self.pos_y[index], self.pos_z[index])
    }

    #[inline]
    pub fn previous(&self, index: usize) -> Vec3 {
        Vec3::new(self.prev_x[index], self.prev_y[index], self.prev_z[index])
    }

    #[inline]
    pub fn force(&self, index: usize) -> Vec3 {
        Vec3::new(self.force_x[index], self.force_y[index], self.force_z[index])
    }

    /// Implicit per-step displacement `current - previous`.
    #[inline]
    pub fn velocity(&self, index: usize) -> Vec3 {
        self.position(index) - self.previous(index)
    }

    /// Zero all force accumulators.
    pub fn reset_forces(&mut self) {
        self.force_x.fill(0.0);
        self.force_y.fill(0.0);
        self.force_z.fill(0.0);
    }

    /// Add `force` to particle `index`'s accumulator.
    ///
    /// # Panics
    /// If `index` is out of range; valid indices are `0..particle_count`.
    #[inline]
    pub fn apply_force(&mut self, index: usize, force: Vec3) {
        self.force_x[index] += force.x;
        self.force_y[index] += force.y;
        self.force_z[index] += force.z;
    }

    /// Advance every unpinned particle by one Verlet step.
    ///
    /// `next = current + (current - previous) * (1 - damping) + force * dt²`,
    /// where `damping = base_damping * profile.factor(x_pos)` clamped to `[0, 1]`.
    pub fn integrate(&mut self, dt: f32, base_damping: f32) {
        let dt2 = dt * dt;
        let cols = self.columns();
        let segments_x = self.segments_x as f32;

        for i in 0..self.particle_count {
            if self.pinned[i] {
                continue;
            }

            let x_pos = (i % cols) as f32 / segments_x;
            let damping = (base_damping * self.damping_profile.factor(x_pos)).clamp(0.0, 1.0);
            let keep = 1.0 - damping;

            let (cx, cy, cz) = (self.pos_x[i], self.pos_y[i], self.pos_z[i]);

            self.pos_x[i] = cx + (cx - self.prev_x[i]) * keep + self.force_x[i] * dt2;
            self.pos_y[i] = cy + (cy - self.prev_y[i]) * keep + self.force_y[i] * dt2;
            self.pos_z[i] = cz + (cz - self.prev_z[i]) * keep + self.force_z[i] * dt2;

            self.prev_x[i] = cx;
            self.prev_y[i] = cy;
            self.prev_z[i] = cz;
        }
    }

    /// Kinematic overwrite of particle `index`. Verlet history is left alone.
    #[inline]
    pub fn update_position(&mut self, index: usize, position: Vec3) {
        self.pos_x[index] = position.x;
        self.pos_y[index] = position.y;
        self.pos_z[index] = position.z;
    }

    /// Discard particle `index`'s implicit velocity (`previous = current`).
    #[inline]
    pub fn reset_history(&mut self, index: usize) {
        self.prev_x[index] = self.pos_x[index];
        self.prev_y[index] = self.pos_y[index];
        self.prev_z[index] = self.pos_z[index];
    }

    /// Move particle `index` by `delta`. Relaxation and collision call this
    /// on free particles only.
    #[inline]
    pub fn translate(&mut self, index: usize, delta: Vec3) {
        self.pos_x[index] += delta.x;
        self.pos_y[index] += delta.y;
        self.pos_z[index] += delta.z;
    }

    /// Kinetic energy of the free particles, `0.5 * m * |v/dt|²` summed.
    pub fn kinetic_energy(&self, dt: f32) -> f64 {
        if dt <= 0.0 {
            return 0.0;
        }
        let inv_dt = 1.0 / dt as f64;
        let m = self.mass as f64;
        (0..self.particle_count)
            .filter(|&i| !self.pinned[i])
            .map(|i| {
                let v = self.velocity(i).as_dvec3() * inv_dt;
                0.5 * m * v.length_squared()
            })
            .sum()
    }

    /// Lowest Y coordinate of any particle.
    pub fn min_height(&self) -> f32 {
        self.pos_y.iter().copied().fold(f32::INFINITY, f32::min)
    }
}
