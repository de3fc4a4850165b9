//! State snapshot serialization for replay and debugging.

use serde::{Deserialize, Serialize};
use vexillum_solver::state::ParticleGrid;
use vexillum_types::{VexillumError, VexillumResult};

/// The particle state at one point in time.
///
/// Serialized with `bincode`. Velocities are the implicit Verlet
/// displacements `current - previous` (per step, not per second).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Steps completed when the snapshot was taken.
    pub timestep: u64,
    /// Simulation time in seconds.
    pub sim_time: f64,
    pub segments_x: usize,
    pub segments_y: usize,
    /// Positions, interleaved `[x0, y0, z0, x1, y1, z1, ...]`.
    pub positions: Vec<f32>,
    /// Per-step displacements, interleaved like `positions`.
    pub velocities: Vec<f32>,
    /// Number of particles.
    pub particle_count: usize,
}

impl StateSnapshot {
    /// Capture the grid's current state.
    pub fn capture(timestep: u64, sim_time: f64, grid: &ParticleGrid) -> Self {
        let n = grid.particle_count;
        let mut positions = Vec::with_capacity(n * 3);
        let mut velocities = Vec::with_capacity(n * 3);

        for i in 0..n {
            positions.extend_from_slice(&grid.position(i).to_array());
            velocities.extend_from_slice(&grid.velocity(i).to_array());
        }

        Self {
            timestep,
            sim_time,
            segments_x: grid.segments_x,
            segments_y: grid.segments_y,
            positions,
            velocities,
            particle_count: n,
        }
    }

    /// Position of particle `index`.
    pub fn position(&self, index: usize) -> [f32; 3] {
        let i = index * 3;
        [self.positions[i], self.positions[i + 1], self.positions[i + 2]]
    }

    /// Lowest and highest Y over all particles, or `None` for an empty snapshot.
    pub fn height_range(&self) -> Option<(f32, f32)> {
        let mut ys = self.positions.iter().skip(1).step_by(3).copied();
        let first = ys.next()?;
        Some(ys.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }

    /// Largest per-step displacement of any particle.
    pub fn max_speed(&self) -> f32 {
        self.velocities
            .chunks_exact(3)
            .map(|v| (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt())
            .fold(0.0, f32::max)
    }

    /// Serializes to compact binary format.
    pub fn to_bytes(&self) -> VexillumResult<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| VexillumError::Serialization(format!("snapshot serialization failed: {e}")))
    }

    /// Deserializes from binary format.
    pub fn from_bytes(data: &[u8]) -> VexillumResult<Self> {
        let snapshot: Self = bincode::deserialize(data).map_err(|e| {
            VexillumError::Serialization(format!("snapshot deserialization failed: {e}"))
        })?;
        if snapshot.positions.len() != snapshot.particle_count * 3
            || snapshot.velocities.len() != snapshot.particle_count * 3
        {
            return Err(VexillumError::Serialization(format!(
                "snapshot buffers do not match particle count {}",
                snapshot.particle_count
            )));
        }
        Ok(snapshot)
    }
}
