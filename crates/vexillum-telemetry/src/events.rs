//! Simulation event types.
//!
//! Events are small value types tagged with the step counter at which they
//! were produced.

use serde::{Deserialize, Serialize};

/// A simulation event emitted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Step counter. Events raised inside a step carry that step's 1-based
    /// number; events between steps carry the number of steps completed.
    pub timestep: u64,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// Step started.
    TimestepBegin {
        /// Simulation time at the start of the step (seconds).
        sim_time: f64,
    },

    /// Step completed.
    TimestepEnd {
        /// Wall-clock time spent in the step (seconds).
        wall_time: f64,
    },

    /// Pole collision passes for one step.
    Collision {
        /// Particles pushed out of the pole, summed over both passes.
        resolved: u32,
        /// Deepest penetration found (meters).
        max_penetration: f32,
    },

    /// Grid, constraints and mesh were rebuilt.
    Rebuild {
        /// Particle count of the new grid.
        particle_count: usize,
    },

    /// The pole rotation changed and the pinned column was re-anchored.
    PoleRotated {
        /// New rotation (degrees).
        degrees: f32,
    },

    /// Kinetic energy of the free particles after a step.
    Energy {
        /// `0.5 * m * v^2`, summed.
        kinetic: f64,
    },

}

impl SimulationEvent {
    pub fn new(timestep: u64, kind: EventKind) -> Self {
        Self { timestep, kind }
    }
}
