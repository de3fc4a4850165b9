//! Inspection hooks for live debugging.
//!
//! Hooks are registered on the stepper and called at fixed points. They are
//! read-only observers: none of the callbacks can reach the particle state.
//!
//! ```text
//! on rebuild:          hook.on_rebuild(...)
//! on rotation change:  hook.on_pole_rotated(...)
//! for each step:
//!   hook.on_timestep_begin(...)
//!   hook.on_collision(...)
//!   hook.on_timestep_end(...)
//! on dispose:          hook.on_simulation_end()
//! ```

use vexillum_telemetry::bus::EventBus;
use vexillum_telemetry::events::{EventKind, SimulationEvent};

/// Observer of the simulation lifecycle. Every callback defaults to a no-op.
pub trait InspectionHook: Send {
    /// A step is about to run. Step callbacks get the step's 1-based number,
    /// the same value its `StepReport` carries.
    fn on_timestep_begin(&mut self, timestep: u64, sim_time: f64) {
        let _ = (timestep, sim_time);
    }

    /// Both collision passes of a step finished.
    fn on_collision(&mut self, timestep: u64, resolved: u32, max_penetration: f32) {
        let _ = (timestep, resolved, max_penetration);
    }

    /// A step finished.
    fn on_timestep_end(&mut self, timestep: u64, wall_time: f64, kinetic_energy: f64) {
        let _ = (timestep, wall_time, kinetic_energy);
    }

    /// Grid, constraints and mesh were (re)built.
    fn on_rebuild(&mut self, particle_count: usize) {
        let _ = particle_count;
    }

    /// The pinned column was re-anchored to a new pole rotation.
    fn on_pole_rotated(&mut self, timestep: u64, degrees: f32) {
        let _ = (timestep, degrees);
    }

    /// The stepper was disposed.
    fn on_simulation_end(&mut self) {}

    fn name(&self) -> &str;
}

/// Hook that forwards every callback to a telemetry [`EventBus`].
///
/// Events are flushed to the bus sinks at the end of every step and on
/// rebuild, so sinks never lag more than one step behind.
pub struct TelemetryHook {
    bus: EventBus,
    last_timestep: u64,
}

impl TelemetryHook {
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            last_timestep: 0,
        }
    }

    /// The underlying bus.
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    fn emit(&mut self, timestep: u64, kind: EventKind) {
        self.last_timestep = timestep;
        self.bus.emit(SimulationEvent::new(timestep, kind));
    }
}

impl InspectionHook for TelemetryHook {
    fn on_timestep_begin(&mut self, timestep: u64, sim_time: f64) {
        self.emit(timestep, EventKind::TimestepBegin { sim_time });
    }

    fn on_collision(&mut self, timestep: u64, resolved: u32, max_penetration: f32) {
        if resolved > 0 {
            self.emit(timestep, EventKind::Collision { resolved, max_penetration });
        }
    }

    fn on_timestep_end(&mut self, timestep: u64, wall_time: f64, kinetic_energy: f64) {
        self.emit(timestep, EventKind::Energy { kinetic: kinetic_energy });
        self.emit(timestep, EventKind::TimestepEnd { wall_time });
        self.bus.flush();
    }

    fn on_rebuild(&mut self, particle_count: usize) {
        let timestep = self.last_timestep;
        self.emit(timestep, EventKind::Rebuild { particle_count });
        self.bus.flush();
    }

    fn on_pole_rotated(&mut self, timestep: u64, degrees: f32) {
        self.emit(timestep, EventKind::PoleRotated { degrees });
    }

    fn on_simulation_end(&mut self) {
        self.bus.finish();
    }

    fn name(&self) -> &str {
        "telemetry_hook"
    }
}
