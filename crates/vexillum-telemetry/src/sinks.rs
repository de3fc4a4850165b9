//! Pluggable event sinks.

use std::sync::{Arc, Mutex};

use crate::events::{EventKind, SimulationEvent};

/// Trait for event consumers.
pub trait EventSink: Send {
    /// Process a single event.
    fn handle(&mut self, event: &SimulationEvent);

    /// Called when the run ends.
    fn finalize(&mut self) {}

    /// Returns a human-readable name for this sink.
    fn name(&self) -> &str;
}

/// Collects events into a shared `Vec`.
///
/// The sink is boxed into the bus, so the collected events are read back
/// through the handle returned by [`VecSink::events`].
#[derive(Default)]
pub struct VecSink {
    events: Arc<Mutex<Vec<SimulationEvent>>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the collected events.
    pub fn events(&self) -> Arc<Mutex<Vec<SimulationEvent>>> {
        Arc::clone(&self.events)
    }
}

impl EventSink for VecSink {
    fn handle(&mut self, event: &SimulationEvent) {
        // A poisoned lock only means a reader panicked; keep collecting.
        let mut events = match self.events.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        events.push(event.clone());
    }

    fn name(&self) -> &str {
        "vec_sink"
    }
}

/// Logs events through `tracing`.
///
/// Per-step events go out at `TRACE`, everything else at `DEBUG`.
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for TracingSink {
    fn handle(&mut self, event: &SimulationEvent) {
        match &event.kind {
            EventKind::TimestepBegin { .. }
            | EventKind::TimestepEnd { .. }
            | EventKind::Energy { .. } => {
                tracing::trace!(timestep = event.timestep, event = ?event.kind, "simulation_event");
            }
            EventKind::Collision { resolved, max_penetration } => {
                tracing::debug!(
                    timestep = event.timestep,
                    resolved,
                    max_penetration,
                    "pole_collision"
                );
            }
            _ => {
                tracing::debug!(timestep = event.timestep, event = ?event.kind, "simulation_event");
            }
        }
    }

    fn name(&self) -> &str {
        "tracing_sink"
    }
}
