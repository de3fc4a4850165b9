//! # vexillum-telemetry
//!
//! Event bus for simulation telemetry. The engine emits structured events
//! (step timing, pole contacts, rebuilds, rotations, energy) which are
//! consumed by pluggable sinks.

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::EventBus;
pub use events::{EventKind, SimulationEvent};
pub use sinks::{EventSink, TracingSink, VecSink};
