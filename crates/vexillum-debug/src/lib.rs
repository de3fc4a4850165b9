//! # vexillum-debug
//!
//! Inspection hooks called by the stepper, and binary snapshots of the
//! particle state for offline inspection.

pub mod hooks;
pub mod snapshot;

pub use hooks::{InspectionHook, TelemetryHook};
pub use snapshot::StateSnapshot;
