//! # vexillum-engine
//!
//! Ties the solver pieces into a flag simulation with a lifecycle.
//!
//! ## Key Types
//!
//! - [`SimulationStepper`] — Owns the grid, runs one step in fixed order,
//!   handles rebuilds and pole rotation
//! - [`GeometryExporter`] — Mirrors particle positions into the render mesh
//! - [`Lifecycle`] — `Uninitialized → Ready → Stepping`, `Rebuilding`, `Disposed`
//!
//! ```text
//! reset forces → gravity + wind → integrate → relax constraints
//!   → pole collision → pole collision → export geometry
//! ```

pub mod exporter;
pub mod lifecycle;
pub mod stepper;

pub use exporter::GeometryExporter;
pub use lifecycle::Lifecycle;
pub use stepper::{GridSizing, SimulationStepper, StepReport};
