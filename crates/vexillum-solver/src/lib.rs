//! # vexillum-solver
//!
//! Particle state, forces, constraints and kinematic anchoring for the
//! flag simulation.
//!
//! ## Key Types
//!
//! - [`ParticleGrid`] — SoA buffers for positions, Verlet history and forces
//! - [`ForceField`] — Gravity plus a deterministic, time-parameterized wind
//! - [`ConstraintSolver`] — Structural/shear distance constraints, Gauss–Seidel relaxation
//! - [`PoleKinematics`] — Re-anchors the pinned column when the pole rotates
//! - [`ClothConfig`] — Every tunable parameter, serde-ready

pub mod config;
pub mod constraints;
pub mod forces;
pub mod pole;
pub mod state;

pub use config::ClothConfig;
pub use constraints::{Constraint, ConstraintKind, ConstraintSolver};
pub use forces::{ForceField, WindConfig};
pub use pole::{KinematicHistory, PoleConfig, PoleGeometry, PoleKinematics};
pub use state::{DampingProfile, ParticleGrid};
