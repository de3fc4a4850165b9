//! # vexillum-types
//!
//! Shared types, identifiers, error types, and tuning constants
//! for the Vexillum flag simulation kernel.
//!
//! This crate has zero domain logic; it defines the vocabulary
//! that all other Vexillum crates share.

pub mod constants;
pub mod error;
pub mod ids;

pub use error::{VexillumError, VexillumResult};
pub use ids::ParticleId;
