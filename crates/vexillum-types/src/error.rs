//! Error types for the Vexillum kernel.
//!
//! All crates return `VexillumResult<T>` from fallible operations.

use thiserror::Error;

/// Unified error type for the Vexillum kernel.
#[derive(Debug, Error)]
pub enum VexillumError {
    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Operation is not allowed in the stepper's current lifecycle state.
    #[error("Lifecycle violation: cannot {operation} while {state}")]
    Lifecycle {
        operation: &'static str,
        state: &'static str,
    },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for `Result<T, VexillumError>`.
pub type VexillumResult<T> = Result<T, VexillumError>;
