//! Contact resolution statistics.

use serde::{Deserialize, Serialize};

/// Result of one collision pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactResult {
    /// Number of particles moved.
    pub resolved_count: u32,
    /// Deepest penetration found before projection.
    pub max_penetration: f32,
    /// Sum of all correction lengths.
    pub total_correction: f32,
}

impl ContactResult {
    /// `true` if the pass moved nothing.
    pub fn is_clear(&self) -> bool {
        self.resolved_count == 0
    }

    /// Combine the statistics of two passes.
    pub fn merge(self, other: ContactResult) -> ContactResult {
        ContactResult {
            resolved_count: self.resolved_count + other.resolved_count,
            max_penetration: self.max_penetration.max(other.max_penetration),
            total_correction: self.total_correction + other.total_correction,
        }
    }
}
