//! Strongly-typed particle identifiers.
//!
//! Constraint endpoints carry `ParticleId` rather than bare integers so
//! they cannot be confused with mesh triangle or row indices.

use serde::{Deserialize, Serialize};

/// Index into the particle arrays of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticleId(pub u32);

impl ParticleId {
    /// Returns the raw index as `usize` for array indexing.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for ParticleId {
    fn from(val: u32) -> Self {
        Self(val)
    }
}

/// Grids are capped at [`MAX_PARTICLES`](crate::constants::MAX_PARTICLES),
/// so every index of a built grid fits.
impl From<usize> for ParticleId {
    fn from(val: usize) -> Self {
        debug_assert!(val <= crate::constants::MAX_PARTICLES, "particle index {val} exceeds u32");
        Self(val as u32)
    }
}
