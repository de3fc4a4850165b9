//! Stepper lifecycle states.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a [`SimulationStepper`](crate::SimulationStepper) is in its life.
///
/// ```text
/// Uninitialized ──build──▶ Ready ──step──▶ Stepping ◀─┐
///                            ▲                │  └──step┘
///                            └──Rebuilding ◀──┘ (rebuild / resize)
/// any ──dispose──▶ Disposed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lifecycle {
    /// No grid yet.
    Uninitialized,
    /// Built, not stepped since the last build.
    Ready,
    /// At least one step since the last build.
    Stepping,
    /// A rebuild is in progress.
    Rebuilding,
    /// Terminal.
    Disposed,
}

impl Lifecycle {
    /// Lower-case name, used in lifecycle errors.
    pub fn as_str(self) -> &'static str {
        match self {
            Lifecycle::Uninitialized => "uninitialized",
            Lifecycle::Ready => "ready",
            Lifecycle::Stepping => "stepping",
            Lifecycle::Rebuilding => "rebuilding",
            Lifecycle::Disposed => "disposed",
        }
    }

    /// `true` in the states that own a grid.
    pub fn is_live(self) -> bool {
        matches!(self, Lifecycle::Ready | Lifecycle::Stepping)
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
