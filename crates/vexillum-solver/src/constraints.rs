//! Distance constraints and Gauss–Seidel relaxation.
//!
//! Topology is built once from the flat construction layout and never
//! changes afterwards; only particle positions are touched while solving.

use serde::{Deserialize, Serialize};
use vexillum_types::ParticleId;

use crate::state::ParticleGrid;

/// Which neighbour relation a constraint encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// Horizontal or vertical neighbours.
    Structural,
    /// Diagonal neighbours, rest length inflated by the shear slack.
    Shear,
}

/// A distance constraint between two particles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub a: ParticleId,
    pub b: ParticleId,
    pub kind: ConstraintKind,
    rest_length: f32,
}

impl Constraint {
    /// Rest length captured at construction.
    #[inline]
    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }

    /// Current length divided by rest length, minus one.
    pub fn strain(&self, grid: &ParticleGrid) -> f32 {
        let d = grid.position(self.b.index()) - grid.position(self.a.index());
        d.length() / self.rest_length - 1.0
    }
}

/// Owns the constraint topology of one grid.
#[derive(Debug, Clone)]
pub struct ConstraintSolver {
    constraints: Vec<Constraint>,
}

impl ConstraintSolver {
    /// Build structural and shear constraints from the grid's current layout.
    ///
    /// Call this immediately after [`ParticleGrid::new`]: structural rest
    /// lengths are the construction-time distances, shear rest lengths are
    /// those distances times `shear_slack`.
    pub fn build(grid: &ParticleGrid, shear_slack: f32) -> Self {
        let sx = grid.segments_x;
        let sy = grid.segments_y;
        let mut constraints = Vec::with_capacity(
            (sx * (sy + 1)) + (sy * (sx + 1)) + 2 * sx * sy,
        );

        let mut link = |a: usize, b: usize, kind: ConstraintKind, slack: f32| {
            let rest = grid.position(a).distance(grid.position(b)) * slack;
            constraints.push(Constraint {
                a: ParticleId::from(a),
                b: ParticleId::from(b),
                kind,
                rest_length: rest,
            });
        };

        // Horizontal
        for y in 0..=sy {
            for x in 0..sx {
                link(grid.index_at(x, y), grid.index_at(x + 1, y), ConstraintKind::Structural, 1.0);
            }
        }

        // Vertical
        for x in 0..=sx {
            for y in 0..sy {
                link(grid.index_at(x, y), grid.index_at(x, y + 1), ConstraintKind::Structural, 1.0);
            }
        }

        // Both diagonals of every cell
        for y in 0..sy {
            for x in 0..sx {
                link(grid.index_at(x, y), grid.index_at(x + 1, y + 1), ConstraintKind::Shear, shear_slack);
                link(grid.index_at(x + 1, y), grid.index_at(x, y + 1), ConstraintKind::Shear, shear_slack);
            }
        }

        Self { constraints }
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Number of constraints of the given kind.
    pub fn count_of(&self, kind: ConstraintKind) -> usize {
        self.constraints.iter().filter(|c| c.kind == kind).count()
    }

    /// Relax every constraint `iterations` times, in order (Gauss–Seidel).
    ///
    /// Each constraint shifts its free endpoints by
    /// `(d - rest) / d * (p2 - p1) * stiffness * 0.5`; a pinned endpoint
    /// stays put and the free one still receives that same correction.
    /// Coincident endpoints are skipped.
    pub fn solve(&self, grid: &mut ParticleGrid, iterations: u32, stiffness: f32) {
        let half_stiffness = stiffness * 0.5;

        for _ in 0..iterations {
            for c in &self.constraints {
                let (a, b) = (c.a.index(), c.b.index());
                let delta = grid.position(b) - grid.position(a);
                let dist = delta.length();
                if dist == 0.0 {
                    continue;
                }

                let correction = delta * ((dist - c.rest_length) / dist * half_stiffness);

                if !grid.is_pinned(a) {
                    grid.translate(a, correction);
                }
                if !grid.is_pinned(b) {
                    grid.translate(b, -correction);
                }
            }
        }
    }

    /// Largest absolute strain over all constraints.
    pub fn max_strain(&self, grid: &ParticleGrid) -> f32 {
        self.constraints
            .iter()
            .map(|c| c.strain(grid).abs())
            .fold(0.0, f32::max)
    }
}
