//! Simulation stepper: one flag, one step at a time.
//!
//! The stepper exclusively owns the particle grid and hands it by `&mut` to
//! each stage in turn. Everything is synchronous; a host that shares the
//! stepper between threads wraps it in a `Mutex`.

use std::time::Instant;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use vexillum_contact::{ContactResult, PoleCollider};
use vexillum_debug::hooks::InspectionHook;
use vexillum_mesh::FlagMesh;
use vexillum_solver::config::ClothConfig;
use vexillum_solver::constraints::ConstraintSolver;
use vexillum_solver::forces::ForceField;
use vexillum_solver::pole::{KinematicHistory, PoleGeometry, PoleKinematics};
use vexillum_solver::state::ParticleGrid;
use vexillum_types::{VexillumError, VexillumResult};

use crate::exporter::GeometryExporter;
use crate::lifecycle::Lifecycle;

/// How [`SimulationStepper::resize_for_aspect`] maps an aspect ratio
/// (`width / height`) onto the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridSizing {
    /// Keep the width and both segment counts; the height follows the aspect.
    #[default]
    FixedWidth,
    /// Keep the width and `segments_y`; the height follows the aspect and
    /// `segments_x` is chosen so cells stay roughly square.
    FixedRows,
}

/// Result of one [`SimulationStepper::step`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Steps completed since construction, including this one.
    pub timestep: u64,
    /// Simulation time after the step (seconds).
    pub sim_time: f64,
    /// Both collision passes combined.
    pub contacts: ContactResult,
    /// Kinetic energy of the free particles after the step.
    pub kinetic_energy: f64,
    /// Wall-clock time spent in the step (seconds).
    pub wall_time: f64,
}

/// Everything that is rebuilt together when the flag size changes.
struct FlagState {
    grid: ParticleGrid,
    constraints: ConstraintSolver,
    forces: ForceField,
    pole: PoleGeometry,
    collider: PoleCollider,
    exporter: GeometryExporter,
}

impl FlagState {
    /// Build a complete flag for `config`, already anchored to `degrees`.
    fn assemble(config: &ClothConfig, degrees: f32) -> VexillumResult<Self> {
        config.validate()?;

        let mut grid = ParticleGrid::new(
            config.width,
            config.height,
            config.segments_x,
            config.segments_y,
            config.mass,
        )?
        .with_damping_profile(config.damping_profile);

        // Rest lengths come from the flat layout, before any rotation.
        let constraints = ConstraintSolver::build(&grid, config.shear_slack);

        let pole = PoleGeometry::for_flag(config.width, config.height, config.segments_y, &config.pole);
        // A fresh grid has no motion to preserve.
        PoleKinematics::apply(&pole, degrees, &mut grid, KinematicHistory::ResetHistory);

        let exporter = GeometryExporter::new(&grid);
        exporter.mesh().validate()?;

        Ok(Self {
            forces: ForceField::from_config(config),
            collider: PoleCollider::from_geometry(&pole),
            grid,
            constraints,
            pole,
            exporter,
        })
    }
}

/// Drives one flag through its lifecycle.
///
/// # Example
///
/// ```
/// use vexillum_engine::SimulationStepper;
/// use vexillum_solver::ClothConfig;
///
/// let mut stepper = SimulationStepper::with_config(ClothConfig::default()).unwrap();
/// stepper.set_pole_rotation(15.0).unwrap();
/// let report = stepper.step(1.0, 1.0 / 60.0).unwrap();
/// assert_eq!(report.timestep, 1);
/// assert_eq!(stepper.mesh().unwrap().vertex_count(), 21 * 16);
/// ```
pub struct SimulationStepper {
    lifecycle: Lifecycle,
    config: ClothConfig,
    sizing: GridSizing,
    flag: Option<FlagState>,
    pole_degrees: f32,
    sim_time: f64,
    timestep: u64,
    hooks: Vec<Box<dyn InspectionHook>>,
}

impl SimulationStepper {
    /// An empty stepper. Call [`build`](Self::build) before stepping.
    pub fn new() -> Self {
        Self {
            lifecycle: Lifecycle::Uninitialized,
            config: ClothConfig::default(),
            sizing: GridSizing::default(),
            flag: None,
            pole_degrees: 0.0,
            sim_time: 0.0,
            timestep: 0,
            hooks: Vec::new(),
        }
    }

    /// A stepper built from `config`, ready to step.
    pub fn with_config(config: ClothConfig) -> VexillumResult<Self> {
        let mut stepper = Self::new();
        stepper.build(config)?;
        Ok(stepper)
    }

    /// Choose how [`resize_for_aspect`](Self::resize_for_aspect) sizes the grid.
    pub fn with_sizing(mut self, sizing: GridSizing) -> Self {
        self.sizing = sizing;
        self
    }

    /// Register an inspection hook.
    pub fn add_hook(&mut self, hook: Box<dyn InspectionHook>) {
        tracing::debug!(hook = hook.name(), "registered inspection hook");
        self.hooks.push(hook);
    }

    // ─── Lifecycle ────────────────────────────────────────────

    /// Build grid, constraints and mesh from `config`.
    ///
    /// Valid in every state but [`Lifecycle::Disposed`]; on an already built
    /// stepper this is the same as [`rebuild`](Self::rebuild).
    pub fn build(&mut self, config: ClothConfig) -> VexillumResult<()> {
        self.require("build", |s| s != Lifecycle::Disposed)?;
        self.install(config)
    }

    /// Replace the flag with one built from `config`.
    ///
    /// The new state is assembled on the side and swapped in only once it is
    /// complete. If `config` is invalid the current flag, configuration and
    /// lifecycle state are kept unchanged. The simulation clock keeps running.
    pub fn rebuild(&mut self, config: ClothConfig) -> VexillumResult<()> {
        self.require("rebuild", Lifecycle::is_live)?;
        self.install(config)
    }

    /// Rebuild with a new flag size, keeping every other parameter.
    pub fn resize(&mut self, width: f32, height: f32) -> VexillumResult<()> {
        let config = ClothConfig {
            width,
            height,
            ..self.config.clone()
        };
        self.rebuild(config)
    }

    /// Rebuild for an image of aspect ratio `aspect` (`width / height`),
    /// according to the stepper's [`GridSizing`].
    pub fn resize_for_aspect(&mut self, aspect: f32) -> VexillumResult<()> {
        if !(aspect.is_finite() && aspect > 0.0) {
            return Err(VexillumError::InvalidConfig(format!(
                "aspect ratio must be positive, got {aspect}"
            )));
        }

        let mut config = self.config.clone();
        config.height = config.width / aspect;
        if self.sizing == GridSizing::FixedRows {
            config.segments_x = ((config.segments_y as f32 * aspect).round() as usize).max(1);
        }
        self.rebuild(config)
    }

    /// Release the flag. Every later call fails with a lifecycle error.
    pub fn dispose(&mut self) -> VexillumResult<()> {
        self.require("dispose", |s| s != Lifecycle::Disposed)?;
        self.flag = None;
        self.lifecycle = Lifecycle::Disposed;
        for hook in &mut self.hooks {
            hook.on_simulation_end();
        }
        tracing::debug!(timestep = self.timestep, "stepper disposed");
        Ok(())
    }

    fn install(&mut self, config: ClothConfig) -> VexillumResult<()> {
        let previous = self.lifecycle;
        self.lifecycle = Lifecycle::Rebuilding;

        let flag = match FlagState::assemble(&config, self.pole_degrees) {
            Ok(flag) => flag,
            Err(e) => {
                self.lifecycle = previous;
                tracing::debug!(error = %e, "rebuild rejected; keeping previous state");
                return Err(e);
            }
        };

        let particle_count = flag.grid.particle_count;
        tracing::debug!(
            width = config.width,
            height = config.height,
            segments_x = config.segments_x,
            segments_y = config.segments_y,
            particles = particle_count,
            constraints = flag.constraints.len(),
            "flag built"
        );

        self.flag = Some(flag);
        self.config = config;
        self.lifecycle = Lifecycle::Ready;

        for hook in &mut self.hooks {
            hook.on_rebuild(particle_count);
        }
        Ok(())
    }

    fn require(&self, operation: &'static str, allowed: impl Fn(Lifecycle) -> bool) -> VexillumResult<()> {
        if allowed(self.lifecycle) {
            Ok(())
        } else {
            Err(VexillumError::Lifecycle {
                operation,
                state: self.lifecycle.as_str(),
            })
        }
    }

    // ─── Inputs ───────────────────────────────────────────────

    /// Set the pole rotation in degrees (any signed value).
    ///
    /// The pinned column is re-anchored only when the angle actually
    /// changes; returns whether that happened. Before the first build the
    /// angle is just remembered and applied at build time.
    pub fn set_pole_rotation(&mut self, degrees: f32) -> VexillumResult<bool> {
        self.require("set pole rotation", |s| s != Lifecycle::Disposed)?;
        if !degrees.is_finite() {
            return Err(VexillumError::InvalidConfig(format!(
                "pole rotation must be finite, got {degrees}"
            )));
        }
        if degrees == self.pole_degrees {
            return Ok(false);
        }
        self.pole_degrees = degrees;

        let Some(flag) = self.flag.as_mut() else {
            return Ok(false);
        };
        PoleKinematics::apply(&flag.pole, degrees, &mut flag.grid, self.config.kinematic_history);
        flag.exporter.sync(&flag.grid);

        tracing::debug!(degrees, timestep = self.timestep, "pole rotated");
        for hook in &mut self.hooks {
            hook.on_pole_rotated(self.timestep, degrees);
        }
        Ok(true)
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// `dt` is used as given; callers keep it near 1/60 s and below
    /// [`MAX_STABLE_DT`](vexillum_types::constants::MAX_STABLE_DT).
    /// Fails if the stepper is not built, or if `dt` or the wind scale is
    /// negative or non-finite.
    pub fn step(&mut self, wind_force_scale: f32, dt: f32) -> VexillumResult<StepReport> {
        self.require("step", Lifecycle::is_live)?;
        if !(dt.is_finite() && dt > 0.0) {
            return Err(VexillumError::InvalidConfig(format!(
                "timestep must be positive, got {dt}"
            )));
        }
        if !(wind_force_scale.is_finite() && wind_force_scale >= 0.0) {
            return Err(VexillumError::InvalidConfig(format!(
                "wind force scale must be non-negative, got {wind_force_scale}"
            )));
        }
        let Some(flag) = self.flag.as_mut() else {
            return Err(VexillumError::Lifecycle {
                operation: "step",
                state: self.lifecycle.as_str(),
            });
        };

        let start = Instant::now();
        // Hooks see the number this step reports once it completes.
        let timestep = self.timestep + 1;
        for hook in &mut self.hooks {
            hook.on_timestep_begin(timestep, self.sim_time);
        }

        let config = &self.config;
        flag.grid.reset_forces();
        flag.forces.apply(&mut flag.grid, self.sim_time, wind_force_scale);
        flag.grid.integrate(dt, config.damping);
        flag.constraints
            .solve(&mut flag.grid, config.constraint_iterations, config.stiffness);

        // Second pass catches particles pushed back in by the first.
        let contacts = flag
            .collider
            .resolve(&mut flag.grid)
            .merge(flag.collider.resolve(&mut flag.grid));

        flag.exporter.sync(&flag.grid);

        let kinetic_energy = flag.grid.kinetic_energy(dt);
        self.sim_time += dt as f64;
        self.timestep += 1;
        self.lifecycle = Lifecycle::Stepping;

        let wall_time = start.elapsed().as_secs_f64();
        tracing::trace!(
            timestep = self.timestep,
            sim_time = self.sim_time,
            contacts = contacts.resolved_count,
            kinetic_energy,
            "step"
        );
        for hook in &mut self.hooks {
            hook.on_collision(timestep, contacts.resolved_count, contacts.max_penetration);
            hook.on_timestep_end(timestep, wall_time, kinetic_energy);
        }

        Ok(StepReport {
            timestep: self.timestep,
            sim_time: self.sim_time,
            contacts,
            kinetic_energy,
            wall_time,
        })
    }

    // ─── Accessors ────────────────────────────────────────────

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Configuration of the current flag.
    pub fn config(&self) -> &ClothConfig {
        &self.config
    }

    pub fn sizing(&self) -> GridSizing {
        self.sizing
    }

    /// The particle grid, once built.
    pub fn grid(&self) -> Option<&ParticleGrid> {
        self.flag.as_ref().map(|f| &f.grid)
    }

    /// The render mesh, once built.
    pub fn mesh(&self) -> Option<&FlagMesh> {
        self.flag.as_ref().map(|f| f.exporter.mesh())
    }

    /// Whether the mesh changed since the last call; clears the flag.
    pub fn take_mesh_dirty(&mut self) -> bool {
        self.flag.as_mut().is_some_and(|f| f.exporter.take_dirty())
    }

    /// Number of distance constraints, once built.
    pub fn constraint_count(&self) -> Option<usize> {
        self.flag.as_ref().map(|f| f.constraints.len())
    }

    /// The pole geometry, once built.
    pub fn pole(&self) -> Option<&PoleGeometry> {
        self.flag.as_ref().map(|f| &f.pole)
    }

    /// Base and tip of the pole at the current rotation, for drawing.
    pub fn pole_endpoints(&self) -> Option<(Vec3, Vec3)> {
        self.flag
            .as_ref()
            .map(|f| f.pole.endpoints(self.pole_degrees))
    }

    /// Current pole rotation (degrees).
    pub fn pole_rotation(&self) -> f32 {
        self.pole_degrees
    }

    /// Simulation time (seconds), the sum of every `dt` stepped so far.
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Number of completed steps.
    pub fn timestep(&self) -> u64 {
        self.timestep
    }
}

impl Default for SimulationStepper {
    fn default() -> Self {
        Self::new()
    }
}
