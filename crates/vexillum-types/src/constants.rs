//! Simulation defaults and tolerances.

/// Default gravity magnitude; the force on a particle is `gravity * mass`.
pub const DEFAULT_GRAVITY: f32 = 5.0;

/// Default per-particle mass.
///
/// With the default gravity this gives a gravity force of 0.5 per particle.
/// Much heavier sheets fold flat against the pole when there is no wind.
pub const DEFAULT_PARTICLE_MASS: f32 = 0.1;

/// Default simulation timestep (seconds). 1/60th of a second.
pub const DEFAULT_DT: f32 = 1.0 / 60.0;

/// Largest timestep a caller should feed the stepper (seconds).
pub const MAX_STABLE_DT: f32 = 0.02;

/// Default base velocity damping.
pub const DEFAULT_DAMPING: f32 = 0.03;

/// Default number of Gauss–Seidel relaxation passes per step.
pub const DEFAULT_CONSTRAINT_ITERATIONS: u32 = 4;

/// Default rest-length inflation for shear (diagonal) constraints.
pub const DEFAULT_SHEAR_SLACK: f32 = 1.05;

/// Default pole radius (meters).
pub const DEFAULT_POLE_RADIUS: f32 = 0.02;

/// Exclusion radius as a multiple of the pole radius.
pub const POLE_CLEARANCE: f32 = 1.5;

/// Penetrations shallower than this are treated as resolved.
pub const CONTACT_EPSILON: f32 = 1.0e-6;

/// Epsilon for floating-point comparisons.
pub const EPSILON: f32 = 1.0e-7;

/// Largest grid, in particles; particle ids and mesh indices are `u32`.
pub const MAX_PARTICLES: usize = u32::MAX as usize;
