//! Integration tests for vexillum-solver.

use glam::Vec3;
use vexillum_solver::config::ClothConfig;
use vexillum_solver::constraints::{ConstraintKind, ConstraintSolver};
use vexillum_solver::forces::{ForceField, WindConfig};
use vexillum_solver::pole::{KinematicHistory, PoleConfig, PoleGeometry, PoleKinematics};
use vexillum_solver::state::{DampingProfile, ParticleGrid};
use vexillum_types::constants::MAX_PARTICLES;
use vexillum_types::VexillumError;

fn grid(sx: usize, sy: usize) -> ParticleGrid {
    ParticleGrid::new(1.0, 0.6, sx, sy, 1.0).unwrap()
}

fn pinned_positions(grid: &ParticleGrid) -> Vec<Vec3> {
    grid.pinned_indices().map(|i| grid.position(i)).collect()
}

// ─── ParticleGrid Tests ───────────────────────────────────────

#[test]
fn grid_layout() {
    let g = grid(4, 3);
    assert_eq!(g.particle_count, 5 * 4);
    assert_eq!(g.position(0), Vec3::new(-0.5, -0.3, 0.0));
    let last = g.particle_count - 1;
    assert_eq!(g.position(last), Vec3::new(0.5, 0.3, 0.0));
    assert!(g.pos_z.iter().all(|&z| z == 0.0));
}

#[test]
fn grid_pins_first_column_only() {
    let g = grid(4, 3);
    for i in 0..g.particle_count {
        let (x, _) = g.grid_coords(i);
        assert_eq!(g.is_pinned(i), x == 0, "particle {i}");
    }
    assert_eq!(g.pinned_indices().count(), 4);
}

#[test]
fn grid_index_round_trip() {
    let g = grid(6, 5);
    let i = g.index_at(4, 3);
    assert_eq!(i, 3 * 7 + 4);
    assert_eq!(g.grid_coords(i), (4, 3));
    assert!((g.normalized_x(i) - 4.0 / 6.0).abs() < 1e-6);
}

#[test]
fn grid_rejects_invalid_dimensions() {
    assert!(ParticleGrid::new(0.0, 0.6, 4, 4, 1.0).is_err());
    assert!(ParticleGrid::new(1.0, -0.6, 4, 4, 1.0).is_err());
    assert!(ParticleGrid::new(1.0, 0.6, 0, 4, 1.0).is_err());
    assert!(ParticleGrid::new(1.0, 0.6, 4, 0, 1.0).is_err());
    assert!(ParticleGrid::new(f32::NAN, 0.6, 4, 4, 1.0).is_err());
    assert!(ParticleGrid::new(1.0, 0.6, 4, 4, 0.0).is_err());
}

#[test]
fn forces_accumulate_and_reset() {
    let mut g = grid(2, 2);
    g.apply_force(1, Vec3::new(1.0, 0.0, 0.0));
    g.apply_force(1, Vec3::new(0.5, -2.0, 0.0));
    assert_eq!(g.force(1), Vec3::new(1.5, -2.0, 0.0));

    g.reset_forces();
    assert_eq!(g.force(1), Vec3::ZERO);
}

#[test]
#[should_panic]
fn apply_force_out_of_range_panics() {
    let mut g = grid(2, 2);
    let n = g.particle_count;
    g.apply_force(n, Vec3::ONE);
}

#[test]
fn integrate_skips_pinned() {
    let mut g = grid(4, 4);
    for i in 0..g.particle_count {
        g.apply_force(i, Vec3::new(3.0, -7.0, 1.0));
    }
    let before = pinned_positions(&g);
    g.integrate(1.0 / 60.0, 0.03);
    assert_eq!(pinned_positions(&g), before);
}

#[test]
fn integrate_applies_force_dt_squared() {
    let mut g = grid(2, 2);
    let i = g.index_at(2, 1);
    let start = g.position(i);
    let dt = 0.02;
    g.apply_force(i, Vec3::new(0.0, -5.0, 0.0));
    g.integrate(dt, 0.0);

    let expected = start + Vec3::new(0.0, -5.0 * dt * dt, 0.0);
    assert!((g.position(i) - expected).length() < 1e-7);
    // Previous snapshot is the pre-update position.
    assert_eq!(g.previous(i), start);
}

#[test]
fn verlet_preserves_velocity_without_force_or_damping() {
    let mut g = grid(3, 3);
    let i = g.index_at(2, 2);
    let step = Vec3::new(0.01, -0.02, 0.005);
    g.update_position(i, g.position(i) + step);

    for _ in 0..10 {
        g.reset_forces();
        g.integrate(1.0 / 60.0, 0.0);
        assert!((g.velocity(i) - step).length() < 1e-5);
    }
}

#[test]
fn damping_is_stronger_near_the_pole() {
    let profile = DampingProfile::default();
    assert!(profile.factor(0.0) > profile.factor(1.0));

    let mut g = grid(4, 1);
    let near = g.index_at(1, 0);
    let far = g.index_at(4, 0);
    let step = Vec3::new(0.0, 0.0, 0.01);
    g.update_position(near, g.position(near) + step);
    g.update_position(far, g.position(far) + step);

    g.integrate(1.0 / 60.0, 0.2);
    assert!(g.velocity(near).z < g.velocity(far).z);
}

#[test]
fn uniform_damping_profile_scales_evenly() {
    let mut g = grid(4, 1).with_damping_profile(DampingProfile::uniform());
    let near = g.index_at(1, 0);
    let far = g.index_at(4, 0);
    let step = Vec3::new(0.0, 0.0, 0.01);
    g.update_position(near, g.position(near) + step);
    g.update_position(far, g.position(far) + step);

    g.integrate(1.0 / 60.0, 0.2);
    assert!((g.velocity(near).z - g.velocity(far).z).abs() < 1e-7);
    assert!((g.velocity(far).z - 0.008).abs() < 1e-6);
}

#[test]
fn update_position_keeps_history() {
    let mut g = grid(2, 2);
    let prev = g.previous(0);
    g.update_position(0, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(g.previous(0), prev);

    g.reset_history(0);
    assert_eq!(g.previous(0), Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(g.velocity(0), Vec3::ZERO);
}

#[test]
fn kinetic_energy_counts_free_particles() {
    let mut g = grid(1, 1);
    assert_eq!(g.kinetic_energy(0.1), 0.0);
    // Pinned motion does not count.
    g.update_position(0, g.position(0) + Vec3::X);
    assert_eq!(g.kinetic_energy(0.1), 0.0);

    let free = g.index_at(1, 0);
    g.update_position(free, g.position(free) + Vec3::new(0.1, 0.0, 0.0));
    // v = 0.1 / 0.1 = 1, m = 1 → 0.5
    assert!((g.kinetic_energy(0.1) - 0.5).abs() < 1e-5);
}

// ─── ConstraintSolver Tests ───────────────────────────────────

#[test]
fn constraint_counts() {
    let g = grid(4, 3);
    let solver = ConstraintSolver::build(&g, 1.05);
    let structural = 4 * 4 + 3 * 5;
    let shear = 2 * 4 * 3;
    assert_eq!(solver.count_of(ConstraintKind::Structural), structural);
    assert_eq!(solver.count_of(ConstraintKind::Shear), shear);
    assert_eq!(solver.len(), structural + shear);
}

#[test]
fn rest_lengths_match_construction_distances() {
    let g = grid(5, 4);
    let slack = 1.08;
    let solver = ConstraintSolver::build(&g, slack);
    for c in solver.constraints() {
        let d = g.position(c.a.index()).distance(g.position(c.b.index()));
        let expected = match c.kind {
            ConstraintKind::Structural => d,
            ConstraintKind::Shear => d * slack,
        };
        assert!((c.rest_length() - expected).abs() < 1e-7);
    }
}

#[test]
fn solve_on_relaxed_grid_is_noop() {
    let mut g = grid(6, 4);
    let solver = ConstraintSolver::build(&g, 1.0);
    let before = (g.pos_x.clone(), g.pos_y.clone(), g.pos_z.clone());
    solver.solve(&mut g, 4, 1.0);
    assert_eq!((g.pos_x.clone(), g.pos_y.clone(), g.pos_z.clone()), before);
}

#[test]
fn solve_never_moves_pinned() {
    let mut g = grid(6, 4);
    let solver = ConstraintSolver::build(&g, 1.05);
    let before = pinned_positions(&g);
    for i in 0..g.particle_count {
        if !g.is_pinned(i) {
            g.translate(i, Vec3::new(0.03, -0.05, 0.02));
        }
    }
    solver.solve(&mut g, 10, 1.0);
    assert_eq!(pinned_positions(&g), before);
}

#[test]
fn solve_reduces_stretch() {
    let mut g = grid(4, 4);
    let solver = ConstraintSolver::build(&g, 1.0);
    let tip = g.index_at(4, 4);
    g.translate(tip, Vec3::new(0.2, 0.1, 0.1));
    let strained = solver.max_strain(&g);
    solver.solve(&mut g, 8, 1.0);
    assert!(solver.max_strain(&g) < strained);
}

#[test]
fn pinned_endpoint_moves_only_free_side() {
    let mut g = ParticleGrid::new(1.0, 1.0, 1, 1, 1.0).unwrap();
    let solver = ConstraintSolver::build(&g, 1.0);
    let free = g.index_at(1, 0);
    // Stretch the bottom edge by 0.2 along X.
    g.translate(free, Vec3::new(0.2, 0.0, 0.0));
    let pinned_before = g.position(0);

    solver.solve(&mut g, 1, 1.0);

    assert_eq!(g.position(0), pinned_before);
    assert!(g.position(free).x < 0.7);
}

#[test]
fn coincident_endpoints_are_skipped() {
    let mut g = ParticleGrid::new(1.0, 1.0, 1, 1, 1.0).unwrap();
    let solver = ConstraintSolver::build(&g, 1.0);
    let a = g.index_at(1, 0);
    let b = g.index_at(1, 1);
    let target = g.position(b);
    g.update_position(a, target);

    solver.solve(&mut g, 3, 1.0);
    for i in 0..g.particle_count {
        assert!(g.position(i).is_finite(), "particle {i} became non-finite");
    }
}

// ─── ForceField Tests ─────────────────────────────────────────

#[test]
fn gravity_scales_with_mass() {
    let field = ForceField::new(5.0, 0.5, WindConfig::default());
    assert_eq!(field.gravity_force(), Vec3::new(0.0, -2.5, 0.0));
}

#[test]
fn wind_is_pure() {
    let field = ForceField::new(5.0, 1.0, WindConfig::default());
    let a = field.wind_force(12.345, 0.7, 1.3);
    let b = field.wind_force(12.345, 0.7, 1.3);
    assert_eq!(a, b);
}

#[test]
fn wind_vanishes_at_pole_and_without_scale() {
    let field = ForceField::new(5.0, 1.0, WindConfig::default());
    assert_eq!(field.wind_force(3.0, 0.0, 2.0), Vec3::ZERO);
    assert_eq!(field.wind_force(3.0, 0.8, 0.0), Vec3::ZERO);
}

#[test]
fn wind_grows_toward_free_edge_and_horizontal_dominates() {
    let field = ForceField::new(5.0, 1.0, WindConfig::default());
    for step in 0..50 {
        let t = step as f64 * 0.13;
        let near = field.wind_force(t, 0.1, 1.0);
        let far = field.wind_force(t, 1.0, 1.0);
        assert!(far.x > near.x);
        assert!(far.x > far.y.abs());
        assert!(far.x > far.z.abs());
    }
}

#[test]
fn wind_changes_over_time() {
    let field = ForceField::new(5.0, 1.0, WindConfig::default());
    let a = field.wind_force(0.0, 1.0, 1.0);
    let b = field.wind_force(0.5, 1.0, 1.0);
    assert_ne!(a, b);
}

#[test]
fn steady_wind_has_no_flutter() {
    let field = ForceField::new(5.0, 1.0, WindConfig::steady());
    let f = field.wind_force(7.0, 1.0, 1.0);
    assert_eq!(f.y, 0.0);
    assert_eq!(f.z, 0.0);
    assert!((f.x - 8.0).abs() < 1e-5);
}

#[test]
fn apply_skips_pinned_particles() {
    let mut g = grid(4, 2);
    let field = ForceField::new(5.0, 1.0, WindConfig::default());
    field.apply(&mut g, 1.0, 1.0);
    for i in 0..g.particle_count {
        if g.is_pinned(i) {
            assert_eq!(g.force(i), Vec3::ZERO);
        } else {
            assert!(g.force(i).y < 0.0);
            assert!(g.force(i).x > 0.0);
        }
    }
}

// ─── Pole Tests ───────────────────────────────────────────────

#[test]
fn pole_at_rest_matches_flat_layout() {
    let g = grid(10, 6);
    let pole = PoleGeometry::for_flag(1.0, 0.6, 6, &PoleConfig::default());
    for (row, i) in g.pinned_indices().enumerate() {
        assert!((pole.anchor(row, 0.0) - g.position(i)).length() < 1e-6);
    }
}

#[test]
fn pole_endpoints() {
    let pole = PoleGeometry::for_flag(1.0, 0.6, 6, &PoleConfig::default());
    let (base, tip) = pole.endpoints(0.0);
    assert!((base - Vec3::new(-0.5, -0.36, 0.0)).length() < 1e-6);
    assert!((tip - base - Vec3::new(0.0, 0.72, 0.0)).length() < 1e-6);
}

#[test]
fn rotation_is_rigid() {
    let mut g = grid(10, 6);
    let pole = PoleGeometry::for_flag(1.0, 0.6, 6, &PoleConfig::default());
    PoleKinematics::apply(&pole, 37.0, &mut g, KinematicHistory::PreserveHistory);

    let axis = pole.axis(37.0);
    for (row, i) in g.pinned_indices().enumerate() {
        let offset = g.position(i) - pole.base;
        // On the rotated axis, at the row's rest distance.
        assert!((offset.length() - pole.rest_distance(row).abs()).abs() < 1e-5);
        assert!(offset.cross(axis).length() < 1e-5);
    }
}

#[test]
fn rotation_round_trip_is_exact() {
    let mut g = grid(20, 15);
    let pole = PoleGeometry::for_flag(1.0, 0.6, 15, &PoleConfig::default());
    PoleKinematics::apply(&pole, 0.0, &mut g, KinematicHistory::PreserveHistory);
    let original = pinned_positions(&g);

    PoleKinematics::apply(&pole, 90.0, &mut g, KinematicHistory::PreserveHistory);
    assert_ne!(pinned_positions(&g), original);
    PoleKinematics::apply(&pole, 0.0, &mut g, KinematicHistory::PreserveHistory);
    assert_eq!(pinned_positions(&g), original);
}

#[test]
fn kinematics_touch_only_the_pinned_column() {
    let mut g = grid(5, 4);
    let before = g.clone();
    let pole = PoleGeometry::for_flag(1.0, 0.6, 4, &PoleConfig::default());
    PoleKinematics::apply(&pole, 45.0, &mut g, KinematicHistory::PreserveHistory);
    for i in 0..g.particle_count {
        if !g.is_pinned(i) {
            assert_eq!(g.position(i), before.position(i));
        }
    }
}

#[test]
fn history_policy() {
    let pole = PoleGeometry::for_flag(1.0, 0.6, 4, &PoleConfig::default());

    let mut preserved = grid(5, 4);
    PoleKinematics::apply(&pole, 30.0, &mut preserved, KinematicHistory::PreserveHistory);
    assert_ne!(preserved.velocity(preserved.index_at(0, 4)), Vec3::ZERO);

    let mut reset = grid(5, 4);
    PoleKinematics::apply(&pole, 30.0, &mut reset, KinematicHistory::ResetHistory);
    for i in reset.pinned_indices() {
        assert_eq!(reset.velocity(i), Vec3::ZERO);
    }
}

// ─── Config Tests ─────────────────────────────────────────────

#[test]
fn default_config_is_valid() {
    assert!(ClothConfig::default().validate().is_ok());
    assert!(ClothConfig::banner().validate().is_ok());
    assert!(ClothConfig::high_resolution().validate().is_ok());
}

#[test]
fn config_rejects_bad_values() {
    let bad = [
        ClothConfig { width: 0.0, ..Default::default() },
        ClothConfig { segments_y: 0, ..Default::default() },
        ClothConfig { damping: 1.0, ..Default::default() },
        ClothConfig { constraint_iterations: 0, ..Default::default() },
        ClothConfig { shear_slack: 0.9, ..Default::default() },
        ClothConfig { stiffness: 0.0, ..Default::default() },
        ClothConfig {
            pole: PoleConfig { radius: -0.1, ..Default::default() },
            ..Default::default()
        },
        ClothConfig {
            pole: PoleConfig { hinge: Vec3::ZERO, ..Default::default() },
            ..Default::default()
        },
    ];
    for config in bad {
        assert!(config.validate().is_err(), "accepted {config:?}");
    }
}

#[test]
fn config_particle_count() {
    let config = ClothConfig::default();
    assert_eq!(config.particle_count().unwrap(), 21 * 16);
}

#[test]
fn oversized_grids_are_rejected() {
    let too_many = [
        (usize::MAX, 15),
        (20, usize::MAX),
        // 65537 * 65537 particles overflows the u32 index range.
        (65_536, 65_536),
    ];
    for (segments_x, segments_y) in too_many {
        let config = ClothConfig { segments_x, segments_y, ..Default::default() };
        assert!(matches!(config.particle_count(), Err(VexillumError::InvalidConfig(_))));
        assert!(matches!(config.validate(), Err(VexillumError::InvalidConfig(_))));
        assert!(ParticleGrid::new(1.0, 0.6, segments_x, segments_y, 0.1).is_err());
    }

    // Largest grid that still fits.
    let config = ClothConfig { segments_x: MAX_PARTICLES / 2 - 1, segments_y: 1, ..Default::default() };
    assert!(config.particle_count().unwrap() <= MAX_PARTICLES);
}

#[test]
fn config_toml_partial() {
    let config: ClothConfig = toml::from_str(
        r#"
        width = 2.0
        kinematic_history = "reset_history"

        [wind]
        strength = 4.0
        "#,
    )
    .unwrap();
    assert_eq!(config.width, 2.0);
    assert_eq!(config.segments_x, 20);
    assert_eq!(config.kinematic_history, KinematicHistory::ResetHistory);
    assert_eq!(config.wind.strength, 4.0);
    assert_eq!(config.wind.flutter_frequency, WindConfig::default().flutter_frequency);
}

#[test]
fn config_json_round_trip() {
    let config = ClothConfig::banner();
    let json = serde_json::to_string(&config).unwrap();
    let recovered: ClothConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered, config);
}
