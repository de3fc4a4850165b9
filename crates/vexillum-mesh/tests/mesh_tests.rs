//! Integration tests for vexillum-mesh.

use vexillum_mesh::generators::{flag_grid, grid_point};
use vexillum_mesh::normals::compute_vertex_normals;

// ─── FlagMesh Tests ───────────────────────────────────────────

#[test]
fn basic_counts() {
    let mesh = flag_grid(20, 15, 1.0, 0.6);
    assert_eq!(mesh.vertex_count(), 21 * 16);
    assert_eq!(mesh.triangle_count(), 20 * 15 * 2);
    assert_eq!(mesh.uvs.len(), 21 * 16 * 2);
}

#[test]
fn validate_ok() {
    let mesh = flag_grid(4, 3, 2.0, 1.0);
    assert!(mesh.validate().is_ok());
}

#[test]
fn validate_catches_short_normals() {
    let mut mesh = flag_grid(2, 2, 1.0, 1.0);
    mesh.normals.pop();
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_catches_oob_index() {
    let mut mesh = flag_grid(1, 1, 1.0, 1.0);
    mesh.indices[2] = 99;
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_catches_degenerate() {
    let mut mesh = flag_grid(1, 1, 1.0, 1.0);
    mesh.indices[0] = 1;
    mesh.indices[1] = 1;
    assert!(mesh.validate().is_err());
}

#[test]
fn set_position_round_trip() {
    let mut mesh = flag_grid(2, 2, 1.0, 1.0);
    mesh.set_position(4, 0.1, 0.2, 0.3);
    assert_eq!(mesh.position(4), [0.1, 0.2, 0.3]);
}

#[test]
fn dirty_flag_is_consumed() {
    let mut mesh = flag_grid(2, 2, 1.0, 1.0);
    assert!(mesh.take_dirty());
    assert!(!mesh.is_dirty());
    assert!(!mesh.take_dirty());
    mesh.mark_dirty();
    assert!(mesh.is_dirty());
}

// ─── Generator Tests ──────────────────────────────────────────

#[test]
fn grid_is_centered() {
    let mesh = flag_grid(4, 2, 2.0, 1.0);
    assert_eq!(mesh.position(0), [-1.0, -0.5, 0.0]);
    let last = mesh.vertex_count() - 1;
    assert_eq!(mesh.position(last), [1.0, 0.5, 0.0]);
}

#[test]
fn grid_point_matches_mesh() {
    let mesh = flag_grid(5, 3, 1.5, 0.9);
    let i = 2 * 6 + 4;
    assert_eq!(mesh.position(i), grid_point(4, 2, 5, 3, 1.5, 0.9));
}

#[test]
fn uv_corners() {
    let mesh = flag_grid(4, 2, 2.0, 1.0);
    // Bottom-left vertex samples the bottom of the image.
    assert_eq!(mesh.uv(0), [0.0, 1.0]);
    let last = mesh.vertex_count() - 1;
    assert_eq!(mesh.uv(last), [1.0, 0.0]);
}

#[test]
fn two_triangles_per_cell_share_diagonal() {
    let mesh = flag_grid(1, 1, 1.0, 1.0);
    assert_eq!(mesh.triangle(0), [0, 1, 2]);
    assert_eq!(mesh.triangle(1), [1, 3, 2]);
}

// ─── Normal Tests ─────────────────────────────────────────────

#[test]
fn flat_grid_normals_face_z() {
    let mut mesh = flag_grid(4, 4, 1.0, 1.0);
    mesh.normals.iter_mut().for_each(|n| *n = 0.0);
    compute_vertex_normals(&mut mesh);
    for i in 0..mesh.vertex_count() {
        let n = mesh.normal_vec3(i);
        assert!((n.z - 1.0).abs() < 1e-6, "vertex {i}: normal {n:?}");
    }
}

#[test]
fn normals_are_unit_after_bending() {
    let mut mesh = flag_grid(4, 4, 1.0, 1.0);
    for i in 0..mesh.vertex_count() {
        let [x, y, _] = mesh.position(i);
        mesh.set_position(i, x, y, 0.3 * x * x);
    }
    compute_vertex_normals(&mut mesh);
    for i in 0..mesh.vertex_count() {
        let len = mesh.normal_vec3(i).length();
        assert!((len - 1.0).abs() < 1e-5);
    }
}

#[test]
fn serialization_skips_dirty_flag() {
    let mesh = flag_grid(1, 1, 1.0, 1.0);
    let json = serde_json::to_string(&mesh).unwrap();
    assert!(!json.contains("dirty"));
    let recovered: vexillum_mesh::FlagMesh = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered.indices, mesh.indices);
}
