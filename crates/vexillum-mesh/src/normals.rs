//! Vertex normal computation from triangle mesh data.
//!
//! Computes area-weighted vertex normals by accumulating
//! face normals from each adjacent triangle.

use glam::Vec3;

use crate::mesh::FlagMesh;

/// Recompute vertex normals from triangle geometry (area-weighted).
///
/// Each triangle's face normal (weighted by its area) is accumulated
/// at each vertex, then normalized. Vertices whose accumulated normal
/// vanishes (all adjacent triangles collapsed) keep a zero normal.
pub fn compute_vertex_normals(mesh: &mut FlagMesh) {
    let n = mesh.vertex_count();
    let mut accum = vec![Vec3::ZERO; n];

    for t in 0..mesh.triangle_count() {
        let [ia, ib, ic] = mesh.triangle(t);
        let (a, b, c) = (ia as usize, ib as usize, ic as usize);

        let pa = mesh.position_vec3(a);
        let e1 = mesh.position_vec3(b) - pa;
        let e2 = mesh.position_vec3(c) - pa;

        // Magnitude = 2 × triangle area
        let face = e1.cross(e2);
        accum[a] += face;
        accum[b] += face;
        accum[c] += face;
    }

    for (i, normal) in accum.into_iter().enumerate() {
        let unit = normal.normalize_or_zero();
        let base = i * 3;
        mesh.normals[base] = unit.x;
        mesh.normals[base + 1] = unit.y;
        mesh.normals[base + 2] = unit.z;
    }
}
