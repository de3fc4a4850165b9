//! Flag grid layout and mesh generation.
//!
//! The particle solver and the mesh both place grid point `(x, y)` with
//! [`grid_point`], so vertex `i` of the mesh always sits on particle `i`.

use crate::mesh::FlagMesh;

/// Flat-layout position of grid point `(x, y)`.
///
/// The grid spans `[-width/2, width/2]` in X and `[-height/2, height/2]` in Y,
/// centered at the origin at Z=0. Row 0 is the bottom edge.
#[inline]
pub fn grid_point(
    x: usize,
    y: usize,
    segments_x: usize,
    segments_y: usize,
    width: f32,
    height: f32,
) -> [f32; 3] {
    [
        (x as f32 / segments_x as f32 - 0.5) * width,
        (y as f32 / segments_y as f32 - 0.5) * height,
        0.0,
    ]
}

/// Generates the flat flag mesh for a `segments_x × segments_y` grid.
///
/// Vertices are row-major, `i = y * (segments_x + 1) + x`. UVs are
/// `u = x / segments_x`, `v = 1 - y / segments_y`. Each cell contributes two
/// counter-clockwise triangles, so the flat sheet faces +Z.
///
/// # Example
/// ```
/// use vexillum_mesh::generators::flag_grid;
/// let mesh = flag_grid(2, 2, 1.0, 1.0);
/// assert_eq!(mesh.vertex_count(), 9);  // 3×3 vertices
/// assert_eq!(mesh.triangle_count(), 8); // 2×2 cells × 2 tris each
/// ```
pub fn flag_grid(segments_x: usize, segments_y: usize, width: f32, height: f32) -> FlagMesh {
    let verts_x = segments_x + 1;
    let verts_y = segments_y + 1;
    let mut mesh = FlagMesh::with_capacity(verts_x * verts_y, segments_x * segments_y * 2);

    for y in 0..verts_y {
        for x in 0..verts_x {
            mesh.positions
                .extend_from_slice(&grid_point(x, y, segments_x, segments_y, width, height));
            mesh.normals.extend_from_slice(&[0.0, 0.0, 1.0]);
            mesh.uvs.push(x as f32 / segments_x as f32);
            mesh.uvs.push(1.0 - y as f32 / segments_y as f32);
        }
    }

    for y in 0..segments_y {
        for x in 0..segments_x {
            let bottom_left = (y * verts_x + x) as u32;
            let bottom_right = bottom_left + 1;
            let top_left = bottom_left + verts_x as u32;
            let top_right = top_left + 1;

            mesh.indices
                .extend_from_slice(&[bottom_left, bottom_right, top_left]);
            mesh.indices
                .extend_from_slice(&[bottom_right, top_right, top_left]);
        }
    }

    mesh
}
