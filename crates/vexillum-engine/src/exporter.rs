//! Particle → mesh export.

use vexillum_mesh::generators::flag_grid;
use vexillum_mesh::normals::compute_vertex_normals;
use vexillum_mesh::FlagMesh;
use vexillum_solver::state::ParticleGrid;

/// Owns the render mesh of one grid.
///
/// Indices and UVs are fixed when the exporter is created; [`sync`](Self::sync)
/// only rewrites positions and normals.
#[derive(Debug, Clone)]
pub struct GeometryExporter {
    mesh: FlagMesh,
}

impl GeometryExporter {
    /// Build the mesh for `grid` and copy its current positions in.
    pub fn new(grid: &ParticleGrid) -> Self {
        let mut exporter = Self {
            mesh: flag_grid(grid.segments_x, grid.segments_y, grid.width, grid.height),
        };
        exporter.sync(grid);
        exporter
    }

    /// Copy every particle position into the mesh, recompute normals and
    /// mark the mesh dirty.
    pub fn sync(&mut self, grid: &ParticleGrid) {
        debug_assert_eq!(self.mesh.vertex_count(), grid.particle_count);

        for (i, p) in self.mesh.positions.chunks_exact_mut(3).enumerate() {
            p[0] = grid.pos_x[i];
            p[1] = grid.pos_y[i];
            p[2] = grid.pos_z[i];
        }
        compute_vertex_normals(&mut self.mesh);
        self.mesh.mark_dirty();
    }

    pub fn mesh(&self) -> &FlagMesh {
        &self.mesh
    }

    /// Returns whether the mesh changed since the last call, clearing the flag.
    pub fn take_dirty(&mut self) -> bool {
        self.mesh.take_dirty()
    }
}
