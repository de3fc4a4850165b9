//! Core flag mesh type with interleaved vertex buffers.
//!
//! Unlike the solver's Structure-of-Arrays particle storage, the mesh is
//! laid out the way a renderer uploads it:
//! - `positions: [x0, y0, z0, x1, y1, z1, ...]`
//! - `normals:   [nx0, ny0, nz0, ...]`
//! - `uvs:       [u0, v0, u1, v1, ...]`
//!
//! Indices and UVs are fixed when the mesh is built; only positions and
//! normals change from frame to frame.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use vexillum_types::{VexillumError, VexillumResult};

/// An indexed triangle mesh mirroring a particle grid one vertex per particle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagMesh {
    /// Interleaved vertex positions.
    pub positions: Vec<f32>,

    /// Interleaved vertex normals.
    pub normals: Vec<f32>,

    /// Interleaved texture coordinates.
    pub uvs: Vec<f32>,

    /// Triangle indices, three per triangle: [v0, v1, v2].
    /// Stored flat: `[t0v0, t0v1, t0v2, t1v0, t1v1, t1v2, ...]`
    pub indices: Vec<u32>,

    /// Set when positions/normals changed since the renderer last uploaded.
    #[serde(skip)]
    dirty: bool,
}

impl FlagMesh {
    /// Creates an empty mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_capacity: usize, triangle_capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_capacity * 3),
            normals: Vec::with_capacity(vertex_capacity * 3),
            uvs: Vec::with_capacity(vertex_capacity * 2),
            indices: Vec::with_capacity(triangle_capacity * 3),
            dirty: true,
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns the position of vertex `i` as `[x, y, z]`.
    #[inline]
    pub fn position(&self, i: usize) -> [f32; 3] {
        let base = i * 3;
        [self.positions[base], self.positions[base + 1], self.positions[base + 2]]
    }

    /// Returns the position as a `glam::Vec3`.
    #[inline]
    pub fn position_vec3(&self, i: usize) -> Vec3 {
        Vec3::from(self.position(i))
    }

    /// Returns the normal of vertex `i` as a `glam::Vec3`.
    #[inline]
    pub fn normal_vec3(&self, i: usize) -> Vec3 {
        let base = i * 3;
        Vec3::new(self.normals[base], self.normals[base + 1], self.normals[base + 2])
    }

    /// Returns the UV of vertex `i` as `[u, v]`.
    #[inline]
    pub fn uv(&self, i: usize) -> [f32; 2] {
        [self.uvs[i * 2], self.uvs[i * 2 + 1]]
    }

    /// Returns the three vertex indices of triangle `t`.
    #[inline]
    pub fn triangle(&self, t: usize) -> [u32; 3] {
        let base = t * 3;
        [self.indices[base], self.indices[base + 1], self.indices[base + 2]]
    }

    /// Sets the position of vertex `i`.
    #[inline]
    pub fn set_position(&mut self, i: usize, x: f32, y: f32, z: f32) {
        let base = i * 3;
        self.positions[base] = x;
        self.positions[base + 1] = y;
        self.positions[base + 2] = z;
    }

    /// Flags the vertex buffers for re-upload.
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns true if the buffers changed since the last [`take_dirty`](Self::take_dirty).
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the dirty flag and clears it. Renderers call this once per upload.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Validates mesh integrity.
    ///
    /// Checks:
    /// - Position, normal and UV buffers describe the same vertex count
    /// - Triangle indices are within bounds
    /// - No degenerate triangles (repeated vertex indices)
    pub fn validate(&self) -> VexillumResult<()> {
        if self.positions.len() % 3 != 0 {
            return Err(VexillumError::InvalidMesh(
                "Position buffer length is not divisible by 3".into(),
            ));
        }

        let n = self.vertex_count();
        if self.normals.len() != n * 3 {
            return Err(VexillumError::InvalidMesh(format!(
                "Normal buffer holds {} floats, expected {}",
                self.normals.len(),
                n * 3
            )));
        }
        if self.uvs.len() != n * 2 {
            return Err(VexillumError::InvalidMesh(format!(
                "UV buffer holds {} floats, expected {}",
                self.uvs.len(),
                n * 2
            )));
        }

        if self.indices.len() % 3 != 0 {
            return Err(VexillumError::InvalidMesh(
                "Index count is not divisible by 3".into(),
            ));
        }

        for (i, &idx) in self.indices.iter().enumerate() {
            if idx as usize >= n {
                return Err(VexillumError::InvalidMesh(format!(
                    "Index {} at position {} is out of range (vertex count: {})",
                    idx, i, n
                )));
            }
        }

        for t in 0..self.triangle_count() {
            let [a, b, c] = self.triangle(t);
            if a == b || b == c || a == c {
                return Err(VexillumError::InvalidMesh(format!(
                    "Triangle {} has repeated vertex indices: [{}, {}, {}]",
                    t, a, b, c
                )));
            }
        }

        Ok(())
    }
}
