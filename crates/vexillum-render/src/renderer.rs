//! Renderer trait and the headless implementation.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use vexillum_mesh::FlagMesh;
use vexillum_types::{VexillumError, VexillumResult};

/// Per-step data a renderer needs: the moving buffers and the pole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    /// Steps completed when the frame was captured.
    pub timestep: u64,
    /// Interleaved vertex positions.
    pub positions: Vec<f32>,
    /// Interleaved vertex normals.
    pub normals: Vec<f32>,
    /// Pole base and tip.
    pub pole: [[f32; 3]; 2],
}

impl RenderFrame {
    /// Copy the moving parts of `mesh`.
    pub fn capture(timestep: u64, mesh: &FlagMesh, pole: (Vec3, Vec3)) -> Self {
        Self {
            timestep,
            positions: mesh.positions.clone(),
            normals: mesh.normals.clone(),
            pole: [pole.0.to_array(), pole.1.to_array()],
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// Something that presents simulation output.
///
/// ```text
/// renderer.init(&mesh)?;
/// loop { renderer.submit_frame(&frame)?; }
/// renderer.finalize()?;
/// ```
pub trait Renderer: Send {
    /// Receive the fixed topology (indices, UVs) of the mesh.
    fn init(&mut self, mesh: &FlagMesh) -> VexillumResult<()>;

    /// Present one frame.
    fn submit_frame(&mut self, frame: &RenderFrame) -> VexillumResult<()>;

    /// Flush buffers, close files.
    fn finalize(&mut self) -> VexillumResult<()>;

    fn name(&self) -> &str;

    /// Frames submitted so far.
    fn frame_count(&self) -> usize;
}

/// Discards every frame. Used when only the simulation itself matters.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    vertex_count: usize,
    frames: usize,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for HeadlessRenderer {
    fn init(&mut self, mesh: &FlagMesh) -> VexillumResult<()> {
        mesh.validate()?;
        self.vertex_count = mesh.vertex_count();
        Ok(())
    }

    fn submit_frame(&mut self, frame: &RenderFrame) -> VexillumResult<()> {
        if frame.vertex_count() != self.vertex_count {
            return Err(VexillumError::InvalidMesh(format!(
                "frame has {} vertices, mesh has {}",
                frame.vertex_count(),
                self.vertex_count
            )));
        }
        self.frames += 1;
        Ok(())
    }

    fn finalize(&mut self) -> VexillumResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "headless"
    }

    fn frame_count(&self) -> usize {
        self.frames
    }
}
