//! JSON frame exporter: writes the whole run to one file for inspection.
//!
//! Indices and UVs are written once; every frame carries positions,
//! normals and the pole endpoints.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use vexillum_mesh::FlagMesh;
use vexillum_types::{VexillumError, VexillumResult};

use crate::renderer::{RenderFrame, Renderer};

/// Complete animation as written to disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub indices: Vec<u32>,
    pub uvs: Vec<f32>,
    pub frames: Vec<RenderFrame>,
}

/// Records frames and writes them as JSON on [`finalize`](Renderer::finalize).
///
/// ```text
/// let mut exporter = JsonFrameExporter::new("frames.json");
/// exporter.init(mesh)?;
/// // submit_frame() after every step
/// exporter.finalize()?;
/// ```
pub struct JsonFrameExporter {
    output_path: PathBuf,
    /// Keep every `stride`-th submitted frame.
    stride: usize,
    submitted: usize,
    animation: Animation,
}

impl JsonFrameExporter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            stride: 1,
            submitted: 0,
            animation: Animation::default(),
        }
    }

    /// Record only every `stride`-th frame (the first one is always kept).
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride.max(1);
        self
    }

    /// The animation recorded so far.
    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    /// Serialize the recorded animation.
    pub fn to_json(&self) -> VexillumResult<String> {
        serde_json::to_string(&self.animation)
            .map_err(|e| VexillumError::Serialization(format!("JSON serialization failed: {e}")))
    }
}

impl Renderer for JsonFrameExporter {
    fn init(&mut self, mesh: &FlagMesh) -> VexillumResult<()> {
        mesh.validate()?;
        self.animation = Animation {
            vertex_count: mesh.vertex_count(),
            triangle_count: mesh.triangle_count(),
            indices: mesh.indices.clone(),
            uvs: mesh.uvs.clone(),
            frames: Vec::new(),
        };
        self.submitted = 0;
        Ok(())
    }

    fn submit_frame(&mut self, frame: &RenderFrame) -> VexillumResult<()> {
        if frame.vertex_count() != self.animation.vertex_count {
            return Err(VexillumError::InvalidMesh(format!(
                "frame has {} vertices, mesh has {}",
                frame.vertex_count(),
                self.animation.vertex_count
            )));
        }
        if self.submitted % self.stride == 0 {
            self.animation.frames.push(frame.clone());
        }
        self.submitted += 1;
        Ok(())
    }

    fn finalize(&mut self) -> VexillumResult<()> {
        let json = self.to_json()?;
        std::fs::write(&self.output_path, json)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "json_exporter"
    }

    fn frame_count(&self) -> usize {
        self.animation.frames.len()
    }
}
