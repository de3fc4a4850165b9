//! # vexillum-mesh
//!
//! Renderable flag mesh with interleaved vertex buffers, ready for
//! upload by an external renderer.
//!
//! ## Key Types
//!
//! - [`FlagMesh`] — Positions, normals, UVs and triangle indices, plus a
//!   dirty flag telling the renderer when to re-upload.
//! - [`generators::flag_grid`] — The flat grid layout shared with the
//!   particle solver.
//! - [`normals::compute_vertex_normals`] — Smooth, area-weighted normals.

pub mod generators;
pub mod mesh;
pub mod normals;

pub use mesh::FlagMesh;
