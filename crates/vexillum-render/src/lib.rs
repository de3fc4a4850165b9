//! # vexillum-render
//!
//! Consumer side of the flag mesh. A [`Renderer`] receives the fixed
//! topology once and a [`RenderFrame`] per step.
//!
//! - [`HeadlessRenderer`] counts frames and discards them
//! - [`JsonFrameExporter`] records frames and writes them as one JSON file

pub mod json_exporter;
pub mod renderer;

pub use json_exporter::{Animation, JsonFrameExporter};
pub use renderer::{HeadlessRenderer, RenderFrame, Renderer};
