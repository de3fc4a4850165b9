//! Integration tests for vexillum-render.

use glam::Vec3;
use vexillum_mesh::generators::flag_grid;
use vexillum_render::json_exporter::{Animation, JsonFrameExporter};
use vexillum_render::renderer::{HeadlessRenderer, RenderFrame, Renderer};

fn pole() -> (Vec3, Vec3) {
    (Vec3::new(-0.5, -0.36, 0.0), Vec3::new(-0.5, 0.36, 0.0))
}

// ─── Headless ─────────────────────────────────────────────────

#[test]
fn headless_counts_frames() {
    let mesh = flag_grid(2, 2, 1.0, 1.0);
    let mut renderer = HeadlessRenderer::new();
    renderer.init(&mesh).unwrap();
    assert_eq!(renderer.name(), "headless");
    assert_eq!(renderer.frame_count(), 0);

    let frame = RenderFrame::capture(0, &mesh, pole());
    renderer.submit_frame(&frame).unwrap();
    renderer.submit_frame(&frame).unwrap();
    renderer.finalize().unwrap();
    assert_eq!(renderer.frame_count(), 2);
}

#[test]
fn mismatched_frame_is_rejected() {
    let mut renderer = HeadlessRenderer::new();
    renderer.init(&flag_grid(2, 2, 1.0, 1.0)).unwrap();
    let other = RenderFrame::capture(0, &flag_grid(3, 2, 1.0, 1.0), pole());
    assert!(renderer.submit_frame(&other).is_err());
}

#[test]
fn frame_capture() {
    let mesh = flag_grid(2, 1, 1.0, 1.0);
    let frame = RenderFrame::capture(42, &mesh, pole());
    assert_eq!(frame.timestep, 42);
    assert_eq!(frame.vertex_count(), 6);
    assert_eq!(frame.positions, mesh.positions);
    assert_eq!(frame.pole[1], [-0.5, 0.36, 0.0]);
}

// ─── JSON Export ──────────────────────────────────────────────

#[test]
fn json_exporter_records_topology_once() {
    let mesh = flag_grid(4, 3, 1.0, 0.6);
    let mut exporter = JsonFrameExporter::new("unused.json");
    exporter.init(&mesh).unwrap();
    for t in 0..3 {
        exporter.submit_frame(&RenderFrame::capture(t, &mesh, pole())).unwrap();
    }
    assert_eq!(exporter.frame_count(), 3);

    let animation: Animation = serde_json::from_str(&exporter.to_json().unwrap()).unwrap();
    assert_eq!(animation.vertex_count, 20);
    assert_eq!(animation.triangle_count, 24);
    assert_eq!(animation.indices, mesh.indices);
    assert_eq!(animation.uvs, mesh.uvs);
    assert_eq!(animation.frames[2].timestep, 2);
}

#[test]
fn json_exporter_stride() {
    let mesh = flag_grid(2, 2, 1.0, 1.0);
    let mut exporter = JsonFrameExporter::new("unused.json").with_stride(4);
    exporter.init(&mesh).unwrap();
    for t in 0..10 {
        exporter.submit_frame(&RenderFrame::capture(t, &mesh, pole())).unwrap();
    }
    let kept: Vec<u64> = exporter.animation().frames.iter().map(|f| f.timestep).collect();
    assert_eq!(kept, vec![0, 4, 8]);
}

#[test]
fn json_exporter_writes_file() {
    let path = std::env::temp_dir().join(format!("vexillum-render-{}.json", std::process::id()));
    let mesh = flag_grid(2, 2, 1.0, 1.0);
    let mut exporter = JsonFrameExporter::new(&path);
    exporter.init(&mesh).unwrap();
    exporter.submit_frame(&RenderFrame::capture(0, &mesh, pole())).unwrap();
    exporter.finalize().unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    let animation: Animation = serde_json::from_str(&written).unwrap();
    assert_eq!(animation.frames.len(), 1);
    assert_eq!(exporter.name(), "json_exporter");
}
