//! CLI command implementations.

use std::time::Instant;

use tracing_subscriber::EnvFilter;
use vexillum_debug::{StateSnapshot, TelemetryHook};
use vexillum_engine::SimulationStepper;
use vexillum_render::{HeadlessRenderer, JsonFrameExporter, RenderFrame, Renderer};
use vexillum_telemetry::{EventBus, TracingSink};

use crate::settings::SimulationFile;

/// Install the global `tracing` subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Run a headless simulation.
pub fn simulate(
    config_path: Option<&str>,
    output_path: Option<&str>,
    snapshot_path: Option<&str>,
    steps_override: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Vexillum Simulation");
    println!("───────────────────");

    let file = match config_path {
        Some(path) => {
            println!("Config:    {path}");
            SimulationFile::load(path)?
        }
        None => {
            println!("Config:    (defaults)");
            SimulationFile::default()
        }
    };
    let run = &file.run;
    let steps = steps_override.unwrap_or(run.steps);
    let dt = run.effective_dt();
    if dt < run.dt {
        tracing::warn!(requested = run.dt, used = dt, "timestep capped at max_dt");
    }

    let mut stepper = SimulationStepper::new().with_sizing(run.sizing);
    stepper.add_hook(Box::new(TelemetryHook::new(
        EventBus::new().with_sink(Box::new(TracingSink::new())),
    )));
    stepper.set_pole_rotation(run.pole_rotation_degrees)?;
    stepper.build(file.cloth.clone())?;
    if let Some(aspect) = run.aspect_ratio {
        stepper.resize_for_aspect(aspect)?;
    }

    let config = stepper.config();
    let particles = config.particle_count()?;
    println!(
        "Flag:      {:.3} x {:.3} m, {} x {} cells, {} particles",
        config.width,
        config.height,
        config.segments_x,
        config.segments_y,
        particles,
    );
    println!("Wind:      {}", run.wind_force);
    println!("Pole:      {}°", run.pole_rotation_degrees);
    println!("Steps:     {steps} at dt = {dt:.5}s");
    println!();

    let mut renderer: Box<dyn Renderer> = match output_path {
        Some(path) => Box::new(JsonFrameExporter::new(path).with_stride(run.frame_stride)),
        None => Box::new(HeadlessRenderer::new()),
    };
    let mesh = stepper.mesh().ok_or("stepper has no mesh after build")?;
    renderer.init(mesh)?;

    let start = Instant::now();
    let mut contacts = 0u64;
    let mut max_penetration = 0.0f32;
    let mut kinetic_energy = 0.0;

    for _ in 0..steps {
        let report = stepper.step(run.wind_force, dt)?;
        contacts += u64::from(report.contacts.resolved_count);
        max_penetration = max_penetration.max(report.contacts.max_penetration);
        kinetic_energy = report.kinetic_energy;

        if stepper.take_mesh_dirty() {
            let (Some(mesh), Some(pole)) = (stepper.mesh(), stepper.pole_endpoints()) else {
                break;
            };
            renderer.submit_frame(&RenderFrame::capture(report.timestep, mesh, pole))?;
        }
    }
    renderer.finalize()?;
    let wall_time = start.elapsed().as_secs_f64();

    println!("Sim time:       {:.3}s", stepper.sim_time());
    println!("Wall time:      {:.3}s", wall_time);
    if steps > 0 {
        println!("Avg step:       {:.3}ms", wall_time * 1000.0 / f64::from(steps));
    }
    println!("Final KE:       {:.6e}", kinetic_energy);
    println!("Pole contacts:  {contacts}");
    println!("Max pen.:       {:.6}m", max_penetration);
    if let Some(grid) = stepper.grid() {
        println!("Lowest point:   {:.4}m", grid.min_height());
    }
    println!("Frames ({}): {}", renderer.name(), renderer.frame_count());

    if let Some(path) = output_path {
        println!("Frames written to: {path}");
    }

    if let Some(path) = snapshot_path {
        let grid = stepper.grid().ok_or("stepper has no grid")?;
        let snapshot = StateSnapshot::capture(stepper.timestep(), stepper.sim_time(), grid);
        std::fs::write(path, snapshot.to_bytes()?)?;
        println!("Snapshot written to: {path}");
    }

    stepper.dispose()?;
    Ok(())
}

/// Inspect a state snapshot.
pub fn inspect(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("Vexillum Snapshot Inspector");
    println!("───────────────────────────");
    println!();

    let data = std::fs::read(path)?;
    let snapshot = StateSnapshot::from_bytes(&data)
        .map_err(|e| format!("Failed to read snapshot: {e}"))?;

    println!("Timestep:     {}", snapshot.timestep);
    println!("Sim time:     {:.4}s", snapshot.sim_time);
    println!(
        "Grid:         {} x {} cells ({} particles)",
        snapshot.segments_x, snapshot.segments_y, snapshot.particle_count
    );

    if let Some((min_y, max_y)) = snapshot.height_range() {
        println!("Y range:      [{:.4}, {:.4}]", min_y, max_y);
    }
    println!("Max step:     {:.6}m", snapshot.max_speed());

    // Corner of the free edge, top row.
    if let Some(last) = snapshot.particle_count.checked_sub(1) {
        let tip = snapshot.position(last);
        println!("Free tip:     ({:.4}, {:.4}, {:.4})", tip[0], tip[1], tip[2]);
    }

    Ok(())
}

/// Validate a simulation config.
pub fn validate(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("Vexillum Validator");
    println!("──────────────────");
    println!();

    println!("Validating config: {path}");
    let file = SimulationFile::load(path)?;
    println!("✅ Config is valid.");
    println!(
        "   {} particles, {} steps at dt = {:.5}s",
        file.cloth.particle_count()?,
        file.run.steps,
        file.run.effective_dt()
    );
    if file.run.effective_dt() < file.run.dt {
        println!("   note: dt {} exceeds max_dt and will be capped", file.run.dt);
    }

    Ok(())
}

/// Print the default simulation file.
pub fn default_config() -> Result<(), Box<dyn std::error::Error>> {
    print!("{}", SimulationFile::default().to_toml()?);
    Ok(())
}
