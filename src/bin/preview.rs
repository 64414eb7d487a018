use clap::Parser;
use std::fs;
use tracing::info;

use openroad_world::{
    EnvironmentOptions, Mode, NodeKind, Preset, Scene, Vertex3, WorldConfig, WorldGenerator,
};

/// Generate a world off-screen and report what ended up in the scene.
///
/// Lets the generated geometry be inspected without the render shell: run a
/// few simulated frames, optionally switch modes mid-run, optionally dump
/// the meshes as OBJ.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to world.toml configuration file
    #[arg(short, long, default_value = "./world.toml")]
    config: String,

    /// Override the configured preset
    #[arg(short, long)]
    preset: Option<String>,

    /// Number of simulated frames to run
    #[arg(short, long, default_value_t = 120)]
    ticks: u32,

    /// Switch to the other environment mode halfway through the run
    #[arg(long)]
    switch_mode: bool,

    /// Directory to write terrain/road OBJ dumps into
    #[arg(long)]
    export_obj: Option<String>,

    /// Override log level (trace|debug|info|warn|error)
    #[arg(short, long)]
    log_level: Option<String>,
}

fn other_mode(mode: Mode) -> Mode {
    match mode {
        Mode::Natural => Mode::Winter,
        Mode::Winter => Mode::Natural,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = args.log_level.as_deref().unwrap_or("info");
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config = WorldConfig::load_or_default(&args.config);
    let preset_name = args.preset.as_deref().unwrap_or(&config.world.preset);
    let preset = Preset::resolve_or_default(preset_name);

    info!(
        "preset '{}': detail={} view_distance={} tree_density={}",
        preset.name, preset.detail_scale, preset.view_distance, preset.tree_density
    );

    let mut scene = Scene::new();
    let mut world = WorldGenerator::generate_from_preset(
        Some(&mut scene),
        &preset,
        config.world.mode,
        config.world.day_night,
        config.world.seed,
    );

    let mut mode = config.world.mode;
    let dt = 1.0 / 60.0;
    for tick in 0..args.ticks {
        if args.switch_mode && tick == args.ticks / 2 {
            mode = other_mode(mode);
            info!("switching environment to {:?} at tick {}", mode, tick);
            let options = EnvironmentOptions {
                detail: preset.detail_scale,
                tree_density: preset.tree_density,
                day_night: config.world.day_night,
            };
            world.apply_environment(Some(&mut scene), mode, &options);
        }

        let player_pos = Vertex3::new(0.0, tick as f32 * 2.0, 0.0);
        world.update(Some(&mut scene), player_pos, dt);
    }

    info!("scene after {} ticks:", args.ticks);
    let mut names: Vec<&str> = scene.child_names().collect();
    names.sort_unstable();
    for name in names {
        let node = scene.get_named(name).unwrap();
        match &node.kind {
            NodeKind::Mesh { geometry, .. } => {
                info!(
                    "  {}: mesh, {} vertices / {} triangles, at y={}",
                    name,
                    geometry.vertices.len(),
                    geometry.triangle_count(),
                    node.position.y
                );
            }
            NodeKind::Instanced { instances, .. } => {
                info!("  {}: instanced batch, {} instances", name, instances.len());
            }
            NodeKind::Points { positions, .. } => {
                info!("  {}: particles, {} points", name, positions.len());
            }
        }
    }
    let stats = scene.stats();
    info!(
        "buffers: {} live, {} released over the run",
        stats.live_geometries, stats.released_geometries
    );

    if let Some(dir) = &args.export_obj {
        fs::create_dir_all(dir)?;
        for name in ["terrain", "road"] {
            if let Some(node) = scene.get_named(name) {
                if let NodeKind::Mesh { geometry, .. } = &node.kind {
                    let path = format!("{}/{}.obj", dir, name);
                    fs::write(&path, geometry.export_obj(name))?;
                    info!("wrote {}", path);
                }
            }
        }
    }

    info!("road length: {:.1} units", world.road().total_length());

    Ok(())
}
