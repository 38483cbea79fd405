use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gridaura::prelude::*;
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

mod scene;
mod svg;

#[derive(Parser)]
#[command(name = "gridaura")]
#[command(about = "Aura borders, inside tests, and scene replays")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Print the border path of one owner footprint as JSON
    Border {
        /// Host grid code: 0 gridless, 1 square, 2/3 row hex, 4/5 columnar hex
        #[arg(long, default_value_t = 1)]
        grid: u8,
        #[arg(long, default_value_t = 100.0)]
        cell: f64,
        #[arg(long, default_value_t = 1.0)]
        width: f64,
        #[arg(long, default_value_t = 1.0)]
        height: f64,
        /// Hex shape code 0..=5
        #[arg(long, default_value_t = 0)]
        shape: u8,
        #[arg(long)]
        radius: f64,
        #[arg(long, default_value = "equidistant")]
        mode: SquareDistanceMode,
    },
    /// Replay a scene file and print transitions as JSON lines
    Replay {
        #[arg(long)]
        scene: PathBuf,
        /// Write the JSON lines here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Render every aura border of a scene to SVG
    Render {
        #[arg(long)]
        scene: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 20.0)]
        margin: f64,
    },
    /// Print which tokens start inside which auras
    Inside {
        #[arg(long)]
        scene: PathBuf,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Border {
            grid,
            cell,
            width,
            height,
            shape,
            radius,
            mode,
        } => border(grid, cell, Footprint::new(width, height), shape, radius, mode),
        Action::Replay { scene, out } => replay(scene, out),
        Action::Render { scene, out, margin } => render(scene, out, margin),
        Action::Inside { scene } => inside(scene),
    }
}

fn border(
    code: u8,
    cell: f64,
    footprint: Footprint,
    shape: u8,
    radius: f64,
    mode: SquareDistanceMode,
) -> Result<()> {
    let grid = Grid::from_host_code(code, cell)?;
    let footprint = footprint.with_shape(HexShape::try_from(shape)?);
    tracing::info!(?grid, ?footprint, radius, %mode, "border");
    let mut cache = GeometryCache::new();
    let geometry = AuraGeometry::build(&mut cache, &grid, &footprint, radius, mode);
    if geometry.border().is_empty() {
        tracing::info!("no border for this footprint and radius");
    }
    println!("{}", serde_json::to_string_pretty(geometry.border())?);
    Ok(())
}

fn replay(path: PathBuf, out: Option<PathBuf>) -> Result<()> {
    let scene = scene::load(&path)?;
    let events = scene::replay(&scene);
    tracing::info!(steps = scene.steps.len(), events = events.len(), "replay");
    let mut lines = String::new();
    for e in &events {
        lines.push_str(&serde_json::to_string(e)?);
        lines.push('\n');
    }
    match out {
        Some(p) => scene::write_output(&p, lines.as_bytes()),
        None => {
            print!("{lines}");
            Ok(())
        }
    }
}

fn render(path: PathBuf, out: PathBuf, margin: f64) -> Result<()> {
    let scene = scene::load(&path)?;
    let tokens = scene.snapshots();
    let manager = scene.manager();
    let mut sink = svg::SvgSink::default();
    manager.render(&tokens, &mut sink);
    if sink.is_empty() {
        tracing::info!("scene has no visible auras");
    }
    tracing::info!(paths = sink.len(), out = %out.display(), "render");
    scene::write_output(&out, sink.finish(margin).as_bytes())
        .with_context(|| format!("rendering {}", path.display()))
}

fn inside(path: PathBuf) -> Result<()> {
    let scene = scene::load(&path)?;
    let report = scene::inside_report(&scene);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
