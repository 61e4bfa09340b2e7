#[cfg(feature = "window")]
mod window;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rasterizer::Rasterizer;
use reflectance_viewer::{render_sequence, FrameClock, Scene, ViewerConfig};
use shading::ReflectanceModel;

/// Renders procedural shapes lit with the Blinn–Phong or Cook–Torrance
/// reflectance model.
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// TOML configuration file, defaults are used for anything it leaves out
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,

    /// Reflectance model: blinn-phong or cook-torrance
    #[arg(long, short = 'm')]
    model: Option<ReflectanceModel>,

    /// Number of frames to render
    #[arg(long, short = 'n')]
    frames: Option<u32>,

    /// Frames per second of scene time
    #[arg(long)]
    fps: Option<f32>,

    /// Scene time of the first frame in seconds
    #[arg(long, value_name = "SECONDS")]
    start_time: Option<f32>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Seed for shape colors and spins
    #[arg(long)]
    seed: Option<u64>,

    /// Directory the frames are written to
    #[arg(long, short = 'o', value_name = "DIR")]
    output: Option<PathBuf>,

    /// Open a window instead of writing frames
    #[cfg(feature = "window")]
    #[arg(long)]
    window: bool,
}

impl Cli {
    fn apply_to(&self, config: &mut ViewerConfig) {
        let render = &mut config.render;
        if let Some(model) = self.model {
            render.model = model;
        }
        if let Some(frames) = self.frames {
            render.frames = frames;
        }
        if let Some(fps) = self.fps {
            render.fps = fps;
        }
        if let Some(start_time) = self.start_time {
            render.start_time = start_time;
        }
        if let Some(width) = self.width {
            render.width = width;
        }
        if let Some(height) = self.height {
            render.height = height;
        }
        if let Some(output) = &self.output {
            render.output = output.clone();
        }
        if let Some(seed) = self.seed {
            config.scene.seed = Some(seed);
        }
    }
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    cli.apply_to(&mut config);
    config.validate().context("invalid configuration")?;

    let mut scene = Scene::demo(&config).context("failed to build the scene")?;
    info!(
        "{} objects, {} lights, {}",
        scene.objects.len(),
        scene.lights.len(),
        config.render.model
    );

    #[cfg(feature = "window")]
    {
        if cli.window {
            return window::run(&config, &mut scene);
        }
    }

    let render = &config.render;
    let mut rasterizer = Rasterizer::new(render.width, render.height);
    let clock = FrameClock::new(render.fps, render.start_time, render.frames);
    let written = render_sequence(
        &mut rasterizer,
        &mut scene,
        render.model,
        clock,
        &render.output,
    )
    .with_context(|| format!("failed to render into {}", render.output.display()))?;

    println!("Wrote {} frame(s) to {}", written, render.output.display());
    Ok(())
}
