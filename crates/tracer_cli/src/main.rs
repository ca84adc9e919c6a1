//! tracer - render an OBJ model with the CPU ray tracer and save the image.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracer_core::{load_obj, SceneDescription, UnsignedColor};
use tracer_engine::shading::lambert_pipeline;
use tracer_engine::{FrameBuffers, Scene, TracerConfig};
use tracer_math::OrbitCamera;

#[derive(Parser)]
#[command(name = "tracer")]
#[command(about = "CPU ray tracer for OBJ models", long_about = None)]
struct Cli {
    /// Scene description (JSON); defaults apply when omitted
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// OBJ model, overrides the scene's model
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Output image (format determined by extension)
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,

    /// Image width, overrides the scene
    #[arg(long)]
    width: Option<u32>,

    /// Image height, overrides the scene
    #[arg(long)]
    height: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut description = match &cli.scene {
        Some(path) => SceneDescription::load(path)
            .with_context(|| format!("failed to load scene {}", path.display()))?,
        None => SceneDescription::default(),
    };
    if let Some(model) = &cli.model {
        description.set_model(model);
    }
    if let Some(width) = cli.width {
        description.width = width;
    }
    if let Some(height) = cli.height {
        description.height = height;
    }

    let model_path = description
        .model_path()
        .context("no model given, pass --model or set \"model\" in the scene")?;
    let meshes = load_obj(&model_path)
        .with_context(|| format!("failed to load model {}", model_path.display()))?;
    let scene = Scene::build(&meshes, description.lights());

    let camera = description.camera();
    let frame = render(&scene, &camera, &description)?;

    save_image(&frame, &cli.output)?;
    log::info!("Wrote {}", cli.output.display());

    Ok(())
}

fn render(
    scene: &Scene,
    camera: &OrbitCamera,
    description: &SceneDescription,
) -> Result<FrameBuffers<UnsignedColor>> {
    let tracer = lambert_pipeline(scene, TracerConfig::default(), description.background());

    let mut frame = FrameBuffers::new(description.width as usize, description.height as usize);
    frame.clear(UnsignedColor::BLACK);

    // Span the image plane at unit distance; rows run top to bottom
    let extent = 2.0 * (camera.angle_of_view * 0.5).tan();
    let right = camera.right() * extent * camera.aspect_ratio();
    let down = -camera.up() * extent;

    log::info!(
        "Rendering {}x{} ({} triangles)",
        frame.width(),
        frame.height(),
        scene.triangle_count()
    );
    let start = std::time::Instant::now();
    tracer.ray_generation(
        &mut frame,
        camera.position,
        camera.direction(),
        right,
        down,
        description.depth,
        description.sample_index,
    )?;

    let counts = tracer.stats();
    log::info!(
        "Rendered in {:?}: {} rays (primary and shadow), {} triangle tests",
        start.elapsed(),
        counts.rays,
        counts.triangle_tests
    );

    Ok(frame)
}

fn save_image(frame: &FrameBuffers<UnsignedColor>, path: &Path) -> Result<()> {
    let pixels: &[u8] = bytemuck::cast_slice(frame.output().get_data());
    let image = image::RgbImage::from_raw(frame.width() as u32, frame.height() as u32, pixels.to_vec())
        .context("output buffer does not match the image size")?;
    image
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
