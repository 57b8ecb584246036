//! `ronald` - render a JSON scene description to an image file.

mod cli;
mod logger;

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use ronald_renderer::RenderConfig;
use ronald_scene::load_scene;

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_logger(args.log_level.into());

    let mut config = RenderConfig::new(args.width, args.height, args.samples, args.threads)
        .context("Invalid render settings")?;
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(max_depth) = args.max_depth {
        config = config.with_max_depth(max_depth)?;
    }

    log::info!(
        "Using config: {}x{}, {} samples, {} thread(s), output {}",
        config.width(),
        config.height(),
        config.samples(),
        config.threads(),
        args.out.display()
    );

    let scene = load_scene(&args.scene, config.aspect_ratio(), args.split.into())
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;

    let progress = ProgressBar::new(config.height() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} rows ETA: {eta}")
            .context("Invalid progress bar template")?,
    );

    let start = Instant::now();
    let mut image = scene
        .render_multi_threaded_with_progress(&config, |_| progress.inc(1))
        .context("Render failed")?;
    progress.finish_and_clear();
    log::info!("Rendered in {:.2?}", start.elapsed());

    image.apply_tone_map(args.tone_map.into());
    image
        .save(&args.out)
        .with_context(|| format!("Failed to write {}", args.out.display()))?;
    log::info!("Wrote {}", args.out.display());

    Ok(())
}
