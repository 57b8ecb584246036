//! Work distribution: turning a scene and a config into an image.
//!
//! Both renderers share the per-row loop. Each row draws from its own
//! generator seeded with `config.seed() + y`, so the image depends only on
//! the seed and never on which thread rendered which row.

use std::time::{Duration, Instant};

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::framebuffer::ImageBuffer;
use crate::integrator::PathTracer;
use crate::material::Color;
use crate::sampling::gen_f32;
use crate::scene::Scene;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::ThreadPoolBuilder;

impl Scene {
    /// Render on the calling thread, rows then columns then samples.
    pub fn render_single_threaded(&self, config: &RenderConfig) -> ImageBuffer {
        let start = Instant::now();
        log_start(config, 1);

        let tracer = PathTracer::new(self, config);
        let mut image = ImageBuffer::new(config.width(), config.height());
        for (y, row) in image.rows_mut().enumerate() {
            render_row(&tracer, config, y, row);
        }

        log_finish(config, start.elapsed());
        image
    }

    /// Render with `config.threads()` workers.
    pub fn render_multi_threaded(&self, config: &RenderConfig) -> Result<ImageBuffer, RenderError> {
        self.render_multi_threaded_with_progress(config, |_| {})
    }

    /// Render with `config.threads()` workers, calling `on_row` on the
    /// calling thread with each row index as that row completes.
    ///
    /// Every row is queued before the workers start. Workers pull one row at
    /// a time and own that slice of the framebuffer exclusively, so no pixel
    /// is ever locked.
    pub fn render_multi_threaded_with_progress(
        &self,
        config: &RenderConfig,
        mut on_row: impl FnMut(usize),
    ) -> Result<ImageBuffer, RenderError> {
        let start = Instant::now();
        log_start(config, config.threads());

        let pool = ThreadPoolBuilder::new()
            .num_threads(config.threads())
            .thread_name(|i| format!("ronald-worker-{i}"))
            .build()?;

        let tracer = &PathTracer::new(self, config);
        let mut image = ImageBuffer::new(config.width(), config.height());

        {
            let (row_tx, row_rx) = crossbeam_channel::unbounded();
            for row in image.rows_mut().enumerate() {
                // Cannot fail: row_rx is alive for this whole block
                let _ = row_tx.send(row);
            }
            drop(row_tx);

            let (done_tx, done_rx) = crossbeam_channel::unbounded();

            pool.in_place_scope(|scope| {
                for _ in 0..config.threads() {
                    let row_rx = row_rx.clone();
                    let done_tx = done_tx.clone();

                    scope.spawn(move |_| {
                        // Ends once the queue is drained
                        for (y, row) in row_rx.iter() {
                            render_row(tracer, config, y, row);
                            if done_tx.send(y).is_err() {
                                break;
                            }
                        }
                    });
                }
                drop(done_tx);

                // Ends once every worker has dropped its sender
                for y in done_rx.iter() {
                    on_row(y);
                }
            });
        }

        log_finish(config, start.elapsed());
        Ok(image)
    }
}

/// Render row `y` (0 is the top) into `row`.
fn render_row(tracer: &PathTracer<'_>, config: &RenderConfig, y: usize, row: &mut [Color]) {
    let mut rng = StdRng::seed_from_u64(config.seed().wrapping_add(y as u64));
    let width = config.width() as f32;
    let height = config.height() as f32;
    let flipped_y = (config.height() - 1 - y) as f32;
    let samples = config.samples();

    for (x, pixel) in row.iter_mut().enumerate() {
        let mut color = Color::ZERO;
        for _ in 0..samples {
            let u = (x as f32 + gen_f32(&mut rng)) / width;
            let v = (flipped_y + gen_f32(&mut rng)) / height;
            color += tracer.trace(u, v, &mut rng);
        }
        *pixel = color / samples as f32;
    }
}

fn log_start(config: &RenderConfig, threads: usize) {
    log::info!(
        "Rendering {}x{} at {} spp on {} thread(s), seed {}",
        config.width(),
        config.height(),
        config.samples(),
        threads,
        config.seed()
    );
}

fn log_finish(config: &RenderConfig, elapsed: Duration) {
    let samples_per_sec = config.total_samples() as f64 / elapsed.as_secs_f64().max(1e-9);
    log::info!(
        "Render finished in {:.2?} ({:.0} samples/sec)",
        elapsed,
        samples_per_sec
    );
}
