//! Render configuration.

use std::num::NonZeroUsize;
use std::thread;

use crate::error::ConfigError;
use crate::integrator::MAX_DEPTH;

/// Largest accepted image width or height.
pub const MAX_DIMENSION: usize = 20_000;

/// Largest accepted samples-per-pixel count.
pub const MAX_SAMPLES: usize = 32_000;

/// Base seed used when none is given.
pub const DEFAULT_SEED: u64 = 0x726f_6e61_6c64;

/// Validated render parameters.
///
/// Only `RenderConfig::new` creates one, so a value of this type always has
/// dimensions and sample counts in range and a concrete thread count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    width: usize,
    height: usize,
    samples: usize,
    threads: usize,
    /// Base seed; row `y` draws from a generator seeded with `seed + y`
    seed: u64,
    /// Maximum number of path segments per sample
    max_depth: usize,
    russian_roulette: bool,
}

impl RenderConfig {
    /// Validate the parameters. `threads == 0` means one thread per
    /// hardware thread.
    pub fn new(
        width: usize,
        height: usize,
        samples: usize,
        threads: usize,
    ) -> Result<Self, ConfigError> {
        check_range("width", width, MAX_DIMENSION)?;
        check_range("height", height, MAX_DIMENSION)?;
        check_range("samples", samples, MAX_SAMPLES)?;

        let available = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .map_err(|_| ConfigError::NoHardwareConcurrency)?;
        let threads = resolve_threads(threads, available)?;

        Ok(Self {
            width,
            height,
            samples,
            threads,
            seed: DEFAULT_SEED,
            max_depth: MAX_DEPTH,
            russian_roulette: true,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Result<Self, ConfigError> {
        if max_depth == 0 {
            return Err(ConfigError::Zero { name: "max depth" });
        }
        self.max_depth = max_depth;
        Ok(self)
    }

    /// Keep every path alive until it is absorbed or runs out of bounces.
    pub fn without_russian_roulette(mut self) -> Self {
        self.russian_roulette = false;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn russian_roulette(&self) -> bool {
        self.russian_roulette
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Total number of camera samples in one render.
    pub fn total_samples(&self) -> u64 {
        self.width as u64 * self.height as u64 * self.samples as u64
    }
}

fn check_range(name: &'static str, value: usize, max: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Zero { name });
    }
    if value > max {
        return Err(ConfigError::TooLarge { name, value, max });
    }
    Ok(())
}

fn resolve_threads(requested: usize, available: usize) -> Result<usize, ConfigError> {
    match requested {
        0 => Ok(available),
        n if n > available => Err(ConfigError::TooManyThreads {
            requested: n,
            available,
        }),
        n => Ok(n),
    }
}
