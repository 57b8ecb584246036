use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use ronald_renderer::{SplitStrategy, ToneMapOperator};

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ToneMap {
    Clamp,
    ReinhardJodie,
}

impl From<ToneMap> for ToneMapOperator {
    fn from(tone_map: ToneMap) -> Self {
        match tone_map {
            ToneMap::Clamp => ToneMapOperator::Clamp,
            ToneMap::ReinhardJodie => ToneMapOperator::ReinhardJodie,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Split {
    Random,
    LongestAxis,
    Sah,
}

impl From<Split> for SplitStrategy {
    fn from(split: Split) -> Self {
        match split {
            Split::Random => SplitStrategy::Random,
            Split::LongestAxis => SplitStrategy::LongestAxis,
            Split::Sah => SplitStrategy::SurfaceAreaHeuristic,
        }
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Debug, Parser)]
#[command(name = "ronald")]
#[command(about = "Offline Monte Carlo path tracer")]
pub struct Args {
    /// Scene description JSON file
    pub scene: PathBuf,

    /// Image width in pixels
    #[arg(long)]
    pub width: usize,

    /// Image height in pixels
    #[arg(long)]
    pub height: usize,

    /// Number of samples per pixel
    #[arg(long, short = 's')]
    pub samples: usize,

    /// Worker threads; 0 uses every hardware thread
    #[arg(long, short = 't', default_value_t = 1)]
    pub threads: usize,

    /// Output image; the format follows the extension
    #[arg(long, short = 'o', default_value = "./image.ppm")]
    pub out: PathBuf,

    /// Tone mapping operator applied before encoding
    #[arg(long, value_enum, default_value_t = ToneMap::ReinhardJodie)]
    pub tone_map: ToneMap,

    /// BVH split strategy
    #[arg(long, value_enum, default_value_t = Split::Sah)]
    pub split: Split,

    /// Base random seed; the same seed gives the same image
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum path length in bounces
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Set the logging level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}
