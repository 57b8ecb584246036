//! Error types for scene construction and render configuration.
//!
//! Everything here is raised before the first ray is traced. Once a render
//! starts, per-ray conditions (misses, absorbed paths, roulette) are plain
//! control flow inside the integrator and never surface as errors.

use thiserror::Error;

/// Errors that make a scene unusable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("cannot build a BVH from an empty object list")]
    EmptyScene,

    #[error("invalid refractive index {0}: must be greater than zero")]
    InvalidRefractiveIndex(f32),

    #[error("Undefined reference to material \"{0}\"")]
    UndefinedMaterial(String),

    #[error("material \"{0}\" is declared more than once")]
    DuplicateMaterial(String),

    #[error("object refers to material #{0}, which is not in the library")]
    UnknownMaterialId(usize),

    #[error("Focal distance cannot be zero!")]
    ZeroFocusDistance,

    #[error("camera look_from and look_at are the same point")]
    CoincidentLookAt,

    #[error("camera vup is parallel to the view direction")]
    ParallelUpVector,

    #[error("invalid sphere radius {0}: must be greater than zero")]
    InvalidRadius(f32),
}

/// Result type for scene construction.
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors raised while validating render parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },

    #[error("{name} of {value} is too large (maximum {max})")]
    TooLarge {
        name: &'static str,
        value: usize,
        max: usize,
    },

    #[error("Hardware concurrency value is not available on this machine")]
    NoHardwareConcurrency,

    #[error("using {requested} threads is more than the {available} available hardware threads")]
    TooManyThreads { requested: usize, available: usize },
}

/// Errors raised while starting a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to start render threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
