//! Ronald renderer - CPU Monte Carlo path tracing
//!
//! Geometry, materials and a BVH over them, a path tracing integrator, and
//! single- and multi-threaded schedulers that fill a linear-radiance
//! framebuffer. Scenes are frozen before rendering and shared read-only by
//! every worker.

mod bvh;
mod camera;
mod config;
mod error;
mod framebuffer;
mod hittable;
mod integrator;
mod material;
mod object;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod triangle;

pub use bvh::{Bvh, BvhNode, FlatBvh, SplitStrategy, DEFAULT_BUILD_SEED};
pub use camera::Camera;
pub use config::{RenderConfig, DEFAULT_SEED, MAX_DIMENSION, MAX_SAMPLES};
pub use error::{BuildError, BuildResult, ConfigError, RenderError};
pub use framebuffer::{encode, ImageBuffer, ToneMapOperator};
pub use hittable::{Hittable, Intersection};
pub use integrator::{PathTracer, MAX_DEPTH, T_MIN};
pub use material::{
    reflect, refract, schlick, Color, Dielectric, Lambertian, Light, Material, MaterialLibrary,
    Reflector, Scatter,
};
pub use object::{intersect_linear, Hit, MaterialId, Object, Primitive};
pub use sampling::{gen_f32, random_in_unit_disk, random_in_unit_sphere, random_on_unit_sphere};
pub use scene::Scene;
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export Vec3 and common math types from ronald_math
pub use ronald_math::{Aabb, Interval, Ray, Vec3};
