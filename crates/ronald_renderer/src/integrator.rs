//! Monte Carlo path tracing integrator.
//!
//! Paths are followed iteratively: each bounce multiplies the running
//! attenuation by the material's, and a path that reaches an emitter (which
//! never scatters) returns the attenuated emission. Paths that leave the
//! scene see a black background.

use crate::config::RenderConfig;
use crate::material::Color;
use crate::sampling::gen_f32;
use crate::scene::Scene;
use rand::RngCore;
use ronald_math::{Interval, Ray};

/// Minimum ray parameter for every query, to avoid self-intersection.
pub const T_MIN: f32 = 5e-4;

/// Default maximum number of path segments.
pub const MAX_DEPTH: usize = 20;

/// Computes radiance samples for a scene.
#[derive(Clone, Copy)]
pub struct PathTracer<'a> {
    scene: &'a Scene,
    max_depth: usize,
    russian_roulette: bool,
}

impl<'a> PathTracer<'a> {
    pub fn new(scene: &'a Scene, config: &RenderConfig) -> Self {
        Self {
            scene,
            max_depth: config.max_depth(),
            russian_roulette: config.russian_roulette(),
        }
    }

    /// One radiance sample through viewport coordinates `(u, v)`.
    pub fn trace(&self, u: f32, v: f32, rng: &mut dyn RngCore) -> Color {
        let ray = self.scene.camera().get_ray(u, v, rng);
        self.trace_ray(ray, rng)
    }

    /// Follow one path starting with `ray`.
    pub fn trace_ray(&self, mut ray: Ray, rng: &mut dyn RngCore) -> Color {
        let mut attenuation = Color::ONE;
        let mut emitted = Color::ZERO;

        for _ in 0..self.max_depth {
            let Some(hit) = self.scene.intersect(&ray, Interval::from_min(T_MIN)) else {
                return Color::ZERO;
            };

            let material = self.scene.material(&hit);
            emitted += material.emitted(&ray, &hit.intersection);

            let Some(scatter) = material.scatter(&ray, &hit.intersection, rng) else {
                return attenuation * emitted;
            };

            attenuation *= scatter.attenuation;
            ray = scatter.specular;

            if self.russian_roulette {
                // Survival probability follows the path's remaining throughput
                let p = attenuation.max_element().min(1.0);
                if p <= 0.0 || gen_f32(rng) > p {
                    return attenuation * emitted;
                }
                attenuation *= 1.0 / p;
            }
        }

        // Out of bounces
        Color::ZERO
    }
}
