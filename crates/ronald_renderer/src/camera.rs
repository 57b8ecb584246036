//! Thin-lens camera for ray generation.

use crate::error::{BuildError, BuildResult};
use crate::sampling::random_in_unit_disk;
use rand::RngCore;
use ronald_math::{Ray, Vec3};

/// Camera for generating rays into the scene.
///
/// Configure with the `with_*` builders, then call `initialize()` once.
#[derive(Debug, Clone)]
pub struct Camera {
    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,         // Vertical field of view in degrees
    aspect_ratio: f32, // Image width over height
    aperture: f32,     // Lens diameter; zero is a pinhole
    focus_dist: f32,   // Distance from camera to plane of perfect focus

    // Cached computed values (set by initialize())
    lower_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 1.0,
            aperture: 0.0,
            focus_dist: 1.0,
            lower_left: Vec3::ZERO,
            horizontal: Vec3::ZERO,
            vertical: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            lens_radius: 0.0,
        }
    }

    /// Set the image aspect ratio (width / height).
    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) -> BuildResult<()> {
        if self.focus_dist.abs() < f32::EPSILON {
            return Err(BuildError::ZeroFocusDistance);
        }

        // A degenerate basis would turn every ray into NaN
        let w = (self.look_from - self.look_at)
            .try_normalize()
            .ok_or(BuildError::CoincidentLookAt)?;
        let u = self.vup.cross(w).try_normalize().ok_or(BuildError::ParallelUpVector)?;

        self.lens_radius = self.aperture / 2.0;

        let theta = self.vfov.to_radians();
        let half_height = (theta / 2.0).tan();
        let half_width = self.aspect_ratio * half_height;

        self.w = w;
        self.u = u;
        self.v = w.cross(u);

        self.lower_left = self.look_from
            - half_width * self.focus_dist * self.u
            - half_height * self.focus_dist * self.v
            - self.focus_dist * self.w;
        self.horizontal = 2.0 * half_width * self.focus_dist * self.u;
        self.vertical = 2.0 * half_height * self.focus_dist * self.v;

        Ok(())
    }

    /// Generate the ray through viewport coordinates `(s, t)`.
    ///
    /// `(0, 0)` is the lower-left corner and `(1, 1)` the upper-right. The
    /// origin is jittered over the lens disk when the aperture is open.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.u * rd.x + self.v * rd.y
        } else {
            Vec3::ZERO
        };

        let origin = self.look_from + offset;
        let target = self.lower_left + s * self.horizontal + t * self.vertical;
        Ray::new(origin, target - origin)
    }

    pub fn look_from(&self) -> Vec3 {
        self.look_from
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
