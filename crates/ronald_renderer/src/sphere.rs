//! Sphere primitive for ray tracing.

use crate::error::{BuildError, BuildResult};
use crate::hittable::{Hittable, Intersection};
use ronald_math::{Aabb, Interval, Ray, Vec3};

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere. `radius` must be positive and finite; use
    /// [`Sphere::try_new`] for values read from a scene file.
    pub fn new(center: Vec3, radius: f32) -> Self {
        debug_assert!(radius > 0.0 && radius.is_finite(), "invalid sphere radius {radius}");
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            bbox,
        }
    }

    /// Checked constructor. A zero radius would give NaN normals.
    pub fn try_new(center: Vec3, radius: f32) -> BuildResult<Self> {
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(BuildError::InvalidRadius(radius));
        }
        Ok(Self::new(center, radius))
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let point = ray.point_at_parameter(root);
        Some(Intersection {
            point,
            normal: (point - self.center) / self.radius,
            t: root,
        })
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
