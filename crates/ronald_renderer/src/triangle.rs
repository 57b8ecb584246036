//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::hittable::{Hittable, Intersection};
use ronald_math::{Aabb, Interval, Ray, Vec3};

/// Determinant and `t` threshold below which a hit is rejected.
const EPSILON: f32 = 1e-7;

/// A triangle primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    v0: Vec3,
    edge1: Vec3,
    edge2: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    ///
    /// The face normal follows the right-hand rule: `(v1 - v0) x (v2 - v0)`.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let normal = edge1.cross(edge2).normalize_or_zero();

        // from_points pads axes the triangle is flat along
        let min = v0.min(v1).min(v2);
        let max = v0.max(v1).max(v2);
        let bbox = Aabb::from_points(min, max);

        Self {
            v0,
            edge1,
            edge2,
            normal,
            bbox,
        }
    }

    /// The same triangle with its normal pointing the other way.
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v0 + self.edge1, self.v0 + self.edge2]
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn centroid(&self) -> Vec3 {
        self.v0 + (self.edge1 + self.edge2) / 3.0
    }
}

impl Hittable for Triangle {
    /// Möller-Trumbore ray-triangle intersection algorithm.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection> {
        let h = ray.direction().cross(self.edge2);
        let a = self.edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);

        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(self.edge1);
        let v = f * ray.direction().dot(q);

        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * self.edge2.dot(q);

        if t <= EPSILON || !ray_t.surrounds(t) {
            return None;
        }

        Some(Intersection {
            point: ray.point_at_parameter(t),
            normal: self.normal,
            t,
        })
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
