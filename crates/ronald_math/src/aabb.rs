use crate::{Interval, Ray, Vec3};

/// Smallest extent an axis may have before it gets padded.
const MIN_EXTENT: f32 = 0.0001;

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// Boxes are always derived from geometry (a primitive or the union of two
/// child boxes), never authored by hand. Every axis keeps `min <= max`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create an AABB from its two corners without any padding.
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from two arbitrary corner points.
    ///
    /// Axes thinner than `MIN_EXTENT` are padded so that planar primitives
    /// (an axis-aligned triangle, say) never produce a zero-volume box.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let mut aabb = Self {
            min: a.min(b),
            max: a.max(b),
        };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            min: box0.min.min(box1.min),
            max: box0.max.max(box1.max),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, axis: usize) -> Interval {
        Interval::new(self.min[axis], self.max[axis])
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Slab method. `inv_dir` must be `ray.inv_direction()`; callers compute
    /// it once per traversal instead of once per node.
    #[inline]
    pub fn hit(&self, ray: &Ray, inv_dir: Vec3, mut ray_t: Interval) -> bool {
        let origin = ray.origin();

        for axis in 0..3 {
            let t0 = (self.min[axis] - origin[axis]) * inv_dir[axis];
            let t1 = (self.max[axis] - origin[axis]) * inv_dir[axis];

            ray_t.min = t0.min(t1).max(ray_t.min);
            ray_t.max = t0.max(t1).min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }

        true
    }

    /// Pad intervals to avoid zero-width AABBs (degenerate cases).
    fn pad_to_minimums(&mut self) {
        for axis in 0..3 {
            if self.max[axis] - self.min[axis] < MIN_EXTENT {
                let padded = self.axis_interval(axis).expand(MIN_EXTENT);
                self.min[axis] = padded.min;
                self.max[axis] = padded.max;
            }
        }
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the largest extent.
    pub fn largest_extent(&self) -> usize {
        let size = self.max - self.min;

        if size.x > size.y && size.x > size.z {
            0
        } else if size.y > size.z {
            1
        } else {
            2
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Total area of the six faces. Used by the SAH split cost.
    pub fn surface_area(&self) -> f32 {
        let d = self.max - self.min;
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }

    /// Box that contains nothing; the identity for `surrounding`.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };
}
