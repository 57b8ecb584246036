//! Hittable trait and Intersection record for ray-primitive queries.

use ronald_math::{Aabb, Interval, Ray, Vec3};

/// Record of a ray-primitive intersection.
///
/// Produced fresh by every query and never shared. The normal is unit
/// length and keeps the orientation the primitive defines (outward for
/// spheres, the winding/sign-chosen face normal for triangles); it is *not*
/// flipped to face the ray. Materials that care about sidedness look at
/// `normal.dot(direction)` themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Point of intersection
    pub point: Vec3,
    /// Surface normal at intersection
    pub normal: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f32,
}

/// Trait for geometry that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object strictly inside `ray_t`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection>;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;
}
