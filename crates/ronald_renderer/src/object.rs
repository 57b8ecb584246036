//! Scene objects: a primitive paired with a material reference.
//!
//! Materials live in a `MaterialLibrary` arena and objects refer to them by
//! `MaterialId`. The scene is frozen before rendering starts, so plain
//! indices are enough and leaves of the BVH can carry objects by value.

use crate::hittable::{Hittable, Intersection};
use crate::sphere::Sphere;
use crate::triangle::Triangle;
use ronald_math::{Aabb, Interval, Ray};

/// Index of a material inside a `MaterialLibrary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MaterialId(pub usize);

/// The closed set of geometric primitives.
///
/// Enum dispatch keeps the BVH leaves `Copy` and free of vtable hops in
/// the traversal loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Sphere(Sphere),
    Triangle(Triangle),
}

impl Hittable for Primitive {
    #[inline]
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection> {
        match self {
            Primitive::Sphere(sphere) => sphere.hit(ray, ray_t),
            Primitive::Triangle(triangle) => triangle.hit(ray, ray_t),
        }
    }

    #[inline]
    fn bounding_box(&self) -> Aabb {
        match self {
            Primitive::Sphere(sphere) => sphere.bounding_box(),
            Primitive::Triangle(triangle) => triangle.bounding_box(),
        }
    }
}

impl From<Sphere> for Primitive {
    fn from(sphere: Sphere) -> Self {
        Primitive::Sphere(sphere)
    }
}

impl From<Triangle> for Primitive {
    fn from(triangle: Triangle) -> Self {
        Primitive::Triangle(triangle)
    }
}

/// One primitive with the material it is shaded with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Object {
    pub primitive: Primitive,
    pub material: MaterialId,
}

impl Object {
    pub fn new(primitive: impl Into<Primitive>, material: MaterialId) -> Self {
        Self {
            primitive: primitive.into(),
            material,
        }
    }

    #[inline]
    pub fn bounding_box(&self) -> Aabb {
        self.primitive.bounding_box()
    }

    /// Intersect the primitive and tag the result with this object's material.
    #[inline]
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        self.primitive.hit(ray, ray_t).map(|intersection| Hit {
            intersection,
            material: self.material,
        })
    }
}

/// An intersection together with the material of the object that was hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub intersection: Intersection,
    pub material: MaterialId,
}

impl Hit {
    #[inline]
    pub fn t(&self) -> f32 {
        self.intersection.t
    }
}

/// Closest hit over a plain object list, testing every object.
///
/// This is the reference the BVH is checked against.
pub fn intersect_linear(objects: &[Object], ray: &Ray, ray_t: Interval) -> Option<Hit> {
    let mut closest: Option<Hit> = None;
    let mut closest_so_far = ray_t.max;

    for object in objects {
        if let Some(hit) = object.intersect(ray, ray_t.with_max(closest_so_far)) {
            closest_so_far = hit.t();
            closest = Some(hit);
        }
    }

    closest
}
