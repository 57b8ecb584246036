//! The frozen scene handed to the renderer.

use std::fmt;

use crate::bvh::{Bvh, FlatBvh, SplitStrategy};
use crate::camera::Camera;
use crate::error::{BuildError, BuildResult};
use crate::material::{Material, MaterialLibrary};
use crate::object::{Hit, Object};
use ronald_math::{Aabb, Interval, Ray};

/// Materials, objects, their BVH and the camera.
///
/// Nothing in a `Scene` changes once `new` returns, so render workers share
/// it by reference.
pub struct Scene {
    materials: MaterialLibrary,
    bvh: FlatBvh,
    camera: Camera,
    object_count: usize,
}

impl Scene {
    /// Validate the parts, initialize the camera and build the BVH.
    pub fn new(
        materials: MaterialLibrary,
        objects: Vec<Object>,
        mut camera: Camera,
        split: SplitStrategy,
    ) -> BuildResult<Self> {
        if let Some(object) = objects.iter().find(|object| !materials.contains(object.material)) {
            return Err(BuildError::UnknownMaterialId(object.material.0));
        }

        camera.initialize()?;

        let object_count = objects.len();
        let bvh = Bvh::build(objects, split)?.flatten();

        log::info!(
            "Scene ready: {} materials, {} objects, {} BVH nodes",
            materials.len(),
            object_count,
            bvh.len()
        );

        Ok(Self {
            materials,
            bvh,
            camera,
            object_count,
        })
    }

    /// Closest hit strictly inside `ray_t`.
    #[inline]
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        self.bvh.intersect(ray, ray_t)
    }

    #[inline]
    pub fn material(&self, hit: &Hit) -> &dyn Material {
        self.materials.get(hit.material)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bvh.bounding_box()
    }

    /// Number of objects in the scene.
    pub fn len(&self) -> usize {
        self.object_count
    }

    pub fn is_empty(&self) -> bool {
        self.object_count == 0
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("materials", &self.materials.len())
            .field("objects", &self.object_count)
            .field("bvh_nodes", &self.bvh.len())
            .field("camera", &self.camera)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Color, Lambertian, Light};
    use crate::object::MaterialId;
    use crate::sphere::Sphere;
    use ronald_math::Vec3;

    fn camera() -> Camera {
        Camera::new()
            .with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
            .with_lens(40.0, 0.0, 5.0)
    }

    #[test]
    fn test_scene_new() {
        let mut materials = MaterialLibrary::new();
        let grey = materials.insert("grey", Lambertian::new(Color::splat(0.5))).unwrap();
        let lamp = materials.insert("lamp", Light::new(Color::ONE)).unwrap();

        let objects = vec![
            Object::new(Sphere::new(Vec3::ZERO, 1.0), grey),
            Object::new(Sphere::new(Vec3::new(0.0, 5.0, 0.0), 1.0), lamp),
        ];
        let scene = Scene::new(materials, objects, camera(), SplitStrategy::default()).unwrap();
        assert_eq!(scene.len(), 2);

        let debug = format!("{scene:?}");
        assert!(debug.contains("objects: 2") && debug.contains("bvh_nodes: 3"), "{debug}");

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = scene.intersect(&ray, Interval::from_min(5e-4)).expect("sphere is in front");
        assert_eq!(hit.material, grey);
        assert!((hit.t() - 4.0).abs() < 1e-5);

        // Grey is diffuse and does not emit
        assert_eq!(scene.material(&hit).emitted(&ray, &hit.intersection), Color::ZERO);
    }

    #[test]
    fn test_scene_rejects_bad_parts() {
        let objects = vec![Object::new(Sphere::new(Vec3::ZERO, 1.0), MaterialId(0))];

        let empty = Scene::new(MaterialLibrary::new(), vec![], camera(), SplitStrategy::default());
        assert_eq!(empty.err(), Some(BuildError::EmptyScene));

        let unknown = Scene::new(
            MaterialLibrary::new(),
            objects.clone(),
            camera(),
            SplitStrategy::default(),
        );
        assert_eq!(unknown.err(), Some(BuildError::UnknownMaterialId(0)));

        let mut materials = MaterialLibrary::new();
        materials.insert("grey", Lambertian::new(Color::splat(0.5))).unwrap();
        let unfocused = camera().with_lens(40.0, 0.0, 0.0);
        let result = Scene::new(materials, objects, unfocused, SplitStrategy::default());
        assert_eq!(result.err(), Some(BuildError::ZeroFocusDistance));
    }
}
