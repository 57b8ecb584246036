//! Material trait for surface scattering.

use std::collections::HashMap;

use crate::error::{BuildError, BuildResult};
use crate::hittable::Intersection;
use crate::object::MaterialId;
use crate::sampling::{gen_f32, random_on_unit_sphere};
use rand::RngCore;
use ronald_math::{Ray, Vec3};

/// Color type alias (linear RGB radiance or reflectance)
pub type Color = Vec3;

/// Outcome of a ray scattering off a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scatter {
    /// Next ray of the light path
    pub specular: Ray,
    /// Fraction of energy kept per channel; [0.9, 0.9, 0.9] loses 10% per bounce
    pub attenuation: Color,
}

/// Trait for materials that describe how light interacts with surfaces.
///
/// `scatter` and `emitted` are the whole contract the integrator relies on.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// `None` means the path ends at this vertex (light sources, rays
    /// reflected into the surface).
    fn scatter(&self, ray_in: &Ray, isect: &Intersection, rng: &mut dyn RngCore) -> Option<Scatter>;

    /// Light emitted towards the incoming ray. Most materials emit nothing.
    fn emitted(&self, _ray_in: &Ray, _isect: &Intersection) -> Color {
        Color::ZERO
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        isect: &Intersection,
        rng: &mut dyn RngCore,
    ) -> Option<Scatter> {
        let mut scatter_direction = isect.normal + random_on_unit_sphere(rng);

        // Catch degenerate scatter direction
        if scatter_direction.length_squared() < 1e-8 {
            scatter_direction = isect.normal;
        }

        Some(Scatter {
            specular: Ray::new(isect.point, scatter_direction),
            attenuation: self.albedo,
        })
    }
}

/// Perfect mirror.
#[derive(Debug, Clone)]
pub struct Reflector {
    attenuation: Color,
}

impl Reflector {
    pub fn new(attenuation: Color) -> Self {
        Self { attenuation }
    }
}

impl Material for Reflector {
    fn scatter(
        &self,
        ray_in: &Ray,
        isect: &Intersection,
        _rng: &mut dyn RngCore,
    ) -> Option<Scatter> {
        let reflected = reflect(ray_in.direction().normalize(), isect.normal);

        // Only scatter if the reflected ray leaves the surface
        if reflected.dot(isect.normal) > 0.0 {
            Some(Scatter {
                specular: Ray::new(isect.point, reflected),
                attenuation: self.attenuation,
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
    /// Tint applied to refracted rays; reflections stay white
    attenuation: Color,
}

impl Dielectric {
    /// Create a new clear Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> BuildResult<Self> {
        Self::tinted(ior, Color::ONE)
    }

    /// Dielectric whose refracted rays are attenuated by `attenuation`.
    pub fn tinted(ior: f32, attenuation: Color) -> BuildResult<Self> {
        if !(ior > 0.0) || !ior.is_finite() {
            return Err(BuildError::InvalidRefractiveIndex(ior));
        }
        Ok(Self { ior, attenuation })
    }

    /// Outward normal, index ratio and Schlick cosine for a unit direction
    /// meeting a surface whose normal is `normal`.
    ///
    /// Leaving the medium the cosine is scaled by the index, approximating
    /// the transmitted-side angle.
    fn orient(&self, unit_direction: Vec3, normal: Vec3) -> (Vec3, f32, f32) {
        let d = unit_direction.dot(normal);
        if d > 0.0 {
            (-normal, self.ior, self.ior * d)
        } else {
            (normal, 1.0 / self.ior, -d)
        }
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        isect: &Intersection,
        rng: &mut dyn RngCore,
    ) -> Option<Scatter> {
        let unit_direction = ray_in.direction().normalize();

        let (outward_normal, ni_over_nt, cosine) = self.orient(unit_direction, isect.normal);

        if let Some(refracted) = refract(unit_direction, outward_normal, ni_over_nt) {
            if gen_f32(rng) >= schlick(cosine, ni_over_nt) {
                return Some(Scatter {
                    specular: Ray::new(isect.point, refracted),
                    attenuation: self.attenuation,
                });
            }
        }

        Some(Scatter {
            specular: Ray::new(isect.point, reflect(unit_direction, isect.normal)),
            attenuation: Color::ONE,
        })
    }
}

/// One-sided area light.
#[derive(Debug, Clone)]
pub struct Light {
    emittance: Color,
}

impl Light {
    /// Create a new light with the given emitted radiance.
    pub fn new(emittance: Color) -> Self {
        Self { emittance }
    }
}

impl Material for Light {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _isect: &Intersection,
        _rng: &mut dyn RngCore,
    ) -> Option<Scatter> {
        None
    }

    /// Emits only towards rays that strike the front face.
    fn emitted(&self, ray_in: &Ray, isect: &Intersection) -> Color {
        if isect.normal.dot(ray_in.direction()) < 0.0 {
            self.emittance
        } else {
            Color::ZERO
        }
    }
}

/// Named materials, declared once and shared by index.
#[derive(Default)]
pub struct MaterialLibrary {
    materials: Vec<Box<dyn Material>>,
    names: HashMap<String, MaterialId>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material under `name`.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        material: impl Material + 'static,
    ) -> BuildResult<MaterialId> {
        self.insert_boxed(name, Box::new(material))
    }

    pub fn insert_boxed(
        &mut self,
        name: impl Into<String>,
        material: Box<dyn Material>,
    ) -> BuildResult<MaterialId> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(BuildError::DuplicateMaterial(name));
        }

        let id = MaterialId(self.materials.len());
        self.materials.push(material);
        self.names.insert(name, id);
        Ok(id)
    }

    /// Resolve a material name to its id.
    pub fn id(&self, name: &str) -> BuildResult<MaterialId> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| BuildError::UndefinedMaterial(name.to_string()))
    }

    /// Look up a material by id. Ids only come from this library.
    #[inline]
    pub fn get(&self, id: MaterialId) -> &dyn Material {
        self.materials[id.0].as_ref()
    }

    pub fn contains(&self, id: MaterialId) -> bool {
        id.0 < self.materials.len()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract `v` through a surface with normal `n` (facing the incoming side).
///
/// Returns `None` on total internal reflection.
#[inline]
pub fn refract(v: Vec3, n: Vec3, ni_over_nt: f32) -> Option<Vec3> {
    let uv = v.normalize();
    let dt = uv.dot(n);
    let discriminant = 1.0 - ni_over_nt * ni_over_nt * (1.0 - dt * dt);

    if discriminant > 0.0 {
        Some(ni_over_nt * (uv - n * dt) - n * discriminant.sqrt())
    } else {
        None
    }
}

/// Schlick's approximation for reflectance
#[inline]
pub fn schlick(cosine: f32, ref_idx: f32) -> f32 {
    let r0 = ((1.0 - ref_idx) / (1.0 + ref_idx)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
