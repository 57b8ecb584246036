//! Serde types mirroring the JSON scene format.
//!
//! ```json
//! {
//!   "camera": { "look_from": [0, 1, 10], "look_at": [0, 0, 0], "vup": [0, 1, 0],
//!               "vfov": 20, "aperture": 0, "focus_dist": 10 },
//!   "materials": { "grey": { "type": "lambertian", "albedo": [0.5, 0.5, 0.5] } },
//!   "objects": [ { "material": "grey",
//!                  "primitives": [ { "type": "sphere", "origin": [0, 0, 0], "radius": 1 } ] } ]
//! }
//! ```

use std::collections::BTreeMap;

use ronald_renderer::{
    BuildResult, Camera, Color, Dielectric, Lambertian, Light, Material, Primitive, Reflector,
    Sphere, Triangle, Vec3,
};
use serde::{Deserialize, Serialize};

/// A whole scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub camera: CameraDescription,
    /// Materials by name. Sorted so material ids are stable across loads.
    pub materials: BTreeMap<String, MaterialDescription>,
    pub objects: Vec<ObjectDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraDescription {
    pub look_from: [f32; 3],
    pub look_at: [f32; 3],
    #[serde(default = "default_vup")]
    pub vup: [f32; 3],
    /// Vertical field of view in degrees
    pub vfov: f32,
    #[serde(default)]
    pub aperture: f32,
    /// Defaults to the distance between `look_from` and `look_at`
    #[serde(default)]
    pub focus_dist: Option<f32>,
}

impl CameraDescription {
    /// Camera for an image with the given width / height ratio. The camera
    /// is initialized when the scene is built.
    pub fn to_camera(&self, aspect_ratio: f32) -> Camera {
        let look_from = Vec3::from(self.look_from);
        let look_at = Vec3::from(self.look_at);
        let focus_dist = self
            .focus_dist
            .unwrap_or_else(|| look_from.distance(look_at));

        Camera::new()
            .with_aspect_ratio(aspect_ratio)
            .with_position(look_from, look_at, Vec3::from(self.vup))
            .with_lens(self.vfov, self.aperture, focus_dist)
    }
}

fn default_vup() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

fn white() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn front_facing() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MaterialDescription {
    Lambertian {
        albedo: [f32; 3],
    },
    Light {
        emittance: [f32; 3],
    },
    Reflector {
        attenuation: [f32; 3],
    },
    Dielectric {
        refractive_index: f32,
        /// Tint of refracted light
        #[serde(default = "white")]
        attenuation: [f32; 3],
    },
}

impl MaterialDescription {
    pub fn to_material(&self) -> BuildResult<Box<dyn Material>> {
        let material: Box<dyn Material> = match self {
            MaterialDescription::Lambertian { albedo } => {
                Box::new(Lambertian::new(Color::from(*albedo)))
            }
            MaterialDescription::Light { emittance } => {
                Box::new(Light::new(Color::from(*emittance)))
            }
            MaterialDescription::Reflector { attenuation } => {
                Box::new(Reflector::new(Color::from(*attenuation)))
            }
            MaterialDescription::Dielectric {
                refractive_index,
                attenuation,
            } => Box::new(Dielectric::tinted(*refractive_index, Color::from(*attenuation))?),
        };
        Ok(material)
    }
}

/// A group of primitives sharing one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescription {
    /// Only used in log messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub material: String,
    pub primitives: Vec<PrimitiveDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PrimitiveDescription {
    Sphere {
        origin: [f32; 3],
        radius: f32,
    },
    Triangle {
        vertices: [[f32; 3]; 3],
        /// Sign applied to the right-handed face normal
        #[serde(default = "front_facing")]
        normal: f32,
    },
}

impl PrimitiveDescription {
    pub fn to_primitive(&self) -> BuildResult<Primitive> {
        match self {
            PrimitiveDescription::Sphere { origin, radius } => {
                Ok(Sphere::try_new(Vec3::from(*origin), *radius)?.into())
            }
            PrimitiveDescription::Triangle { vertices, normal } => {
                let [v0, v1, v2] = vertices.map(Vec3::from);
                let triangle = Triangle::new(v0, v1, v2);
                if *normal < 0.0 {
                    Ok(triangle.flipped().into())
                } else {
                    Ok(triangle.into())
                }
            }
        }
    }
}
