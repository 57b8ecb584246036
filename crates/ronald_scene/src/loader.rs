//! Scene file loading.
//!
//! Turns a JSON scene description into a frozen `ronald_renderer::Scene`.
//! Every problem (unreadable file, malformed JSON, unknown material
//! reference, invalid parameter) is reported before any rendering starts.

use std::fs;
use std::path::Path;

use ronald_renderer::{BuildError, MaterialLibrary, Object, Scene, SplitStrategy};
use thiserror::Error;

use crate::description::SceneDescription;

/// Errors that can occur during scene loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Build(#[from] BuildError),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load a scene file for an image with the given width / height ratio.
///
/// # Example
///
/// ```ignore
/// use ronald_scene::load_scene;
///
/// let scene = load_scene("scenes/spheres.json", 16.0 / 9.0, SplitStrategy::default())?;
/// println!("Loaded {} objects", scene.len());
/// ```
pub fn load_scene<P: AsRef<Path>>(
    path: P,
    aspect_ratio: f32,
    split: SplitStrategy,
) -> LoadResult<Scene> {
    let path = path.as_ref();
    log::info!("Loading scene {}", path.display());

    let json = fs::read_to_string(path)?;
    load_scene_from_str(&json, aspect_ratio, split)
}

/// Parse and build a scene from JSON text.
pub fn load_scene_from_str(
    json: &str,
    aspect_ratio: f32,
    split: SplitStrategy,
) -> LoadResult<Scene> {
    let description: SceneDescription = serde_json::from_str(json)?;
    Ok(build_scene(&description, aspect_ratio, split)?)
}

/// Resolve material references and build the scene.
pub fn build_scene(
    description: &SceneDescription,
    aspect_ratio: f32,
    split: SplitStrategy,
) -> Result<Scene, BuildError> {
    let mut materials = MaterialLibrary::new();
    for (name, material) in &description.materials {
        materials.insert_boxed(name.as_str(), material.to_material()?)?;
    }

    let mut objects = Vec::new();
    for (index, object) in description.objects.iter().enumerate() {
        let material = materials.id(&object.material)?;
        let label = object.name.clone().unwrap_or_else(|| format!("#{index}"));

        if object.primitives.is_empty() {
            log::warn!("Object {} has no primitives", label);
        } else {
            log::debug!(
                "Object {}: {} primitives, material \"{}\"",
                label,
                object.primitives.len(),
                object.material
            );
        }

        for primitive in &object.primitives {
            objects.push(Object::new(primitive.to_primitive()?, material));
        }
    }

    Scene::new(materials, objects, description.camera.to_camera(aspect_ratio), split)
}
