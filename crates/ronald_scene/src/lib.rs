//! Ronald scene files
//!
//! JSON scene descriptions (camera, named materials, objects made of
//! spheres and triangles) and the loader that turns them into a renderable
//! `ronald_renderer::Scene`.

pub mod description;
pub mod loader;

pub use description::{
    CameraDescription, MaterialDescription, ObjectDescription, PrimitiveDescription,
    SceneDescription,
};
pub use loader::{build_scene, load_scene, load_scene_from_str, LoadError, LoadResult};
