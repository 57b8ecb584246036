//! Loads the bundled scene files and renders them at a tiny size.

use std::path::PathBuf;

use ronald_renderer::{RenderConfig, SplitStrategy, ToneMapOperator};
use ronald_scene::{load_scene, SceneDescription};

fn scene_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../scenes")
        .join(name)
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_bundled_scenes_load() {
    init_logging();

    let spheres =
        load_scene(scene_path("spheres.json"), 16.0 / 9.0, SplitStrategy::default()).unwrap();
    assert_eq!(spheres.len(), 7);

    let cornell = load_scene(scene_path("cornell.json"), 1.0, SplitStrategy::LongestAxis).unwrap();
    assert_eq!(cornell.len(), 14);
}

#[test]
fn test_description_round_trips_through_serde() {
    let json = std::fs::read_to_string(scene_path("cornell.json")).unwrap();
    let description: SceneDescription = serde_json::from_str(&json).unwrap();

    let reparsed: SceneDescription =
        serde_json::from_str(&serde_json::to_string(&description).unwrap()).unwrap();
    assert_eq!(description, reparsed);
    assert_eq!(description.materials.len(), 5);
}

#[test]
fn test_cornell_box_walls() {
    init_logging();

    let config = RenderConfig::new(24, 24, 32, 0).unwrap();
    let scene = load_scene(
        scene_path("cornell.json"),
        config.aspect_ratio(),
        SplitStrategy::default(),
    )
    .unwrap();
    let mut image = scene.render_multi_threaded(&config).unwrap();

    let column_sums = |image: &ronald_renderer::ImageBuffer, columns: std::ops::Range<usize>| {
        let mut sum = ronald_renderer::Color::ZERO;
        for y in 0..image.height {
            for x in columns.clone() {
                sum += image.get(x, y);
            }
        }
        sum
    };

    // Light bounces off the red wall on the left and the green one on the right
    let left = column_sums(&image, 0..3);
    let right = column_sums(&image, 21..24);
    assert!(left.x > left.y, "left columns {left}");
    assert!(right.y > right.x, "right columns {right}");

    image.apply_tone_map(ToneMapOperator::ReinhardJodie);
    assert!(image.pixels.iter().all(|p| p.is_finite() && p.min_element() >= 0.0));
    assert!(image.to_rgb8().pixels().any(|p| p.0 != [0, 0, 0]));
}
