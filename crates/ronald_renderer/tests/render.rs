//! Whole-pipeline checks: integrator statistics and both schedulers.

use rand::rngs::StdRng;
use rand::SeedableRng;
use ronald_renderer::{
    Camera, Color, Lambertian, Light, MaterialLibrary, Object, PathTracer, Ray, RenderConfig, Scene,
    Sphere, SplitStrategy, Triangle, Vec3,
};

fn camera() -> Camera {
    Camera::new()
        .with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
        .with_lens(40.0, 0.0, 5.0)
}

/// Grey floor under a huge downward-facing light at y = 1.
fn floor_under_light() -> Scene {
    let mut materials = MaterialLibrary::new();
    let floor = materials.insert("floor", Lambertian::new(Color::splat(0.5))).unwrap();
    let lamp = materials.insert("lamp", Light::new(Color::ONE)).unwrap();

    let objects = vec![
        Object::new(Sphere::new(Vec3::new(0.0, -100.0, 0.0), 100.0), floor),
        Object::new(
            Triangle::new(
                Vec3::new(-50.0, 1.0, -50.0),
                Vec3::new(50.0, 1.0, -50.0),
                Vec3::new(-50.0, 1.0, 50.0),
            ),
            lamp,
        ),
        Object::new(
            Triangle::new(
                Vec3::new(50.0, 1.0, -50.0),
                Vec3::new(50.0, 1.0, 50.0),
                Vec3::new(-50.0, 1.0, 50.0),
            ),
            lamp,
        ),
    ];
    Scene::new(materials, objects, camera(), SplitStrategy::default()).unwrap()
}

/// Diffuse sphere lit by a triangle light above it, nothing else.
fn sphere_under_triangle_light() -> Scene {
    let mut materials = MaterialLibrary::new();
    let white = materials.insert("white", Lambertian::new(Color::splat(0.8))).unwrap();
    let lamp = materials.insert("lamp", Light::new(Color::splat(4.0))).unwrap();

    let objects = vec![
        Object::new(Sphere::new(Vec3::ZERO, 1.0), white),
        // Winding gives a -y normal, facing the sphere
        Object::new(
            Triangle::new(
                Vec3::new(-2.0, 3.0, -2.0),
                Vec3::new(2.0, 3.0, -2.0),
                Vec3::new(0.0, 3.0, 2.0),
            ),
            lamp,
        ),
    ];
    Scene::new(materials, objects, camera(), SplitStrategy::default()).unwrap()
}

fn mean_radiance(scene: &Scene, config: &RenderConfig, samples: usize) -> f32 {
    let tracer = PathTracer::new(scene, config);
    let mut rng = StdRng::seed_from_u64(42);
    let ray = Ray::new(Vec3::new(0.0, 0.5, 0.0), Vec3::new(0.0, -1.0, 0.0));

    let total: f32 = (0..samples).map(|_| tracer.trace_ray(ray, &mut rng).x).sum();
    total / samples as f32
}

#[test]
fn test_russian_roulette_is_unbiased() {
    let scene = floor_under_light();
    let config = RenderConfig::new(1, 1, 1, 1).unwrap();
    let samples = 20_000;

    // One bounce off the 0.5 floor into a light of radiance 1
    let without = mean_radiance(&scene, &config.clone().without_russian_roulette(), samples);
    let with = mean_radiance(&scene, &config, samples);

    assert!((without - 0.5).abs() < 0.01, "without roulette: {without}");
    assert!((with - 0.5).abs() < 0.02, "with roulette: {with}");
    assert!((with - without).abs() < 0.03);
}

#[test]
fn test_single_and_multi_threaded_match() {
    let scene = sphere_under_triangle_light();
    let single = RenderConfig::new(24, 17, 4, 1).unwrap().with_seed(1234);
    let multi = RenderConfig::new(24, 17, 4, 0).unwrap().with_seed(1234);

    let expected = scene.render_single_threaded(&single);
    let mut rows_done = 0;
    let image = scene
        .render_multi_threaded_with_progress(&multi, |_| rows_done += 1)
        .unwrap();

    assert_eq!(rows_done, 17);
    assert_eq!(image.width, expected.width);
    assert_eq!(image.height, expected.height);

    // Per-row generators make the result independent of scheduling
    for y in 0..image.height {
        assert_eq!(image.row(y), expected.row(y), "row {y} differs");
    }
}

#[test]
fn test_end_to_end_sphere_under_light() {
    let scene = sphere_under_triangle_light();
    let config = RenderConfig::new(32, 32, 16, 0).unwrap();
    let image = scene.render_multi_threaded(&config).unwrap();

    assert!(image.pixels.iter().any(|p| p.max_element() > 0.0), "image is black");
    assert!(image.pixels.iter().all(|p| p.is_finite() && p.min_element() >= 0.0));

    // Nothing but empty space behind the corners
    for (x, y) in [(0, 0), (31, 0), (0, 31), (31, 31)] {
        assert_eq!(image.get(x, y), Color::ZERO, "corner ({x}, {y})");
    }

    // The light is above, so the top of the sphere is brighter
    let brightness = |rows: std::ops::Range<usize>| -> f32 {
        rows.map(|y| image.row(y).iter().map(|p| p.x + p.y + p.z).sum::<f32>())
            .sum()
    };
    let top = brightness(0..16);
    let bottom = brightness(16..32);
    assert!(top > bottom, "top {top} vs bottom {bottom}");
}

#[test]
fn test_render_split_strategies_agree() {
    let config = RenderConfig::new(12, 12, 2, 1).unwrap();
    let mut images = Vec::new();

    let strategies = [
        SplitStrategy::Random,
        SplitStrategy::LongestAxis,
        SplitStrategy::SurfaceAreaHeuristic,
    ];
    for split in strategies {
        let mut materials = MaterialLibrary::new();
        let white = materials.insert("white", Lambertian::new(Color::splat(0.8))).unwrap();
        let lamp = materials.insert("lamp", Light::new(Color::splat(4.0))).unwrap();

        let mut objects = vec![Object::new(
            Triangle::new(
                Vec3::new(-2.0, 3.0, -2.0),
                Vec3::new(2.0, 3.0, -2.0),
                Vec3::new(0.0, 3.0, 2.0),
            ),
            lamp,
        )];
        for i in 0..5 {
            let x = i as f32 - 2.0;
            objects.push(Object::new(Sphere::new(Vec3::new(x, 0.0, 0.0), 0.4), white));
        }

        let scene = Scene::new(materials, objects, camera(), split).unwrap();
        images.push(scene.render_single_threaded(&config));
    }

    // Same closest hits regardless of tree shape
    assert_eq!(images[0], images[1]);
    assert_eq!(images[1], images[2]);
}
