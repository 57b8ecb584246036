//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree with exactly one object per leaf, so `k` objects always
//! produce `2k - 1` nodes. The tree is built once and never mutated. For
//! rendering it is flattened into a pre-order array that is walked with a
//! fixed-size stack.

use std::fmt;
use std::time::Instant;

use crate::error::{BuildError, BuildResult};
use crate::object::{Hit, Object};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use ronald_math::{Aabb, Interval, Ray, Vec3};

/// Seed used by `Bvh::build` so that random splits are reproducible.
pub const DEFAULT_BUILD_SEED: u64 = 0x5eed_b0b5;

/// Capacity of the flat traversal stack.
const STACK_CAPACITY: usize = 64;

/// Below this depth SAH gives way to median splits. Median splits add at
/// most `log2(n)` further levels, which keeps the tree inside the
/// traversal stack.
const SAH_MAX_DEPTH: usize = 32;

/// How the split axis (and for SAH, the split position) is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitStrategy {
    /// Uniformly random axis, median split.
    Random,
    /// Axis of largest extent, median split.
    LongestAxis,
    /// Surface Area Heuristic sweep over all three axes.
    #[default]
    SurfaceAreaHeuristic,
}

impl fmt::Display for SplitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SplitStrategy::Random => "random",
            SplitStrategy::LongestAxis => "longest-axis",
            SplitStrategy::SurfaceAreaHeuristic => "sah",
        };
        f.write_str(name)
    }
}

/// BVH node - either a branch with two children or a leaf with one object.
#[derive(Debug, Clone)]
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node holding a single object.
    Leaf { object: Object, bbox: Aabb },
}

impl BvhNode {
    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Branch { bbox, .. } | BvhNode::Leaf { bbox, .. } => *bbox,
        }
    }

    fn hit(&self, ray: &Ray, inv_dir: Vec3, ray_t: Interval) -> Option<Hit> {
        match self {
            BvhNode::Leaf { object, bbox } => {
                if !bbox.hit(ray, inv_dir, ray_t) {
                    return None;
                }
                object.intersect(ray, ray_t)
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, inv_dir, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, inv_dir, ray_t);

                // Only check right up to closest hit
                let right_max = hit_left.map_or(ray_t.max, |hit| hit.t());
                let hit_right = right.hit(ray, inv_dir, ray_t.with_max(right_max));

                hit_right.or(hit_left)
            }
        }
    }
}

/// Recursive BVH over a list of objects.
#[derive(Debug, Clone)]
pub struct Bvh {
    root: BvhNode,
    node_count: usize,
    depth: usize,
    strategy: SplitStrategy,
}

impl Bvh {
    /// Build a BVH. Random splits draw from a generator seeded with
    /// `DEFAULT_BUILD_SEED`.
    pub fn build(objects: Vec<Object>, strategy: SplitStrategy) -> BuildResult<Self> {
        let mut rng = StdRng::seed_from_u64(DEFAULT_BUILD_SEED);
        Self::build_with_rng(objects, strategy, &mut rng)
    }

    /// Build a BVH drawing random split axes from `rng`.
    pub fn build_with_rng(
        mut objects: Vec<Object>,
        strategy: SplitStrategy,
        rng: &mut dyn RngCore,
    ) -> BuildResult<Self> {
        if objects.is_empty() {
            return Err(BuildError::EmptyScene);
        }

        let start = Instant::now();
        let mut builder = Builder {
            strategy,
            rng,
            node_count: 0,
            depth: 0,
        };
        let root = builder.build_node(&mut objects, 0);

        log::info!(
            "Built BVH: {} objects, {} nodes, depth {}, {} split in {:.2?}",
            objects.len(),
            builder.node_count,
            builder.depth,
            strategy,
            start.elapsed()
        );

        Ok(Self {
            root,
            node_count: builder.node_count,
            depth: builder.depth,
            strategy,
        })
    }

    /// Closest hit strictly inside `ray_t`.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        self.root.hit(ray, ray.inv_direction(), ray_t)
    }

    pub fn root(&self) -> &BvhNode {
        &self.root
    }

    /// Total number of nodes, branches and leaves.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn strategy(&self) -> SplitStrategy {
        self.strategy
    }

    pub fn bounding_box(&self) -> Aabb {
        self.root.bounding_box()
    }

    /// Lay the tree out as a pre-order array.
    pub fn flatten(&self) -> FlatBvh {
        let mut nodes = Vec::with_capacity(self.node_count);
        flatten_node(&self.root, &mut nodes);
        FlatBvh { nodes }
    }
}

struct Builder<'a> {
    strategy: SplitStrategy,
    rng: &'a mut dyn RngCore,
    node_count: usize,
    depth: usize,
}

impl Builder<'_> {
    fn build_node(&mut self, objects: &mut [Object], depth: usize) -> BvhNode {
        self.node_count += 1;
        self.depth = self.depth.max(depth);

        if objects.len() == 1 {
            let object = objects[0];
            return BvhNode::Leaf {
                object,
                bbox: object.bounding_box(),
            };
        }

        let mid = self.partition(objects, depth);
        let (left_objects, right_objects) = objects.split_at_mut(mid);

        let left = self.build_node(left_objects, depth + 1);
        let right = self.build_node(right_objects, depth + 1);
        let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }

    /// Reorder `objects` and return the split position, always in `1..len`.
    fn partition(&mut self, objects: &mut [Object], depth: usize) -> usize {
        match self.strategy {
            SplitStrategy::Random => {
                let axis = self.rng.gen_range(0..3);
                median_split(objects, axis)
            }
            SplitStrategy::LongestAxis => {
                median_split(objects, bounds_of(objects).largest_extent())
            }
            SplitStrategy::SurfaceAreaHeuristic if depth >= SAH_MAX_DEPTH => {
                median_split(objects, bounds_of(objects).largest_extent())
            }
            SplitStrategy::SurfaceAreaHeuristic => sah_split(objects),
        }
    }
}

fn bounds_of(objects: &[Object]) -> Aabb {
    objects
        .iter()
        .fold(Aabb::EMPTY, |acc, object| Aabb::surrounding(&acc, &object.bounding_box()))
}

fn compare_on_axis(a: &Object, b: &Object, axis: usize) -> std::cmp::Ordering {
    a.bounding_box().min[axis].total_cmp(&b.bounding_box().min[axis])
}

/// Select the median by box minimum on `axis`; a selection, not a sort.
fn median_split(objects: &mut [Object], axis: usize) -> usize {
    let mid = objects.len() / 2;
    objects.select_nth_unstable_by(mid, |a, b| compare_on_axis(a, b, axis));
    mid
}

/// Sort along each axis and keep the split with the lowest SAH cost.
fn sah_split(objects: &mut [Object]) -> usize {
    let n = objects.len();
    let mut best_axis = 0;
    let mut best_index = n / 2;
    let mut best_cost = f32::INFINITY;
    let mut right_areas = vec![0.0; n];

    for axis in 0..3 {
        objects.sort_unstable_by(|a, b| compare_on_axis(a, b, axis));

        // right_areas[i] = area of the box around objects[i..]
        let mut right_box = Aabb::EMPTY;
        for i in (1..n).rev() {
            right_box = Aabb::surrounding(&right_box, &objects[i].bounding_box());
            right_areas[i] = right_box.surface_area();
        }

        let mut left_box = Aabb::EMPTY;
        for i in 1..n {
            left_box = Aabb::surrounding(&left_box, &objects[i - 1].bounding_box());
            let cost = i as f32 * left_box.surface_area() + (n - i) as f32 * right_areas[i];
            if cost < best_cost {
                best_cost = cost;
                best_axis = axis;
                best_index = i;
            }
        }
    }

    // The last sweep left the objects sorted on z
    if best_axis != 2 {
        objects.sort_unstable_by(|a, b| compare_on_axis(a, b, best_axis));
    }
    best_index
}

/// Node of the flattened tree.
#[derive(Debug, Clone, Copy, PartialEq)]
enum FlatNode {
    /// The first child directly follows its parent; the second is at
    /// `second_child`.
    Branch { bbox: Aabb, second_child: usize },
    Leaf { bbox: Aabb, object: Object },
}

fn flatten_node(node: &BvhNode, nodes: &mut Vec<FlatNode>) {
    match node {
        BvhNode::Leaf { object, bbox } => nodes.push(FlatNode::Leaf {
            bbox: *bbox,
            object: *object,
        }),
        BvhNode::Branch { left, right, bbox } => {
            let index = nodes.len();
            nodes.push(FlatNode::Branch {
                bbox: *bbox,
                second_child: 0,
            });
            flatten_node(left, nodes);

            let second = nodes.len();
            if let FlatNode::Branch { second_child, .. } = &mut nodes[index] {
                *second_child = second;
            }
            flatten_node(right, nodes);
        }
    }
}

/// BVH stored as a pre-order node array.
#[derive(Debug, Clone)]
pub struct FlatBvh {
    nodes: Vec<FlatNode>,
}

impl FlatBvh {
    /// Build the recursive tree and flatten it.
    pub fn build(objects: Vec<Object>, strategy: SplitStrategy) -> BuildResult<Self> {
        Ok(Bvh::build(objects, strategy)?.flatten())
    }

    /// Closest hit strictly inside `ray_t`.
    ///
    /// Same answers as `Bvh::intersect`, but iterative with one running
    /// `min_so_far` shared by every node visited.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        let inv_dir = ray.inv_direction();
        let mut stack = [0usize; STACK_CAPACITY];
        let mut top = 1;
        let mut closest = None;
        let mut min_so_far = ray_t.max;

        while top > 0 {
            top -= 1;
            let index = stack[top];
            let interval = ray_t.with_max(min_so_far);

            match &self.nodes[index] {
                FlatNode::Leaf { bbox, object } => {
                    if !bbox.hit(ray, inv_dir, interval) {
                        continue;
                    }
                    if let Some(hit) = object.intersect(ray, interval) {
                        min_so_far = hit.t();
                        closest = Some(hit);
                    }
                }
                FlatNode::Branch { bbox, second_child } => {
                    if !bbox.hit(ray, inv_dir, interval) {
                        continue;
                    }
                    // Push the second child first so the first is visited first
                    stack[top] = *second_child;
                    stack[top + 1] = index + 1;
                    top += 2;
                }
            }
        }

        closest
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn bounding_box(&self) -> Aabb {
        match self.nodes.first() {
            Some(FlatNode::Branch { bbox, .. }) | Some(FlatNode::Leaf { bbox, .. }) => *bbox,
            None => Aabb::EMPTY,
        }
    }
}

impl From<&Bvh> for FlatBvh {
    fn from(bvh: &Bvh) -> Self {
        bvh.flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable::Hittable;
    use crate::object::{intersect_linear, MaterialId};
    use crate::sampling::random_on_unit_sphere;
    use crate::sphere::Sphere;
    use crate::triangle::Triangle;

    const STRATEGIES: [SplitStrategy; 3] = [
        SplitStrategy::Random,
        SplitStrategy::LongestAxis,
        SplitStrategy::SurfaceAreaHeuristic,
    ];

    const RAY_T: Interval = Interval::new(0.0005, f32::INFINITY);

    /// Non-overlapping spheres: one per cell of a jittered grid.
    fn disjoint_spheres(rng: &mut StdRng, per_axis: usize) -> Vec<Object> {
        let mut objects = Vec::new();
        for i in 0..per_axis {
            for j in 0..per_axis {
                for k in 0..per_axis {
                    let cell = Vec3::new(i as f32, j as f32, k as f32) * 4.0;
                    let jitter = Vec3::new(rng.gen(), rng.gen(), rng.gen());
                    let radius = 0.2 + rng.gen::<f32>() * 1.2;
                    let slack = (3.6 - 2.0 * radius).max(0.0);
                    let center = cell + Vec3::splat(2.0) + (jitter - 0.5) * slack;
                    let id = MaterialId(objects.len());
                    objects.push(Object::new(Sphere::new(center, radius), id));
                }
            }
        }
        objects
    }

    fn random_ray(rng: &mut StdRng, extent: f32) -> Ray {
        let unit = Vec3::new(rng.gen(), rng.gen(), rng.gen());
        let origin = unit * extent * 1.5 - Vec3::splat(extent * 0.25);
        Ray::new(origin, random_on_unit_sphere(rng))
    }

    #[test]
    fn test_bvh_empty() {
        for strategy in STRATEGIES {
            assert_eq!(Bvh::build(vec![], strategy).unwrap_err(), BuildError::EmptyScene);
            assert!(FlatBvh::build(vec![], strategy).is_err());
        }
    }

    #[test]
    fn test_bvh_single_sphere() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5);
        let objects = vec![Object::new(sphere, MaterialId(3))];
        let bvh = Bvh::build(objects, SplitStrategy::default()).unwrap();

        // Should create a leaf
        assert!(matches!(bvh.root(), BvhNode::Leaf { .. }));
        assert_eq!(bvh.node_count(), 1);
        assert_eq!(bvh.bounding_box(), sphere.bounding_box());

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let hit = bvh.intersect(&ray, RAY_T).expect("ray at the sphere must hit");
        assert_eq!(hit.material, MaterialId(3));
        assert!((hit.t() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let spheres: Vec<Object> = (0..10)
            .map(|i| Object::new(Sphere::new(Vec3::new(i as f32, 0.0, -5.0), 0.5), MaterialId(i)))
            .collect();

        for strategy in STRATEGIES {
            let bvh = Bvh::build(spheres.clone(), strategy).unwrap();

            // Test ray that hits sphere at x=5
            let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
            let hit = bvh.intersect(&ray, RAY_T).expect("ray at x=5 must hit");

            // Hit point should be near z = -4.5 (sphere at z=-5, radius 0.5)
            assert!((hit.intersection.point.z - (-4.5)).abs() < 0.01);
            assert_eq!(hit.material, MaterialId(5));
        }
    }

    #[test]
    fn test_bvh_node_count() {
        let mut rng = StdRng::seed_from_u64(42);
        for strategy in STRATEGIES {
            for k in 1..40 {
                let objects: Vec<Object> = (0..k)
                    .map(|i| {
                        let center = Vec3::new(rng.gen(), rng.gen(), rng.gen()) * 20.0;
                        Object::new(Sphere::new(center, 0.5), MaterialId(i))
                    })
                    .collect();

                let bvh = Bvh::build(objects, strategy).unwrap();
                assert_eq!(bvh.node_count(), 2 * k - 1, "{strategy} split, {k} objects");
                assert_eq!(bvh.flatten().len(), 2 * k - 1);
            }
        }
    }

    #[test]
    fn test_bvh_bounding_box_surrounds_objects() {
        let mut rng = StdRng::seed_from_u64(42);
        let objects = disjoint_spheres(&mut rng, 3);
        let expected = bounds_of(&objects);

        for strategy in STRATEGIES {
            let bvh = Bvh::build(objects.clone(), strategy).unwrap();
            assert_eq!(bvh.bounding_box(), expected);
            assert_eq!(bvh.flatten().bounding_box(), expected);
        }
    }

    #[test]
    fn test_bvh_matches_linear_scan() {
        let mut rng = StdRng::seed_from_u64(42);
        let objects = disjoint_spheres(&mut rng, 5);
        let extent = 20.0;

        for strategy in STRATEGIES {
            let bvh = Bvh::build(objects.clone(), strategy).unwrap();
            let flat = bvh.flatten();
            let mut hits = 0;

            for _ in 0..2000 {
                let ray = random_ray(&mut rng, extent);
                let expected = intersect_linear(&objects, &ray, RAY_T);

                let tree_hit = bvh.intersect(&ray, RAY_T);
                let flat_hit = flat.intersect(&ray, RAY_T);
                assert_eq!(tree_hit.map(|h| h.material), expected.map(|h| h.material));
                assert_eq!(flat_hit.map(|h| h.material), expected.map(|h| h.material));

                if let (Some(tree_hit), Some(expected)) = (tree_hit, expected) {
                    assert!((tree_hit.t() - expected.t()).abs() < 1e-4);
                    hits += 1;
                }
            }

            assert!(hits > 100, "only {hits} rays hit anything with {strategy} split");
        }
    }

    #[test]
    fn test_flat_bvh_matches_tree() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut objects = disjoint_spheres(&mut rng, 4);
        objects.push(Object::new(
            Triangle::new(
                Vec3::new(-5.0, -1.0, -5.0),
                Vec3::new(25.0, -1.0, -5.0),
                Vec3::new(-5.0, -1.0, 25.0),
            ),
            MaterialId(999),
        ));

        for strategy in STRATEGIES {
            let bvh = Bvh::build(objects.clone(), strategy).unwrap();
            let flat = FlatBvh::from(&bvh);

            for _ in 0..2000 {
                let ray = random_ray(&mut rng, 16.0);
                let tree_hit = bvh.intersect(&ray, RAY_T);
                let flat_hit = flat.intersect(&ray, RAY_T);

                // Same tree, same primitive tests: results are bit-identical
                assert_eq!(tree_hit, flat_hit);
            }
        }
    }

    #[test]
    fn test_bvh_respects_interval() {
        let objects: Vec<Object> = (0..8)
            .map(|i| {
                let center = Vec3::new(0.0, 0.0, -5.0 * (i + 1) as f32);
                Object::new(Sphere::new(center, 1.0), MaterialId(i))
            })
            .collect();
        let flat = FlatBvh::build(objects, SplitStrategy::LongestAxis).unwrap();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let first = flat.intersect(&ray, RAY_T).unwrap();
        assert_eq!(first.material, MaterialId(0));

        // Skip past the first two spheres
        let later = flat.intersect(&ray, Interval::new(12.0, f32::INFINITY)).unwrap();
        assert_eq!(later.material, MaterialId(2));
        assert!((later.t() - 14.0).abs() < 1e-4);

        assert!(flat.intersect(&ray, Interval::new(0.0005, 3.0)).is_none());
    }

    #[test]
    fn test_random_split_is_reproducible() {
        let mut rng = StdRng::seed_from_u64(42);
        let objects = disjoint_spheres(&mut rng, 3);

        let a = Bvh::build(objects.clone(), SplitStrategy::Random).unwrap().flatten();
        let b = Bvh::build(objects, SplitStrategy::Random).unwrap().flatten();
        assert_eq!(a.nodes, b.nodes);
    }

    #[test]
    fn test_sah_depth_stays_within_stack() {
        // Identical boxes give every SAH split the same cost
        let objects: Vec<Object> = (0..2000)
            .map(|i| Object::new(Sphere::new(Vec3::ZERO, 1.0), MaterialId(i)))
            .collect();

        let bvh = Bvh::build(objects, SplitStrategy::SurfaceAreaHeuristic).unwrap();
        assert_eq!(bvh.node_count(), 3999);
        assert!(bvh.depth() < STACK_CAPACITY);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = bvh.flatten().intersect(&ray, RAY_T).unwrap();
        assert!((hit.t() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_median_split_depth_is_logarithmic() {
        let mut rng = StdRng::seed_from_u64(42);
        let objects = disjoint_spheres(&mut rng, 6);
        let bvh = Bvh::build(objects, SplitStrategy::LongestAxis).unwrap();

        // 216 objects need at most ceil(log2(216)) = 8 levels
        assert!(bvh.depth() <= 8);
    }
}
