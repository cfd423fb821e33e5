//! Bounding volume hierarchy used as the intersection accelerator.
//!
//! Built once per committed scene: median split on the longest centroid
//! axis, small leaves, nearest-hit traversal with Möller–Trumbore at the
//! leaves. Triangle indices reported in hits refer to the flattened buffer
//! the tree was built from.

use cgmath::{InnerSpace, Vector3};

use crate::aabb::AABB;
use crate::ray::RayHit;
use crate::scene::Triangle;

const LEAF_SIZE: usize = 4;
const EPSILON: f32 = 1e-7;

#[derive(Debug)]
enum Node {
    Leaf {
        bounds: AABB,
        start: u32,
        count: u32,
    },
    Interior {
        bounds: AABB,
        // Left child is always at self + 1; only the right needs storing.
        right: u32,
    },
}

impl Node {
    fn bounds(&self) -> &AABB {
        match self {
            Node::Leaf { bounds, .. } => bounds,
            Node::Interior { bounds, .. } => bounds,
        }
    }
}

/// Accelerator over a flattened triangle buffer.
#[derive(Debug)]
pub struct Bvh {
    nodes: Vec<Node>,
    /// Permutation of triangle indices, partitioned by the build.
    order: Vec<u32>,
}

struct BuildPrim {
    index: u32,
    bounds: AABB,
    centroid: Vector3<f32>,
}

impl Bvh {
    pub fn build(triangles: &[Triangle]) -> Bvh {
        let mut prims: Vec<BuildPrim> = triangles
            .iter()
            .enumerate()
            .map(|(i, tri)| {
                let bounds = AABB::default()
                    .union_vec(&tri.v0)
                    .union_vec(&tri.v1)
                    .union_vec(&tri.v2);
                BuildPrim {
                    index: i as u32,
                    centroid: bounds.center(),
                    bounds,
                }
            })
            .collect();
        let mut bvh = Bvh {
            nodes: Vec::new(),
            order: Vec::with_capacity(prims.len()),
        };
        if !prims.is_empty() {
            let n = prims.len();
            bvh.build_range(&mut prims, 0, n);
        }
        bvh.order = prims.iter().map(|p| p.index).collect();
        bvh
    }

    fn build_range(&mut self, prims: &mut [BuildPrim], start: usize, end: usize) -> u32 {
        let bounds = prims[start..end]
            .iter()
            .fold(AABB::default(), |b, p| b.union_aabb(&p.bounds));
        let node_id = self.nodes.len() as u32;
        if end - start <= LEAF_SIZE {
            self.nodes.push(Node::Leaf {
                bounds,
                start: start as u32,
                count: (end - start) as u32,
            });
            return node_id;
        }
        let centroid_bounds = prims[start..end]
            .iter()
            .fold(AABB::default(), |b, p| b.union_vec(&p.centroid));
        let axis = centroid_bounds.longest_axis();
        let mid = (start + end) / 2;
        prims[start..end].select_nth_unstable_by(mid - start, |a, b| {
            a.centroid[axis]
                .partial_cmp(&b.centroid[axis])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        self.nodes.push(Node::Interior { bounds, right: 0 });
        self.build_range(prims, start, mid);
        let right = self.build_range(prims, mid, end);
        match &mut self.nodes[node_id as usize] {
            Node::Interior { right: slot, .. } => *slot = right,
            Node::Leaf { .. } => unreachable!(),
        }
        node_id
    }

    /// Updates `ray_hit` with the nearest intersection, if any.
    pub fn intersect(&self, triangles: &[Triangle], ray_hit: &mut RayHit) {
        if self.nodes.is_empty() {
            return;
        }
        let origin = ray_hit.ray.origin;
        let inv_dir = Vector3::new(
            1.0 / ray_hit.ray.dir.x,
            1.0 / ray_hit.ray.dir.y,
            1.0 / ray_hit.ray.dir.z,
        );
        let mut stack = vec![0_u32];
        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id as usize];
            let t_max = ray_hit.hit.t.min(ray_hit.ray.tfar);
            if !node
                .bounds()
                .intersects_ray(&origin, &inv_dir, ray_hit.ray.tnear, t_max)
            {
                continue;
            }
            match node {
                Node::Leaf { start, count, .. } => {
                    for slot in *start..*start + *count {
                        let tri_index = self.order[slot as usize];
                        let tri = &triangles[tri_index as usize];
                        if let Some(t) = intersect_triangle(tri, ray_hit) {
                            ray_hit.hit.prim_id = tri_index;
                            ray_hit.hit.t = t;
                        }
                    }
                }
                Node::Interior { right, .. } => {
                    stack.push(*right);
                    stack.push(node_id + 1);
                }
            }
        }
    }
}

/// Möller–Trumbore, accepting only hits nearer than the current one.
fn intersect_triangle(tri: &Triangle, ray_hit: &RayHit) -> Option<f32> {
    let ray = &ray_hit.ray;
    let e1 = tri.v1 - tri.v0;
    let e2 = tri.v2 - tri.v0;
    let p = ray.dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = ray.origin - tri.v0;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = ray.dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv_det;
    if t < ray.tnear || t > ray.tfar || t >= ray_hit.hit.t {
        return None;
    }
    Some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ray::{Ray, INVALID_ID};

    fn quad(z: f32, half: f32) -> Vec<Triangle> {
        // Two triangles spanning [-half, half]^2 at the given z.
        let a = Vector3::new(-half, -half, z);
        let b = Vector3::new(half, -half, z);
        let c = Vector3::new(half, half, z);
        let d = Vector3::new(-half, half, z);
        vec![Triangle::new(a, b, c), Triangle::new(a, c, d)]
    }

    fn cast(tris: &[Triangle], origin: Vector3<f32>, dir: Vector3<f32>) -> RayHit {
        let bvh = Bvh::build(tris);
        let mut rh = RayHit::new(Ray::new(origin, dir));
        bvh.intersect(tris, &mut rh);
        rh
    }

    #[test]
    fn hits_a_quad_straight_on() {
        let tris = quad(0.0, 1.0);
        let rh = cast(
            &tris,
            Vector3::new(0.2, 0.2, 5.0),
            Vector3::new(0.0, 0.0, -1.0),
        );
        assert!(rh.hit.hit());
        assert!((rh.hit.t - 5.0).abs() < 1e-4);
    }

    #[test]
    fn reports_misses() {
        let tris = quad(0.0, 1.0);
        let rh = cast(
            &tris,
            Vector3::new(5.0, 5.0, 5.0),
            Vector3::new(0.0, 0.0, -1.0),
        );
        assert!(!rh.hit.hit());
        assert_eq!(rh.hit.prim_id, INVALID_ID);
    }

    #[test]
    fn nearest_of_two_stacked_quads_wins() {
        let mut tris = quad(0.0, 1.0);
        tris.extend(quad(2.0, 1.0));
        let rh = cast(
            &tris,
            Vector3::new(0.0, 0.0, 5.0),
            Vector3::new(0.0, 0.0, -1.0),
        );
        assert!(rh.hit.hit());
        // The z = 2 quad occupies indices 2 and 3.
        assert!(rh.hit.prim_id >= 2);
        assert!((rh.hit.t - 3.0).abs() < 1e-4);
    }

    #[test]
    fn many_triangles_still_find_the_right_one() {
        // A row of small quads along x, each offset in z by its index.
        let mut tris = Vec::new();
        for i in 0..64 {
            let x = i as f32 * 2.0;
            let a = Vector3::new(x - 0.5, -0.5, -(i as f32));
            let b = Vector3::new(x + 0.5, -0.5, -(i as f32));
            let c = Vector3::new(x + 0.5, 0.5, -(i as f32));
            tris.push(Triangle::new(a, b, c));
        }
        let bvh = Bvh::build(&tris);
        for i in 0..64 {
            let x = i as f32 * 2.0;
            let mut rh = RayHit::new(Ray::new(
                Vector3::new(x, -0.1, 10.0),
                Vector3::new(0.0, 0.0, -1.0),
            ));
            bvh.intersect(&tris, &mut rh);
            assert_eq!(rh.hit.prim_id, i as u32);
        }
    }

    #[test]
    fn empty_scene_is_a_noop() {
        let tris: Vec<Triangle> = Vec::new();
        let rh = cast(
            &tris,
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, -1.0),
        );
        assert!(!rh.hit.hit());
    }
}
