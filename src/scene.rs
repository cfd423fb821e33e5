//! Scene assembly and intersection queries.
//!
//! A [`Scene`] is a list of named geometries straight out of the mesh
//! loader, one per material. Committing flattens the surviving geometries
//! into one triangle buffer with stable indices, builds the accelerator
//! and keeps a parallel triangle-to-material table so intersections can be
//! mapped back to semantics.

use cgmath::{InnerSpace, Vector3};
use rayon::prelude::*;

use crate::bvh::Bvh;
use crate::camera::{Camera, RayTable};
use crate::error::Error;
use crate::ray::{Ray, RayHit};
use crate::Result;

/// Material whose triangles must never reach the accelerator.
pub const PHYSICS_MATERIAL: &str = "physics";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: Vector3<f32>,
    pub v1: Vector3<f32>,
    pub v2: Vector3<f32>,
}

impl Triangle {
    pub fn new(v0: Vector3<f32>, v1: Vector3<f32>, v2: Vector3<f32>) -> Triangle {
        Triangle { v0, v1, v2 }
    }

    /// Unit face normal; zero for degenerate triangles.
    pub fn normal(&self) -> Vector3<f32> {
        let n = (self.v1 - self.v0).cross(self.v2 - self.v0);
        let len = n.magnitude();
        if len > 1e-12 {
            n / len
        } else {
            Vector3::new(0.0, 0.0, 0.0)
        }
    }
}

/// A named bundle of triangles sharing one material.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub name: String,
    pub triangles: Vec<Triangle>,
}

/// Mutable scene: geometries can still be deleted and nothing is flattened.
#[derive(Debug, Default)]
pub struct Scene {
    geometries: Vec<Geometry>,
}

impl Scene {
    pub fn new() -> Scene {
        Scene::default()
    }

    /// Attaches a geometry, returning its id.
    pub fn attach_geometry(&mut self, geometry: Geometry) -> u32 {
        self.geometries.push(geometry);
        self.geometries.len() as u32 - 1
    }

    /// Drops every geometry whose name appears in `names`.
    pub fn delete_geometries(&mut self, names: &[&str]) {
        self.geometries
            .retain(|geometry| !names.contains(&geometry.name.as_str()));
    }

    pub fn geometry(&self, name: &str) -> Option<&Geometry> {
        self.geometries.iter().find(|g| g.name == name)
    }

    pub fn geometry_names(&self) -> impl Iterator<Item = &str> {
        self.geometries.iter().map(|g| g.name.as_str())
    }

    /// Flattens the scene and builds the intersection accelerator.
    ///
    /// Triangle indices are assigned in attachment order and stay stable
    /// for the lifetime of the committed scene; `physics`-tagged triangles
    /// are excluded before the accelerator sees them.
    pub fn commit(self) -> CommittedScene {
        let mut triangles = Vec::new();
        let mut material_names = Vec::new();
        let mut triangle_material = Vec::new();
        for geometry in self.geometries {
            if geometry.name == PHYSICS_MATERIAL {
                continue;
            }
            let material_id = material_names.len() as u32;
            material_names.push(geometry.name);
            triangle_material.extend(std::iter::repeat(material_id).take(geometry.triangles.len()));
            triangles.extend(geometry.triangles);
        }
        let bvh = Bvh::build(&triangles);
        CommittedScene {
            triangles,
            material_names,
            triangle_material,
            bvh,
            camera: None,
        }
    }
}

/// Ragged output of [`CommittedScene::intersects_location`]: three parallel
/// arrays covering only the rays that hit something.
#[derive(Debug, Clone)]
pub struct LocatedHits {
    pub locations: Vec<Vector3<f32>>,
    pub ray_indices: Vec<u32>,
    pub triangle_indices: Vec<u32>,
}

/// Immutable flattened scene with its accelerator and attached camera.
pub struct CommittedScene {
    triangles: Vec<Triangle>,
    material_names: Vec<String>,
    triangle_material: Vec<u32>,
    bvh: Bvh,
    camera: Option<Camera>,
}

impl CommittedScene {
    pub fn n_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Material name for a flattened triangle index.
    pub fn material_name(&self, triangle_index: u32) -> &str {
        &self.material_names[self.triangle_material[triangle_index as usize] as usize]
    }

    /// Unit face normal per flattened triangle; degenerate faces yield zero.
    pub fn face_normals(&self) -> Vec<Vector3<f32>> {
        self.triangles.iter().map(Triangle::normal).collect()
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = Some(camera);
    }

    /// Per-pixel rays for the attached camera.
    pub fn camera_rays(&self) -> Result<RayTable> {
        let camera = self.camera.as_ref().ok_or(Error::NoCamera)?;
        Ok(camera.camera_rays())
    }

    fn cast(&self, origin: Vector3<f32>, dir: Vector3<f32>) -> RayHit {
        let mut ray_hit = RayHit::new(Ray::new(origin, dir));
        self.bvh.intersect(&self.triangles, &mut ray_hit);
        ray_hit
    }

    /// Nearest triangle per ray, [`crate::ray::INVALID_ID`] where the ray
    /// escapes.
    pub fn intersects_first(&self, rays: &RayTable) -> Vec<u32> {
        rays.directions
            .par_iter()
            .zip(rays.origins.par_iter())
            .map(|(dir, origin)| self.cast(*origin, *dir).hit.prim_id)
            .collect()
    }

    /// Nearest hit per ray with its location, skipping rays that escape.
    pub fn intersects_location(&self, rays: &RayTable) -> LocatedHits {
        let hits: Vec<(u32, Vector3<f32>, u32)> = rays
            .directions
            .par_iter()
            .zip(rays.origins.par_iter())
            .enumerate()
            .filter_map(|(i, (dir, origin))| {
                let ray_hit = self.cast(*origin, *dir);
                ray_hit
                    .hit
                    .hit()
                    .then(|| (i as u32, ray_hit.ray.point_at(ray_hit.hit.t), ray_hit.hit.prim_id))
            })
            .collect();
        let mut located = LocatedHits {
            locations: Vec::with_capacity(hits.len()),
            ray_indices: Vec::with_capacity(hits.len()),
            triangle_indices: Vec::with_capacity(hits.len()),
        };
        for (ray_index, location, triangle_index) in hits {
            located.ray_indices.push(ray_index);
            located.locations.push(location);
            located.triangle_indices.push(triangle_index);
        }
        located
    }
}
