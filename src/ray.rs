use std::f32;

use cgmath::Vector3;

/// Sentinel for "no triangle": misses keep their id at `u32::MAX`.
pub const INVALID_ID: u32 = u32::MAX;

/// A ray segment starting at `origin` and heading in direction `dir`.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vector3<f32>,
    pub dir: Vector3<f32>,
    pub tnear: f32,
    pub tfar: f32,
}

impl Ray {
    pub fn new(origin: Vector3<f32>, dir: Vector3<f32>) -> Ray {
        Ray::segment(origin, dir, 0.0, f32::INFINITY)
    }

    pub fn segment(origin: Vector3<f32>, dir: Vector3<f32>, tnear: f32, tfar: f32) -> Ray {
        Ray {
            origin,
            dir,
            tnear,
            tfar,
        }
    }

    /// Point along the ray at parameter `t`.
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.dir * t
    }
}

/// Result of intersecting one ray: the nearest triangle, or invalid.
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    pub prim_id: u32,
    /// Distance along the ray to the intersection.
    pub t: f32,
}

impl Hit {
    pub fn none() -> Hit {
        Hit {
            prim_id: INVALID_ID,
            t: f32::INFINITY,
        }
    }

    pub fn hit(&self) -> bool {
        self.prim_id != INVALID_ID
    }
}

/// A ray paired with its (mutable) hit record, threaded through traversal.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub ray: Ray,
    pub hit: Hit,
}

impl RayHit {
    pub fn new(ray: Ray) -> RayHit {
        RayHit {
            ray,
            hit: Hit::none(),
        }
    }
}
