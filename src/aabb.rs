use std::f32;

use cgmath::Vector3;

use crate::{vec_max, vec_min};

/// Axis-aligned bounding box.
#[derive(Clone, Debug)]
pub struct AABB {
    pub p_min: Vector3<f32>,
    pub p_max: Vector3<f32>,
}

impl Default for AABB {
    fn default() -> Self {
        Self {
            p_min: Vector3::new(f32::MAX, f32::MAX, f32::MAX),
            p_max: Vector3::new(f32::MIN, f32::MIN, f32::MIN),
        }
    }
}

impl AABB {
    pub fn is_valid(&self) -> bool {
        self.p_max.x >= self.p_min.x && self.p_max.y >= self.p_min.y && self.p_max.z >= self.p_min.z
    }

    pub fn union_aabb(&self, b: &AABB) -> AABB {
        AABB {
            p_min: vec_min(&self.p_min, &b.p_min),
            p_max: vec_max(&self.p_max, &b.p_max),
        }
    }

    pub fn union_vec(&self, v: &Vector3<f32>) -> AABB {
        AABB {
            p_min: vec_min(&self.p_min, v),
            p_max: vec_max(&self.p_max, v),
        }
    }

    #[inline]
    pub fn size(&self) -> Vector3<f32> {
        self.p_max - self.p_min
    }

    #[inline]
    pub fn center(&self) -> Vector3<f32> {
        self.size() * 0.5 + self.p_min
    }

    /// Axis with the largest extent, 0..=2.
    pub fn longest_axis(&self) -> usize {
        let size = self.size();
        if size.x >= size.y && size.x >= size.z {
            0
        } else if size.y >= size.z {
            1
        } else {
            2
        }
    }

    /// Slab test against a ray expressed with a precomputed reciprocal
    /// direction. Returns true when the box overlaps `[t_near, t_far]`.
    pub fn intersects_ray(
        &self,
        origin: &Vector3<f32>,
        inv_dir: &Vector3<f32>,
        t_near: f32,
        t_far: f32,
    ) -> bool {
        let mut t0 = t_near;
        let mut t1 = t_far;
        for axis in 0..3 {
            let lo = (self.p_min[axis] - origin[axis]) * inv_dir[axis];
            let hi = (self.p_max[axis] - origin[axis]) * inv_dir[axis];
            let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
            t0 = t0.max(lo);
            t1 = t1.min(hi);
            if t0 > t1 {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_box_is_invalid_until_grown() {
        let aabb = AABB::default();
        assert!(!aabb.is_valid());
        let aabb = aabb.union_vec(&Vector3::new(1.0, 2.0, 3.0));
        assert!(aabb.is_valid());
        assert_eq!(aabb.center(), Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn union_covers_both_boxes() {
        let a = AABB::default().union_vec(&Vector3::new(0.0, 0.0, 0.0));
        let b = AABB::default().union_vec(&Vector3::new(2.0, -1.0, 4.0));
        let joined = a.union_aabb(&b);
        assert_eq!(joined.size(), Vector3::new(2.0, 1.0, 4.0));
        assert_eq!(joined.longest_axis(), 2);
    }

    #[test]
    fn slab_test_hits_and_misses() {
        let aabb = AABB::default()
            .union_vec(&Vector3::new(-1.0, -1.0, -1.0))
            .union_vec(&Vector3::new(1.0, 1.0, 1.0));
        let origin = Vector3::new(0.0, 0.0, 5.0);
        let toward = Vector3::new(0.0, 0.0, -1.0);
        let away = Vector3::new(0.0, 0.0, 1.0);
        let inv = |d: Vector3<f32>| Vector3::new(1.0 / d.x, 1.0 / d.y, 1.0 / d.z);
        assert!(aabb.intersects_ray(&origin, &inv(toward), 0.0, f32::INFINITY));
        assert!(!aabb.intersects_ray(&origin, &inv(away), 0.0, f32::INFINITY));
    }
}
