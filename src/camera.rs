//! Pinhole camera: one primary ray per pixel.
//!
//! Pixel (0, 0) is the top-left of the view; `v` grows downward. The ray
//! table is flattened u-major (`k = u * height + v`), and consumers must
//! treat `pixels` as the source of truth for the ray-to-pixel mapping.

use std::f32;

use cgmath::{InnerSpace, Matrix3, Vector3};

/// A positioned pinhole camera with a fixed resolution and field of view.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub pos: Vector3<f32>,
    dir_top_left: Vector3<f32>,
    screen_du: Vector3<f32>,
    screen_dv: Vector3<f32>,
    img: (u32, u32),
}

/// Parallel per-ray arrays produced by [`Camera::camera_rays`].
#[derive(Debug, Clone)]
pub struct RayTable {
    pub origins: Vec<Vector3<f32>>,
    pub directions: Vec<Vector3<f32>>,
    pub pixels: Vec<(u32, u32)>,
}

impl RayTable {
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }
}

impl Camera {
    /// Builds a camera at `pos` with the given world-from-camera rotation
    /// and `(horizontal, vertical)` field of view in degrees.
    ///
    /// The camera frame is right-handed with -z forward and +y up.
    pub fn from_pose(
        pos: Vector3<f32>,
        rotation: Matrix3<f32>,
        fov: (f32, f32),
        img: (u32, u32),
    ) -> Camera {
        let forward = rotation * Vector3::new(0.0, 0.0, -1.0);
        let right = rotation * Vector3::new(1.0, 0.0, 0.0);
        let up = rotation * Vector3::new(0.0, 1.0, 0.0);
        let dim_x = 2.0 * f32::tan((fov.0 / 2.0) * f32::consts::PI / 180.0);
        let dim_y = 2.0 * f32::tan((fov.1 / 2.0) * f32::consts::PI / 180.0);
        let screen_du = right * dim_x;
        // v grows downward, so the vertical screen vector points down.
        let screen_dv = up * -dim_y;
        let dir_top_left = forward - 0.5 * screen_du - 0.5 * screen_dv;
        Camera {
            pos,
            dir_top_left,
            screen_du,
            screen_dv,
            img,
        }
    }

    /// Compute the ray direction going through the pixel passed.
    pub fn ray_dir(&self, px: (f32, f32)) -> Vector3<f32> {
        (self.dir_top_left
            + px.0 / (self.img.0 as f32) * self.screen_du
            + px.1 / (self.img.1 as f32) * self.screen_dv)
            .normalize()
    }

    pub fn resolution(&self) -> (u32, u32) {
        self.img
    }

    /// One ray through the centre of every pixel, flattened u-major.
    pub fn camera_rays(&self) -> RayTable {
        let (width, height) = self.img;
        let n = (width * height) as usize;
        let mut origins = Vec::with_capacity(n);
        let mut directions = Vec::with_capacity(n);
        let mut pixels = Vec::with_capacity(n);
        for u in 0..width {
            for v in 0..height {
                origins.push(self.pos);
                directions.push(self.ray_dir((u as f32 + 0.5, v as f32 + 0.5)));
                pixels.push((u, v));
            }
        }
        RayTable {
            origins,
            directions,
            pixels,
        }
    }
}

/// Horizontal field of view in degrees for an image plane of `width` by
/// `height` pixels and the given vertical field of view in degrees.
pub fn calculate_horizontal_fov(vertical_fov: f32, width: u32, height: u32) -> f32 {
    let focal_length = height as f32 / f32::tan(vertical_fov.to_radians() / 2.0);
    (2.0 * f32::atan(width as f32 / focal_length)).to_degrees()
}

#[cfg(test)]
mod tests {
    use cgmath::SquareMatrix;

    use super::*;

    #[test]
    fn horizontal_fov_matches_a_16_by_9_plane() {
        let hfov = calculate_horizontal_fov(60.0, 1920, 1080);
        assert!((hfov - 90.0).abs() < 1e-3, "got {hfov}");
    }

    #[test]
    fn horizontal_fov_equals_vertical_for_square_images() {
        for vfov in [30.0_f32, 45.0, 60.0, 90.0] {
            let hfov = calculate_horizontal_fov(vfov, 512, 512);
            assert!((hfov - vfov).abs() < 1e-3);
        }
    }

    #[test]
    fn horizontal_fov_is_monotone_in_vfov_and_aspect() {
        assert!(
            calculate_horizontal_fov(61.0, 1920, 1080) > calculate_horizontal_fov(60.0, 1920, 1080)
        );
        assert!(
            calculate_horizontal_fov(60.0, 2560, 1080) > calculate_horizontal_fov(60.0, 1920, 1080)
        );
    }

    #[test]
    fn centre_ray_points_forward() {
        let fov = (calculate_horizontal_fov(60.0, 64, 48), 60.0);
        let cam = Camera::from_pose(
            Vector3::new(0.0, 0.0, 0.0),
            Matrix3::identity(),
            fov,
            (64, 48),
        );
        let dir = cam.ray_dir((32.0, 24.0));
        assert!((dir - Vector3::new(0.0, 0.0, -1.0)).magnitude() < 1e-6);
    }

    #[test]
    fn top_left_ray_points_up_and_left() {
        let cam = Camera::from_pose(
            Vector3::new(0.0, 0.0, 0.0),
            Matrix3::identity(),
            (60.0, 60.0),
            (64, 64),
        );
        let dir = cam.ray_dir((0.0, 0.0));
        assert!(dir.x < 0.0);
        assert!(dir.y > 0.0);
        assert!(dir.z < 0.0);
    }

    #[test]
    fn ray_table_is_u_major_with_pixel_truth() {
        let cam = Camera::from_pose(
            Vector3::new(1.0, 2.0, 3.0),
            Matrix3::identity(),
            (80.0, 60.0),
            (4, 3),
        );
        let rays = cam.camera_rays();
        assert_eq!(rays.len(), 12);
        assert_eq!(rays.pixels[0], (0, 0));
        assert_eq!(rays.pixels[3], (1, 0));
        assert_eq!(rays.pixels[5], (1, 2));
        assert!(rays.origins.iter().all(|o| *o == Vector3::new(1.0, 2.0, 3.0)));
    }
}
