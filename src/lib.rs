//! Ground-truth label synthesis for driving-simulator captures.
//!
//! For every recorded frame (`{id}.bin` camera state + `{id}.jpeg` render)
//! the pipeline positions a pinhole camera from the recorded pose, casts one
//! primary ray per pixel against the prepared track mesh and writes aligned
//! label rasters: semantic segmentation, surface normals and depth. Work is
//! split over two pools of worker threads (ray casting and data generation)
//! joined by bounded queues and driven by [`DataGenerationPipeline`].

use cgmath::Vector3;

pub mod cars;
pub mod config;
pub mod error;
pub mod generators;
pub mod pipeline;
pub mod records;
pub mod semantics;
pub mod tracks;
pub mod workers;

pub mod aabb;
pub mod bvh;
pub mod camera;
pub mod mesh;
pub mod pose;
pub mod raster;
pub mod ray;
pub mod scene;

pub use config::Configuration;
pub use error::Error;
pub use pipeline::DataGenerationPipeline;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) fn vec_min(a: &Vector3<f32>, b: &Vector3<f32>) -> Vector3<f32> {
    Vector3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z))
}

pub(crate) fn vec_max(a: &Vector3<f32>, b: &Vector3<f32>) -> Vector3<f32> {
    Vector3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z))
}
