//! Data generators: turn one intersection record into label rasters.
//!
//! Each enabled [`GeneratorKind`] is constructed once per generation worker
//! against that worker's private scene, then fed [`GenerationJob`]s. All
//! output goes through the worker's [`OutputSink`] so every raster of a
//! record shares the orientation rule.

use cgmath::Vector3;

use crate::config::{Configuration, GeneratorKind};
use crate::raster::OutputSink;
use crate::scene::CommittedScene;
use crate::tracks::TrackData;
use crate::Result;

mod depth;
mod normals;
mod segmentation;

pub use depth::DepthMapGenerator;
pub use normals::NormalMapGenerator;
pub use segmentation::SegmentationGenerator;

/// The message a ray-cast worker hands to the generation stage.
///
/// In first-hit mode `triangle_ids` has one entry per camera ray, flattened
/// the way the ray table is. In depth mode it is ragged: one entry per ray
/// that hit anything, aligned with the [`DepthPayload`] arrays.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub record_id: String,
    pub triangle_ids: Vec<u32>,
    pub depth: Option<DepthPayload>,
}

/// Extra intersection data carried only when depth maps are generated.
#[derive(Debug, Clone)]
pub struct DepthPayload {
    /// World-space hit location per hit.
    pub locations: Vec<Vector3<f32>>,
    /// Camera position the rays left from.
    pub origin: Vector3<f32>,
    /// Pixel owning each hit, gathered from the ray table.
    pub pixel_to_ray: Vec<(u32, u32)>,
    /// Direction of every camera ray, indexed by `ray_indices`.
    pub ray_directions: Vec<Vector3<f32>>,
    /// Ray index per hit.
    pub ray_indices: Vec<u32>,
}

/// Everything a generator may touch while setting itself up.
pub struct GenerationContext<'a> {
    pub config: &'a Configuration,
    pub scene: &'a CommittedScene,
    pub track: &'a TrackData,
}

/// One family of label data.
///
/// Setup happens in the constructor against the worker's scene; `generate`
/// must only read the job and write through the sink.
pub trait DataGenerator: Send {
    fn generate(&self, job: &GenerationJob, sink: &OutputSink) -> Result<()>;
}

/// Builds the generators enabled in the configuration, in invocation order.
pub fn build_generators(ctx: &GenerationContext) -> Result<Vec<Box<dyn DataGenerator>>> {
    let mut generators: Vec<Box<dyn DataGenerator>> = Vec::new();
    for kind in ctx.config.generate.keys() {
        match kind {
            GeneratorKind::Segmentation => {
                generators.push(Box::new(SegmentationGenerator::new(ctx)?))
            }
            GeneratorKind::Normals => generators.push(Box::new(NormalMapGenerator::new(ctx)?)),
            GeneratorKind::Depth => generators.push(Box::new(DepthMapGenerator::new(ctx)?)),
        }
    }
    Ok(generators)
}
