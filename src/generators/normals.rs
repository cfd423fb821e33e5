//! Visualised surface-normal maps.
//!
//! Normals are normalised per frame (shift by component minimum, divide by
//! component range) rather than mapped through `(n + 1) / 2`; the output is
//! a visualisation, and callers needing geometrically meaningful normals
//! should disable visualisation and request raw output once it exists.

use cgmath::Vector3;

use crate::config::{GeneratorKind, OutputKind};
use crate::raster::{normalise_channels, to_u8, OutputSink, Raster};
use crate::ray::INVALID_ID;
use crate::Result;

use super::{DataGenerator, GenerationContext, GenerationJob};

pub struct NormalMapGenerator {
    outputs: Vec<OutputKind>,
    /// Flattened triangle index -> unit face normal; zero for degenerate
    /// faces.
    triangle_to_normal: Vec<Vector3<f32>>,
    width: u32,
    height: u32,
}

impl NormalMapGenerator {
    pub fn new(ctx: &GenerationContext) -> Result<NormalMapGenerator> {
        Ok(NormalMapGenerator {
            outputs: ctx.config.outputs_for(GeneratorKind::Normals).to_vec(),
            triangle_to_normal: ctx.scene.face_normals(),
            width: ctx.config.width(),
            height: ctx.config.height(),
        })
    }

    fn normal_map(&self, job: &GenerationJob) -> Result<Raster> {
        let mut values = Vec::with_capacity(job.triangle_ids.len() * 3);
        for &triangle in &job.triangle_ids {
            let normal = if triangle == INVALID_ID {
                Vector3::new(0.0, 0.0, 0.0)
            } else {
                self.triangle_to_normal[triangle as usize]
            };
            values.extend_from_slice(&[normal.x, normal.y, normal.z]);
        }
        normalise_channels(&mut values, 3);
        let bytes = to_u8(&values);
        match &job.depth {
            Some(payload) => {
                let mut raster = Raster::new(self.width, self.height, 3);
                for (px, &(u, v)) in bytes.chunks_exact(3).zip(payload.pixel_to_ray.iter()) {
                    raster.set_pixel(u, v, px);
                }
                Ok(raster)
            }
            None => Raster::from_values(self.width, self.height, 3, bytes),
        }
    }
}

impl DataGenerator for NormalMapGenerator {
    fn generate(&self, job: &GenerationJob, sink: &OutputSink) -> Result<()> {
        if !self.outputs.contains(&OutputKind::Visuals) {
            return Ok(());
        }
        let normal_map = self.normal_map(job)?;
        sink.save(&format!("{}-normals.png", job.record_id), &normal_map)
    }
}
