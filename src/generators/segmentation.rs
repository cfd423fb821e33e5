//! Semantic segmentation rasters: colour visuals, train-id data and
//! frame overlays.

use std::path::PathBuf;

use crate::config::OutputKind;
use crate::error::Error;
use crate::raster::{blend, rgb_to_bgr, OutputSink, Raster};
use crate::ray::INVALID_ID;
use crate::semantics::{build_colour_list, build_train_id_list, dense_index, VOID_INDEX};
use crate::Result;

use super::{DataGenerator, GenerationContext, GenerationJob};

pub struct SegmentationGenerator {
    outputs: Vec<OutputKind>,
    /// Flattened triangle index -> semantic class id.
    triangle_to_id: Vec<u8>,
    colour_list: Vec<[u8; 3]>,
    train_id_list: Vec<u8>,
    width: u32,
    height: u32,
    recording_path: PathBuf,
    depth_enabled: bool,
}

impl SegmentationGenerator {
    /// Resolves every triangle's material against the track profile.
    ///
    /// A material missing from the profile means the profile and mesh are
    /// out of step, which would silently mislabel pixels; fail instead.
    pub fn new(ctx: &GenerationContext) -> Result<SegmentationGenerator> {
        let material_to_id = ctx.track.material_to_id()?;
        let scene = ctx.scene;
        let mut triangle_to_id = Vec::with_capacity(scene.n_triangles());
        for triangle in 0..scene.n_triangles() as u32 {
            let material = scene.material_name(triangle);
            let id = material_to_id
                .get(material)
                .ok_or_else(|| Error::UnknownMaterial(material.to_owned()))?;
            triangle_to_id.push(*id);
        }
        Ok(SegmentationGenerator {
            outputs: ctx
                .config
                .outputs_for(crate::config::GeneratorKind::Segmentation)
                .to_vec(),
            triangle_to_id,
            colour_list: build_colour_list(),
            train_id_list: build_train_id_list(),
            width: ctx.config.width(),
            height: ctx.config.height(),
            recording_path: ctx.config.recorded_data_path.clone(),
            depth_enabled: ctx.config.is_generating_depth(),
        })
    }

    /// Materialises the per-pixel class-id raster for one record.
    fn pixel_ids(&self, job: &GenerationJob) -> Result<Raster> {
        let ids: Vec<u8> = job
            .triangle_ids
            .iter()
            .map(|&triangle| {
                if triangle == INVALID_ID {
                    VOID_INDEX
                } else {
                    self.triangle_to_id[triangle as usize]
                }
            })
            .collect();
        match &job.depth {
            Some(payload) => {
                let mut raster = Raster::filled(self.width, self.height, 1, VOID_INDEX);
                for (id, &(u, v)) in ids.iter().zip(payload.pixel_to_ray.iter()) {
                    raster.set_pixel(u, v, &[*id]);
                }
                Ok(raster)
            }
            None => Raster::from_values(self.width, self.height, 1, ids),
        }
    }

    /// Class-id raster mapped to BGR colours for the sink.
    fn colour_map(&self, pixel_ids: &Raster) -> Raster {
        let mut data = Vec::with_capacity(pixel_ids.values().len() * 3);
        for &id in pixel_ids.values() {
            data.extend_from_slice(&self.colour_list[dense_index(id)]);
        }
        rgb_to_bgr(&mut data);
        Raster::from_values(self.width, self.height, 3, data)
            .expect("colour map matches the id raster")
    }

    fn train_id_map(&self, pixel_ids: &Raster) -> Raster {
        let data = pixel_ids
            .values()
            .iter()
            .map(|&id| self.train_id_list[dense_index(id)])
            .collect();
        Raster::from_values(self.width, self.height, 1, data)
            .expect("train id map matches the id raster")
    }

    fn generate_overlay(
        &self,
        job: &GenerationJob,
        pixel_ids: &Raster,
        sink: &OutputSink,
    ) -> Result<()> {
        let frame_path = self.recording_path.join(format!("{}.jpeg", job.record_id));
        let frame = sink.load_frame(&frame_path, self.width, self.height)?;
        let overlaid = blend(&frame, &self.colour_map(pixel_ids));
        sink.save(&format!("{}-seg_overlay.png", job.record_id), &overlaid)
    }
}

impl DataGenerator for SegmentationGenerator {
    fn generate(&self, job: &GenerationJob, sink: &OutputSink) -> Result<()> {
        let pixel_ids = self.pixel_ids(job)?;
        for output in &self.outputs {
            match output {
                OutputKind::Visuals => sink.save(
                    &format!("{}-seg_colour.png", job.record_id),
                    &self.colour_map(&pixel_ids),
                )?,
                OutputKind::Data => sink.save(
                    &format!("{}-trainids.png", job.record_id),
                    &self.train_id_map(&pixel_ids),
                )?,
                OutputKind::Overlays => self.generate_overlay(job, &pixel_ids, sink)?,
            }
        }
        Ok(())
    }
}
