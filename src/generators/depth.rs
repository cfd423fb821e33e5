//! Visualised depth maps.
//!
//! Depth is the projection of camera-to-hit vectors onto the ray
//! directions. Visualisation normalises to the frame's own range and
//! inverts, so near surfaces render bright; the scaling is per frame and
//! therefore not comparable between records.

use cgmath::InnerSpace;

use crate::config::{GeneratorKind, OutputKind};
use crate::error::Error;
use crate::raster::{invert_unit, normalise_channels, to_u8, OutputSink, Raster};
use crate::Result;

use super::{DataGenerator, DepthPayload, GenerationContext, GenerationJob};

pub struct DepthMapGenerator {
    outputs: Vec<OutputKind>,
    width: u32,
    height: u32,
}

impl DepthMapGenerator {
    pub fn new(ctx: &GenerationContext) -> Result<DepthMapGenerator> {
        Ok(DepthMapGenerator {
            outputs: ctx.config.outputs_for(GeneratorKind::Depth).to_vec(),
            width: ctx.config.width(),
            height: ctx.config.height(),
        })
    }

    fn depth_map(&self, payload: &DepthPayload) -> Raster {
        let mut depth = calculate_depth(payload);
        normalise_channels(&mut depth, 1);
        invert_unit(&mut depth);
        let bytes = to_u8(&depth);
        let mut raster = Raster::new(self.width, self.height, 1);
        for (value, &(u, v)) in bytes.iter().zip(payload.pixel_to_ray.iter()) {
            raster.set_pixel(u, v, &[*value]);
        }
        raster
    }
}

impl DataGenerator for DepthMapGenerator {
    fn generate(&self, job: &GenerationJob, sink: &OutputSink) -> Result<()> {
        if !self.outputs.contains(&OutputKind::Visuals) {
            return Ok(());
        }
        // Only the located-hits intersection mode carries what depth needs.
        let payload = job.depth.as_ref().ok_or_else(|| {
            Error::Config("depth generation requires the depth intersection mode".into())
        })?;
        sink.save(
            &format!("{}-depth.png", job.record_id),
            &self.depth_map(payload),
        )
    }
}

/// Distance from the image plane to each hit, measured along the ray.
fn calculate_depth(payload: &DepthPayload) -> Vec<f32> {
    payload
        .locations
        .iter()
        .zip(payload.ray_indices.iter())
        .map(|(location, &ray)| {
            let hit_to_camera = location - payload.origin;
            hit_to_camera.dot(payload.ray_directions[ray as usize])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use cgmath::Vector3;

    use super::*;

    fn payload_along_z(distances: &[f32]) -> DepthPayload {
        DepthPayload {
            locations: distances
                .iter()
                .map(|&d| Vector3::new(0.0, 0.0, 5.0 - d))
                .collect(),
            origin: Vector3::new(0.0, 0.0, 5.0),
            pixel_to_ray: (0..distances.len()).map(|i| (i as u32, 0)).collect(),
            ray_directions: vec![Vector3::new(0.0, 0.0, -1.0); distances.len()],
            ray_indices: (0..distances.len() as u32).collect(),
        }
    }

    #[test]
    fn depth_is_the_projection_onto_the_ray() {
        let depth = calculate_depth(&payload_along_z(&[1.0, 4.0]));
        assert!((depth[0] - 1.0).abs() < 1e-6);
        assert!((depth[1] - 4.0).abs() < 1e-6);
    }

    #[test]
    fn near_surfaces_render_bright() {
        let generator = DepthMapGenerator {
            outputs: vec![OutputKind::Visuals],
            width: 3,
            height: 1,
        };
        let raster = generator.depth_map(&payload_along_z(&[1.0, 2.0, 3.0]));
        assert_eq!(raster.pixel(0, 0), &[255]);
        assert_eq!(raster.pixel(2, 0), &[0]);
        assert!(raster.pixel(1, 0)[0] > 0 && raster.pixel(1, 0)[0] < 255);
    }

    #[test]
    fn missing_payload_is_a_configuration_error() {
        let generator = DepthMapGenerator {
            outputs: vec![OutputKind::Visuals],
            width: 1,
            height: 1,
        };
        let dir = tempfile::tempdir().unwrap();
        let sink = OutputSink::new(dir.path().to_owned(), false);
        let job = GenerationJob {
            record_id: "0".into(),
            triangle_ids: vec![],
            depth: None,
        };
        assert!(generator.generate(&job, &sink).is_err());
    }
}
