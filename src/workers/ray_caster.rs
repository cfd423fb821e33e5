//! The ray-casting stage: camera placement and mesh intersection.

use std::sync::Arc;

use crossbeam_channel::Receiver;
use tracing::debug;

use crate::camera::{calculate_horizontal_fov, Camera};
use crate::cars::{car_data, CarData};
use crate::config::Configuration;
use crate::error::Error;
use crate::generators::{DepthPayload, GenerationJob};
use crate::mesh::load_prepared_mesh;
use crate::pose::{camera_location, camera_rotation};
use crate::records::load_game_state;
use crate::scene::CommittedScene;
use crate::tracks::{track_data, TrackData};
use crate::workers::{PipelineShared, Worker};
use crate::Result;

/// Casts one ray per pixel for each record it receives and posts the
/// resulting intersection record to the generation queue.
pub struct RayCastingWorker {
    config: Arc<Configuration>,
    shared: Arc<PipelineShared>,
    track: &'static TrackData,
    car: &'static CarData,
    /// Horizontal and vertical field of view, degrees.
    fov: (f32, f32),
    is_generating_depth: bool,
    scene: Option<CommittedScene>,
}

impl RayCastingWorker {
    pub fn new(config: Arc<Configuration>, shared: Arc<PipelineShared>) -> Result<RayCastingWorker> {
        let track = track_data(&config.track_name)?;
        let car = car_data(&config.car_name)?;
        let h_fov = calculate_horizontal_fov(config.vertical_fov, config.width(), config.height());
        let fov = (h_fov, config.vertical_fov);
        let is_generating_depth = config.is_generating_depth();
        Ok(RayCastingWorker {
            config,
            shared,
            track,
            car,
            fov,
            is_generating_depth,
            scene: None,
        })
    }

    fn scene(&mut self) -> &mut CommittedScene {
        self.scene.as_mut().expect("setup loads the scene")
    }

    /// Positions the camera from the record's state and intersects every
    /// pixel ray.
    fn cast_rays(&mut self, record_id: &str) -> Result<GenerationJob> {
        let state_path = self
            .config
            .recorded_data_path
            .join(format!("{record_id}.bin"));
        let state = load_game_state(&state_path)?;
        let camera = Camera::from_pose(
            camera_location(&state, self.car),
            camera_rotation(&state, self.car),
            self.fov,
            (self.config.width(), self.config.height()),
        );
        let is_generating_depth = self.is_generating_depth;
        let scene = self.scene();
        scene.set_camera(camera);
        let rays = scene.camera_rays()?;

        if !is_generating_depth {
            let triangle_ids = scene.intersects_first(&rays);
            return Ok(GenerationJob {
                record_id: record_id.to_owned(),
                triangle_ids,
                depth: None,
            });
        }

        let located = scene.intersects_location(&rays);
        let pixel_to_ray = located
            .ray_indices
            .iter()
            .map(|&ray| rays.pixels[ray as usize])
            .collect();
        debug!(record_id, hits = located.ray_indices.len(), "rays cast");
        Ok(GenerationJob {
            record_id: record_id.to_owned(),
            triangle_ids: located.triangle_indices,
            depth: Some(DepthPayload {
                locations: located.locations,
                origin: rays.origins[0],
                pixel_to_ray,
                ray_directions: rays.directions,
                ray_indices: located.ray_indices,
            }),
        })
    }
}

impl Worker for RayCastingWorker {
    type Job = String;

    /// Loads this worker's private copy of the prepared mesh and builds its
    /// accelerator.
    fn setup(&mut self) -> Result<()> {
        let scene = load_prepared_mesh(&self.config.modified_mesh_path(), self.track)?;
        self.scene = Some(scene);
        Ok(())
    }

    fn job_queue(&self) -> &Receiver<String> {
        &self.shared.ray_cast_queue
    }

    fn is_work_complete(&self) -> bool {
        self.shared.ray_cast_queue.is_empty()
    }

    fn process(&mut self, record_id: String) -> Result<()> {
        let job = self.cast_rays(&record_id)?;
        self.shared
            .generation_sender
            .send(job)
            .map_err(|_| Error::QueueClosed)
    }
}
