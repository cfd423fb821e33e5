//! The data-generation stage: intersection records in, label files out.

use std::fs;
use std::sync::Arc;

use crossbeam_channel::Receiver;
use tracing::debug;

use crate::config::Configuration;
use crate::generators::{build_generators, DataGenerator, GenerationContext, GenerationJob};
use crate::mesh::load_prepared_mesh;
use crate::raster::OutputSink;
use crate::tracks::{track_data, TrackData};
use crate::workers::{increment_n_complete, PipelineShared, Worker};
use crate::Result;

/// Runs every enabled generator over incoming intersection records and
/// copies the captured frame alongside the generated labels.
pub struct DataGenerationWorker {
    config: Arc<Configuration>,
    shared: Arc<PipelineShared>,
    track: &'static TrackData,
    sink: OutputSink,
    generators: Vec<Box<dyn DataGenerator>>,
}

impl DataGenerationWorker {
    pub fn new(
        config: Arc<Configuration>,
        shared: Arc<PipelineShared>,
    ) -> Result<DataGenerationWorker> {
        let track = track_data(&config.track_name)?;
        // Depth generation flips the whole run into the rotate-only
        // orientation; the sink carries that decision for every artifact.
        let sink = OutputSink::new(config.output_path.clone(), !config.is_generating_depth());
        Ok(DataGenerationWorker {
            config,
            shared,
            track,
            sink,
            generators: Vec::new(),
        })
    }

    fn copy_frame(&self, record_id: &str) -> Result<()> {
        let filename = format!("{record_id}.jpeg");
        fs::copy(
            self.config.recorded_data_path.join(&filename),
            self.sink.output_path().join(&filename),
        )?;
        Ok(())
    }
}

impl Worker for DataGenerationWorker {
    type Job = GenerationJob;

    /// Loads this worker's private scene copy and builds the enabled
    /// generators against it. The scene itself is only needed during setup;
    /// generators keep the per-triangle tables they derive from it.
    fn setup(&mut self) -> Result<()> {
        let scene = load_prepared_mesh(&self.config.modified_mesh_path(), self.track)?;
        let ctx = GenerationContext {
            config: &self.config,
            scene: &scene,
            track: self.track,
        };
        self.generators = build_generators(&ctx)?;
        Ok(())
    }

    fn job_queue(&self) -> &Receiver<GenerationJob> {
        &self.shared.generation_queue
    }

    fn is_work_complete(&self) -> bool {
        self.shared
            .is_ray_casting_done
            .load(std::sync::atomic::Ordering::Acquire)
            && self.shared.generation_queue.is_empty()
    }

    fn process(&mut self, job: GenerationJob) -> Result<()> {
        for generator in &self.generators {
            generator.generate(&job, &self.sink)?;
        }
        self.copy_frame(&job.record_id)?;
        increment_n_complete(&self.shared);
        debug!(record_id = %job.record_id, "record generated");
        Ok(())
    }
}
