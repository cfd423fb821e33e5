//! The pipeline supervisor.
//!
//! Owns both worker pools, the two queues and the shared scalars. Setup
//! prepares the mesh once, enumerates the configured record subsequence and
//! fills the ray-cast queue; `start` spawns the pools, waits for readiness,
//! reports coarse progress, drains the two stages in order and tears down.
//! Any worker that dies without reporting done aborts the run instead of
//! leaving the supervisor polling forever.

use std::fs;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Sender};
use tracing::info;

use crate::config::Configuration;
use crate::error::Error;
use crate::mesh::preprocess_track_mesh;
use crate::records::{sample_list, subsample};
use crate::tracks::track_data;
use crate::workers::{
    spawn, DataGenerationWorker, PipelineShared, RayCastingWorker, WorkerFlags,
};
use crate::Result;

/// Backpressure bound on the ray-cast to generation queue.
const GENERATION_QUEUE_BOUND: usize = 64;
/// How often the supervisor samples progress and worker health.
const POLL_INTERVAL: Duration = Duration::from_millis(100);
const PROGRESS_INTERVAL: Duration = Duration::from_secs(2);

struct WorkerHandle {
    flags: Arc<WorkerFlags>,
    handle: JoinHandle<()>,
}

/// Two-stage worker pipeline over a recorded session.
pub struct DataGenerationPipeline {
    config: Arc<Configuration>,
    shared: Arc<PipelineShared>,
    /// Kept alive so ray-cast receivers never disconnect before teardown.
    _ray_cast_sender: Sender<String>,
    records: Vec<String>,
    ray_casters: Vec<WorkerHandle>,
    generators: Vec<WorkerHandle>,
}

impl DataGenerationPipeline {
    /// Validates the configuration, prepares the mesh and queues the work.
    pub fn new(config: Configuration) -> Result<DataGenerationPipeline> {
        config.validate()?;
        config.log_summary();
        fs::create_dir_all(&config.output_path)?;

        let track = track_data(&config.track_name)?;
        preprocess_track_mesh(&config.track_mesh_path, &config.modified_mesh_path(), track)?;

        let samples = sample_list(&config.recorded_data_path)?;
        let records = subsample(
            &samples,
            config.start_at_sample,
            config.finish_at_sample,
            config.sample_every,
        );
        info!(
            available = samples.len(),
            selected = records.len(),
            "recording enumerated"
        );

        let (ray_cast_sender, ray_cast_queue) = bounded(records.len().max(1));
        let (generation_sender, generation_queue) = bounded(GENERATION_QUEUE_BOUND);
        for record in &records {
            ray_cast_sender
                .send(record.clone())
                .map_err(|_| Error::QueueClosed)?;
        }

        let shared = Arc::new(PipelineShared {
            ray_cast_queue,
            generation_sender,
            generation_queue,
            n_complete: AtomicUsize::new(0),
            is_ray_casting_done: AtomicBool::new(false),
        });
        Ok(DataGenerationPipeline {
            config: Arc::new(config),
            shared,
            _ray_cast_sender: ray_cast_sender,
            records,
            ray_casters: Vec::new(),
            generators: Vec::new(),
        })
    }

    /// Runs the pipeline to completion.
    pub fn start(mut self) -> Result<()> {
        let started_at = Instant::now();
        self.spawn_workers()?;
        self.wait_until_workers_are_ready()?;
        self.monitor_progress()?;
        self.drain_ray_casters()?;
        self.drain_generators()?;
        self.join_workers()?;
        let n_complete = self.shared.n_complete.load(Ordering::SeqCst);
        info!(
            records = n_complete,
            elapsed = %format_elapsed(started_at.elapsed()),
            "generation finished"
        );
        Ok(())
    }

    fn spawn_workers(&mut self) -> Result<()> {
        info!(
            n_workers = self.config.n_ray_casting_workers,
            "creating ray casting worker(s)"
        );
        for i in 0..self.config.n_ray_casting_workers {
            let flags = WorkerFlags::new(format!("ray-caster-{i}"));
            let worker = RayCastingWorker::new(self.config.clone(), self.shared.clone())?;
            let handle = spawn(worker, flags.clone())?;
            self.ray_casters.push(WorkerHandle { flags, handle });
        }
        info!(
            n_workers = self.config.n_generation_workers,
            "creating generation worker(s)"
        );
        for i in 0..self.config.n_generation_workers {
            let flags = WorkerFlags::new(format!("generator-{i}"));
            let worker = DataGenerationWorker::new(self.config.clone(), self.shared.clone())?;
            let handle = spawn(worker, flags.clone())?;
            self.generators.push(WorkerHandle { flags, handle });
        }
        Ok(())
    }

    fn workers(&self) -> impl Iterator<Item = &WorkerHandle> {
        self.ray_casters.iter().chain(self.generators.iter())
    }

    /// Watchdog: a worker that stopped without reporting done is fatal.
    fn check_worker_health(&self) -> Result<()> {
        for worker in self.workers() {
            if worker.flags.is_failed()
                || (worker.handle.is_finished() && !worker.flags.is_done())
            {
                return Err(Error::WorkerFailed(worker.flags.name().to_owned()));
            }
        }
        Ok(())
    }

    fn wait_until_workers_are_ready(&self) -> Result<()> {
        info!("waiting until workers are ready");
        while !self.workers().all(|worker| worker.flags.is_ready()) {
            self.check_worker_health()?;
            std::thread::sleep(POLL_INTERVAL);
        }
        info!("workers initialised");
        Ok(())
    }

    fn monitor_progress(&self) -> Result<()> {
        let total = self.records.len();
        let mut last_report = Instant::now();
        while !self.shared.ray_cast_queue.is_empty() {
            self.check_worker_health()?;
            if last_report.elapsed() >= PROGRESS_INTERVAL {
                info!(
                    complete = self.shared.n_complete.load(Ordering::SeqCst),
                    total,
                    "progress"
                );
                last_report = Instant::now();
            }
            std::thread::sleep(POLL_INTERVAL);
        }
        Ok(())
    }

    fn drain_ray_casters(&self) -> Result<()> {
        info!("waiting until ray casters finish");
        while !self.ray_casters.iter().all(|worker| worker.flags.is_done()) {
            self.check_worker_health()?;
            std::thread::sleep(POLL_INTERVAL);
        }
        self.shared.is_ray_casting_done.store(true, Ordering::Release);
        Ok(())
    }

    fn drain_generators(&self) -> Result<()> {
        info!("waiting until generators finish");
        while !self.generators.iter().all(|worker| worker.flags.is_done()) {
            self.check_worker_health()?;
            std::thread::sleep(POLL_INTERVAL);
        }
        info!(
            complete = self.shared.n_complete.load(Ordering::SeqCst),
            total = self.records.len(),
            "progress"
        );
        Ok(())
    }

    fn join_workers(&mut self) -> Result<()> {
        for worker in self.ray_casters.drain(..).chain(self.generators.drain(..)) {
            if worker.handle.join().is_err() {
                return Err(Error::WorkerFailed(worker.flags.name().to_owned()));
            }
        }
        Ok(())
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_times_format_as_hh_mm_ss() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "00:00:00");
        assert_eq!(format_elapsed(Duration::from_secs(61)), "00:01:01");
        assert_eq!(format_elapsed(Duration::from_secs(3723)), "01:02:03");
    }
}
