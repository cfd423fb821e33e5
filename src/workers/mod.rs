//! Worker plumbing shared by both pipeline stages.
//!
//! Workers are threads that do heavy per-worker setup (their own mesh load
//! and accelerator build), signal readiness, then drain a bounded queue.
//! Queue receives use a short timeout so each worker can re-check its
//! termination predicate without busy-waiting. A worker that errors flags
//! itself as failed instead of done; the supervisor's watchdog turns that
//! into a fatal run error.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use tracing::error;

use crate::generators::GenerationJob;
use crate::Result;

pub mod generation;
pub mod ray_caster;

pub use generation::DataGenerationWorker;
pub use ray_caster::RayCastingWorker;

/// How long a worker waits on its queue before re-checking termination.
pub const QUEUE_TIMEOUT: Duration = Duration::from_millis(500);

/// State shared between the supervisor and every worker.
///
/// Both queue receivers live here: crossbeam receivers are multi-consumer
/// through a shared reference, which is exactly the pool semantics the two
/// stages need.
pub struct PipelineShared {
    pub ray_cast_queue: Receiver<String>,
    pub generation_sender: Sender<GenerationJob>,
    pub generation_queue: Receiver<GenerationJob>,
    /// Records fully generated, across all workers.
    pub n_complete: AtomicUsize,
    pub is_ray_casting_done: AtomicBool,
}

/// Per-worker lifecycle flags, owned jointly by the worker thread and the
/// supervisor.
pub struct WorkerFlags {
    name: String,
    is_ready: AtomicBool,
    is_done: AtomicBool,
    is_failed: AtomicBool,
}

impl WorkerFlags {
    pub fn new(name: String) -> Arc<WorkerFlags> {
        Arc::new(WorkerFlags {
            name,
            is_ready: AtomicBool::new(false),
            is_done: AtomicBool::new(false),
            is_failed: AtomicBool::new(false),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_ready(&self) -> bool {
        self.is_ready.load(Ordering::Acquire)
    }

    pub fn is_done(&self) -> bool {
        self.is_done.load(Ordering::Acquire)
    }

    pub fn is_failed(&self) -> bool {
        self.is_failed.load(Ordering::Acquire)
    }
}

/// One stage worker: heavy setup, then a drain loop over its job queue.
pub trait Worker: Send {
    type Job: Send;

    /// Per-worker initialisation run on the worker thread before any job is
    /// accepted.
    fn setup(&mut self) -> Result<()>;

    fn job_queue(&self) -> &Receiver<Self::Job>;

    /// Termination predicate checked whenever the queue is quiet.
    fn is_work_complete(&self) -> bool;

    fn process(&mut self, job: Self::Job) -> Result<()>;
}

fn run_loop<W: Worker>(worker: &mut W, flags: &WorkerFlags) -> Result<()> {
    worker.setup()?;
    flags.is_ready.store(true, Ordering::Release);
    loop {
        match worker.job_queue().recv_timeout(QUEUE_TIMEOUT) {
            Ok(job) => worker.process(job)?,
            Err(RecvTimeoutError::Timeout) => {
                if worker.is_work_complete() {
                    break;
                }
            }
            // All senders gone: nothing can arrive any more.
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    Ok(())
}

/// Runs a worker to completion, translating its outcome into flags.
pub fn run<W: Worker>(mut worker: W, flags: &WorkerFlags) {
    match run_loop(&mut worker, flags) {
        Ok(()) => flags.is_done.store(true, Ordering::Release),
        Err(err) => {
            error!(worker = %flags.name, error = %err, "worker failed");
            flags.is_failed.store(true, Ordering::Release);
        }
    }
}

/// Spawns a worker on a named thread.
pub fn spawn<W: Worker + 'static>(
    worker: W,
    flags: Arc<WorkerFlags>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(flags.name.clone())
        .spawn(move || run(worker, &flags))
}

/// Serialized increment; reads elsewhere stay lock-free.
pub fn increment_n_complete(shared: &PipelineShared) {
    shared.n_complete.fetch_add(1, Ordering::SeqCst);
}
