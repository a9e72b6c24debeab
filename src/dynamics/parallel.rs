//! Worker pool for large offline ray batches (lightmap shadow rays and the
//! like).
//!
//! Jobs go through a bounded queue, so [`TracePool::submit`] blocks once
//! `queue_depth` jobs are waiting. Each worker owns one [`TraceScratch`] for
//! its whole life and shares the scene read-only. Results come back over a
//! channel in completion order, tagged with the job id.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use crate::{
    collision::queries::{RayHit, StaticScene, TraceScratch},
    core::types::Ray,
    error::{PhysicsError, Result},
};

struct TraceJob {
    id: u64,
    rays: Vec<Ray>,
}

/// Hits of one job, in the order its rays were submitted.
#[derive(Debug, Clone)]
pub struct TraceOutcome {
    pub job: u64,
    pub worker: usize,
    pub hits: Vec<Option<RayHit>>,
}

pub struct TracePool {
    jobs: Option<Sender<TraceJob>>,
    results: Receiver<TraceOutcome>,
    workers: Vec<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
    in_flight: usize,
}

impl TracePool {
    pub fn new(scene: Arc<StaticScene>, workers: usize, queue_depth: usize) -> Result<Self> {
        if workers == 0 {
            return Err(PhysicsError::InvalidConfig(
                "trace pool needs at least one worker".into(),
            ));
        }
        if queue_depth == 0 {
            return Err(PhysicsError::InvalidConfig(
                "trace pool queue depth must be positive".into(),
            ));
        }

        let (job_sender, job_receiver) = bounded::<TraceJob>(queue_depth);
        let (result_sender, results) = unbounded();
        let stop = Arc::new(AtomicBool::new(false));

        let mut handles = Vec::with_capacity(workers);
        for index in 0..workers {
            let scene = Arc::clone(&scene);
            let jobs = job_receiver.clone();
            let results = result_sender.clone();
            let stop = Arc::clone(&stop);
            let handle = thread::Builder::new()
                .name(format!("trace-worker-{index}"))
                .spawn(move || worker_loop(index, &scene, &jobs, &results, &stop))
                .map_err(|e| PhysicsError::WorkerSpawn(e.to_string()))?;
            handles.push(handle);
        }

        log::debug!(
            "trace pool started: {} workers, queue depth {}, {} static bodies",
            workers,
            queue_depth,
            scene.len()
        );

        Ok(Self {
            jobs: Some(job_sender),
            results,
            workers: handles,
            stop,
            in_flight: 0,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Jobs submitted whose outcome has not been received yet.
    pub fn pending(&self) -> usize {
        self.in_flight
    }

    /// Queues a job, blocking while the queue is full.
    pub fn submit(&mut self, job: u64, rays: Vec<Ray>) -> Result<()> {
        let sender = self.jobs.as_ref().ok_or(PhysicsError::PoolClosed)?;
        sender
            .send(TraceJob { id: job, rays })
            .map_err(|_| PhysicsError::PoolClosed)?;
        self.in_flight += 1;
        Ok(())
    }

    /// Blocks for the next finished job. `None` once nothing is pending or
    /// the workers have exited.
    pub fn recv(&mut self) -> Option<TraceOutcome> {
        if self.in_flight == 0 {
            return None;
        }
        match self.results.recv() {
            Ok(outcome) => {
                self.in_flight -= 1;
                Some(outcome)
            }
            Err(_) => {
                self.in_flight = 0;
                None
            }
        }
    }

    pub fn try_recv(&mut self) -> Option<TraceOutcome> {
        let outcome = self.results.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(outcome)
    }

    /// Collects every pending outcome, leaving all workers idle.
    pub fn wait_idle(&mut self) -> Vec<TraceOutcome> {
        let mut outcomes = Vec::with_capacity(self.in_flight);
        while let Some(outcome) = self.recv() {
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Stops the workers and joins them. Jobs still queued are dropped; a job
    /// a worker has already started is finished first.
    pub fn shutdown(&mut self) {
        if self.jobs.is_none() && self.workers.is_empty() {
            return;
        }
        self.stop.store(true, Ordering::Release);
        self.jobs = None;

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                log::warn!("trace worker panicked before shutdown");
            }
        }
        log::debug!("trace pool stopped, {} outcomes unclaimed", self.results.len());
    }
}

impl Drop for TracePool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(
    index: usize,
    scene: &StaticScene,
    jobs: &Receiver<TraceJob>,
    results: &Sender<TraceOutcome>,
    stop: &AtomicBool,
) {
    let mut scratch = TraceScratch::new();
    let mut completed = 0usize;

    while let Ok(job) = jobs.recv() {
        if stop.load(Ordering::Acquire) {
            continue;
        }
        let hits = job
            .rays
            .iter()
            .map(|ray| scene.trace(ray, &mut scratch))
            .collect();
        completed += 1;
        let outcome = TraceOutcome {
            job: job.id,
            worker: index,
            hits,
        };
        if results.send(outcome).is_err() {
            break;
        }
    }

    log::debug!("trace worker {index} exiting after {completed} jobs");
}
