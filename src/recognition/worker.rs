//! Background recognition worker
//!
//! A dedicated thread owning a tokio runtime so the UI thread never blocks
//! on the network round-trip. Jobs are processed in arrival order, one at a
//! time; a submitted job always runs to completion or failure.

use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::thread::JoinHandle;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use super::{RecognitionClient, RecognitionError};
use crate::canvas::StrokeBounds;

/// A completed stroke submitted for recognition
#[derive(Debug)]
pub struct RecognitionJob {
    /// PNG-encoded crop of the stroke's bounding region
    pub png: Vec<u8>,
    /// The region's placement, in surface coordinates at submission time
    pub bounds: StrokeBounds,
    /// Surface dimensions at submission time, for reflow if the surface
    /// resizes while the request is in flight
    pub surface_size: (f32, f32),
}

/// The settled result of a recognition job
#[derive(Debug)]
pub struct RecognitionOutcome {
    pub bounds: StrokeBounds,
    pub surface_size: (f32, f32),
    pub result: Result<String, RecognitionError>,
}

/// Handle to the recognition worker thread
pub struct RecognitionWorker {
    job_tx: Option<Sender<RecognitionJob>>,
    outcome_rx: Receiver<RecognitionOutcome>,
    handle: Option<JoinHandle<()>>,
}

impl RecognitionWorker {
    /// Spawn the worker thread with its own tokio runtime
    pub fn spawn(client: RecognitionClient) -> Result<Self> {
        let runtime = Runtime::new().context("Failed to create tokio runtime")?;
        let (job_tx, job_rx) = unbounded::<RecognitionJob>();
        let (outcome_tx, outcome_rx) = unbounded();

        let handle = std::thread::spawn(move || {
            info!("Recognition worker starting...");
            while let Ok(job) = job_rx.recv() {
                debug!(bytes = job.png.len(), "processing recognition job");
                let result = runtime.block_on(client.recognize(&job.png));
                let outcome = RecognitionOutcome {
                    bounds: job.bounds,
                    surface_size: job.surface_size,
                    result,
                };
                if outcome_tx.send(outcome).is_err() {
                    break;
                }
            }
            info!("Recognition worker exiting...");
        });

        Ok(Self {
            job_tx: Some(job_tx),
            outcome_rx,
            handle: Some(handle),
        })
    }

    /// Queue a job for the worker
    pub fn submit(&self, job: RecognitionJob) {
        if let Some(tx) = &self.job_tx {
            let _ = tx.send(job);
        }
    }

    /// Take the next settled outcome without blocking
    pub fn try_recv(&self) -> Option<RecognitionOutcome> {
        self.outcome_rx.try_recv().ok()
    }
}

impl Drop for RecognitionWorker {
    fn drop(&mut self) {
        // Closing the job channel lets the thread's recv loop exit
        self.job_tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
