//! # Submission Pool
//!
//! Ordered background execution for message submission tasks.
//!
//! Protocol messages of one exchange must reach the counterparty in the
//! order they were authored, while unrelated exchanges should not wait
//! on each other. The pool therefore runs a fixed set of worker lanes;
//! each task is routed to a lane by hashing its exchange id, so tasks
//! sharing an exchange share a lane and run FIFO, and tasks on other
//! lanes proceed concurrently.
//!
//! ```text
//! dispatch(exchange_id, task)
//!        |
//!        v  hash(exchange_id) % lanes
//! [lane 0] [lane 1] ... [lane N]     each lane: FIFO worker
//! ```
//!
//! [`SubmissionPool::shutdown`] closes the lanes and waits for every
//! queued task to finish, so callers can drain in-flight submissions
//! before exiting.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::value_objects::ExchangeId;

type Task = BoxFuture<'static, ()>;

/// Lane-partitioned worker pool for submission tasks.
#[derive(Debug)]
pub struct SubmissionPool {
    /// One sender per lane; cleared on shutdown.
    lanes: Mutex<Vec<mpsc::Sender<Task>>>,
    /// Worker join handles, awaited on shutdown.
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl SubmissionPool {
    /// Creates a pool with `lanes` workers and `capacity` queued tasks
    /// per lane.
    ///
    /// Both values are clamped to at least 1.
    #[must_use]
    pub fn new(lanes: usize, capacity: usize) -> Self {
        let lane_count = lanes.max(1);
        let capacity = capacity.max(1);

        let mut senders = Vec::with_capacity(lane_count);
        let mut workers = Vec::with_capacity(lane_count);

        for lane in 0..lane_count {
            let (tx, mut rx) = mpsc::channel::<Task>(capacity);
            senders.push(tx);
            workers.push(tokio::spawn(async move {
                while let Some(task) = rx.recv().await {
                    task.await;
                }
                tracing::debug!(lane, "submission lane drained");
            }));
        }

        Self {
            lanes: Mutex::new(senders),
            workers: Mutex::new(workers),
        }
    }

    /// Queues a task on the lane owning `key`.
    ///
    /// Applies backpressure when the lane queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::SubmissionPoolClosed`] after
    /// [`shutdown`](Self::shutdown).
    pub async fn dispatch<F>(&self, key: &ExchangeId, task: F) -> ApplicationResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let sender = {
            let lanes = self.lanes.lock();
            if lanes.is_empty() {
                return Err(ApplicationError::SubmissionPoolClosed);
            }
            let mut hasher = DefaultHasher::new();
            key.hash(&mut hasher);
            let index = (hasher.finish() as usize) % lanes.len();
            lanes
                .get(index)
                .cloned()
                .ok_or(ApplicationError::SubmissionPoolClosed)?
        };

        sender
            .send(Box::pin(task))
            .await
            .map_err(|_| ApplicationError::SubmissionPoolClosed)
    }

    /// Returns true if the pool no longer accepts tasks.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.lanes.lock().is_empty()
    }

    /// Closes the lanes and waits for queued tasks to finish.
    ///
    /// Safe to call more than once; later calls return immediately.
    pub async fn shutdown(&self) {
        self.lanes.lock().clear();

        let workers: Vec<JoinHandle<()>> = std::mem::take(&mut *self.workers.lock());
        for worker in workers {
            // Drained workers exit on their own once senders are gone.
            let _ = worker.await;
        }
    }
}
