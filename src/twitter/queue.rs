//! Single-lane throttled execution queue for upstream API calls.
//!
//! Every call to the Twitter API goes through one [`ThrottledQueue`]. A
//! background worker pulls tasks in FIFO order, runs exactly one at a time and
//! keeps at least `min_interval` between the start of consecutive tasks, no
//! matter how many callers are waiting.

use log::{debug, error};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use super::error::TwitterError;

type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Handle to the queue. Dropping the last handle stops the worker once the
/// tasks already queued have run.
#[derive(Debug)]
pub struct ThrottledQueue {
    jobs: mpsc::UnboundedSender<Job>,
}

impl ThrottledQueue {
    /// Creates the queue and spawns its worker on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn new(min_interval: Duration) -> Self {
        let (jobs, rx) = mpsc::unbounded_channel();
        tokio::spawn(drain(rx, min_interval));
        Self { jobs }
    }

    /// Appends `task` to the queue and returns a future resolving to its
    /// output.
    ///
    /// The task is queued when `enqueue` is called, not when the returned
    /// future is first polled, so tasks run in call order. Dropping the
    /// returned future does not cancel the task; its result is discarded.
    pub fn enqueue<F, T>(&self, task: F) -> impl Future<Output = Result<T, TwitterError>>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job: Job = Box::pin(async move {
            let _ = tx.send(task.await);
        });
        let queued = self.jobs.send(job).is_ok();

        async move {
            if !queued {
                return Err(TwitterError::Queue("queue worker has stopped"));
            }
            rx.await
                .map_err(|_| TwitterError::Queue("task ended without producing a result"))
        }
    }
}

/// Worker loop. It is the only owner of `next_available_at`, which is reserved
/// before a task starts so a task queued behind a slow call still waits its
/// full interval.
async fn drain(mut rx: mpsc::UnboundedReceiver<Job>, min_interval: Duration) {
    let mut next_available_at = Instant::now();

    while let Some(job) = rx.recv().await {
        let now = Instant::now();
        if next_available_at > now {
            debug!(
                "Throttling Twitter API call for {} ms",
                (next_available_at - now).as_millis()
            );
            tokio::time::sleep_until(next_available_at).await;
        }
        next_available_at = Instant::now() + min_interval;

        // Own task per job: a panic is contained and the worker's stack stays flat.
        if let Err(e) = tokio::spawn(job).await {
            error!("Queued Twitter API task failed: {}", e);
        }
    }

    debug!("Twitter API queue closed");
}
