//! tokio-backed job dispatcher.

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::queue::{EnqueueOptions, Job, JobDispatcher};

/// Spawns each job as an independent tokio task.
///
/// There is no surrounding transaction in process, so `after_commit` jobs
/// start immediately. Wrap a [`DeferredDispatcher`](super::DeferredDispatcher)
/// when jobs must wait for a commit.
#[derive(Debug)]
pub struct TokioDispatcher {
    handle: Handle,
    running: Mutex<Vec<JoinHandle<()>>>,
}

impl TokioDispatcher {
    /// Dispatcher on the runtime of the calling task.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            running: Mutex::new(Vec::new()),
        }
    }

    /// Wait for every job spawned so far to finish.
    pub async fn wait_idle(&self) {
        loop {
            let handles = std::mem::take(&mut *self.running.lock());
            if handles.is_empty() {
                return;
            }
            for handle in handles {
                if let Err(e) = handle.await {
                    warn!(error = %e, "background job failed");
                }
            }
        }
    }
}

impl JobDispatcher for TokioDispatcher {
    fn enqueue(&self, name: &'static str, options: EnqueueOptions, job: Job) {
        debug!(job = name, queue = %options.queue, "spawning job");
        let handle = self.handle.spawn(job);
        let mut running = self.running.lock();
        running.retain(|h| !h.is_finished());
        running.push(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn spawned_job_completes() {
        let done = Arc::new(AtomicBool::new(false));
        let dispatcher = TokioDispatcher::current();

        let flag = Arc::clone(&done);
        dispatcher.enqueue(
            "flag",
            EnqueueOptions::short_after_commit(),
            async move { flag.store(true, Ordering::SeqCst) }.boxed(),
        );

        dispatcher.wait_idle().await;
        assert!(done.load(Ordering::SeqCst));
    }
}
