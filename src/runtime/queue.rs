//! Background job dispatch.

use std::fmt;

use futures::future::BoxFuture;
use parking_lot::Mutex;
use tracing::debug;

/// A unit of background work.
pub type Job = BoxFuture<'static, ()>;

/// Named worker queue a job is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Queue {
    Short,
    #[default]
    Default,
    Long,
}

impl fmt::Display for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Short => f.write_str("short"),
            Self::Default => f.write_str("default"),
            Self::Long => f.write_str("long"),
        }
    }
}

/// How a job should be enqueued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnqueueOptions {
    pub queue: Queue,
    /// Only start the job once the caller's transaction has committed.
    pub after_commit: bool,
}

impl EnqueueOptions {
    /// Short queue, after commit. Used for status refreshes.
    pub fn short_after_commit() -> Self {
        Self {
            queue: Queue::Short,
            after_commit: true,
        }
    }
}

/// Dispatches jobs without waiting for them.
pub trait JobDispatcher: Send + Sync {
    fn enqueue(&self, name: &'static str, options: EnqueueOptions, job: Job);
}

struct PendingJob {
    name: &'static str,
    options: EnqueueOptions,
    job: Job,
}

/// Buffers jobs until the surrounding transaction commits.
///
/// `commit` hands buffered jobs to the caller (or [`run_pending`](Self::run_pending)
/// runs them in enqueue order); `rollback` discards them.
#[derive(Default)]
pub struct DeferredDispatcher {
    pending: Mutex<Vec<PendingJob>>,
}

impl fmt::Debug for DeferredDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredDispatcher")
            .field("pending", &self.len())
            .finish()
    }
}

impl DeferredDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names and options of the buffered jobs, in enqueue order.
    pub fn pending(&self) -> Vec<(&'static str, EnqueueOptions)> {
        self.pending
            .lock()
            .iter()
            .map(|p| (p.name, p.options))
            .collect()
    }

    /// Take all buffered jobs, leaving the buffer empty.
    pub fn commit(&self) -> Vec<Job> {
        let jobs = std::mem::take(&mut *self.pending.lock());
        debug!(jobs = jobs.len(), "committing deferred jobs");
        jobs.into_iter().map(|p| p.job).collect()
    }

    /// Commit and run every buffered job to completion, one after another.
    pub async fn run_pending(&self) {
        for job in self.commit() {
            job.await;
        }
    }

    /// Discard all buffered jobs.
    pub fn rollback(&self) {
        let dropped = std::mem::take(&mut *self.pending.lock());
        debug!(jobs = dropped.len(), "discarding deferred jobs");
    }
}

impl JobDispatcher for DeferredDispatcher {
    fn enqueue(&self, name: &'static str, options: EnqueueOptions, job: Job) {
        debug!(job = name, queue = %options.queue, "deferring job");
        self.pending.lock().push(PendingJob { name, options, job });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_job(counter: &Arc<AtomicUsize>) -> Job {
        let counter = Arc::clone(counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
        .boxed()
    }

    #[tokio::test]
    async fn jobs_run_only_after_commit() {
        let counter = Arc::new(AtomicUsize::new(0));
        let dispatcher = DeferredDispatcher::new();
        dispatcher.enqueue("a", EnqueueOptions::short_after_commit(), counting_job(&counter));
        dispatcher.enqueue("b", EnqueueOptions::default(), counting_job(&counter));

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(
            dispatcher.pending(),
            vec![
                ("a", EnqueueOptions::short_after_commit()),
                ("b", EnqueueOptions::default())
            ]
        );

        dispatcher.run_pending().await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn rollback_discards_jobs() {
        let counter = Arc::new(AtomicUsize::new(0));
        let dispatcher = DeferredDispatcher::new();
        dispatcher.enqueue("a", EnqueueOptions::short_after_commit(), counting_job(&counter));
        dispatcher.rollback();
        assert!(dispatcher.is_empty());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn queue_names() {
        assert_eq!(Queue::Short.to_string(), "short");
        assert_eq!(EnqueueOptions::default().queue, Queue::Default);
    }
}
