//! Outbound worker pool
//!
//! A fixed number of workers pull jobs from one unbounded queue, so
//! submitting never waits while at most N remote calls are in flight.
//! Jobs from one submitter may run out of submission order.

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

struct Job {
    label: &'static str,
    task: BoxFuture<'static, ()>,
}

type SharedQueue = Arc<tokio::sync::Mutex<mpsc::UnboundedReceiver<Job>>>;

/// Fixed-size pool running fire-and-forget jobs
pub struct Dispatcher {
    queue: Mutex<Option<mpsc::UnboundedSender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    size: usize,
}

impl Dispatcher {
    /// Spawn `size` workers on the current runtime
    pub fn new(size: usize) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let rx: SharedQueue = Arc::new(tokio::sync::Mutex::new(rx));

        let workers = (0..size)
            .map(|worker| tokio::spawn(run_worker(worker, Arc::clone(&rx))))
            .collect();

        tracing::debug!(workers = size, "Dispatcher started");

        Self {
            queue: Mutex::new(Some(tx)),
            workers: Mutex::new(workers),
            size,
        }
    }

    /// Queue a job; returns `false` once the pool is shut down
    pub fn submit<F>(&self, label: &'static str, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let queue = self.queue.lock();
        let Some(tx) = queue.as_ref() else {
            tracing::debug!(task = label, "Dispatcher shut down, job dropped");
            return false;
        };

        tx.send(Job {
            label,
            task: task.boxed(),
        })
        .is_ok()
    }

    /// Stop admitting jobs and wait until queued and running jobs finish
    ///
    /// Only the first call does anything; later calls return `false`.
    pub async fn shutdown(&self) -> bool {
        let Some(tx) = self.queue.lock().take() else {
            return false;
        };
        drop(tx);

        let workers = std::mem::take(&mut *self.workers.lock());
        for worker in workers {
            if let Err(e) = worker.await {
                tracing::warn!(error = %e, "Dispatcher worker ended abnormally");
            }
        }

        tracing::debug!("Dispatcher shut down");
        true
    }

    pub fn is_running(&self) -> bool {
        self.queue.lock().is_some()
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("size", &self.size)
            .field("running", &self.is_running())
            .finish()
    }
}

async fn run_worker(worker: usize, queue: SharedQueue) {
    loop {
        // Hold the lock only while waiting, not while running the job
        let job = queue.lock().await.recv().await;
        let Some(Job { label, task }) = job else {
            break;
        };

        tracing::trace!(worker, task = label, "Running job");
        if AssertUnwindSafe(task).catch_unwind().await.is_err() {
            tracing::error!(worker, task = label, "Job panicked");
        }
    }
    tracing::trace!(worker, "Worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_shutdown_drains_queue() {
        let pool = Dispatcher::new(2);
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..20 {
            let done = done.clone();
            assert!(pool.submit("count", async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                done.fetch_add(1, Ordering::SeqCst);
            }));
        }

        assert!(pool.shutdown().await);
        assert_eq!(done.load(Ordering::SeqCst), 20);

        assert!(!pool.submit("late", async {}));
        assert!(!pool.shutdown().await);
        assert!(!pool.is_running());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_is_bounded() {
        let pool = Dispatcher::new(3);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        for _ in 0..30 {
            let running = running.clone();
            let peak = peak.clone();
            pool.submit("probe", async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                running.fetch_sub(1, Ordering::SeqCst);
            });
        }

        pool.shutdown().await;
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_panicking_job_keeps_worker() {
        let pool = Dispatcher::new(1);
        let done = Arc::new(AtomicUsize::new(0));

        pool.submit("boom", async { panic!("job failure") });
        let after = done.clone();
        pool.submit("after", async move {
            after.fetch_add(1, Ordering::SeqCst);
        });

        pool.shutdown().await;
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }
}
