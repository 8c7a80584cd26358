//! Bounded-concurrency worker queue
//!
//! Fan-out/fan-in primitive behind the coordinator: run every added task with
//! at most `concurrency` inflight, then report all failures and results at
//! once, after the last task has finished.

use futures::FutureExt;
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};

/// Design-default fan-out width
pub const DEFAULT_CONCURRENCY: usize = 3;

/// Aggregate report produced when a queue drains
///
/// Both lists are in completion order, which is not the submission order.
#[derive(Debug)]
pub struct QueueReport<R, E> {
    /// Collected failures
    pub errors: Vec<E>,
    /// Collected successful outputs
    pub results: Vec<R>,
}

impl<R, E> QueueReport<R, E> {
    /// Number of tasks the report covers
    pub fn total(&self) -> usize {
        self.errors.len() + self.results.len()
    }

    /// Whether every task succeeded
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Bounded-concurrency task queue
///
/// Tasks beyond the limit wait; a freed slot immediately starts the next
/// waiting task. One task's failure does not stop the rest or shrink the
/// fan-out.
pub struct WorkerQueue<R, E> {
    concurrency: usize,
    tasks: Vec<BoxFuture<'static, Result<R, E>>>,
}

impl<R, E> WorkerQueue<R, E>
where
    R: Send + 'static,
    E: Send + 'static,
{
    /// Create a queue with the given fan-out width (clamped to at least 1)
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
            tasks: Vec::new(),
        }
    }

    /// Fan-out width the queue drains with
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Number of tasks waiting to run
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no tasks have been added
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Enqueue one task
    pub fn add<F>(&mut self, task: F)
    where
        F: Future<Output = Result<R, E>> + Send + 'static,
    {
        self.tasks.push(task.boxed());
    }

    /// Run everything and report once, after every task has finished
    pub async fn drain(self) -> QueueReport<R, E> {
        let mut report = QueueReport {
            errors: Vec::new(),
            results: Vec::new(),
        };

        let mut outcomes = stream::iter(self.tasks).buffer_unordered(self.concurrency);
        while let Some(outcome) = outcomes.next().await {
            match outcome {
                Ok(result) => report.results.push(result),
                Err(error) => report.errors.push(error),
            }
        }

        report
    }
}

impl<R, E> Default for WorkerQueue<R, E>
where
    R: Send + 'static,
    E: Send + 'static,
{
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}

/// Run one operation per item through a fresh queue
pub async fn run_batch<T, R, E, F, Fut>(
    items: impl IntoIterator<Item = T>,
    operation: F,
    concurrency: usize,
) -> QueueReport<R, E>
where
    R: Send + 'static,
    E: Send + 'static,
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
{
    let mut queue = WorkerQueue::new(concurrency);
    for item in items {
        queue.add(operation(item));
    }
    queue.drain().await
}
