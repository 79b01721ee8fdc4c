//! Dispatch of a task set, either serially or on a bounded worker pool.
//!
//! Executors return one result list per worker, in worker order. Ordering across
//! workers is left to the merge step.

use crate::harvest::outcome::{FetchOutcome, FetchResult};
use crate::harvest::task::FetchTask;
use log::{debug, info};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use std::thread;

pub trait Executor {
    fn execute<F>(&self, tasks: &[FetchTask], fetch: F) -> Vec<Vec<FetchResult>>
    where
        F: Fn(&FetchTask) -> FetchOutcome + Sync;
}

/// Runs `tasks` in order, stopping after the first fatal outcome.
pub(crate) fn run_worker<F>(tasks: &[FetchTask], fetch: &F) -> Vec<FetchResult>
where
    F: Fn(&FetchTask) -> FetchOutcome,
{
    let mut results = Vec::with_capacity(tasks.len());
    for task in tasks {
        let outcome = fetch(task);
        let fatal = outcome.is_fatal();
        results.push(FetchResult {
            task: task.clone(),
            outcome,
        });
        if fatal {
            debug!("Worker stopping after fatal outcome of task {}", task);
            break;
        }
    }
    results
}

/// One worker: the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialExecutor;

impl Executor for SerialExecutor {
    fn execute<F>(&self, tasks: &[FetchTask], fetch: F) -> Vec<Vec<FetchResult>>
    where
        F: Fn(&FetchTask) -> FetchOutcome + Sync,
    {
        info!("Dispatching {} tasks serially", tasks.len());
        vec![run_worker(tasks, &fetch)]
    }
}

/// A fixed number of OS threads, each given one contiguous slice of the task set.
pub struct PoolExecutor {
    pool: ThreadPool,
    workers: usize,
}

fn available_cores() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// One less than the available cores, at least one, never more than there are tasks.
pub fn default_workers(task_count: usize) -> usize {
    available_cores()
        .saturating_sub(1)
        .max(1)
        .min(task_count.max(1))
}

/// Pool size for `task_count` tasks. A requested size is bounded by the available
/// cores and the task count.
pub(crate) fn worker_count(requested: Option<usize>, task_count: usize) -> usize {
    match requested {
        Some(requested) => requested
            .min(available_cores())
            .min(task_count)
            .max(1),
        None => default_workers(task_count),
    }
}

impl PoolExecutor {
    pub fn new(workers: usize) -> Result<Self, ThreadPoolBuildError> {
        let workers = workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("euskalmet-worker-{i}"))
            .build()?;
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Executor for PoolExecutor {
    fn execute<F>(&self, tasks: &[FetchTask], fetch: F) -> Vec<Vec<FetchResult>>
    where
        F: Fn(&FetchTask) -> FetchOutcome + Sync,
    {
        if tasks.is_empty() {
            return Vec::new();
        }
        let chunk_size = tasks.len().div_ceil(self.workers);
        info!(
            "Dispatching {} tasks on {} workers ({} tasks each)",
            tasks.len(),
            self.workers,
            chunk_size
        );
        self.pool.install(|| {
            tasks
                .par_chunks(chunk_size)
                .map(|chunk| run_worker(chunk, &fetch))
                .collect()
        })
    }
}
