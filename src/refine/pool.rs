//! Worker pools that execute grid passes.
//!
//! A round is a batch of [`SearchRequest`]s, one per operations sub-range.
//! Each request owns its scorer, so workers share nothing but the
//! cancellation flag.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use crate::error::OptimizerError;
use crate::error::WorkerError;
use crate::grid::{GridPass, GridSearch, RefinementWindow, StaffingConstraints};
use crate::scoring::CandidateScorer;
use crate::topk::SortStrategy;

/// Work for one worker.
#[derive(Debug, Clone)]
pub struct SearchRequest<S> {
    /// Position of this request within its round.
    pub worker: usize,
    pub scorer: S,
    pub window: RefinementWindow,
    pub constraints: StaffingConstraints,
    pub strategy: SortStrategy,
    pub capacity: usize,
}

/// A worker's partial top-K.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub worker: usize,
    pub pass: GridPass,
}

impl<S: CandidateScorer> SearchRequest<S> {
    /// Runs the grid pass in the calling thread.
    ///
    /// Errors and panics become a [`WorkerError`] for this request.
    pub fn execute(&self, cancel: &AtomicBool) -> Result<SearchResponse, WorkerError> {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            GridSearch::run(
                &self.scorer,
                &self.window,
                &self.constraints,
                self.strategy,
                self.capacity,
                cancel,
            )
        }));
        match outcome {
            Ok(Ok(pass)) => Ok(SearchResponse {
                worker: self.worker,
                pass,
            }),
            Ok(Err(e)) => Err(WorkerError::new(self.worker, e.to_string())),
            Err(payload) => Err(WorkerError::new(
                self.worker,
                format!("panicked: {}", panic_message(payload.as_ref())),
            )),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Executes the requests of one round.
///
/// Implementations must return exactly one result per request, in request
/// order, and must not return before every request has finished.
pub trait WorkerPool {
    /// Number of requests a round is split into.
    fn parallelism(&self) -> usize;

    fn dispatch<S: CandidateScorer>(
        &self,
        requests: Vec<SearchRequest<S>>,
        cancel: &Arc<AtomicBool>,
    ) -> Vec<Result<SearchResponse, WorkerError>>;
}

/// Runs every request in the calling thread, one after another.
///
/// Still partitions the work, so results match a parallel pool of the same
/// width exactly.
#[derive(Debug, Clone, Copy)]
pub struct SequentialPool {
    parallelism: usize,
}

impl SequentialPool {
    pub fn new(parallelism: usize) -> Self {
        Self {
            parallelism: parallelism.max(1),
        }
    }
}

impl Default for SequentialPool {
    fn default() -> Self {
        Self::new(1)
    }
}

impl WorkerPool for SequentialPool {
    fn parallelism(&self) -> usize {
        self.parallelism
    }

    fn dispatch<S: CandidateScorer>(
        &self,
        requests: Vec<SearchRequest<S>>,
        cancel: &Arc<AtomicBool>,
    ) -> Vec<Result<SearchResponse, WorkerError>> {
        requests.iter().map(|r| r.execute(cancel)).collect()
    }
}

/// Runs requests on a dedicated rayon thread pool.
#[cfg(feature = "parallel")]
#[derive(Debug)]
pub struct RayonPool {
    pool: rayon::ThreadPool,
    threads: usize,
}

#[cfg(feature = "parallel")]
impl RayonPool {
    /// Builds a pool of `threads` workers.
    ///
    /// # Errors
    ///
    /// [`OptimizerError::InvalidConfig`] when `threads` is 0 or the
    /// threads cannot be spawned.
    pub fn new(threads: usize) -> Result<Self, OptimizerError> {
        if threads == 0 {
            return Err(OptimizerError::InvalidConfig(
                "worker pool needs at least one thread".into(),
            ));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("corp-optim-{i}"))
            .build()
            .map_err(|e| OptimizerError::InvalidConfig(e.to_string()))?;
        Ok(Self { pool, threads })
    }
}

#[cfg(feature = "parallel")]
impl WorkerPool for RayonPool {
    fn parallelism(&self) -> usize {
        self.threads
    }

    fn dispatch<S: CandidateScorer>(
        &self,
        requests: Vec<SearchRequest<S>>,
        cancel: &Arc<AtomicBool>,
    ) -> Vec<Result<SearchResponse, WorkerError>> {
        use rayon::prelude::*;

        self.pool.install(|| {
            requests
                .par_iter()
                .map(|r| r.execute(cancel))
                .collect()
        })
    }
}
