//! Error taxonomy.
//!
//! Only precondition violations, solver failures, worker failures and
//! cancellation are errors. Numeric degeneracy is clamped at the formula
//! layer and infeasible candidates are plain `None` scores, so neither
//! ever shows up here.

use thiserror::Error;

use crate::recovery::SolverError;

/// A failure reported by one worker of a refinement round.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("worker {worker}: {message}")]
pub struct WorkerError {
    /// Index of the request (and therefore the sub-range) that failed.
    pub worker: usize,
    /// Human-readable cause.
    pub message: String,
}

impl WorkerError {
    /// Creates a worker error for the given request index.
    pub fn new(worker: usize, message: impl Into<String>) -> Self {
        Self {
            worker,
            message: message.into(),
        }
    }
}

/// Errors surfaced by the optimizer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizerError {
    /// An upgrade curve with a price multiplier of exactly 1 has no closed form.
    #[error("invalid price multiplier {0}: must differ from 1")]
    InvalidPriceMultiplier(f64),

    /// Upgrade cost requested for a descending level range.
    #[error("invalid level range: target level {to} is below starting level {from}")]
    InvalidLevelRange { from: u32, to: u32 },

    /// Fewer staffed job categories than unknown traits.
    #[error(
        "insufficient job diversity: {staffed} of 5 job categories staffed, at least {required} required"
    )]
    InsufficientJobDiversity { staffed: usize, required: usize },

    /// A capability the operation depends on has not been unlocked.
    #[error("missing capability: {0}")]
    MissingCapability(&'static str),

    /// A search window violates `min <= max` or `step >= 1`.
    #[error("invalid search window: {0}")]
    InvalidWindow(String),

    /// A configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The parameter recovery solver did not produce a trustworthy answer.
    #[error("parameter recovery failed: {0}")]
    Solver(#[from] SolverError),

    /// One or more workers failed; no partial result is returned.
    #[error("{} of {workers} workers failed: {}", .failures.len(), describe(.failures))]
    WorkerFailure {
        workers: usize,
        failures: Vec<WorkerError>,
    },

    /// The caller abandoned the optimization.
    #[error("optimization cancelled")]
    Cancelled,

    /// The state reader could not produce a snapshot.
    #[error("snapshot unavailable for {division}/{city}: {reason}")]
    SnapshotUnavailable {
        division: String,
        city: String,
        reason: String,
    },
}

fn describe(failures: &[WorkerError]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
