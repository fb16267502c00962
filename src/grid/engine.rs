//! Exhaustive enumeration of one refinement window.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::debug;

use super::types::{GridPass, PassStats, StaffingConstraints};
use super::window::RefinementWindow;
use crate::error::OptimizerError;
use crate::scoring::CandidateScorer;
use crate::topk::{BoundedTopK, SortStrategy};

/// Scores every point of a window and keeps the best `capacity`.
///
/// # Usage
///
/// ```
/// use std::sync::atomic::AtomicBool;
/// use corp_optim::grid::{GridSearch, RefinementWindow, StaffingConstraints};
/// use corp_optim::model::{ScoredCandidate, StaffingAssignment};
/// use corp_optim::scoring::CandidateScorer;
/// use corp_optim::topk::SortStrategy;
///
/// #[derive(Clone)]
/// struct Operators;
///
/// impl CandidateScorer for Operators {
///     fn score(&self, a: &StaffingAssignment) -> Option<ScoredCandidate> {
///         let mut c = ScoredCandidate::new(*a);
///         c.raw_production = a.operations as f64;
///         Some(c)
///     }
/// }
///
/// let constraints = StaffingConstraints::new(9, 0);
/// let pass = GridSearch::run(
///     &Operators,
///     &RefinementWindow::full(9),
///     &constraints,
///     SortStrategy::RawProduction,
///     3,
///     &AtomicBool::new(false),
/// )
/// .unwrap();
/// assert_eq!(pass.candidates[0].assignment.operations, 9);
/// ```
pub struct GridSearch;

impl GridSearch {
    /// Runs one pass.
    ///
    /// Operations, engineer and management are enumerated over `window`;
    /// business takes the remaining headcount. Points with neither
    /// operations nor engineers, or that exceed the headcount, are skipped
    /// without scoring. `cancel` is polled once per operations value.
    ///
    /// # Errors
    ///
    /// [`OptimizerError::InvalidWindow`] for a malformed window and
    /// [`OptimizerError::Cancelled`] once `cancel` is set.
    pub fn run<S: CandidateScorer>(
        scorer: &S,
        window: &RefinementWindow,
        constraints: &StaffingConstraints,
        strategy: SortStrategy,
        capacity: usize,
        cancel: &AtomicBool,
    ) -> Result<GridPass, OptimizerError> {
        window.validate()?;
        let started = Instant::now();
        let mut top = BoundedTopK::new(capacity, strategy);
        let mut stats = PassStats::default();

        for ops in window.operations.points() {
            if cancel.load(Ordering::Relaxed) {
                return Err(OptimizerError::Cancelled);
            }
            for eng in window.engineer.points() {
                for mgmt in window.management.points() {
                    if ops == 0 && eng == 0 {
                        stats.skipped += 1;
                        continue;
                    }
                    let Some(assignment) = constraints.assignment(ops, eng, mgmt) else {
                        stats.skipped += 1;
                        continue;
                    };
                    stats.evaluated += 1;
                    if let Some(candidate) = scorer.score(&assignment) {
                        stats.feasible += 1;
                        top.offer(candidate);
                    }
                }
            }
        }

        debug!(
            evaluated = stats.evaluated,
            feasible = stats.feasible,
            skipped = stats.skipped,
            ops_min = window.operations.min,
            ops_max = window.operations.max,
            elapsed_us = started.elapsed().as_micros() as u64,
            "grid pass complete"
        );

        Ok(GridPass {
            candidates: top.into_sorted_vec(),
            stats,
        })
    }
}
