//! Partitioned grid search with iterative narrowing.
//!
//! [`RefinementRunner`] orchestrates the whole search:
//! partition → dispatch → merge → narrow around the best → repeat.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::config::RefinementConfig;
use super::pool::{SearchRequest, WorkerPool};
use crate::error::OptimizerError;
use crate::grid::{PassStats, RefinementWindow, StaffingConstraints};
use crate::model::{Item, ProductionSnapshot, ScoredCandidate};
use crate::scoring::{CandidateScorer, EconomicScorer};
use crate::topk::{merge_sorted, SortStrategy};

/// Summary of one round.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundSummary {
    pub window: RefinementWindow,
    /// Primary metric of the round's best candidate.
    pub best_metric: Option<f64>,
    pub stats: PassStats,
}

/// Result of a refinement run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RefinementResult {
    /// Merged top-K of the final round, best first. Empty when nothing was
    /// feasible.
    pub candidates: Vec<ScoredCandidate>,

    /// Narrowing rounds executed after the initial pass.
    pub reruns: usize,

    /// Coarsest step of the final round.
    pub final_step: u32,

    /// Counters summed over every round.
    pub stats: PassStats,

    /// One entry per round, initial pass first.
    pub history: Vec<RoundSummary>,
}

impl RefinementResult {
    pub fn best(&self) -> Option<&ScoredCandidate> {
        self.candidates.first()
    }
}

/// Executes the refinement search.
///
/// # Usage
///
/// ```ignore
/// let scorer = EconomicScorer::new(snapshot, item, SortStrategy::Profit)?;
/// let config = RefinementConfig::default().with_max_reruns(3);
/// let pool = SequentialPool::new(config.resolved_parallelism());
/// let result = RefinementRunner::run(&scorer, &constraints, &config, &pool)?;
/// println!("best: {:?}", result.best());
/// ```
pub struct RefinementRunner;

impl RefinementRunner {
    /// Runs the search to completion.
    pub fn run<S: CandidateScorer, P: WorkerPool>(
        scorer: &S,
        constraints: &StaffingConstraints,
        config: &RefinementConfig,
        pool: &P,
    ) -> Result<RefinementResult, OptimizerError> {
        Self::run_with_cancel(scorer, constraints, config, pool, None)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// Workers poll the flag once per operations value and the runner checks
    /// it between rounds. Once it is set the call returns
    /// [`OptimizerError::Cancelled`]; no partial result is ever returned.
    ///
    /// # Errors
    ///
    /// Invalid configuration or window, cancellation, or
    /// [`OptimizerError::WorkerFailure`] listing every worker that failed in
    /// the aborted round.
    pub fn run_with_cancel<S: CandidateScorer, P: WorkerPool>(
        scorer: &S,
        constraints: &StaffingConstraints,
        config: &RefinementConfig,
        pool: &P,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<RefinementResult, OptimizerError> {
        config.validate().map_err(OptimizerError::InvalidConfig)?;
        constraints.validate()?;
        let cancel = cancel.unwrap_or_default();
        let started = Instant::now();

        let bounds = config
            .window
            .unwrap_or_else(|| RefinementWindow::full(constraints.searchable()));
        bounds.validate()?;

        let mut window = bounds;
        let mut history = Vec::with_capacity(config.max_reruns + 1);
        let mut reruns = 0usize;

        let mut candidates =
            Self::round(scorer, &window, constraints, config, pool, &cancel, &mut history)?;

        while window.max_step() > 1 && reruns < config.max_reruns {
            let Some(best) = candidates.first() else {
                break;
            };
            if cancel.load(Ordering::Relaxed) {
                return Err(OptimizerError::Cancelled);
            }
            window = window.refined_around(best.assignment.grid_point(), &bounds);
            reruns += 1;
            candidates =
                Self::round(scorer, &window, constraints, config, pool, &cancel, &mut history)?;
        }

        let total = history.iter().fold(PassStats::default(), |mut acc, r| {
            acc.merge(&r.stats);
            acc
        });

        info!(
            reruns,
            final_step = window.max_step(),
            evaluated = total.evaluated,
            feasible = total.feasible,
            retained = candidates.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "staffing refinement complete"
        );

        Ok(RefinementResult {
            candidates,
            reruns,
            final_step: window.max_step(),
            stats: total,
            history,
        })
    }

    /// Partitions `window`, dispatches it and merges the partial results.
    fn round<S: CandidateScorer, P: WorkerPool>(
        scorer: &S,
        window: &RefinementWindow,
        constraints: &StaffingConstraints,
        config: &RefinementConfig,
        pool: &P,
        cancel: &Arc<AtomicBool>,
        history: &mut Vec<RoundSummary>,
    ) -> Result<Vec<ScoredCandidate>, OptimizerError> {
        let started = Instant::now();
        let requests: Vec<SearchRequest<S>> = window
            .split_operations(pool.parallelism())
            .into_iter()
            .enumerate()
            .map(|(worker, sub)| SearchRequest {
                worker,
                scorer: scorer.clone(),
                window: sub,
                constraints: *constraints,
                strategy: config.strategy,
                capacity: config.top_k,
            })
            .collect();
        let workers = requests.len();

        let results = pool.dispatch(requests, cancel);
        if cancel.load(Ordering::Relaxed) {
            return Err(OptimizerError::Cancelled);
        }

        let mut partials = Vec::with_capacity(workers);
        let mut failures = Vec::new();
        let mut stats = PassStats::default();
        for result in results {
            match result {
                Ok(response) => {
                    stats.merge(&response.pass.stats);
                    partials.push(response.pass.candidates);
                }
                Err(e) => failures.push(e),
            }
        }
        if !failures.is_empty() {
            for f in &failures {
                warn!(worker = f.worker, message = %f.message, "refinement worker failed");
            }
            return Err(OptimizerError::WorkerFailure { workers, failures });
        }

        let merged = merge_sorted(partials, config.top_k, &config.strategy);
        let best_metric = merged.first().map(|c| config.strategy.metrics(c).0);
        debug!(
            round = history.len(),
            workers,
            step = window.max_step(),
            evaluated = stats.evaluated,
            feasible = stats.feasible,
            best = ?best_metric,
            elapsed_us = started.elapsed().as_micros() as u64,
            "refinement round complete"
        );
        history.push(RoundSummary {
            window: *window,
            best_metric,
            stats,
        });
        Ok(merged)
    }
}

/// Finds the best staffing layouts for one office and item.
///
/// Runs the default [`RefinementConfig`] with `strategy` and `max_reruns`
/// on a rayon pool sized to the machine (or in-thread when the `parallel`
/// feature is off). Returns candidates best first; an empty list means no
/// layout was feasible.
///
/// # Errors
///
/// See [`EconomicScorer::new`] and [`RefinementRunner::run_with_cancel`].
pub fn optimize_staffing(
    snapshot: &ProductionSnapshot,
    constraints: &StaffingConstraints,
    item: &Item,
    strategy: SortStrategy,
    max_reruns: usize,
) -> Result<Vec<ScoredCandidate>, OptimizerError> {
    let scorer = EconomicScorer::new(snapshot.clone(), *item, strategy)?;
    let config = RefinementConfig::default()
        .with_strategy(strategy)
        .with_max_reruns(max_reruns);

    #[cfg(feature = "parallel")]
    let pool = super::pool::RayonPool::new(config.resolved_parallelism())?;
    #[cfg(not(feature = "parallel"))]
    let pool = super::pool::SequentialPool::new(config.resolved_parallelism());

    RefinementRunner::run(&scorer, constraints, &config, &pool).map(|r| r.candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkerError;
    use crate::grid::Dimension;
    use crate::model::{MaterialListing, StaffingAssignment};
    use crate::refine::pool::{SearchResponse, SequentialPool};
    use crate::topk::Ranking;

    /// Single peak at `peak`; rejects layouts without business staff.
    #[derive(Clone)]
    struct Peak {
        peak: [f64; 3],
    }

    impl CandidateScorer for Peak {
        fn score(&self, a: &StaffingAssignment) -> Option<ScoredCandidate> {
            if a.business == 0 {
                return None;
            }
            let [p, q, r] = self.peak;
            let d = (a.operations as f64 - p).powi(2)
                + 2.0 * (a.engineer as f64 - q).powi(2)
                + 0.5 * (a.management as f64 - r).powi(2);
            let mut c = ScoredCandidate::new(*a);
            c.raw_production = 1e7 - d;
            c.profit = c.raw_production;
            Some(c)
        }
    }

    fn peak() -> Peak {
        Peak {
            peak: [137.0, 61.0, 29.0],
        }
    }

    fn coarse_window() -> RefinementWindow {
        let dim = Dimension::new(0, 200, 3).unwrap();
        RefinementWindow::new(dim, dim, dim).unwrap()
    }

    fn config() -> RefinementConfig {
        RefinementConfig::default()
            .with_strategy(SortStrategy::RawProduction)
            .with_window(coarse_window())
            .with_max_reruns(5)
    }

    fn brute_force_best(scorer: &Peak, constraints: &StaffingConstraints) -> ScoredCandidate {
        let mut best: Option<ScoredCandidate> = None;
        for ops in 0..=200 {
            for eng in 0..=200 {
                for mgmt in 0..=200 {
                    if ops + eng == 0 {
                        continue;
                    }
                    let Some(a) = constraints.assignment(ops, eng, mgmt) else {
                        continue;
                    };
                    let Some(c) = scorer.score(&a) else {
                        continue;
                    };
                    let better = match &best {
                        Some(b) => SortStrategy::RawProduction.compare(&c, b).is_gt(),
                        None => true,
                    };
                    if better {
                        best = Some(c);
                    }
                }
            }
        }
        best.unwrap()
    }

    #[test]
    fn test_refinement_matches_brute_force() {
        let constraints = StaffingConstraints::new(300, 0);
        let result =
            RefinementRunner::run(&peak(), &constraints, &config(), &SequentialPool::new(4))
                .unwrap();
        let expected = brute_force_best(&peak(), &constraints);
        assert_eq!(result.best().unwrap().assignment, expected.assignment);
        assert_eq!(expected.assignment.grid_point(), [137, 61, 29]);
        assert_eq!(result.final_step, 1);
        assert!(result.reruns >= 1);
        assert_eq!(result.history.len(), result.reruns + 1);
    }

    #[test]
    fn test_results_are_best_first_and_bounded() {
        let constraints = StaffingConstraints::new(300, 0);
        let result =
            RefinementRunner::run(&peak(), &constraints, &config(), &SequentialPool::new(3))
                .unwrap();
        assert_eq!(result.candidates.len(), 10);
        for pair in result.candidates.windows(2) {
            assert!(SortStrategy::RawProduction.compare(&pair[0], &pair[1]).is_gt());
        }
    }

    #[test]
    fn test_worker_count_does_not_change_result() {
        let constraints = StaffingConstraints::new(300, 0);
        let one = RefinementRunner::run(&peak(), &constraints, &config(), &SequentialPool::new(1))
            .unwrap();
        let seven =
            RefinementRunner::run(&peak(), &constraints, &config(), &SequentialPool::new(7))
                .unwrap();
        assert_eq!(one.candidates, seven.candidates);
    }

    #[test]
    fn test_best_never_gets_worse_across_rounds() {
        let constraints = StaffingConstraints::new(300, 0);
        let result =
            RefinementRunner::run(&peak(), &constraints, &config(), &SequentialPool::new(2))
                .unwrap();
        let metrics: Vec<f64> = result
            .history
            .iter()
            .map(|r| r.best_metric.unwrap())
            .collect();
        for pair in metrics.windows(2) {
            assert!(pair[1] >= pair[0], "{metrics:?}");
        }
    }

    #[test]
    fn test_zero_reruns_stops_after_initial_pass() {
        let constraints = StaffingConstraints::new(300, 0);
        let result = RefinementRunner::run(
            &peak(),
            &constraints,
            &config().with_max_reruns(0),
            &SequentialPool::new(2),
        )
        .unwrap();
        assert_eq!(result.reruns, 0);
        assert_eq!(result.final_step, 3);
    }

    #[test]
    fn test_unit_step_window_needs_no_rerun() {
        let constraints = StaffingConstraints::new(40, 0);
        let result = RefinementRunner::run(
            &peak(),
            &constraints,
            &RefinementConfig::default().with_strategy(SortStrategy::RawProduction),
            &SequentialPool::new(2),
        )
        .unwrap();
        assert_eq!(result.reruns, 0);
        assert_eq!(result.history.len(), 1);
    }

    #[test]
    fn test_nothing_feasible_returns_empty() {
        #[derive(Clone)]
        struct Never;
        impl CandidateScorer for Never {
            fn score(&self, _: &StaffingAssignment) -> Option<ScoredCandidate> {
                None
            }
        }
        let result = RefinementRunner::run(
            &Never,
            &StaffingConstraints::new(300, 0),
            &config(),
            &SequentialPool::new(2),
        )
        .unwrap();
        assert!(result.candidates.is_empty());
        assert_eq!(result.reruns, 0);
    }

    /// Fails the requests whose index is listed.
    struct FlakyPool {
        failing: Vec<usize>,
    }

    impl WorkerPool for FlakyPool {
        fn parallelism(&self) -> usize {
            4
        }

        fn dispatch<S: CandidateScorer>(
            &self,
            requests: Vec<SearchRequest<S>>,
            cancel: &Arc<AtomicBool>,
        ) -> Vec<Result<SearchResponse, WorkerError>> {
            requests
                .iter()
                .map(|r| {
                    if self.failing.contains(&r.worker) {
                        Err(WorkerError::new(r.worker, "connection lost"))
                    } else {
                        r.execute(cancel)
                    }
                })
                .collect()
        }
    }

    #[test]
    fn test_worker_failure_aborts_with_aggregate_error() {
        let err = RefinementRunner::run(
            &peak(),
            &StaffingConstraints::new(300, 0),
            &config(),
            &FlakyPool {
                failing: vec![1, 3],
            },
        )
        .unwrap_err();
        match err {
            OptimizerError::WorkerFailure { workers, failures } => {
                assert_eq!(workers, 4);
                let ids: Vec<usize> = failures.iter().map(|f| f.worker).collect();
                assert_eq!(ids, vec![1, 3]);
            }
            other => panic!("expected WorkerFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_panicking_scorer_is_a_worker_failure() {
        #[derive(Clone)]
        struct Fragile;
        impl CandidateScorer for Fragile {
            fn score(&self, a: &StaffingAssignment) -> Option<ScoredCandidate> {
                assert!(a.operations <= 150, "bad row");
                Some(ScoredCandidate::new(*a))
            }
        }
        let err = RefinementRunner::run(
            &Fragile,
            &StaffingConstraints::new(300, 0),
            &config(),
            &SequentialPool::new(4),
        )
        .unwrap_err();
        assert!(
            matches!(&err, OptimizerError::WorkerFailure { failures, .. } if failures.len() == 1),
            "{err:?}"
        );
    }

    #[test]
    fn test_cancelled_before_start() {
        let cancel = Arc::new(AtomicBool::new(true));
        let err = RefinementRunner::run_with_cancel(
            &peak(),
            &StaffingConstraints::new(300, 0),
            &config(),
            &SequentialPool::new(2),
            Some(cancel),
        )
        .unwrap_err();
        assert_eq!(err, OptimizerError::Cancelled);
    }

    #[test]
    fn test_cancel_raised_during_round() {
        /// Raises the flag the first time it dispatches.
        struct CancelAfterFirstRound {
            inner: SequentialPool,
            flag: Arc<AtomicBool>,
        }
        impl WorkerPool for CancelAfterFirstRound {
            fn parallelism(&self) -> usize {
                self.inner.parallelism()
            }
            fn dispatch<S: CandidateScorer>(
                &self,
                requests: Vec<SearchRequest<S>>,
                cancel: &Arc<AtomicBool>,
            ) -> Vec<Result<SearchResponse, WorkerError>> {
                let out = self.inner.dispatch(requests, cancel);
                self.flag.store(true, Ordering::Relaxed);
                out
            }
        }

        let flag = Arc::new(AtomicBool::new(false));
        let pool = CancelAfterFirstRound {
            inner: SequentialPool::new(2),
            flag: flag.clone(),
        };
        let err = RefinementRunner::run_with_cancel(
            &peak(),
            &StaffingConstraints::new(300, 0),
            &config(),
            &pool,
            Some(flag),
        )
        .unwrap_err();
        assert_eq!(err, OptimizerError::Cancelled);
    }

    #[test]
    fn test_invalid_inputs() {
        let err = RefinementRunner::run(
            &peak(),
            &StaffingConstraints::new(10, 20),
            &config(),
            &SequentialPool::default(),
        )
        .unwrap_err();
        assert!(matches!(err, OptimizerError::InvalidConfig(_)));

        let err = RefinementRunner::run(
            &peak(),
            &StaffingConstraints::new(10, 0),
            &config().with_top_k(0),
            &SequentialPool::default(),
        )
        .unwrap_err();
        assert!(matches!(err, OptimizerError::InvalidConfig(_)));
    }

    #[test]
    fn test_optimize_staffing_end_to_end() {
        let snapshot = ProductionSnapshot {
            awareness: 100.0,
            popularity: 50.0,
            ..ProductionSnapshot::default()
        };
        let item = Item::Material(MaterialListing {
            quality: 50.0,
            base_markup: 0.05,
            market_price: 1_500.0,
            demand: 80.0,
            competition: 30.0,
        });
        let constraints = StaffingConstraints::new(30, 0);
        let out = optimize_staffing(&snapshot, &constraints, &item, SortStrategy::Profit, 3)
            .unwrap();
        assert!(!out.is_empty());
        assert!(out.len() <= 10);
        for c in &out {
            assert_eq!(c.assignment.total(), 30);
            assert!(c.profit > 0.0);
        }
        for pair in out.windows(2) {
            assert!(SortStrategy::Profit.compare(&pair[0], &pair[1]).is_gt());
        }
    }

    #[test]
    fn test_optimize_staffing_requires_market_data() {
        let snapshot = ProductionSnapshot {
            unlocks: Default::default(),
            ..ProductionSnapshot::default()
        };
        let item = Item::Material(MaterialListing {
            quality: 50.0,
            base_markup: 0.05,
            market_price: 1_500.0,
            demand: 80.0,
            competition: 30.0,
        });
        let err = optimize_staffing(
            &snapshot,
            &StaffingConstraints::new(30, 0),
            &item,
            SortStrategy::Profit,
            3,
        )
        .unwrap_err();
        assert!(matches!(err, OptimizerError::MissingCapability(_)));
    }
}
