//! Refinement configuration.
//!
//! [`RefinementConfig`] controls how wide each round searches, how often
//! the window is narrowed and how many workers share a round.

use crate::grid::RefinementWindow;
use crate::topk::SortStrategy;

/// Parallelism assumed when the platform cannot report it.
pub const FALLBACK_PARALLELISM: usize = 8;

/// Configuration for the distributed refinement search.
///
/// # Defaults
///
/// ```
/// use corp_optim::refine::RefinementConfig;
///
/// let config = RefinementConfig::default();
/// assert_eq!(config.top_k, 10);
/// assert_eq!(config.max_reruns, 5);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use corp_optim::refine::RefinementConfig;
/// use corp_optim::topk::SortStrategy;
///
/// let config = RefinementConfig::default()
///     .with_strategy(SortStrategy::ProfitProgress)
///     .with_top_k(20)
///     .with_parallelism(4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RefinementConfig {
    /// Candidates kept per worker and after every merge.
    pub top_k: usize,

    /// Narrowing rounds after the initial pass.
    ///
    /// Refinement stops earlier once every dimension is searched at step 1.
    pub max_reruns: usize,

    /// Workers per round.
    ///
    /// `None` uses the platform's available parallelism, or
    /// [`FALLBACK_PARALLELISM`] when that is unknown.
    pub parallelism: Option<usize>,

    /// Objective candidates are ranked by.
    pub strategy: SortStrategy,

    /// Window of the initial pass.
    ///
    /// `None` searches `0..=headcount` in every dimension with the auto
    /// step. Later rounds never leave this window.
    pub window: Option<RefinementWindow>,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            max_reruns: 5,
            parallelism: None,
            strategy: SortStrategy::default(),
            window: None,
        }
    }
}

impl RefinementConfig {
    /// Sets the number of retained candidates.
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    /// Sets the rerun budget.
    pub fn with_max_reruns(mut self, n: usize) -> Self {
        self.max_reruns = n;
        self
    }

    /// Sets the worker count.
    pub fn with_parallelism(mut self, n: usize) -> Self {
        self.parallelism = Some(n);
        self
    }

    pub fn with_strategy(mut self, strategy: SortStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Overrides the initial window, including its steps.
    pub fn with_window(mut self, window: RefinementWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Preset for interactive use: a short list and two narrowing rounds.
    pub fn fast() -> Self {
        Self {
            top_k: 5,
            max_reruns: 2,
            ..Self::default()
        }
    }

    /// The default configuration.
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Preset that keeps more alternatives and narrows until step 1.
    pub fn quality() -> Self {
        Self {
            top_k: 20,
            max_reruns: 10,
            ..Self::default()
        }
    }

    /// Worker count after resolving `None`.
    pub fn resolved_parallelism(&self) -> usize {
        self.parallelism.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(FALLBACK_PARALLELISM)
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.top_k == 0 {
            return Err("top_k must be at least 1".into());
        }
        if self.parallelism == Some(0) {
            return Err("parallelism must be at least 1".into());
        }
        if let Some(window) = &self.window {
            window.validate().map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}
