//! Rank orders over candidates.

use std::cmp::Ordering;

use crate::model::ScoredCandidate;

/// A strict total order where `Greater` means "ranks higher".
///
/// Implementations must be deterministic: two distinct candidates may
/// only compare `Equal` if they are interchangeable, otherwise results
/// flap when partial top-K lists are merged in a different order.
pub trait Ranking<T>: Send + Sync {
    fn compare(&self, a: &T, b: &T) -> Ordering;

    /// Like [`compare`](Self::compare), with absent candidates losing to
    /// every present one.
    fn compare_optional(&self, a: Option<&T>, b: Option<&T>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => self.compare(a, b),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Adapts a comparison closure into a [`Ranking`].
#[derive(Debug, Clone, Copy)]
pub struct RankBy<F>(pub F);

impl<T, F> Ranking<T> for RankBy<F>
where
    F: Fn(&T, &T) -> Ordering + Send + Sync,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a, b)
    }
}

/// Objective a staffing search ranks candidates by.
///
/// Each strategy compares a primary metric, then a secondary one, then
/// prefers the lower cost, and finally the lexicographically smaller
/// assignment so that the order is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortStrategy {
    /// Units produced; secondary: profit.
    RawProduction,
    /// Development progress of an in-development product; secondary: production.
    Progress,
    /// Revenue per market cycle; secondary: production.
    #[default]
    Profit,
    /// Profit times development progress; secondary: profit.
    ProfitProgress,
}

impl SortStrategy {
    /// `(primary, secondary)` metrics of a candidate.
    pub fn metrics(self, c: &ScoredCandidate) -> (f64, f64) {
        match self {
            SortStrategy::RawProduction => (c.raw_production, c.profit),
            SortStrategy::Progress => (c.progress_rate, c.raw_production),
            SortStrategy::Profit => (c.profit, c.raw_production),
            SortStrategy::ProfitProgress => (c.profit * c.progress_rate, c.profit),
        }
    }

    /// Whether scoring under this strategy needs a sale price.
    pub fn needs_price(self) -> bool {
        matches!(self, SortStrategy::Profit | SortStrategy::ProfitProgress)
    }

    /// Parses the names used by scripting front ends.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "rawProduction" | "raw_production" => Some(SortStrategy::RawProduction),
            "progress" => Some(SortStrategy::Progress),
            "profit" => Some(SortStrategy::Profit),
            "profit_progress" | "profitProgress" => Some(SortStrategy::ProfitProgress),
            _ => None,
        }
    }
}

/// NaN ranks below every number.
fn metric_cmp(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.total_cmp(&b),
    }
}

impl Ranking<ScoredCandidate> for SortStrategy {
    fn compare(&self, a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
        let (pa, sa) = self.metrics(a);
        let (pb, sb) = self.metrics(b);
        metric_cmp(pa, pb)
            .then_with(|| metric_cmp(sa, sb))
            .then_with(|| metric_cmp(b.cost, a.cost))
            .then_with(|| b.assignment.cmp(&a.assignment))
    }
}
