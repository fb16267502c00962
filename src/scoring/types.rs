//! The contract between the grid search and economic models.

use crate::formulas::employees::{ProductionMultipliers, StatMultipliers};
use crate::formulas::market::{advertising_factors, market_factor, sales_multiplier};
use crate::model::{CorporationUpgrade, Item, ProductionSnapshot, ScoredCandidate, StaffingAssignment};

/// Turns a staffing assignment into a scored candidate.
///
/// Scorers are pure: the same assignment always yields the same result,
/// and every worker of a refinement round owns its own clone.
///
/// # Implementing
///
/// ```ignore
/// #[derive(Clone)]
/// struct HeadcountScorer;
///
/// impl CandidateScorer for HeadcountScorer {
///     fn score(&self, a: &StaffingAssignment) -> Option<ScoredCandidate> {
///         let mut c = ScoredCandidate::new(*a);
///         c.raw_production = a.operations as f64;
///         Some(c)
///     }
/// }
/// ```
pub trait CandidateScorer: Clone + Send + Sync {
    /// Scores `assignment`, or `None` when it is infeasible.
    fn score(&self, assignment: &StaffingAssignment) -> Option<ScoredCandidate>;
}

/// Factors that depend only on the snapshot and the item, computed once
/// per scorer rather than per candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoringContext {
    pub stat_multipliers: StatMultipliers,
    pub production: ProductionMultipliers,
    /// Combined advertising sales factor.
    pub advertising: f64,
    pub market: f64,
    /// SalesBots times research sales multiplier.
    pub sales: f64,
    pub project_insight_level: u32,
    /// Whether demand and competition are readable. Without them the
    /// scorer neither prices nor filters on sales volume.
    pub market_data: bool,
}

impl ScoringContext {
    pub fn new(snapshot: &ProductionSnapshot, item: &Item) -> Self {
        let advertising = advertising_factors(
            snapshot.awareness,
            snapshot.popularity,
            snapshot.industry.advertising_factor,
        );
        Self {
            stat_multipliers: StatMultipliers::from_snapshot(snapshot),
            production: ProductionMultipliers::from_snapshot(snapshot, item.is_product()),
            advertising: advertising.total,
            market: market_factor(item.demand(), item.competition()),
            sales: sales_multiplier(
                snapshot.upgrades.get(CorporationUpgrade::AbcSalesBots),
                snapshot.research_sales_multiplier,
            ),
            project_insight_level: snapshot.upgrades.get(CorporationUpgrade::ProjectInsight),
            market_data: snapshot.unlocks.has_market_data(),
        }
    }
}
