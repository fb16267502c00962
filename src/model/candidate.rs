//! Points of the staffing search space and their scores.

use super::snapshot::{Job, JobCounts};

/// Headcount per job for one candidate office layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaffingAssignment {
    pub operations: u32,
    pub engineer: u32,
    pub business: u32,
    pub management: u32,
    pub research: u32,
}

impl StaffingAssignment {
    pub fn total(&self) -> u32 {
        self.operations + self.engineer + self.business + self.management + self.research
    }

    pub fn to_counts(&self) -> JobCounts {
        JobCounts::new([
            self.operations,
            self.engineer,
            self.business,
            self.management,
            self.research,
        ])
    }

    pub fn from_counts(counts: &JobCounts) -> Self {
        Self {
            operations: counts[Job::Operations],
            engineer: counts[Job::Engineer],
            business: counts[Job::Business],
            management: counts[Job::Management],
            research: counts[Job::ResearchAndDevelopment],
        }
    }

    /// Coordinates in the searched (operations, engineer, management) space.
    pub fn grid_point(&self) -> [u32; 3] {
        [self.operations, self.engineer, self.management]
    }
}

/// A staffing candidate together with the metrics it was ranked by.
///
/// Infeasible candidates are never constructed; scorers return `None`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoredCandidate {
    pub assignment: StaffingAssignment,
    /// Units produced per second.
    pub raw_production: f64,
    /// Units the market absorbs per second at the optimal price.
    ///
    /// This and the two price fields below are 0 when the corporation
    /// cannot read demand and competition.
    pub max_sales_volume: f64,
    pub optimal_price: f64,
    /// Revenue over one market cycle.
    pub profit: f64,
    /// Development progress in percent points per market cycle; 0 for listed goods.
    pub progress_rate: f64,
    /// Research points gained per market cycle.
    pub research_rate: f64,
    /// Predicted product rating, for products only.
    pub rating: Option<f64>,
    /// Predicted product markup, for in-development products only.
    pub markup: Option<f64>,
    /// Lower is better; last metric consulted before the assignment itself.
    ///
    /// The economic scorer reports the headcount here. Every layout of one
    /// staffing search has the same headcount, so there equal metrics fall
    /// straight through to the assignment order.
    pub cost: f64,
}

impl ScoredCandidate {
    /// A candidate with every metric zeroed.
    pub fn new(assignment: StaffingAssignment) -> Self {
        Self {
            assignment,
            raw_production: 0.0,
            max_sales_volume: 0.0,
            optimal_price: 0.0,
            profit: 0.0,
            progress_rate: 0.0,
            research_rate: 0.0,
            rating: None,
            markup: None,
            cost: 0.0,
        }
    }
}
