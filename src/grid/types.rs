//! Grid search inputs and outputs.

use crate::error::OptimizerError;
use crate::model::{ScoredCandidate, StaffingAssignment};

/// Headcount a staffing layout has to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaffingConstraints {
    /// Office size; every layout uses exactly this many employees.
    pub total_headcount: u32,
    /// R&D headcount, held fixed during the search.
    pub research: u32,
}

impl StaffingConstraints {
    pub fn new(total_headcount: u32, research: u32) -> Self {
        Self {
            total_headcount,
            research,
        }
    }

    pub fn validate(&self) -> Result<(), OptimizerError> {
        if self.research > self.total_headcount {
            return Err(OptimizerError::InvalidConfig(format!(
                "research headcount {} exceeds office size {}",
                self.research, self.total_headcount
            )));
        }
        Ok(())
    }

    /// Employees left for operations, engineer, management and business.
    pub fn searchable(&self) -> u32 {
        self.total_headcount.saturating_sub(self.research)
    }

    /// Completes a grid point with business as the remainder, or `None`
    /// when the point alone exceeds the headcount.
    pub fn assignment(&self, operations: u32, engineer: u32, management: u32) -> Option<StaffingAssignment> {
        let used = operations
            .checked_add(engineer)?
            .checked_add(management)?;
        let business = self.searchable().checked_sub(used)?;
        Some(StaffingAssignment {
            operations,
            engineer,
            business,
            management,
            research: self.research,
        })
    }
}

/// Counters of one grid pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassStats {
    /// Points handed to the scorer.
    pub evaluated: usize,
    /// Points the scorer accepted.
    pub feasible: usize,
    /// Points skipped before scoring (no producers, or over headcount).
    pub skipped: usize,
}

impl PassStats {
    pub fn merge(&mut self, other: &PassStats) {
        self.evaluated += other.evaluated;
        self.feasible += other.feasible;
        self.skipped += other.skipped;
    }
}

/// Result of one grid pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPass {
    /// Retained candidates, best first.
    pub candidates: Vec<ScoredCandidate>,
    pub stats: PassStats,
}
