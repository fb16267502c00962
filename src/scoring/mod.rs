//! Candidate scoring.
//!
//! [`CandidateScorer`] is the seam between the generic grid search and a
//! concrete economic model; [`EconomicScorer`] is the production one.

pub mod economic;
pub mod types;

pub use economic::{sellable, EconomicScorer, LISTED_SALES_TOLERANCE};
pub use types::{CandidateScorer, ScoringContext};
