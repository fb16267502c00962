//! Data model shared by every layer.
//!
//! - [`ProductionSnapshot`]: immutable division state for one call
//! - [`Item`]: the material or product being optimized for
//! - [`StaffingAssignment`] / [`ScoredCandidate`]: search points and their scores

mod candidate;
mod item;
mod snapshot;

pub use candidate::{ScoredCandidate, StaffingAssignment};
pub use item::{Item, MaterialListing, ProductListing, ProductStage, RatingWeights};
pub use snapshot::{
    CorporationUnlocks, CorporationUpgrade, EmployeeTraits, IndustryFactors, Job, JobCounts,
    JobProduction, PerJob, ProductionSnapshot, Research, ResearchSet, SnapshotSource,
    UpgradeLevels,
};
