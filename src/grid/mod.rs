//! Single-pass grid search over staffing layouts.
//!
//! # Submodules
//!
//! - [`window`]: per-dimension ranges, auto step, partitioning, narrowing
//! - [`types`]: headcount constraints and pass results
//! - [`engine`]: the enumeration itself

pub mod engine;
pub mod types;
pub mod window;

pub use engine::GridSearch;
pub use types::{GridPass, PassStats, StaffingConstraints};
pub use window::{Dimension, RefinementWindow, TARGET_POINTS_PER_DIMENSION};
