//! Distributed refinement search.
//!
//! Splits a grid pass across workers, merges their partial top-K lists and
//! narrows the window around the best layout until the grid reaches step 1
//! or the rerun budget runs out.
//!
//! # Submodules
//!
//! - [`config`]: refinement parameters and presets
//! - [`pool`]: request/response worker contract, in-thread and rayon pools
//! - [`runner`]: the orchestration loop and [`optimize_staffing`]

pub mod config;
pub mod pool;
pub mod runner;

pub use config::{RefinementConfig, FALLBACK_PARALLELISM};
#[cfg(feature = "parallel")]
pub use pool::RayonPool;
pub use pool::{SearchRequest, SearchResponse, SequentialPool, WorkerPool};
pub use runner::{optimize_staffing, RefinementResult, RefinementRunner, RoundSummary};
