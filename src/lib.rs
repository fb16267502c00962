//! Staffing and production optimizer for corporation simulations.
//!
//! Given an immutable snapshot of a division's office, upgrades and
//! research, finds the job split that maximizes profit, production or
//! development progress:
//!
//! - **Formulas**: closed-form economics of production, sales, pricing,
//!   upgrade costs and boost-material stock.
//! - **Top-K**: fixed-capacity selection under a pluggable total order.
//! - **Recovery**: Levenberg–Marquardt fit of hidden employee stats from
//!   observed output.
//! - **Scoring**: one staffing layout in, one scored candidate (or
//!   nothing, when the market cannot absorb the output) out.
//! - **Grid**: exhaustive enumeration of operations × engineer ×
//!   management with business as the remainder.
//! - **Refine**: the grid pass split across workers, merged, and narrowed
//!   around the best layout until it runs at step 1.
//!
//! # Quick start
//!
//! ```
//! use corp_optim::grid::StaffingConstraints;
//! use corp_optim::model::{Item, MaterialListing, ProductionSnapshot};
//! use corp_optim::optimize_staffing;
//! use corp_optim::topk::SortStrategy;
//!
//! let item = Item::Material(MaterialListing {
//!     quality: 50.0,
//!     base_markup: 0.05,
//!     market_price: 1_500.0,
//!     demand: 80.0,
//!     competition: 30.0,
//! });
//! let best = optimize_staffing(
//!     &ProductionSnapshot::default(),
//!     &StaffingConstraints::new(15, 0),
//!     &item,
//!     SortStrategy::Profit,
//!     3,
//! )
//! .unwrap();
//! assert!(best.iter().all(|c| c.assignment.total() == 15));
//! ```
//!
//! # Features
//!
//! - `parallel` (default): rayon worker pool.
//! - `serde`: serialization of the data model, configs and results.
//! - `wasm`: `optimizeStaffing` / `recoverEmployeeTraits` JS exports.

pub mod error;
pub mod formulas;
pub mod grid;
pub mod model;
pub mod recovery;
pub mod refine;
pub mod scoring;
pub mod topk;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{OptimizerError, WorkerError};
pub use refine::optimize_staffing;
