//! Nonlinear least-squares recovery of hidden employee stats.
//!
//! # Submodules
//!
//! - [`config`]: solver settings
//! - [`lm`]: Levenberg–Marquardt over a dense forward-difference Jacobian
//! - [`traits`]: fitting average stats to observed per-job production

pub mod config;
pub mod lm;
pub mod traits;

pub use config::LmSettings;
pub use lm::{least_squares_lm, LeastSquaresReport, SolverError};
pub use traits::{
    recover_employee_traits, OfficeObservation, RecoveredTraits, TraitRecovery,
    REQUIRED_STAFFED_JOBS,
};
