//! Recovering average employee stats from observed office output.
//!
//! Per-job production is linear in intelligence, charisma, creativity and
//! efficiency once morale, energy and experience are known, so four
//! independently staffed jobs pin the four stats down. Each staffed job
//! contributes one residual, relative to its observed value.

use tracing::{debug, warn};

use super::config::LmSettings;
use super::lm::{least_squares_lm, LeastSquaresReport};
use crate::error::OptimizerError;
use crate::formulas::employees::{job_multiplier, StatMultipliers};
use crate::model::{EmployeeTraits, Job, JobCounts, JobProduction, ProductionSnapshot};

/// Minimum number of staffed jobs that determines all four stats.
pub const REQUIRED_STAFFED_JOBS: usize = 4;

/// Known office state plus the production it was observed to yield.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OfficeObservation {
    pub jobs: JobCounts,
    pub production: JobProduction,
    pub morale: f64,
    pub energy: f64,
    pub experience: f64,
    pub multipliers: StatMultipliers,
}

impl OfficeObservation {
    /// Takes staffing, morale, energy, experience and stat multipliers from
    /// `snapshot`; the snapshot's skill stats are ignored.
    pub fn from_snapshot(snapshot: &ProductionSnapshot, production: JobProduction) -> Self {
        Self {
            jobs: snapshot.jobs,
            production,
            morale: snapshot.traits.morale,
            energy: snapshot.traits.energy,
            experience: snapshot.traits.experience,
            multipliers: StatMultipliers::from_snapshot(snapshot),
        }
    }

    fn traits(&self, x: &[f64]) -> EmployeeTraits {
        EmployeeTraits {
            morale: self.morale,
            energy: self.energy,
            intelligence: x[0],
            charisma: x[1],
            creativity: x[2],
            efficiency: x[3],
            experience: self.experience,
        }
    }
}

/// Recovered stats with solver diagnostics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecoveredTraits {
    pub traits: EmployeeTraits,
    pub report: LeastSquaresReport,
}

/// A validated recovery problem.
#[derive(Debug, Clone)]
pub struct TraitRecovery {
    observation: OfficeObservation,
    staffed: Vec<Job>,
}

impl TraitRecovery {
    /// Checks that the observation can determine every stat.
    ///
    /// # Errors
    ///
    /// [`OptimizerError::InsufficientJobDiversity`] when fewer than
    /// [`REQUIRED_STAFFED_JOBS`] jobs have employees.
    pub fn new(observation: OfficeObservation) -> Result<Self, OptimizerError> {
        let staffed: Vec<Job> = observation
            .jobs
            .iter()
            .filter(|&(_, n)| n > 0)
            .map(|(job, _)| job)
            .collect();
        if staffed.len() < REQUIRED_STAFFED_JOBS {
            return Err(OptimizerError::InsufficientJobDiversity {
                staffed: staffed.len(),
                required: REQUIRED_STAFFED_JOBS,
            });
        }
        Ok(Self {
            observation,
            staffed,
        })
    }

    pub fn staffed_jobs(&self) -> &[Job] {
        &self.staffed
    }

    /// Relative error of every staffed job for stats `x`
    /// (intelligence, charisma, creativity, efficiency).
    pub fn residuals(&self, x: &[f64], out: &mut [f64]) {
        let obs = &self.observation;
        let traits = obs.traits(x);
        let base = obs.morale * obs.energy * 1e-4;
        for (slot, &job) in out.iter_mut().zip(&self.staffed) {
            let observed = obs.production[job];
            let predicted =
                obs.jobs[job] as f64 * job_multiplier(&traits, &obs.multipliers, job) * base;
            *slot = (predicted - observed) / observed.abs().max(1.0);
        }
    }

    /// Runs Levenberg–Marquardt from the new-hire baseline.
    pub fn solve(&self, settings: &LmSettings) -> Result<RecoveredTraits, OptimizerError> {
        settings.validate().map_err(OptimizerError::InvalidConfig)?;
        let x0 = [EmployeeTraits::NEW_HIRE; 4];
        let report = least_squares_lm(
            |x, out| self.residuals(x, out),
            self.staffed.len(),
            &x0,
            settings,
        )
        .map_err(|e| {
            warn!(error = %e, staffed = self.staffed.len(), "employee stat recovery failed");
            OptimizerError::Solver(e)
        })?;

        debug!(
            iterations = report.iterations,
            max_residual = report.max_residual,
            "employee stats recovered"
        );
        Ok(RecoveredTraits {
            traits: self.observation.traits(&report.x),
            report,
        })
    }
}

/// Recovers intelligence, charisma, creativity and efficiency from
/// observed per-job production.
///
/// # Errors
///
/// [`OptimizerError::InsufficientJobDiversity`] before any iteration when
/// fewer than four jobs are staffed, [`OptimizerError::InvalidConfig`] for
/// bad settings and [`OptimizerError::Solver`] when the fit does not
/// converge.
pub fn recover_employee_traits(
    observation: &OfficeObservation,
    settings: &LmSettings,
) -> Result<RecoveredTraits, OptimizerError> {
    TraitRecovery::new(*observation)?.solve(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulas::employees::employee_production;
    use crate::recovery::SolverError;

    fn hidden_traits() -> EmployeeTraits {
        EmployeeTraits {
            morale: 95.0,
            energy: 88.0,
            intelligence: 121.5,
            charisma: 93.0,
            creativity: 64.25,
            efficiency: 108.0,
            experience: 140.0,
        }
    }

    fn multipliers() -> StatMultipliers {
        StatMultipliers {
            intelligence: 1.375,
            charisma: 1.1,
            creativity: 1.21,
            efficiency: 1.5,
        }
    }

    fn observe(jobs: JobCounts) -> OfficeObservation {
        let truth = hidden_traits();
        OfficeObservation {
            jobs,
            production: employee_production(&truth, &jobs, &multipliers()),
            morale: truth.morale,
            energy: truth.energy,
            experience: truth.experience,
            multipliers: multipliers(),
        }
    }

    fn assert_close(recovered: &EmployeeTraits) {
        let truth = hidden_traits();
        for (got, want) in [
            (recovered.intelligence, truth.intelligence),
            (recovered.charisma, truth.charisma),
            (recovered.creativity, truth.creativity),
            (recovered.efficiency, truth.efficiency),
        ] {
            assert!((got - want).abs() < 1e-4, "got {got}, want {want}");
        }
    }

    #[test]
    fn test_recovers_with_four_jobs() {
        let obs = observe(JobCounts::new([6, 4, 0, 3, 5]));
        let out = recover_employee_traits(&obs, &LmSettings::default()).unwrap();
        assert_close(&out.traits);
        assert_eq!(out.traits.morale, 95.0);
        assert!(out.report.max_residual < 1e-6);
    }

    #[test]
    fn test_recovers_with_all_jobs() {
        let obs = observe(JobCounts::new([9, 9, 4, 6, 2]));
        let out = recover_employee_traits(&obs, &LmSettings::default()).unwrap();
        assert_close(&out.traits);
    }

    #[test]
    fn test_insufficient_diversity_fails_before_solving() {
        let obs = observe(JobCounts::new([10, 10, 10, 0, 0]));
        let err = TraitRecovery::new(obs).unwrap_err();
        assert_eq!(
            err,
            OptimizerError::InsufficientJobDiversity {
                staffed: 3,
                required: 4
            }
        );
        // Even an unusable solver configuration is never reached.
        let broken = LmSettings::default().with_max_iterations(0);
        assert_eq!(recover_employee_traits(&obs, &broken).unwrap_err(), err);
    }

    #[test]
    fn test_inconsistent_observation_is_an_error() {
        let mut obs = observe(JobCounts::new([9, 9, 4, 6, 2]));
        obs.production[Job::Operations] *= 1.2;
        let err = recover_employee_traits(&obs, &LmSettings::default()).unwrap_err();
        assert!(
            matches!(
                err,
                OptimizerError::Solver(SolverError::ResidualTooLarge { .. })
            ),
            "{err:?}"
        );
    }

    #[test]
    fn test_invalid_settings() {
        let obs = observe(JobCounts::new([9, 9, 4, 6, 2]));
        let err =
            recover_employee_traits(&obs, &LmSettings::default().with_max_iterations(0)).unwrap_err();
        assert!(matches!(err, OptimizerError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_snapshot_uses_office_state() {
        let snapshot = ProductionSnapshot {
            jobs: JobCounts::new([1, 2, 3, 4, 5]),
            ..ProductionSnapshot::default()
        };
        let obs = OfficeObservation::from_snapshot(&snapshot, JobProduction::default());
        assert_eq!(obs.jobs, snapshot.jobs);
        assert_eq!(obs.morale, 100.0);
        assert_eq!(obs.multipliers, StatMultipliers::default());
    }
}
