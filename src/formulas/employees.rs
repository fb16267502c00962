//! Office productivity.
//!
//! Employee traits feed a per-job weighted sum; operations, engineer and
//! management output then combine into the division's raw production,
//! product development progress and research point gain.

use super::upgrades::upgrade_benefit;
use crate::model::{
    CorporationUpgrade, EmployeeTraits, Job, JobCounts, JobProduction, ProductionSnapshot,
    Research, ResearchSet,
};

/// Trait weights of one job: intelligence, charisma, creativity,
/// efficiency, experience.
pub type TraitWeights = [f64; 5];

/// Per-job trait weights.
pub const fn job_weights(job: Job) -> TraitWeights {
    match job {
        Job::Operations => [0.6, 0.1, 0.5, 1.0, 1.0],
        Job::Engineer => [1.0, 0.1, 0.0, 1.0, 1.5],
        Job::Business => [0.4, 1.0, 0.0, 0.0, 0.5],
        Job::Management => [0.0, 2.0, 0.2, 0.7, 1.0],
        Job::ResearchAndDevelopment => [1.5, 0.0, 1.0, 0.5, 0.8],
    }
}

/// Share of office output kept after balancing.
const OFFICE_BALANCING: f64 = 0.05;

/// Multipliers applied to the four skill traits.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatMultipliers {
    pub intelligence: f64,
    pub charisma: f64,
    pub creativity: f64,
    pub efficiency: f64,
}

impl Default for StatMultipliers {
    fn default() -> Self {
        Self {
            intelligence: 1.0,
            charisma: 1.0,
            creativity: 1.0,
            efficiency: 1.0,
        }
    }
}

impl StatMultipliers {
    /// Upgrade benefit times research multiplier for every trait.
    pub fn from_snapshot(snapshot: &ProductionSnapshot) -> Self {
        let up = |u: CorporationUpgrade| upgrade_benefit(u, snapshot.upgrades.get(u));
        let r = &snapshot.researches;
        let cph4 = r.factor(Research::Cph4Injections, 1.1);
        let overclock = r.factor(Research::Overclock, 1.25);
        Self {
            intelligence: up(CorporationUpgrade::NeuralAccelerators) * cph4 * overclock,
            charisma: up(CorporationUpgrade::SpeechProcessorImplants) * cph4,
            creativity: up(CorporationUpgrade::NuoptimalNootropicInjectorImplants) * cph4,
            efficiency: up(CorporationUpgrade::FocusWires) * cph4 * overclock,
        }
    }
}

/// Weighted trait sum of one employee in `job`, before morale and energy.
pub fn job_multiplier(traits: &EmployeeTraits, multipliers: &StatMultipliers, job: Job) -> f64 {
    let [w_int, w_cha, w_cre, w_eff, w_exp] = job_weights(job);
    w_int * traits.intelligence * multipliers.intelligence
        + w_cha * traits.charisma * multipliers.charisma
        + w_cre * traits.creativity * multipliers.creativity
        + w_eff * traits.efficiency * multipliers.efficiency
        + w_exp * traits.experience
}

/// Production of every job for the given headcounts.
///
/// `count * weighted_traits * morale * energy * 1e-4`.
pub fn employee_production(
    traits: &EmployeeTraits,
    counts: &JobCounts,
    multipliers: &StatMultipliers,
) -> JobProduction {
    let base = traits.morale * traits.energy * 1e-4;
    counts.map(|job, n| n as f64 * job_multiplier(traits, multipliers, job) * base)
}

/// Non-office multipliers on raw production.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProductionMultipliers {
    /// Boost-material multiplier of the division.
    pub division: f64,
    /// Smart Factories benefit.
    pub upgrade: f64,
    pub research: f64,
}

impl ProductionMultipliers {
    pub fn from_snapshot(snapshot: &ProductionSnapshot, is_product: bool) -> Self {
        let r = &snapshot.researches;
        let mut research = r.factor(Research::DroneAssembly, 1.2)
            * r.factor(Research::SelfCorrectingAssemblers, 1.1);
        if is_product {
            research *= r.factor(Research::UpgradeFulcrum, 1.05);
        }
        Self {
            division: snapshot.division_production_multiplier,
            upgrade: upgrade_benefit(
                CorporationUpgrade::SmartFactories,
                snapshot.upgrades.get(CorporationUpgrade::SmartFactories),
            ),
            research,
        }
    }
}

/// `1 + mgmt / (1.2 * total)`, or `None` when the office produces nothing.
fn management_factor(production: &JobProduction) -> Option<(f64, f64, f64)> {
    let ops = production[Job::Operations].max(0.0);
    let eng = production[Job::Engineer].max(0.0);
    let mgmt = production[Job::Management].max(0.0);
    let total = ops + eng + mgmt;
    if !(total > 0.0) {
        return None;
    }
    Some((ops, eng, 1.0 + mgmt / (1.2 * total)))
}

/// Units produced per second.
///
/// `(ops^0.4 + eng^0.3) * management_factor * 0.05`, halved for products,
/// then scaled by `multipliers`. Returns 0 when operations, engineer and
/// management together produce nothing.
pub fn raw_production(
    production: &JobProduction,
    multipliers: &ProductionMultipliers,
    is_product: bool,
) -> f64 {
    let Some((ops, eng, mgmt_factor)) = management_factor(production) else {
        return 0.0;
    };
    let mut office = (ops.powf(0.4) + eng.powf(0.3)) * mgmt_factor * OFFICE_BALANCING;
    if is_product {
        office *= 0.5;
    }
    office * multipliers.division * multipliers.upgrade * multipliers.research
}

/// Development progress in percent points per market cycle.
pub fn product_development_progress(production: &JobProduction) -> f64 {
    let Some((ops, eng, mgmt_factor)) = management_factor(production) else {
        return 0.0;
    };
    0.01 * (eng.powf(0.34) + ops.powf(0.2)) * mgmt_factor
}

/// Research points gained per market cycle from R&D output.
pub fn research_point_gain(
    rnd_production: f64,
    project_insight_level: u32,
    researches: &ResearchSet,
) -> f64 {
    if !(rnd_production > 0.0) {
        return 0.0;
    }
    0.004
        * rnd_production.sqrt()
        * upgrade_benefit(CorporationUpgrade::ProjectInsight, project_insight_level)
        * researches.factor(Research::HiTechRndLaboratory, 1.1)
}
