//! Point-in-time division state consumed by the optimizer.

use std::ops::{Index, IndexMut};

use crate::error::OptimizerError;

/// Productive job categories of an office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Job {
    Operations,
    Engineer,
    Business,
    Management,
    ResearchAndDevelopment,
}

impl Job {
    /// All jobs in canonical order.
    pub const ALL: [Job; 5] = [
        Job::Operations,
        Job::Engineer,
        Job::Business,
        Job::Management,
        Job::ResearchAndDevelopment,
    ];

    /// Position of this job inside a [`PerJob`] record.
    pub const fn index(self) -> usize {
        match self {
            Job::Operations => 0,
            Job::Engineer => 1,
            Job::Business => 2,
            Job::Management => 3,
            Job::ResearchAndDevelopment => 4,
        }
    }
}

/// One value per [`Job`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerJob<T> {
    values: [T; 5],
}

impl<T: Copy> PerJob<T> {
    /// Builds a record in [`Job::ALL`] order.
    pub const fn new(values: [T; 5]) -> Self {
        Self { values }
    }

    /// Iterates `(job, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Job, T)> + '_ {
        Job::ALL.iter().map(move |&job| (job, self.values[job.index()]))
    }

    /// Applies `f` to every value.
    pub fn map<U: Copy>(&self, mut f: impl FnMut(Job, T) -> U) -> PerJob<U> {
        PerJob {
            values: Job::ALL.map(|job| f(job, self.values[job.index()])),
        }
    }
}

impl<T> Index<Job> for PerJob<T> {
    type Output = T;

    fn index(&self, job: Job) -> &T {
        &self.values[job.index()]
    }
}

impl<T> IndexMut<Job> for PerJob<T> {
    fn index_mut(&mut self, job: Job) -> &mut T {
        &mut self.values[job.index()]
    }
}

/// Headcount per job.
pub type JobCounts = PerJob<u32>;

/// Production contributed by each job.
pub type JobProduction = PerJob<f64>;

impl JobCounts {
    /// Total employees over all jobs.
    pub fn total(&self) -> u32 {
        self.values.iter().sum()
    }

    /// Number of jobs with at least one employee.
    pub fn staffed_jobs(&self) -> usize {
        self.values.iter().filter(|&&n| n > 0).count()
    }
}

/// Office-wide averages of employee attributes.
///
/// Morale and energy are percentages in `[0, 100]`; the four skill traits
/// are raw stat averages before upgrade or research multipliers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmployeeTraits {
    pub morale: f64,
    pub energy: f64,
    pub intelligence: f64,
    pub charisma: f64,
    pub creativity: f64,
    pub efficiency: f64,
    pub experience: f64,
}

impl EmployeeTraits {
    /// Baseline stats of a freshly hired employee.
    pub const NEW_HIRE: f64 = 75.0;
}

impl Default for EmployeeTraits {
    fn default() -> Self {
        Self {
            morale: 100.0,
            energy: 100.0,
            intelligence: Self::NEW_HIRE,
            charisma: Self::NEW_HIRE,
            creativity: Self::NEW_HIRE,
            efficiency: Self::NEW_HIRE,
            experience: Self::NEW_HIRE,
        }
    }
}

/// Corporation-wide upgrades that scale production, sales or stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CorporationUpgrade {
    SmartFactories,
    SmartStorage,
    DreamSense,
    WilsonAnalytics,
    NuoptimalNootropicInjectorImplants,
    SpeechProcessorImplants,
    NeuralAccelerators,
    FocusWires,
    AbcSalesBots,
    ProjectInsight,
}

impl CorporationUpgrade {
    pub const ALL: [CorporationUpgrade; 10] = [
        CorporationUpgrade::SmartFactories,
        CorporationUpgrade::SmartStorage,
        CorporationUpgrade::DreamSense,
        CorporationUpgrade::WilsonAnalytics,
        CorporationUpgrade::NuoptimalNootropicInjectorImplants,
        CorporationUpgrade::SpeechProcessorImplants,
        CorporationUpgrade::NeuralAccelerators,
        CorporationUpgrade::FocusWires,
        CorporationUpgrade::AbcSalesBots,
        CorporationUpgrade::ProjectInsight,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Purchased level of every [`CorporationUpgrade`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpgradeLevels {
    levels: [u32; 10],
}

impl UpgradeLevels {
    pub fn get(&self, upgrade: CorporationUpgrade) -> u32 {
        self.levels[upgrade.index()]
    }

    pub fn set(&mut self, upgrade: CorporationUpgrade, level: u32) {
        self.levels[upgrade.index()] = level;
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, upgrade: CorporationUpgrade, level: u32) -> Self {
        self.set(upgrade, level);
        self
    }
}

/// Division research that changes the formulas the optimizer models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Research {
    DroneAssembly,
    SelfCorrectingAssemblers,
    UpgradeFulcrum,
    Overclock,
    Cph4Injections,
    HiTechRndLaboratory,
}

/// Set of completed [`Research`] entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResearchSet {
    bits: u32,
}

impl ResearchSet {
    pub fn contains(&self, research: Research) -> bool {
        self.bits & (1 << research as u32) != 0
    }

    pub fn insert(&mut self, research: Research) {
        self.bits |= 1 << research as u32;
    }

    pub fn with(mut self, research: Research) -> Self {
        self.insert(research);
        self
    }

    /// Returns `multiplier` when `research` is complete, otherwise 1.
    pub fn factor(&self, research: Research, multiplier: f64) -> f64 {
        if self.contains(research) {
            multiplier
        } else {
            1.0
        }
    }
}

/// One-time corporation unlocks relevant to pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorporationUnlocks {
    /// "Market Research - Demand": exposes item demand.
    pub market_research_demand: bool,
    /// "Market Data - Competition": exposes item competition.
    pub market_data_competition: bool,
}

impl CorporationUnlocks {
    /// Both market-data unlocks, required before any price can be derived.
    pub fn has_market_data(&self) -> bool {
        self.market_research_demand && self.market_data_competition
    }

    pub fn all() -> Self {
        Self {
            market_research_demand: true,
            market_data_competition: true,
        }
    }
}

/// Industry constants that shape production.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndustryFactors {
    /// Exponent applied to research points in product quality.
    pub science_factor: f64,
    /// Exponent applied to awareness and popularity.
    pub advertising_factor: f64,
    pub ai_core_factor: f64,
    pub hardware_factor: f64,
    pub real_estate_factor: f64,
    pub robot_factor: f64,
}

impl IndustryFactors {
    /// Agriculture.
    pub const AGRICULTURE: IndustryFactors = IndustryFactors {
        science_factor: 0.5,
        advertising_factor: 0.04,
        ai_core_factor: 0.3,
        hardware_factor: 0.2,
        real_estate_factor: 0.72,
        robot_factor: 0.3,
    };

    /// Chemical.
    pub const CHEMICAL: IndustryFactors = IndustryFactors {
        science_factor: 0.75,
        advertising_factor: 0.07,
        ai_core_factor: 0.2,
        hardware_factor: 0.2,
        real_estate_factor: 0.25,
        robot_factor: 0.25,
    };

    /// Tobacco.
    pub const TOBACCO: IndustryFactors = IndustryFactors {
        science_factor: 0.75,
        advertising_factor: 0.2,
        ai_core_factor: 0.15,
        hardware_factor: 0.15,
        real_estate_factor: 0.15,
        robot_factor: 0.25,
    };

    /// Boost coefficients in `[ai cores, hardware, real estate, robots]` order.
    pub fn boost_coefficients(&self) -> [f64; 4] {
        [
            self.ai_core_factor,
            self.hardware_factor,
            self.real_estate_factor,
            self.robot_factor,
        ]
    }
}

/// Immutable input to one optimization call.
///
/// Produced by a [`SnapshotSource`] and never mutated by the optimizer.
/// Workers receive their own copy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProductionSnapshot {
    pub traits: EmployeeTraits,
    /// Current staffing of the office.
    pub jobs: JobCounts,
    pub upgrades: UpgradeLevels,
    pub researches: ResearchSet,
    pub unlocks: CorporationUnlocks,
    pub industry: IndustryFactors,
    /// Boost-material multiplier of the division (at least 1).
    pub division_production_multiplier: f64,
    pub awareness: f64,
    pub popularity: f64,
    pub research_points: f64,
    /// Sales multiplier from research, 1 when nothing applies.
    pub research_sales_multiplier: f64,
}

impl Default for ProductionSnapshot {
    fn default() -> Self {
        Self {
            traits: EmployeeTraits::default(),
            jobs: JobCounts::default(),
            upgrades: UpgradeLevels::default(),
            researches: ResearchSet::default(),
            unlocks: CorporationUnlocks::all(),
            industry: IndustryFactors::AGRICULTURE,
            division_production_multiplier: 1.0,
            awareness: 0.0,
            popularity: 0.0,
            research_points: 0.0,
            research_sales_multiplier: 1.0,
        }
    }
}

/// Reads consistent snapshots from the host simulation.
///
/// Implementations must not tear reads across staffing, upgrade and
/// research fields.
pub trait SnapshotSource {
    fn production_snapshot(
        &self,
        division: &str,
        city: &str,
    ) -> Result<ProductionSnapshot, OptimizerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_job_indexing() {
        let mut counts = JobCounts::new([1, 2, 3, 4, 5]);
        assert_eq!(counts[Job::Management], 4);
        counts[Job::Business] = 0;
        assert_eq!(counts.total(), 12);
        assert_eq!(counts.staffed_jobs(), 4);
    }

    #[test]
    fn test_per_job_map_preserves_order() {
        let counts = JobCounts::new([1, 2, 3, 4, 5]);
        let doubled = counts.map(|_, n| n as f64 * 2.0);
        let collected: Vec<(Job, f64)> = doubled.iter().collect();
        assert_eq!(collected[0], (Job::Operations, 2.0));
        assert_eq!(collected[4], (Job::ResearchAndDevelopment, 10.0));
    }

    #[test]
    fn test_research_set() {
        let set = ResearchSet::default()
            .with(Research::DroneAssembly)
            .with(Research::Overclock);
        assert!(set.contains(Research::DroneAssembly));
        assert!(!set.contains(Research::UpgradeFulcrum));
        assert_eq!(set.factor(Research::Overclock, 1.25), 1.25);
        assert_eq!(set.factor(Research::Cph4Injections, 1.1), 1.0);
    }

    #[test]
    fn test_upgrade_levels() {
        let levels = UpgradeLevels::default().with(CorporationUpgrade::SmartFactories, 12);
        assert_eq!(levels.get(CorporationUpgrade::SmartFactories), 12);
        assert_eq!(levels.get(CorporationUpgrade::FocusWires), 0);
    }

    #[test]
    fn test_market_data_requires_both_unlocks() {
        let partial = CorporationUnlocks {
            market_research_demand: true,
            market_data_competition: false,
        };
        assert!(!partial.has_market_data());
        assert!(CorporationUnlocks::all().has_market_data());
    }

    struct Offices(Vec<(String, String, ProductionSnapshot)>);

    impl SnapshotSource for Offices {
        fn production_snapshot(
            &self,
            division: &str,
            city: &str,
        ) -> Result<ProductionSnapshot, OptimizerError> {
            self.0
                .iter()
                .find(|(d, c, _)| d == division && c == city)
                .map(|(_, _, s)| s.clone())
                .ok_or_else(|| OptimizerError::SnapshotUnavailable {
                    division: division.to_string(),
                    city: city.to_string(),
                    reason: "no office".to_string(),
                })
        }
    }

    #[test]
    fn test_snapshot_source() {
        let snapshot = ProductionSnapshot {
            awareness: 12.0,
            ..ProductionSnapshot::default()
        };
        let source = Offices(vec![("Agri".into(), "Sector-12".into(), snapshot.clone())]);

        assert_eq!(source.production_snapshot("Agri", "Sector-12"), Ok(snapshot));
        assert!(matches!(
            source.production_snapshot("Agri", "Aevum"),
            Err(OptimizerError::SnapshotUnavailable { ref city, .. }) if city == "Aevum"
        ));
    }
}
