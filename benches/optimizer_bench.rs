//! Criterion benchmarks for corp-optim.
//!
//! Uses a fixed agriculture snapshot selling a material so the numbers
//! measure search overhead rather than input variation.

use std::sync::atomic::AtomicBool;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use corp_optim::formulas::{optimal_boost_quantities, BOOST_MATERIAL_SIZES};
use corp_optim::grid::{GridSearch, RefinementWindow, StaffingConstraints};
use corp_optim::model::{
    EmployeeTraits, IndustryFactors, Item, JobCounts, MaterialListing, ProductionSnapshot,
};
use corp_optim::recovery::{recover_employee_traits, LmSettings, OfficeObservation};
use corp_optim::refine::{RefinementConfig, RefinementRunner, SequentialPool};
use corp_optim::scoring::EconomicScorer;
use corp_optim::topk::SortStrategy;

fn snapshot() -> ProductionSnapshot {
    ProductionSnapshot {
        awareness: 250.0,
        popularity: 120.0,
        division_production_multiplier: 4.5,
        ..ProductionSnapshot::default()
    }
}

fn item() -> Item {
    Item::Material(MaterialListing {
        quality: 40.0,
        base_markup: 0.05,
        market_price: 1_500.0,
        demand: 75.0,
        competition: 35.0,
    })
}

fn scorer() -> EconomicScorer {
    EconomicScorer::new(snapshot(), item(), SortStrategy::Profit).expect("valid scorer")
}

fn bench_grid_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_pass");
    group.sample_size(10);
    let scorer = scorer();

    for headcount in [30u32, 60, 120] {
        let constraints = StaffingConstraints::new(headcount, 0);
        let window = RefinementWindow::full(headcount);
        group.bench_with_input(
            BenchmarkId::from_parameter(headcount),
            &(window, constraints),
            |b, (w, k)| {
                b.iter(|| {
                    let pass = GridSearch::run(
                        black_box(&scorer),
                        w,
                        k,
                        SortStrategy::Profit,
                        10,
                        &AtomicBool::new(false),
                    );
                    black_box(pass)
                });
            },
        );
    }
    group.finish();
}

fn bench_refinement(c: &mut Criterion) {
    let mut group = c.benchmark_group("refinement");
    group.sample_size(10);
    let scorer = scorer();

    for headcount in [300u32, 1_500] {
        let constraints = StaffingConstraints::new(headcount, headcount / 10);
        let config = RefinementConfig::default().with_max_reruns(5);
        group.bench_with_input(
            BenchmarkId::from_parameter(headcount),
            &(constraints, config),
            |b, (k, cfg)| {
                b.iter(|| {
                    let result =
                        RefinementRunner::run(black_box(&scorer), k, cfg, &SequentialPool::new(4));
                    black_box(result)
                });
            },
        );
    }
    group.finish();
}

fn bench_trait_recovery(c: &mut Criterion) {
    let traits = EmployeeTraits {
        morale: 97.0,
        energy: 93.0,
        intelligence: 142.0,
        charisma: 118.0,
        creativity: 86.0,
        efficiency: 131.0,
        experience: 210.0,
    };
    let jobs = JobCounts::new([12, 12, 6, 9, 4]);
    let mut observation = OfficeObservation::from_snapshot(
        &ProductionSnapshot {
            traits,
            jobs,
            ..ProductionSnapshot::default()
        },
        Default::default(),
    );
    observation.production = corp_optim::formulas::employee_production(
        &traits,
        &jobs,
        &observation.multipliers,
    );
    let settings = LmSettings::default();

    c.bench_function("recover_employee_traits", |b| {
        b.iter(|| black_box(recover_employee_traits(black_box(&observation), &settings)))
    });
}

fn bench_boost_solver(c: &mut Criterion) {
    let coefficients = IndustryFactors::AGRICULTURE.boost_coefficients();
    c.bench_function("optimal_boost_quantities", |b| {
        b.iter(|| {
            black_box(optimal_boost_quantities(
                black_box(&coefficients),
                &BOOST_MATERIAL_SIZES,
                black_box(12_000.0),
                true,
            ))
        })
    });
}

criterion_group!(
    benches,
    bench_grid_pass,
    bench_refinement,
    bench_trait_recovery,
    bench_boost_solver
);
criterion_main!(benches);
