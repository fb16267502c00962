//! Product stats, rating and markup.
//!
//! A product's stats are fixed when development finishes and depend on
//! the share of office output each job contributed while it was being
//! designed.

use crate::model::{Job, JobProduction, RatingWeights};

/// Stat weights per contributing job: engineer, management, R&D,
/// operations, business.
type StatWeights = [f64; 5];

const QUALITY: StatWeights = [0.10, 0.05, 0.05, 0.02, 0.02];
const PERFORMANCE: StatWeights = [0.15, 0.02, 0.02, 0.02, 0.02];
const DURABILITY: StatWeights = [0.05, 0.02, 0.08, 0.05, 0.05];
const RELIABILITY: StatWeights = [0.02, 0.08, 0.02, 0.05, 0.08];
const AESTHETICS: StatWeights = [0.00, 0.08, 0.05, 0.02, 0.10];
const FEATURES: StatWeights = [0.08, 0.05, 0.02, 0.05, 0.05];
const BALANCE: StatWeights = [1.2, 0.9, 1.3, 1.5, 1.0];

/// Finished product stats.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProductStats {
    pub quality: f64,
    pub performance: f64,
    pub durability: f64,
    pub reliability: f64,
    pub aesthetics: f64,
    pub features: f64,
}

/// Contribution ratios in [`StatWeights`] order, plus the five-job total.
fn job_ratios(production: &JobProduction) -> Option<([f64; 5], f64)> {
    let order = [
        Job::Engineer,
        Job::Management,
        Job::ResearchAndDevelopment,
        Job::Operations,
        Job::Business,
    ];
    let values = order.map(|job| production[job].max(0.0));
    let total: f64 = values.iter().sum();
    if !(total > 0.0) {
        return None;
    }
    Some((values.map(|v| v / total), total))
}

fn dot(weights: &StatWeights, ratios: &[f64; 5]) -> f64 {
    weights.iter().zip(ratios).map(|(w, r)| w * r).sum()
}

/// Stats of a product developed under `production`.
///
/// Scaled by the design investment (`1 + design^0.1 / 100`) and the
/// division's research points (`1 + points^science_factor / 800`). An
/// office that produces nothing yields all-zero stats.
pub fn product_stats(
    production: &JobProduction,
    design_investment: f64,
    research_points: f64,
    science_factor: f64,
) -> ProductStats {
    let Some((ratios, _)) = job_ratios(production) else {
        return ProductStats::default();
    };
    let design = 1.0 + design_investment.max(0.0).powf(0.1) / 100.0;
    let science = 1.0 + research_points.max(0.0).powf(science_factor) / 800.0;
    let total = dot(&BALANCE, &ratios) * design * science;
    ProductStats {
        quality: total * dot(&QUALITY, &ratios),
        performance: total * dot(&PERFORMANCE, &ratios),
        durability: total * dot(&DURABILITY, &ratios),
        reliability: total * dot(&RELIABILITY, &ratios),
        aesthetics: total * dot(&AESTHETICS, &ratios),
        features: total * dot(&FEATURES, &ratios),
    }
}

/// Industry-weighted rating.
pub fn product_rating(stats: &ProductStats, weights: &RatingWeights) -> f64 {
    stats.quality * weights.quality
        + stats.performance * weights.performance
        + stats.durability * weights.durability
        + stats.reliability * weights.reliability
        + stats.aesthetics * weights.aesthetics
        + stats.features * weights.features
}

/// Markup of a product developed under `production`.
///
/// `100 / (adv * (quality + 0.001)^0.65 * max(business + management ratio,
/// 1 / total))`, with `adv = 1 + advertising^0.1 / 100`. `None` when the
/// office produced nothing.
pub fn product_markup(
    stats: &ProductStats,
    production: &JobProduction,
    advertising_investment: f64,
) -> Option<f64> {
    let (ratios, total) = job_ratios(production)?;
    let advertising = 1.0 + advertising_investment.max(0.0).powf(0.1) / 100.0;
    let business_management = (ratios[4] + ratios[1]).max(1.0 / total);
    Some(100.0 / (advertising * (stats.quality + 0.001).powf(0.65) * business_management))
}

/// Markup limit of a product: `max(rating, 0.001) / markup`.
pub fn product_markup_limit(rating: f64, markup: f64) -> f64 {
    rating.max(0.001) / markup
}

/// Markup limit of a material: `quality / base_markup`.
pub fn material_markup_limit(quality: f64, base_markup: f64) -> f64 {
    quality / base_markup
}
