//! Scoring against the division's production and sales economics.

use super::types::{CandidateScorer, ScoringContext};
use crate::error::OptimizerError;
use crate::formulas::employees::{
    employee_production, product_development_progress, raw_production, research_point_gain,
};
use crate::formulas::market::{
    business_factor, material_item_multiplier, max_sales_volume, optimal_price,
    product_item_multiplier, SalesFactors, SECONDS_PER_MARKET_CYCLE,
};
use crate::formulas::product::{
    material_markup_limit, product_markup, product_markup_limit, product_rating, product_stats,
};
use crate::model::{
    Item, Job, ProductStage, ProductionSnapshot, ScoredCandidate, StaffingAssignment,
};
use crate::topk::SortStrategy;

/// Share of production a listed good may exceed sales volume by.
pub const LISTED_SALES_TOLERANCE: f64 = 0.9;

/// Whether a market absorbing `volume` units can take `production`.
///
/// A product still in development must sell everything it will make;
/// goods already on the market are allowed to overshoot by 10%.
pub fn sellable(in_development: bool, production: f64, volume: f64) -> bool {
    if in_development {
        volume >= production
    } else {
        volume >= LISTED_SALES_TOLERANCE * production
    }
}

/// Scores staffing layouts by production, sale price and profit.
///
/// # Examples
///
/// ```
/// use corp_optim::model::{Item, MaterialListing, ProductionSnapshot, StaffingAssignment};
/// use corp_optim::scoring::{CandidateScorer, EconomicScorer};
/// use corp_optim::topk::SortStrategy;
///
/// let item = Item::Material(MaterialListing {
///     quality: 50.0,
///     base_markup: 0.05,
///     market_price: 1_500.0,
///     demand: 80.0,
///     competition: 30.0,
/// });
/// let scorer =
///     EconomicScorer::new(ProductionSnapshot::default(), item, SortStrategy::Profit).unwrap();
/// let candidate = scorer
///     .score(&StaffingAssignment {
///         operations: 10,
///         engineer: 10,
///         business: 5,
///         management: 5,
///         research: 0,
///     })
///     .unwrap();
/// assert!(candidate.profit > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct EconomicScorer {
    snapshot: ProductionSnapshot,
    item: Item,
    strategy: SortStrategy,
    context: ScoringContext,
}

impl EconomicScorer {
    /// Builds a scorer for one snapshot and item.
    ///
    /// # Errors
    ///
    /// [`OptimizerError::MissingCapability`] when `strategy` ranks by price
    /// but the corporation lacks the market-data unlocks. Other strategies
    /// score without them: no sales-volume filter, and volume, price and
    /// profit are reported as 0.
    pub fn new(
        snapshot: ProductionSnapshot,
        item: Item,
        strategy: SortStrategy,
    ) -> Result<Self, OptimizerError> {
        if strategy.needs_price() && !snapshot.unlocks.has_market_data() {
            return Err(OptimizerError::MissingCapability(
                "Market Research - Demand and Market Data - Competition",
            ));
        }
        let context = ScoringContext::new(&snapshot, &item);
        Ok(Self {
            snapshot,
            item,
            strategy,
            context,
        })
    }

    pub fn snapshot(&self) -> &ProductionSnapshot {
        &self.snapshot
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn strategy(&self) -> SortStrategy {
        self.strategy
    }

    pub fn context(&self) -> &ScoringContext {
        &self.context
    }
}

/// Item-dependent part of a score.
struct Pricing {
    item_multiplier: f64,
    markup_limit: f64,
    progress_rate: f64,
    rating: Option<f64>,
    markup: Option<f64>,
}

impl CandidateScorer for EconomicScorer {
    fn score(&self, assignment: &StaffingAssignment) -> Option<ScoredCandidate> {
        let ctx = &self.context;
        let production = employee_production(
            &self.snapshot.traits,
            &assignment.to_counts(),
            &ctx.stat_multipliers,
        );
        let raw = raw_production(&production, &ctx.production, self.item.is_product());
        if !(raw > 0.0) {
            return None;
        }

        let pricing = match &self.item {
            Item::Material(m) => Pricing {
                item_multiplier: material_item_multiplier(m.quality),
                markup_limit: material_markup_limit(m.quality, m.base_markup),
                progress_rate: 0.0,
                rating: None,
                markup: None,
            },
            Item::Product(p) => match p.stage {
                ProductStage::Listed { rating, markup } => Pricing {
                    item_multiplier: product_item_multiplier(rating),
                    markup_limit: product_markup_limit(rating, markup),
                    progress_rate: 0.0,
                    rating: Some(rating),
                    markup: None,
                },
                ProductStage::InDevelopment {
                    design_investment,
                    advertising_investment,
                    rating_weights,
                } => {
                    let stats = product_stats(
                        &production,
                        design_investment,
                        self.snapshot.research_points,
                        self.snapshot.industry.science_factor,
                    );
                    let rating = product_rating(&stats, &rating_weights);
                    let markup = product_markup(&stats, &production, advertising_investment)?;
                    Pricing {
                        item_multiplier: product_item_multiplier(rating),
                        markup_limit: product_markup_limit(rating, markup),
                        progress_rate: product_development_progress(&production),
                        rating: Some(rating),
                        markup: Some(markup),
                    }
                }
            },
        };

        let (volume, price) = if ctx.market_data {
            let volume = max_sales_volume(&SalesFactors {
                item: pricing.item_multiplier,
                business: business_factor(production[Job::Business]),
                advertising: ctx.advertising,
                market: ctx.market,
                sales: ctx.sales,
            });
            if !sellable(self.item.in_development(), raw, volume) {
                return None;
            }
            let price =
                optimal_price(pricing.markup_limit, raw, volume, self.item.reference_price())?;
            if !price.is_finite() {
                return None;
            }
            (volume, price)
        } else {
            (0.0, 0.0)
        };

        Some(ScoredCandidate {
            assignment: *assignment,
            raw_production: raw,
            max_sales_volume: volume,
            optimal_price: price,
            profit: raw * SECONDS_PER_MARKET_CYCLE * price,
            progress_rate: pricing.progress_rate,
            research_rate: research_point_gain(
                production[Job::ResearchAndDevelopment],
                ctx.project_insight_level,
                &self.snapshot.researches,
            ),
            rating: pricing.rating,
            markup: pricing.markup,
            cost: assignment.total() as f64,
        })
    }
}
