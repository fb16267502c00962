//! Upgrade cost curves and benefits.
//!
//! Every purchasable level costs `base_price * price_mult^level`, so the
//! price of a level range is a geometric series with the closed form
//! used by [`upgrade_cost`].

use crate::error::OptimizerError;
use crate::model::CorporationUpgrade;

/// Correction steps allowed after the logarithmic estimate.
const MAX_LEVEL_CORRECTIONS: u32 = 64;

/// Pricing and effect of one corporation upgrade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeParams {
    pub base_price: f64,
    pub price_multiplier: f64,
    /// Added to the multiplier per purchased level.
    pub benefit: f64,
}

impl CorporationUpgrade {
    /// Catalog entry for this upgrade.
    pub fn params(self) -> UpgradeParams {
        let (base_price, price_multiplier, benefit) = match self {
            CorporationUpgrade::SmartFactories => (2e9, 1.06, 0.03),
            CorporationUpgrade::SmartStorage => (2e9, 1.06, 0.1),
            CorporationUpgrade::DreamSense => (4e9, 1.1, 0.001),
            CorporationUpgrade::WilsonAnalytics => (4e9, 2.0, 0.005),
            CorporationUpgrade::NuoptimalNootropicInjectorImplants => (1e9, 1.06, 0.1),
            CorporationUpgrade::SpeechProcessorImplants => (1e9, 1.06, 0.1),
            CorporationUpgrade::NeuralAccelerators => (1e9, 1.06, 0.1),
            CorporationUpgrade::FocusWires => (1e9, 1.06, 0.1),
            CorporationUpgrade::AbcSalesBots => (1e9, 1.07, 0.01),
            CorporationUpgrade::ProjectInsight => (5e9, 1.07, 0.05),
        };
        UpgradeParams {
            base_price,
            price_multiplier,
            benefit,
        }
    }
}

/// Total price of buying levels `from_level..to_level`.
///
/// `base_price * (mult^to - mult^from) / (mult - 1)`.
///
/// # Errors
///
/// [`OptimizerError::InvalidPriceMultiplier`] when `price_multiplier == 1`
/// (or is not a positive finite number), and
/// [`OptimizerError::InvalidLevelRange`] when `to_level < from_level`.
pub fn upgrade_cost(
    base_price: f64,
    price_multiplier: f64,
    from_level: u32,
    to_level: u32,
) -> Result<f64, OptimizerError> {
    if price_multiplier == 1.0 || !(price_multiplier > 0.0) || !price_multiplier.is_finite() {
        return Err(OptimizerError::InvalidPriceMultiplier(price_multiplier));
    }
    if to_level < from_level {
        return Err(OptimizerError::InvalidLevelRange {
            from: from_level,
            to: to_level,
        });
    }
    Ok(geometric_cost(base_price, price_multiplier, from_level, to_level))
}

fn geometric_cost(base_price: f64, mult: f64, from_level: u32, to_level: u32) -> f64 {
    if to_level == from_level {
        return 0.0;
    }
    base_price * (mult.powf(to_level as f64) - mult.powf(from_level as f64)) / (mult - 1.0)
}

/// Highest level reachable from `from_level` without exceeding `budget`.
///
/// The result `L` satisfies `upgrade_cost(from, L) <= budget <
/// upgrade_cost(from, L + 1)`. A non-positive or NaN budget yields
/// `from_level`.
///
/// # Errors
///
/// [`OptimizerError::InvalidPriceMultiplier`] unless `price_multiplier > 1`,
/// since a shrinking price never runs out of affordable levels.
pub fn max_affordable_level(
    base_price: f64,
    price_multiplier: f64,
    from_level: u32,
    budget: f64,
) -> Result<u32, OptimizerError> {
    if !(price_multiplier > 1.0) || !price_multiplier.is_finite() {
        return Err(OptimizerError::InvalidPriceMultiplier(price_multiplier));
    }
    if !(budget > 0.0) || !(base_price > 0.0) {
        return Ok(from_level);
    }

    let cost = |to: u32| geometric_cost(base_price, price_multiplier, from_level, to);
    // Past f64 range the next level is unaffordable at any finite budget.
    let start = price_multiplier.powf(from_level as f64);
    if from_level == u32::MAX || !start.is_finite() || !cost(from_level + 1).is_finite() {
        return Ok(from_level);
    }

    let estimate =
        ((budget * (price_multiplier - 1.0) / base_price + start).ln() / price_multiplier.ln())
            .floor();
    // `as` saturates; NaN maps to 0 and is lifted back to `from_level`.
    let mut level = (estimate as u32).max(from_level);

    // NaN and infinite costs count as over budget.
    let affordable = |to: u32| cost(to) <= budget;
    for _ in 0..MAX_LEVEL_CORRECTIONS {
        if level > from_level && !affordable(level) {
            level -= 1;
        } else if level < u32::MAX && affordable(level + 1) {
            level += 1;
        } else {
            break;
        }
    }
    if affordable(level) {
        return Ok(level);
    }

    // The estimate overshot by more than the correction budget.
    let (mut lo, mut hi) = (from_level, level);
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if affordable(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(lo)
}

/// Multiplier granted by `level` purchased levels of `upgrade`.
pub fn upgrade_benefit(upgrade: CorporationUpgrade, level: u32) -> f64 {
    1.0 + upgrade.params().benefit * level as f64
}

/// Price of raising `upgrade` from `from_level` to `to_level`.
pub fn corporation_upgrade_cost(
    upgrade: CorporationUpgrade,
    from_level: u32,
    to_level: u32,
) -> Result<f64, OptimizerError> {
    let params = upgrade.params();
    upgrade_cost(params.base_price, params.price_multiplier, from_level, to_level)
}

/// Highest level of `upgrade` affordable with `budget`.
pub fn max_affordable_upgrade_level(
    upgrade: CorporationUpgrade,
    from_level: u32,
    budget: f64,
) -> Result<u32, OptimizerError> {
    let params = upgrade.params();
    max_affordable_level(params.base_price, params.price_multiplier, from_level, budget)
}

const OFFICE_INITIAL_COST: f64 = 4e9;
const OFFICE_INITIAL_SIZE: u32 = 3;
const OFFICE_COST_MULTIPLIER: f64 = 1.09;
const WAREHOUSE_BASE_COST: f64 = 1e9;
const WAREHOUSE_COST_MULTIPLIER: f64 = 1.07;
const ADVERT_BASE_COST: f64 = 1e9;
const ADVERT_COST_MULTIPLIER: f64 = 1.06;

/// Price of adding `increase` seats to an office of `current_size`.
///
/// Seats are bought in blocks of three; a partial block costs a full one.
pub fn office_size_upgrade_cost(current_size: u32, increase: u32) -> f64 {
    let first_block = (current_size as f64 / OFFICE_INITIAL_SIZE as f64).round() as u32;
    let blocks = increase.div_ceil(OFFICE_INITIAL_SIZE);
    geometric_cost(
        OFFICE_INITIAL_COST,
        OFFICE_COST_MULTIPLIER,
        first_block,
        first_block + blocks,
    )
}

/// Price of raising a warehouse from `from_level` to `to_level`.
pub fn warehouse_upgrade_cost(from_level: u32, to_level: u32) -> Result<f64, OptimizerError> {
    upgrade_cost(
        WAREHOUSE_BASE_COST * WAREHOUSE_COST_MULTIPLIER,
        WAREHOUSE_COST_MULTIPLIER,
        from_level,
        to_level,
    )
}

/// Price of the next `count` AdVert campaigns after `bought` earlier ones.
pub fn advert_cost(bought: u32, count: u32) -> f64 {
    geometric_cost(
        ADVERT_BASE_COST,
        ADVERT_COST_MULTIPLIER,
        bought,
        bought.saturating_add(count),
    )
}
