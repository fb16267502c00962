//! Sales-side factors: advertising, market conditions, business staff.

use super::upgrades::upgrade_benefit;
use crate::model::CorporationUpgrade;

/// Seconds in one market cycle.
pub const SECONDS_PER_MARKET_CYCLE: f64 = 10.0;

/// Advertising factors of a division.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdvertisingFactors {
    /// Combined sales factor.
    pub total: f64,
    pub awareness: f64,
    pub popularity: f64,
    pub ratio: f64,
}

/// Advertising factors from awareness, popularity and the industry exponent.
///
/// The ratio factor is 0.01 when awareness is exactly zero.
pub fn advertising_factors(
    awareness: f64,
    popularity: f64,
    industry_factor: f64,
) -> AdvertisingFactors {
    let awareness_factor = (awareness + 1.0).powf(industry_factor);
    let popularity_factor = (popularity + 1.0).powf(industry_factor);
    let ratio = if awareness == 0.0 {
        0.01
    } else {
        ((popularity + 0.001) / awareness).max(0.01)
    };
    AdvertisingFactors {
        total: (awareness_factor * popularity_factor * ratio).powf(0.85),
        awareness: awareness_factor,
        popularity: popularity_factor,
        ratio,
    }
}

/// `max(0.1, demand * (100 - competition) / 100)`.
pub fn market_factor(demand: f64, competition: f64) -> f64 {
    (demand * (100.0 - competition) / 100.0).max(0.1)
}

/// Sales factor from business staff output.
pub fn business_factor(business_production: f64) -> f64 {
    let b = 1.0 + business_production.max(0.0);
    b.powf(0.26) + b / 10_000.0
}

/// ABC SalesBots benefit times research sales multiplier.
pub fn sales_multiplier(sales_bots_level: u32, research_sales_multiplier: f64) -> f64 {
    upgrade_benefit(CorporationUpgrade::AbcSalesBots, sales_bots_level) * research_sales_multiplier
}

/// Inputs of [`max_sales_volume`], all multiplicative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalesFactors {
    pub item: f64,
    pub business: f64,
    pub advertising: f64,
    pub market: f64,
    pub sales: f64,
}

/// Units per second the market absorbs when priced at the markup limit.
pub fn max_sales_volume(factors: &SalesFactors) -> f64 {
    factors.item * factors.business * factors.advertising * factors.market * factors.sales
}

/// Item multiplier of a material.
pub fn material_item_multiplier(quality: f64) -> f64 {
    quality + 0.001
}

/// Item multiplier of a product with the given rating.
pub fn product_item_multiplier(rating: f64) -> f64 {
    0.5 * rating.max(0.0).powf(0.65)
}

/// Highest price at which `production` units per second still all sell.
///
/// `markup_limit / sqrt(production / volume) + reference_price`. Returns
/// `None` when production or volume is not positive.
pub fn optimal_price(
    markup_limit: f64,
    production: f64,
    volume: f64,
    reference_price: f64,
) -> Option<f64> {
    if !(production > 0.0) || !(volume > 0.0) {
        return None;
    }
    Some(markup_limit / (production / volume).sqrt() + reference_price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_advertising_zero_awareness() {
        let f = advertising_factors(0.0, 1234.0, 0.2);
        assert_eq!(f.ratio, 0.01);
        assert!(f.total.is_finite());
        assert_eq!(f.awareness, 1.0);
    }

    #[test]
    fn test_advertising_ratio_floor() {
        let f = advertising_factors(1e6, 0.0, 0.04);
        assert_eq!(f.ratio, 0.01);
        let f = advertising_factors(100.0, 50.0, 0.04);
        assert!((f.ratio - 50.001 / 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_advertising_total() {
        let f = advertising_factors(100.0, 50.0, 0.2);
        let expected = (101f64.powf(0.2) * 51f64.powf(0.2) * (50.001 / 100.0)).powf(0.85);
        assert!((f.total - expected).abs() < 1e-12);
    }

    #[test]
    fn test_market_factor_floor() {
        assert_eq!(market_factor(0.0, 0.0), 0.1);
        assert_eq!(market_factor(50.0, 100.0), 0.1);
        assert!((market_factor(80.0, 25.0) - 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_business_factor() {
        assert!((business_factor(0.0) - (1.0 + 1e-4)).abs() < 1e-12);
        assert!(business_factor(1000.0) > business_factor(10.0));
        assert_eq!(business_factor(-5.0), business_factor(0.0));
    }

    #[test]
    fn test_optimal_price_clears_volume() {
        let price = optimal_price(2.0, 400.0, 100.0, 10.0).unwrap();
        assert!((price - 11.0).abs() < 1e-12);
        assert!(optimal_price(2.0, 0.0, 100.0, 10.0).is_none());
        assert!(optimal_price(2.0, 10.0, 0.0, 10.0).is_none());
    }

    #[test]
    fn test_item_multipliers() {
        assert!((material_item_multiplier(1.0) - 1.001).abs() < 1e-12);
        assert!((product_item_multiplier(1.0) - 0.5).abs() < 1e-12);
        assert_eq!(product_item_multiplier(-1.0), 0.0);
    }

    proptest! {
        #[test]
        fn prop_market_factor_floor(demand in 0f64..=100.0, competition in 0f64..=100.0) {
            prop_assert!(market_factor(demand, competition) >= 0.1);
        }

        #[test]
        fn prop_zero_awareness_ratio(popularity in 0f64..1e9, factor in 0f64..1.0) {
            let f = advertising_factors(0.0, popularity, factor);
            prop_assert_eq!(f.ratio, 0.01);
            prop_assert!(f.total.is_finite());
        }
    }
}
