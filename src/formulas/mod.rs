//! Economic formula library.
//!
//! Pure, deterministic functions mapping division state to production,
//! sales and cost figures. Degenerate inputs saturate instead of
//! producing NaN: production floors at 0, advertising ratios at 0.01 and
//! market factors at 0.1.
//!
//! # Submodules
//!
//! - [`upgrades`]: geometric cost curves, affordability, upgrade catalog
//! - [`employees`]: per-job productivity, raw production, progress, research
//! - [`market`]: advertising, market, business and sales factors, pricing
//! - [`product`]: product stats, rating and markup
//! - [`boost`]: optimal boost-material stock under a space budget

pub mod boost;
pub mod employees;
pub mod market;
pub mod product;
pub mod upgrades;

pub use boost::{boost_multiplier, optimal_boost_quantities, BOOST_MATERIAL_SIZES};
pub use employees::{
    employee_production, product_development_progress, raw_production, research_point_gain,
    ProductionMultipliers, StatMultipliers,
};
pub use market::{
    advertising_factors, business_factor, market_factor, max_sales_volume, optimal_price,
    AdvertisingFactors, SalesFactors, SECONDS_PER_MARKET_CYCLE,
};
pub use product::{product_markup, product_rating, product_stats, ProductStats};
pub use upgrades::{max_affordable_level, upgrade_benefit, upgrade_cost};
