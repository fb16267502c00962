//! What a division sells.

/// Industry weights that fold product stats into a single rating.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RatingWeights {
    pub quality: f64,
    pub performance: f64,
    pub durability: f64,
    pub reliability: f64,
    pub aesthetics: f64,
    pub features: f64,
}

impl RatingWeights {
    pub const TOBACCO: RatingWeights = RatingWeights {
        quality: 0.7,
        performance: 0.0,
        durability: 0.1,
        reliability: 0.0,
        aesthetics: 0.2,
        features: 0.0,
    };

    pub const SOFTWARE: RatingWeights = RatingWeights {
        quality: 0.2,
        performance: 0.2,
        durability: 0.2,
        reliability: 0.2,
        aesthetics: 0.0,
        features: 0.2,
    };

    pub const COMPUTER_HARDWARE: RatingWeights = RatingWeights {
        quality: 0.15,
        performance: 0.25,
        durability: 0.25,
        reliability: 0.2,
        aesthetics: 0.05,
        features: 0.1,
    };
}

/// A raw material sold on the open market.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialListing {
    pub quality: f64,
    /// Base markup of the material type.
    pub base_markup: f64,
    pub market_price: f64,
    pub demand: f64,
    pub competition: f64,
}

/// Lifecycle stage of a product.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProductStage {
    /// Still being designed; stats depend on who is staffed while it develops.
    InDevelopment {
        design_investment: f64,
        advertising_investment: f64,
        rating_weights: RatingWeights,
    },
    /// Finished and on sale with a known rating and markup.
    Listed { rating: f64, markup: f64 },
}

/// A manufactured product.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProductListing {
    pub stage: ProductStage,
    pub demand: f64,
    pub competition: f64,
    /// Per-unit production cost, the product's reference price.
    pub production_cost: f64,
}

/// The good a candidate staffing is scored against.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Item {
    Material(MaterialListing),
    Product(ProductListing),
}

impl Item {
    /// Products are composite goods; their office production is halved.
    pub fn is_product(&self) -> bool {
        matches!(self, Item::Product(_))
    }

    /// Whether the item has not been released yet.
    pub fn in_development(&self) -> bool {
        matches!(
            self,
            Item::Product(ProductListing {
                stage: ProductStage::InDevelopment { .. },
                ..
            })
        )
    }

    pub fn demand(&self) -> f64 {
        match self {
            Item::Material(m) => m.demand,
            Item::Product(p) => p.demand,
        }
    }

    pub fn competition(&self) -> f64 {
        match self {
            Item::Material(m) => m.competition,
            Item::Product(p) => p.competition,
        }
    }

    /// Price the markup is added on top of.
    pub fn reference_price(&self) -> f64 {
        match self {
            Item::Material(m) => m.market_price,
            Item::Product(p) => p.production_cost,
        }
    }
}
