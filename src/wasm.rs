//! JavaScript bindings.
//!
//! Values cross the boundary as plain JS objects shaped like the serde
//! form of the Rust types, with snake_case keys at every level. The
//! browser has no worker threads here, so the search runs on a
//! [`SequentialPool`].

use serde::Deserialize;
use wasm_bindgen::prelude::*;

use crate::grid::StaffingConstraints;
use crate::model::{Item, ProductionSnapshot};
use crate::recovery::{recover_employee_traits, LmSettings, OfficeObservation};
use crate::refine::{RefinementConfig, RefinementRunner, SequentialPool};
use crate::scoring::EconomicScorer;
use crate::topk::SortStrategy;

#[derive(Deserialize)]
struct OptimizeRequest {
    snapshot: ProductionSnapshot,
    constraints: StaffingConstraints,
    item: Item,
    #[serde(default)]
    strategy: Option<String>,
    #[serde(default)]
    max_reruns: Option<usize>,
    #[serde(default)]
    top_k: Option<usize>,
}

fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

/// Runs the staffing refinement and returns the full result object.
#[wasm_bindgen(js_name = optimizeStaffing)]
pub fn optimize_staffing_js(request: JsValue) -> Result<JsValue, JsError> {
    let req: OptimizeRequest = serde_wasm_bindgen::from_value(request).map_err(js_error)?;
    let strategy = match req.strategy.as_deref() {
        None => SortStrategy::default(),
        Some(name) => SortStrategy::from_name(name)
            .ok_or_else(|| JsError::new(&format!("unknown strategy '{name}'")))?,
    };

    let defaults = RefinementConfig::default();
    let config = defaults
        .clone()
        .with_strategy(strategy)
        .with_max_reruns(req.max_reruns.unwrap_or(defaults.max_reruns))
        .with_top_k(req.top_k.unwrap_or(defaults.top_k))
        .with_parallelism(1);

    let scorer = EconomicScorer::new(req.snapshot, req.item, strategy).map_err(js_error)?;
    let result = RefinementRunner::run(&scorer, &req.constraints, &config, &SequentialPool::new(1))
        .map_err(js_error)?;
    serde_wasm_bindgen::to_value(&result).map_err(js_error)
}

/// Fits average employee stats to observed per-job production.
#[wasm_bindgen(js_name = recoverEmployeeTraits)]
pub fn recover_employee_traits_js(observation: JsValue) -> Result<JsValue, JsError> {
    let observation: OfficeObservation =
        serde_wasm_bindgen::from_value(observation).map_err(js_error)?;
    let recovered =
        recover_employee_traits(&observation, &LmSettings::default()).map_err(js_error)?;
    serde_wasm_bindgen::to_value(&recovered).map_err(js_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MaterialListing;
    use serde_json::json;

    fn request(constraints: serde_json::Value) -> serde_json::Value {
        let item = Item::Material(MaterialListing {
            quality: 50.0,
            base_markup: 0.05,
            market_price: 1_500.0,
            demand: 80.0,
            competition: 30.0,
        });
        json!({
            "snapshot": serde_json::to_value(ProductionSnapshot::default()).unwrap(),
            "constraints": constraints,
            "item": serde_json::to_value(item).unwrap(),
            "strategy": "profit",
            "max_reruns": 2,
            "top_k": 3,
        })
    }

    #[test]
    fn test_request_keys_match_nested_types() {
        let snapshot = serde_json::to_value(ProductionSnapshot::default()).unwrap();
        assert!(snapshot.get("division_production_multiplier").is_some());

        let parsed: OptimizeRequest =
            serde_json::from_value(request(json!({ "total_headcount": 15, "research": 0 })))
                .unwrap();
        assert_eq!(parsed.constraints.total_headcount, 15);
        assert_eq!(parsed.strategy.as_deref(), Some("profit"));
        assert_eq!(parsed.max_reruns, Some(2));
        assert_eq!(parsed.top_k, Some(3));

        let camel = request(json!({ "totalHeadcount": 15, "research": 0 }));
        assert!(serde_json::from_value::<OptimizeRequest>(camel).is_err());
    }
}
