//! Portion MCP Tools
//!
//! Request handling behind the portion tools, kept free of MCP types so the
//! CLI and tests can call it directly.

use serde::Serialize;
use serde_json::Value;

use crate::models::MealPlan;
use crate::portions::{KitchenMeasurement, NormalizeReport, PortionNormalizer, RealisticRange};

/// Response for fix_meal_portions
#[derive(Debug, Serialize)]
pub struct FixMealPortionsResponse {
    pub plan: MealPlan,
    pub report: NormalizeReport,
}

/// Range entry for list_realistic_ranges
#[derive(Debug, Serialize)]
pub struct RangeSummary {
    pub item: String,
    #[serde(flatten)]
    pub range: RealisticRange,
}

/// Response for list_realistic_ranges
#[derive(Debug, Serialize)]
pub struct ListRangesResponse {
    pub ranges: Vec<RangeSummary>,
    pub count: usize,
}

/// Normalize a plan given as raw JSON
///
/// Only a plan that is not a JSON object fails here; malformed days, meals
/// and ingredients are skipped by the normalizer.
pub fn fix_meal_portions(
    normalizer: &PortionNormalizer,
    plan: Value,
) -> Result<FixMealPortionsResponse, String> {
    let mut plan: MealPlan =
        serde_json::from_value(plan).map_err(|e| format!("Invalid meal plan: {}", e))?;
    let report = normalizer.normalize_in_place(&mut plan);
    Ok(FixMealPortionsResponse { plan, report })
}

/// Convert a single amount
pub fn convert_to_kitchen_measurement(
    normalizer: &PortionNormalizer,
    amount: f64,
    unit: &str,
    item: &str,
) -> KitchenMeasurement {
    normalizer.converter().convert_detailed(amount, unit, item)
}

/// List the realistic ranges in use
pub fn list_realistic_ranges(normalizer: &PortionNormalizer) -> ListRangesResponse {
    let ranges: Vec<RangeSummary> = normalizer
        .converter()
        .ranges()
        .iter()
        .map(|(item, range)| RangeSummary {
            item: item.to_string(),
            range: *range,
        })
        .collect();

    ListRangesResponse {
        count: ranges.len(),
        ranges,
    }
}
