//! Portion normalization module
//!
//! Realistic-range clamping and kitchen measurement conversion for
//! generated meal plans.

pub mod converter;
pub mod normalizer;
pub mod ranges;
pub mod tables;

pub use converter::{KitchenConverter, KitchenMeasurement, MeasureUnit};
pub use normalizer::{NormalizeReport, PortionCorrection, PortionNormalizer};
pub use ranges::{Correction, RealisticRange, RealisticRanges};
pub use tables::{ingredient_key, MeasurementTable, TableError, Threshold, ThresholdTable};

use crate::models::MealPlan;

/// Normalize a meal plan with the reference tables
pub fn fix_meal_portions(plan: MealPlan) -> MealPlan {
    PortionNormalizer::default().normalize(plan)
}

/// Convert one amount with the reference tables
pub fn convert_to_kitchen_measurement(amount: f64, unit: &str, item: &str) -> String {
    KitchenConverter::default().convert(amount, unit, item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_scenarios() {
        assert_eq!(convert_to_kitchen_measurement(321.4, "g", "tofu"), "1/2 cup");
        assert_eq!(convert_to_kitchen_measurement(47.7, "ml", "soy_sauce"), "2 tbsp");
        assert_eq!(convert_to_kitchen_measurement(77.8, "g", "oats"), "1 cup");
        assert_eq!(convert_to_kitchen_measurement(311.0, "ml", "milk"), "1 1/2 cups");
    }

    #[test]
    fn test_fix_meal_portions_passes_through_empty_plan() {
        let plan = MealPlan::default();
        assert_eq!(fix_meal_portions(plan.clone()), plan);
    }
}
