//! Meal plan portion normalizer
//!
//! Walks a generated plan, pulls absurd amounts back into realistic ranges
//! and annotates each ingredient with a kitchen measurement.

use serde::Serialize;

use super::converter::KitchenConverter;
use super::ranges::Correction;
use crate::models::{Ingredient, MealPlan};

/// One amount that was changed during normalization
///
/// `day` and `meal` are zero-based positions in the plan's `days` and
/// `meals` arrays, the same `days[i].meals[j]` form used in log messages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortionCorrection {
    pub day: usize,
    pub meal: usize,
    pub item: String,
    pub unit: String,
    pub from: f64,
    pub to: f64,
    pub correction: Correction,
}

/// Summary of a normalization pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizeReport {
    pub ingredients_seen: usize,
    pub ingredients_normalized: usize,
    /// Slots that were left alone: days, meals or ingredient lists of the
    /// wrong JSON type, non-record entries, and records with no numeric amount
    pub skipped: usize,
    pub corrections: Vec<PortionCorrection>,
}

impl NormalizeReport {
    pub fn count(&self, correction: Correction) -> usize {
        self.corrections
            .iter()
            .filter(|c| c.correction == correction)
            .count()
    }
}

/// Normalizes ingredient portions across a meal plan
#[derive(Debug, Clone, Default)]
pub struct PortionNormalizer {
    converter: KitchenConverter,
}

impl PortionNormalizer {
    pub fn new(converter: KitchenConverter) -> Self {
        Self { converter }
    }

    pub fn converter(&self) -> &KitchenConverter {
        &self.converter
    }

    /// Normalize a plan and hand it back
    pub fn normalize(&self, mut plan: MealPlan) -> MealPlan {
        self.normalize_in_place(&mut plan);
        plan
    }

    /// Normalize a plan in place, reporting what changed
    ///
    /// Best effort: malformed ingredient entries are skipped, never fatal.
    /// A plan without `days` is left untouched.
    pub fn normalize_in_place(&self, plan: &mut MealPlan) -> NormalizeReport {
        let mut report = NormalizeReport::default();

        let Some(days) = plan.days.as_mut() else {
            tracing::debug!("Meal plan has no days, nothing to normalize");
            return report;
        };

        let days = match days.as_list_mut() {
            Ok(days) => days,
            Err(value) => {
                tracing::warn!("Skipping malformed days: {}", value);
                report.skipped += 1;
                return report;
            }
        };

        for (day_idx, day) in days.iter_mut().enumerate() {
            let day = match day.as_record_mut() {
                Ok(day) => day,
                Err(value) => {
                    tracing::warn!("Skipping malformed days[{}]: {}", day_idx, value);
                    report.skipped += 1;
                    continue;
                }
            };

            let meals = match day.meals.as_mut().map(|meals| meals.as_list_mut()) {
                None => continue,
                Some(Ok(meals)) => meals,
                Some(Err(value)) => {
                    tracing::warn!("Skipping malformed days[{}].meals: {}", day_idx, value);
                    report.skipped += 1;
                    continue;
                }
            };

            for (meal_idx, meal) in meals.iter_mut().enumerate() {
                let meal = match meal.as_record_mut() {
                    Ok(meal) => meal,
                    Err(value) => {
                        tracing::warn!(
                            "Skipping malformed days[{}].meals[{}]: {}",
                            day_idx,
                            meal_idx,
                            value
                        );
                        report.skipped += 1;
                        continue;
                    }
                };

                let ingredients = match meal.ingredients.as_mut().map(|list| list.as_list_mut()) {
                    None => continue,
                    Some(Ok(ingredients)) => ingredients,
                    Some(Err(value)) => {
                        tracing::warn!(
                            "Skipping malformed days[{}].meals[{}].ingredients: {}",
                            day_idx,
                            meal_idx,
                            value
                        );
                        report.skipped += 1;
                        continue;
                    }
                };

                for entry in ingredients.iter_mut() {
                    report.ingredients_seen += 1;

                    let ingredient = match entry.as_record_mut() {
                        Ok(ingredient) => ingredient,
                        Err(value) => {
                            tracing::warn!(
                                "Skipping malformed ingredient in days[{}].meals[{}]: {}",
                                day_idx,
                                meal_idx,
                                value
                            );
                            report.skipped += 1;
                            continue;
                        }
                    };

                    match self.normalize_ingredient(ingredient) {
                        Some(correction) => {
                            report.ingredients_normalized += 1;
                            if let Some((from, to, kind)) = correction {
                                report.corrections.push(PortionCorrection {
                                    day: day_idx,
                                    meal: meal_idx,
                                    item: ingredient.item_lowercase(),
                                    unit: ingredient.unit_or_default().to_string(),
                                    from,
                                    to,
                                    correction: kind,
                                });
                            }
                        }
                        None => {
                            tracing::warn!(
                                "Skipping ingredient '{}' without a numeric amount in days[{}].meals[{}]",
                                ingredient.item.as_deref().unwrap_or(""),
                                day_idx,
                                meal_idx
                            );
                            report.skipped += 1;
                        }
                    }
                }
            }
        }

        if !report.corrections.is_empty() {
            tracing::info!(
                "Normalized {} ingredients: {} rescaled to ideal, {} clamped to max, {} clamped to min, {} skipped",
                report.ingredients_normalized,
                report.count(Correction::RescaledToIdeal),
                report.count(Correction::ClampedToMax),
                report.count(Correction::ClampedToMin),
                report.skipped
            );
        }

        report
    }

    /// Correct and annotate one ingredient
    ///
    /// Returns `None` when there is no amount to work with, otherwise the
    /// correction applied (if any) as `(from, to, kind)`.
    fn normalize_ingredient(
        &self,
        ingredient: &mut Ingredient,
    ) -> Option<Option<(f64, f64, Correction)>> {
        let amount = ingredient.amount?;
        let unit = ingredient.unit_or_default().to_string();
        let item = ingredient.item_lowercase();

        let mut applied = None;
        let mut corrected = amount;

        if let Some(range) = self.converter.ranges().get(&item) {
            let (value, correction) = range.correct(amount);
            if let Some(kind) = correction {
                match kind {
                    Correction::RescaledToIdeal => tracing::info!(
                        "'{}' at {}{} is more than twice the max {}{}, using ideal {}{}",
                        item, amount, unit, range.max, unit, range.ideal, unit
                    ),
                    Correction::ClampedToMax => tracing::info!(
                        "'{}' at {}{} is above max, clamping to {}{}",
                        item, amount, unit, range.max, unit
                    ),
                    Correction::ClampedToMin => tracing::info!(
                        "'{}' at {}{} is below min, clamping to {}{}",
                        item, amount, unit, range.min, unit
                    ),
                }
                applied = Some((amount, value, kind));
            }
            corrected = value;
        }

        ingredient.kitchen_measurement = Some(self.converter.convert(corrected, &unit, &item));

        // Keep the first recorded original so repeated passes stay auditable
        if ingredient.original_amount.is_none() {
            ingredient.original_amount = Some(amount);
            ingredient.original_unit = Some(unit);
        }
        ingredient.amount = Some(corrected);

        Some(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IngredientEntry;
    use serde_json::json;

    fn plan(ingredients: serde_json::Value) -> MealPlan {
        serde_json::from_value(json!({
            "days": [{"meals": [{"name": "lunch", "ingredients": ingredients}]}]
        }))
        .unwrap()
    }

    fn first(plan: &MealPlan) -> &Ingredient {
        plan.ingredients().next().unwrap()
    }

    #[test]
    fn test_severe_outlier_snaps_to_ideal() {
        let normalizer = PortionNormalizer::default();
        let mut plan = plan(json!([{"item": "Tofu", "amount": 321.4, "unit": "g"}]));

        let report = normalizer.normalize_in_place(&mut plan);
        let tofu = first(&plan);

        assert_eq!(tofu.amount, Some(100.0));
        assert_eq!(tofu.original_amount, Some(321.4));
        assert_eq!(tofu.original_unit.as_deref(), Some("g"));
        assert_eq!(tofu.kitchen_measurement.as_deref(), Some("1/2 cup"));
        assert_eq!(report.count(Correction::RescaledToIdeal), 1);
        assert_eq!(report.corrections[0].item, "tofu");
    }

    #[test]
    fn test_clamps_to_bounds() {
        let normalizer = PortionNormalizer::default();
        let plan = normalizer.normalize(plan(json!([
            {"item": "soy_sauce", "amount": 47.7, "unit": "ml"},
            {"item": "milk", "amount": 100, "unit": "ml"},
            {"item": "oats", "amount": 77.8, "unit": "g"}
        ])));

        let items: Vec<_> = plan.ingredients().collect();
        assert_eq!(items[0].amount, Some(30.0));
        assert_eq!(items[0].kitchen_measurement.as_deref(), Some("2 tbsp"));
        assert_eq!(items[1].amount, Some(150.0));
        assert_eq!(items[1].kitchen_measurement.as_deref(), Some("2/3 cup"));
        assert_eq!(items[2].amount, Some(77.8));
        assert_eq!(items[2].kitchen_measurement.as_deref(), Some("1 cup"));
    }

    #[test]
    fn test_unit_defaults_to_grams() {
        let normalizer = PortionNormalizer::default();
        let plan = normalizer.normalize(plan(json!([{"item": "oats", "amount": 500}])));

        let oats = first(&plan);
        assert_eq!(oats.amount, Some(50.0));
        assert_eq!(oats.original_unit.as_deref(), Some("g"));
        // The unit key is not invented on the record itself
        assert!(oats.unit.is_none());
    }

    #[test]
    fn test_unknown_items_keep_their_amount() {
        let normalizer = PortionNormalizer::default();
        let plan = normalizer.normalize(plan(json!([
            {"item": "dragonfruit", "amount": 9000, "unit": "g"},
            {"amount": 3, "unit": "pieces"}
        ])));

        let items: Vec<_> = plan.ingredients().collect();
        assert_eq!(items[0].amount, Some(9000.0));
        assert_eq!(items[0].kitchen_measurement.as_deref(), Some("1 lb"));
        assert_eq!(items[1].kitchen_measurement.as_deref(), Some("3.0 pieces"));
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let normalizer = PortionNormalizer::default();
        let mut plan = plan(json!([
            "a pinch of salt",
            {"item": "tofu", "amount": "lots"},
            {"item": "honey"},
            {"item": "tofu", "amount": 500, "unit": "g"}
        ]));

        let report = normalizer.normalize_in_place(&mut plan);
        assert_eq!(report.ingredients_seen, 4);
        assert_eq!(report.skipped, 3);
        assert_eq!(report.ingredients_normalized, 1);

        let entries: Vec<_> = plan.ingredient_entries().collect();
        assert_eq!(entries[0], &IngredientEntry::Malformed(json!("a pinch of salt")));
        match entries[3] {
            IngredientEntry::Record(tofu) => assert_eq!(tofu.amount, Some(100.0)),
            other => panic!("expected record, got {:?}", other),
        }
    }

    #[test]
    fn test_plan_without_days_is_unchanged() {
        let normalizer = PortionNormalizer::default();
        let original: MealPlan =
            serde_json::from_value(json!({"status": "pending", "user_id": 7})).unwrap();

        let mut plan = original.clone();
        let report = normalizer.normalize_in_place(&mut plan);

        assert_eq!(plan, original);
        assert_eq!(report, NormalizeReport::default());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let normalizer = PortionNormalizer::default();
        let once = normalizer.normalize(plan(json!([
            {"item": "tofu", "amount": 321.4, "unit": "g"},
            {"item": "soy_sauce", "amount": 47.7, "unit": "ml"},
            {"item": "oats", "amount": 5, "unit": "g"},
            {"item": "milk", "amount": 311, "unit": "ml"},
            {"item": "dragonfruit", "amount": 42, "unit": "g"}
        ])));

        let mut twice = once.clone();
        let report = normalizer.normalize_in_place(&mut twice);

        assert_eq!(once, twice);
        assert!(report.corrections.is_empty());
    }

    #[test]
    fn test_second_pass_keeps_first_original() {
        let normalizer = PortionNormalizer::default();
        let once = normalizer.normalize(plan(json!([{"item": "tofu", "amount": 321.4, "unit": "g"}])));
        let twice = normalizer.normalize(once);
        assert_eq!(first(&twice).original_amount, Some(321.4));
    }

    #[test]
    fn test_clamping_invariant_holds_for_known_items() {
        let normalizer = PortionNormalizer::default();
        let ranges = normalizer.converter().ranges().clone();

        let ingredients: Vec<_> = ranges
            .iter()
            .flat_map(|(item, range)| {
                [
                    -1.0,
                    0.0,
                    range.min * 0.5,
                    range.ideal,
                    range.max * 1.5,
                    range.max * 2.0,
                    range.max * 2.0 + 0.1,
                    range.max * 40.0,
                ]
                .into_iter()
                .map(move |amount| json!({"item": item, "amount": amount, "unit": "g"}))
            })
            .collect();

        let plan = normalizer.normalize(plan(json!(ingredients)));

        for ingredient in plan.ingredients() {
            let item = ingredient.item.as_deref().unwrap();
            let range = ranges.get(item).unwrap();
            let amount = ingredient.amount.unwrap();
            let original = ingredient.original_amount.unwrap();

            assert!(
                range.min <= amount && amount <= range.max,
                "{} at {} outside range",
                item,
                amount
            );
            if original > range.max * 2.0 {
                assert_eq!(amount, range.ideal);
            }
        }
    }

    #[test]
    fn test_walks_every_day_and_meal() {
        let normalizer = PortionNormalizer::default();
        let mut plan: MealPlan = serde_json::from_value(json!({
            "days": [
                {"meals": [
                    {"ingredients": [{"item": "milk", "amount": 311, "unit": "ml"}]},
                    {"ingredients": []},
                    {"title": "snack"}
                ]},
                {"day": 2},
                {"meals": [{"ingredients": [{"item": "almonds", "amount": 5, "unit": "g"}]}]}
            ]
        }))
        .unwrap();

        let report = normalizer.normalize_in_place(&mut plan);
        assert_eq!(report.ingredients_normalized, 2);
        assert_eq!(report.corrections.len(), 2);
        assert_eq!(report.corrections[1].day, 2);
        assert_eq!(report.corrections[1].correction, Correction::ClampedToMin);
        assert_eq!(report.corrections[1].to, 15.0);
    }

    #[test]
    fn test_default_normalizer_uses_reference_ranges() {
        let plan = crate::portions::fix_meal_portions(plan(json!([
            {"item": "tofu", "amount": 321.4, "unit": "g"}
        ])));
        assert_eq!(first(&plan).amount, Some(100.0));
    }

    #[test]
    fn test_malformed_containers_are_skipped() {
        let normalizer = PortionNormalizer::default();
        let mut plan: MealPlan = serde_json::from_value(json!({
            "days": [
                null,
                {"meals": "tbd"},
                {"meals": [
                    "leftovers",
                    {"ingredients": "none"},
                    {"ingredients": [{"item": "tofu", "amount": 500, "unit": "g"}]}
                ]}
            ]
        }))
        .unwrap();

        let report = normalizer.normalize_in_place(&mut plan);

        assert_eq!(report.skipped, 4);
        assert_eq!(report.ingredients_seen, 1);
        assert_eq!(report.ingredients_normalized, 1);
        assert_eq!(first(&plan).amount, Some(100.0));
        assert_eq!(report.corrections[0].day, 2);
        assert_eq!(report.corrections[0].meal, 2);

        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["days"][0], json!(null));
        assert_eq!(json["days"][1]["meals"], json!("tbd"));
        assert_eq!(json["days"][2]["meals"][0], json!("leftovers"));
        assert_eq!(json["days"][2]["meals"][1]["ingredients"], json!("none"));
    }

    #[test]
    fn test_null_days_pass_through() {
        let normalizer = PortionNormalizer::default();
        let original: MealPlan = serde_json::from_value(json!({"days": null, "x": 1})).unwrap();

        let mut plan = original.clone();
        let report = normalizer.normalize_in_place(&mut plan);

        assert_eq!(plan, original);
        assert_eq!(report.skipped, 1);
        assert_eq!(serde_json::to_value(&plan).unwrap(), json!({"days": null, "x": 1}));
    }
}
