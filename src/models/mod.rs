//! Data models
//!
//! Serde structs for the meal plans handed over by the generator.

mod meal_plan;

pub use meal_plan::{Entries, Entry, Ingredient, IngredientEntry, Meal, MealPlan, PlanDay};
