//! Cibozer Portions Library
//!
//! Realistic portion clamping and kitchen measurement conversion for
//! generated meal plans.

pub mod build_info;
pub mod config;
pub mod mcp;
pub mod models;
pub mod portions;
pub mod tools;

pub use models::{Entries, Entry, Ingredient, IngredientEntry, Meal, MealPlan, PlanDay};
pub use portions::{
    convert_to_kitchen_measurement, fix_meal_portions, KitchenConverter, NormalizeReport,
    PortionNormalizer,
};
