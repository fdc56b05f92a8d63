//! Meal plan model
//!
//! The nested day -> meal -> ingredient structure produced by the meal
//! generator. Keys this crate does not know about are carried through
//! untouched so downstream renderers see the full plan, and slots holding
//! the wrong JSON type are kept as raw values instead of failing the parse.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A list slot: an array of entries, or whatever else upstream put there
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entries<T> {
    List(Vec<Entry<T>>),
    /// Not an array (including `null`); kept as-is
    Malformed(Value),
}

/// One element of a list slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry<T> {
    Record(T),
    /// Anything that is not an object of the expected shape; kept as-is
    Malformed(Value),
}

/// An ingredient slot, which upstream data does not always fill with a record
pub type IngredientEntry = Entry<Ingredient>;

impl<T> Entries<T> {
    /// Entries of a well-formed list, empty for a malformed slot
    pub fn entries(&self) -> std::slice::Iter<'_, Entry<T>> {
        match self {
            Entries::List(list) => list.iter(),
            Entries::Malformed(_) => <&[Entry<T>]>::default().iter(),
        }
    }

    /// Well-formed records only
    pub fn records(&self) -> impl Iterator<Item = &T> {
        self.entries().filter_map(Entry::record)
    }

    pub fn as_list_mut(&mut self) -> Result<&mut Vec<Entry<T>>, &Value> {
        match self {
            Entries::List(list) => Ok(list),
            Entries::Malformed(value) => Err(&*value),
        }
    }
}

impl<T> Entry<T> {
    pub fn record(&self) -> Option<&T> {
        match self {
            Entry::Record(record) => Some(record),
            Entry::Malformed(_) => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Result<&mut T, &Value> {
        match self {
            Entry::Record(record) => Ok(record),
            Entry::Malformed(value) => Err(&*value),
        }
    }
}

/// Keep an explicitly present key, even when its value is `null`
///
/// Only called when the key exists; absence falls back to `None` through
/// `#[serde(default)]`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// A generated meal plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub days: Option<Entries<PlanDay>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One day of a meal plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanDay {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub meals: Option<Entries<Meal>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One meal within a day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Entries<Ingredient>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single ingredient line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Human-readable amount, e.g. "1/2 cup"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kitchen_measurement: Option<String>,
    /// Amount as generated, before any correction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_unit: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Ingredient {
    /// Unit, defaulting to grams
    pub fn unit_or_default(&self) -> &str {
        self.unit.as_deref().unwrap_or("g")
    }

    /// Lower-cased item name, empty when missing
    pub fn item_lowercase(&self) -> String {
        self.item.as_deref().unwrap_or("").to_lowercase()
    }
}

impl MealPlan {
    /// Iterate over every ingredient entry reachable through well-formed days and meals
    pub fn ingredient_entries(&self) -> impl Iterator<Item = &IngredientEntry> {
        self.days
            .iter()
            .flat_map(|days| days.records())
            .flat_map(|day| day.meals.iter().flat_map(|meals| meals.records()))
            .flat_map(|meal| meal.ingredients.iter().flat_map(|ingredients| ingredients.entries()))
    }

    /// Iterate over every well-formed ingredient record
    pub fn ingredients(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredient_entries().filter_map(Entry::record)
    }
}
