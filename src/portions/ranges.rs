//! Realistic per-serving ranges
//!
//! Keeps generated meal plans from asking for 300g of soy sauce.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::tables::{ingredient_key, TableError};

/// How an out-of-range amount was corrected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Correction {
    /// More than twice the maximum: snapped to the ideal amount
    RescaledToIdeal,
    /// Above the maximum: clamped down to it
    ClampedToMax,
    /// Below the minimum: clamped up to it
    ClampedToMin,
}

/// Acceptable single-serving amount for one ingredient
///
/// Units are the ingredient's natural unit: grams for solids, ml for liquids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RealisticRange {
    pub min: f64,
    pub max: f64,
    pub ideal: f64,
}

impl RealisticRange {
    /// Create a range, enforcing `min < ideal < max`
    pub fn new(item: &str, min: f64, max: f64, ideal: f64) -> Result<Self, TableError> {
        if min < ideal && ideal < max {
            Ok(Self { min, max, ideal })
        } else {
            Err(TableError::InvalidRange {
                item: item.to_string(),
                min,
                max,
                ideal,
            })
        }
    }

    /// Clamp into `[min, max]`
    pub fn clamp(&self, amount: f64) -> f64 {
        if amount > self.max {
            self.max
        } else if amount < self.min {
            self.min
        } else {
            amount
        }
    }

    /// Apply the plan-normalization rule
    ///
    /// Severe outliers (`> max * 2`) snap to `ideal` rather than scaling
    /// proportionally; milder overshoots clamp to the nearest bound.
    pub fn correct(&self, amount: f64) -> (f64, Option<Correction>) {
        if amount > self.max * 2.0 {
            (self.ideal, Some(Correction::RescaledToIdeal))
        } else if amount > self.max {
            (self.max, Some(Correction::ClampedToMax))
        } else if amount < self.min {
            (self.min, Some(Correction::ClampedToMin))
        } else {
            (amount, None)
        }
    }
}

// (item, min, max, ideal)
const REFERENCE_RANGES: &[(&str, f64, f64, f64)] = &[
    // Proteins (g)
    ("chicken_breast", 100.0, 200.0, 150.0),
    ("salmon", 100.0, 200.0, 150.0),
    ("ground_beef", 85.0, 170.0, 115.0),
    ("tofu", 75.0, 150.0, 100.0),
    ("eggs", 50.0, 150.0, 100.0),
    ("greek_yogurt", 100.0, 250.0, 170.0),
    ("cheese", 15.0, 60.0, 30.0),
    // Grains (g, dry)
    ("oats", 30.0, 80.0, 50.0),
    ("rice", 45.0, 100.0, 75.0),
    ("quinoa", 45.0, 90.0, 60.0),
    ("pasta", 56.0, 112.0, 85.0),
    ("flour", 15.0, 125.0, 60.0),
    // Produce (g)
    ("spinach", 30.0, 150.0, 60.0),
    ("broccoli", 75.0, 200.0, 150.0),
    ("sweet_potato", 100.0, 250.0, 150.0),
    ("banana", 80.0, 150.0, 120.0),
    ("berries", 75.0, 150.0, 100.0),
    ("avocado", 50.0, 150.0, 100.0),
    // Fats and nuts (g)
    ("almonds", 15.0, 40.0, 28.0),
    ("walnuts", 15.0, 40.0, 28.0),
    ("peanut_butter", 16.0, 48.0, 32.0),
    // Liquids (ml)
    ("milk", 150.0, 300.0, 240.0),
    ("soy_sauce", 10.0, 30.0, 15.0),
    ("olive_oil", 5.0, 30.0, 15.0),
    ("honey", 5.0, 30.0, 15.0),
    ("lemon_juice", 5.0, 30.0, 15.0),
];

/// Realistic ranges keyed by normalized ingredient name
#[derive(Debug, Clone, PartialEq)]
pub struct RealisticRanges {
    ranges: BTreeMap<String, RealisticRange>,
}

impl RealisticRanges {
    /// The reference ranges shipped with the crate
    pub fn builtin() -> Self {
        let ranges = REFERENCE_RANGES
            .iter()
            .map(|(item, min, max, ideal)| {
                (
                    (*item).to_string(),
                    RealisticRange {
                        min: *min,
                        max: *max,
                        ideal: *ideal,
                    },
                )
            })
            .collect();
        Self { ranges }
    }

    /// No ranges at all: nothing is clamped
    pub fn empty() -> Self {
        Self {
            ranges: BTreeMap::new(),
        }
    }

    pub fn get(&self, item: &str) -> Option<&RealisticRange> {
        self.ranges.get(&ingredient_key(item))
    }

    /// Insert or replace a range after checking it
    pub fn insert(&mut self, item: &str, range: RealisticRange) -> Result<(), TableError> {
        let checked = RealisticRange::new(item, range.min, range.max, range.ideal)?;
        self.ranges.insert(ingredient_key(item), checked);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RealisticRange)> {
        self.ranges.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl Default for RealisticRanges {
    fn default() -> Self {
        Self::builtin()
    }
}
