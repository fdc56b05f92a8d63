//! Kitchen measurement tables
//!
//! Ordered threshold tables mapping metric amounts (ml or g) to the
//! human-readable measurements a home cook would reach for.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lookup tolerance: an amount may exceed a threshold by up to 20%
pub const TOLERANCE: f64 = 1.2;

/// Errors raised when building or loading measurement and range tables
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("Threshold table must have at least one entry")]
    Empty,

    #[error("Thresholds must be strictly increasing: {previous} followed by {next}")]
    NotIncreasing { previous: f64, next: f64 },

    #[error("Threshold must be a finite number, got {0}")]
    NonFinite(f64),

    #[error("Invalid realistic range for '{item}': expected min < ideal < max, got ({min}, {max}, {ideal})")]
    InvalidRange {
        item: String,
        min: f64,
        max: f64,
        ideal: f64,
    },
}

/// One threshold and the display string used up to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub threshold: f64,
    pub display: String,
}

/// Threshold -> display string map with strictly increasing thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Threshold>", into = "Vec<Threshold>")]
pub struct ThresholdTable {
    entries: Vec<Threshold>,
}

impl ThresholdTable {
    /// Build a table, checking that thresholds are finite and strictly increasing
    pub fn new(entries: Vec<Threshold>) -> Result<Self, TableError> {
        if entries.is_empty() {
            return Err(TableError::Empty);
        }

        for entry in &entries {
            if !entry.threshold.is_finite() {
                return Err(TableError::NonFinite(entry.threshold));
            }
        }

        for pair in entries.windows(2) {
            if pair[1].threshold <= pair[0].threshold {
                return Err(TableError::NotIncreasing {
                    previous: pair[0].threshold,
                    next: pair[1].threshold,
                });
            }
        }

        Ok(Self { entries })
    }

    /// Build a checked table from `(threshold, display)` pairs
    #[cfg(test)]
    pub(crate) fn from_pairs(pairs: &[(f64, &str)]) -> Result<Self, TableError> {
        Self::new(
            pairs
                .iter()
                .map(|(threshold, display)| Threshold {
                    threshold: *threshold,
                    display: (*display).to_string(),
                })
                .collect(),
        )
    }

    /// Build a table from trusted literals without re-validating them
    ///
    /// The reference tables are checked by `test_builtin_tables_are_valid`.
    fn from_static(pairs: &[(f64, &str)]) -> Self {
        Self {
            entries: pairs
                .iter()
                .map(|(threshold, display)| Threshold {
                    threshold: *threshold,
                    display: (*display).to_string(),
                })
                .collect(),
        }
    }

    /// Find the display string for an amount
    ///
    /// Returns the first threshold (ascending) with `amount <= threshold * 1.2`.
    /// Amounts beyond every threshold saturate to the largest entry.
    pub fn lookup(&self, amount: f64) -> &str {
        self.entries
            .iter()
            .find(|entry| amount <= entry.threshold * TOLERANCE)
            .or_else(|| self.entries.last())
            .map(|entry| entry.display.as_str())
            .unwrap_or_default()
    }

    pub fn entries(&self) -> &[Threshold] {
        &self.entries
    }
}

impl TryFrom<Vec<Threshold>> for ThresholdTable {
    type Error = TableError;

    fn try_from(entries: Vec<Threshold>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<ThresholdTable> for Vec<Threshold> {
    fn from(table: ThresholdTable) -> Self {
        table.entries
    }
}

/// Normalize an ingredient name into a table key
///
/// "Soy Sauce", " soy-sauce " and "soy_sauce" all become `soy_sauce`.
pub fn ingredient_key(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

// ============================================================================
// Reference Tables
// ============================================================================

const VOLUME_ML: &[(f64, &str)] = &[
    (5.0, "1 tsp"),
    (15.0, "1 tbsp"),
    (30.0, "2 tbsp"),
    (60.0, "1/4 cup"),
    (80.0, "1/3 cup"),
    (120.0, "1/2 cup"),
    (160.0, "2/3 cup"),
    (180.0, "3/4 cup"),
    (240.0, "1 cup"),
    (360.0, "1 1/2 cups"),
    (480.0, "2 cups"),
];

const DEFAULT_WEIGHT_G: &[(f64, &str)] = &[
    (15.0, "1 tbsp"),
    (30.0, "1 oz"),
    (60.0, "2 oz"),
    (85.0, "3 oz"),
    (115.0, "4 oz"),
    (170.0, "6 oz"),
    (225.0, "8 oz"),
    (340.0, "12 oz"),
    (450.0, "1 lb"),
];

const INGREDIENT_WEIGHT_G: &[(&str, &[(f64, &str)])] = &[
    ("oats", &[(20.0, "1/4 cup"), (40.0, "1/2 cup"), (60.0, "3/4 cup"), (80.0, "1 cup")]),
    ("rice", &[(45.0, "1/4 cup"), (90.0, "1/2 cup"), (135.0, "3/4 cup"), (185.0, "1 cup")]),
    ("quinoa", &[(45.0, "1/4 cup"), (85.0, "1/2 cup"), (130.0, "3/4 cup"), (170.0, "1 cup")]),
    ("pasta", &[(28.0, "1 oz dry"), (56.0, "2 oz dry"), (85.0, "3 oz dry"), (112.0, "4 oz dry")]),
    ("tofu", &[(60.0, "1/4 cup"), (125.0, "1/2 cup"), (250.0, "1 cup")]),
    ("almonds", &[(9.0, "1 tbsp"), (18.0, "2 tbsp"), (35.0, "1/4 cup"), (70.0, "1/2 cup")]),
    ("walnuts", &[(7.0, "1 tbsp"), (15.0, "2 tbsp"), (30.0, "1/4 cup"), (60.0, "1/2 cup")]),
    ("peanut_butter", &[(16.0, "1 tbsp"), (32.0, "2 tbsp"), (48.0, "3 tbsp"), (64.0, "1/4 cup")]),
    ("cheese", &[(7.0, "1 tbsp shredded"), (28.0, "1/4 cup shredded"), (56.0, "1/2 cup shredded"), (113.0, "1 cup shredded")]),
    ("spinach", &[(30.0, "1 cup"), (60.0, "2 cups"), (90.0, "3 cups"), (150.0, "5 cups")]),
    ("broccoli", &[(45.0, "1/2 cup"), (90.0, "1 cup"), (180.0, "2 cups")]),
    ("berries", &[(37.0, "1/4 cup"), (75.0, "1/2 cup"), (150.0, "1 cup")]),
    ("greek_yogurt", &[(60.0, "1/4 cup"), (120.0, "1/2 cup"), (170.0, "3/4 cup"), (245.0, "1 cup")]),
    ("flour", &[(8.0, "1 tbsp"), (30.0, "1/4 cup"), (60.0, "1/2 cup"), (125.0, "1 cup")]),
];

/// Volume and weight tables used by the converter
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementTable {
    /// Milliliters -> kitchen unit, shared by every liquid
    pub volume: ThresholdTable,
    /// Grams -> kitchen unit, keyed by ingredient
    pub weights: HashMap<String, ThresholdTable>,
    /// Grams -> kitchen unit for ingredients without a dedicated table
    pub default_weight: ThresholdTable,
}

impl MeasurementTable {
    /// The reference tables shipped with the crate
    pub fn builtin() -> Self {
        let table = ThresholdTable::from_static;

        Self {
            volume: table(VOLUME_ML),
            weights: INGREDIENT_WEIGHT_G
                .iter()
                .map(|(name, pairs)| ((*name).to_string(), table(pairs)))
                .collect(),
            default_weight: table(DEFAULT_WEIGHT_G),
        }
    }

    /// Weight table for an ingredient, falling back to the default table
    pub fn weight_table(&self, item: &str) -> &ThresholdTable {
        self.weights
            .get(&ingredient_key(item))
            .unwrap_or(&self.default_weight)
    }
}

impl Default for MeasurementTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_are_valid() {
        assert!(ThresholdTable::from_pairs(VOLUME_ML).is_ok());
        assert!(ThresholdTable::from_pairs(DEFAULT_WEIGHT_G).is_ok());
        for (name, pairs) in INGREDIENT_WEIGHT_G {
            assert!(ThresholdTable::from_pairs(pairs).is_ok(), "bad table for {}", name);
            assert_eq!(ingredient_key(name), *name);
        }

        let tables = MeasurementTable::builtin();
        assert_eq!(tables.volume.entries().len(), VOLUME_ML.len());
        assert_eq!(tables.weights.len(), INGREDIENT_WEIGHT_G.len());
        assert_eq!(tables.default_weight.entries().len(), DEFAULT_WEIGHT_G.len());
    }

    #[test]
    fn test_lookup_with_tolerance() {
        let tables = MeasurementTable::builtin();
        // 36ml is within 20% of the 30ml threshold
        assert_eq!(tables.volume.lookup(30.0), "2 tbsp");
        assert_eq!(tables.volume.lookup(36.0), "2 tbsp");
        assert_eq!(tables.volume.lookup(37.0), "1/4 cup");
    }

    #[test]
    fn test_lookup_saturates_to_largest() {
        let tables = MeasurementTable::builtin();
        assert_eq!(tables.volume.lookup(10_000.0), "2 cups");
        assert_eq!(tables.default_weight.lookup(f64::INFINITY), "1 lb");
        assert_eq!(tables.default_weight.lookup(f64::NAN), "1 lb");
    }

    #[test]
    fn test_lookup_small_and_negative_amounts() {
        let tables = MeasurementTable::builtin();
        assert_eq!(tables.volume.lookup(0.0), "1 tsp");
        assert_eq!(tables.volume.lookup(-5.0), "1 tsp");
    }

    #[test]
    fn test_weight_table_fallback() {
        let tables = MeasurementTable::builtin();
        assert_eq!(tables.weight_table("oats").lookup(77.8), "1 cup");
        assert_eq!(tables.weight_table("Peanut Butter").lookup(32.0), "2 tbsp");
        assert_eq!(tables.weight_table("dragonfruit").lookup(110.0), "4 oz");
    }

    #[test]
    fn test_table_rejects_unsorted_thresholds() {
        let err = ThresholdTable::from_pairs(&[(10.0, "a"), (10.0, "b")]).unwrap_err();
        assert_eq!(err, TableError::NotIncreasing { previous: 10.0, next: 10.0 });

        assert_eq!(ThresholdTable::from_pairs(&[]).unwrap_err(), TableError::Empty);
        assert!(matches!(
            ThresholdTable::from_pairs(&[(f64::NAN, "a")]),
            Err(TableError::NonFinite(_))
        ));
    }

    #[test]
    fn test_table_deserialize_validates() {
        let ok: ThresholdTable = serde_json::from_str(
            r#"[{"threshold": 5, "display": "1 tsp"}, {"threshold": 15, "display": "1 tbsp"}]"#,
        )
        .unwrap();
        assert_eq!(ok.lookup(12.0), "1 tbsp");

        let bad = serde_json::from_str::<ThresholdTable>(
            r#"[{"threshold": 15, "display": "1 tbsp"}, {"threshold": 5, "display": "1 tsp"}]"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_ingredient_key() {
        assert_eq!(ingredient_key("Soy Sauce"), "soy_sauce");
        assert_eq!(ingredient_key("  soy-sauce "), "soy_sauce");
        assert_eq!(ingredient_key("soy_sauce"), "soy_sauce");
        assert_eq!(ingredient_key("Greek  Yogurt"), "greek_yogurt");
        assert_eq!(ingredient_key(""), "");
    }
}
