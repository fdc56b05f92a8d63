//! Kitchen measurement conversion
//!
//! Turns metric amounts into the cups and tablespoons shown on exported plans.

use serde::Serialize;

use super::ranges::{RealisticRange, RealisticRanges};
use super::tables::MeasurementTable;

/// Unit family the converter understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureUnit {
    Grams,
    Milliliters,
    Other,
}

impl MeasureUnit {
    /// Only "g" and "ml" get table lookups; everything else is formatted as-is
    pub fn from_str(unit: &str) -> Self {
        match unit.trim().to_lowercase().as_str() {
            "g" => MeasureUnit::Grams,
            "ml" => MeasureUnit::Milliliters,
            _ => MeasureUnit::Other,
        }
    }
}

/// Conversion result with the amount actually used for the lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KitchenMeasurement {
    pub display: String,
    pub amount: f64,
    pub unit: String,
    pub range: Option<RealisticRange>,
}

/// Converts (amount, unit, item) triples to kitchen measurements
#[derive(Debug, Clone, Default)]
pub struct KitchenConverter {
    tables: MeasurementTable,
    ranges: RealisticRanges,
}

impl KitchenConverter {
    pub fn new(tables: MeasurementTable, ranges: RealisticRanges) -> Self {
        Self { tables, ranges }
    }

    pub fn tables(&self) -> &MeasurementTable {
        &self.tables
    }

    pub fn ranges(&self) -> &RealisticRanges {
        &self.ranges
    }

    /// Convert an amount to a kitchen measurement string
    ///
    /// Never fails: unknown ingredients use the default weight table and
    /// amounts past the end of a table saturate to its largest entry.
    pub fn convert(&self, amount: f64, unit: &str, item: &str) -> String {
        self.convert_detailed(amount, unit, item).display
    }

    pub fn convert_detailed(&self, amount: f64, unit: &str, item: &str) -> KitchenMeasurement {
        let measure = MeasureUnit::from_str(unit);
        let range = self.ranges.get(item).copied();

        if measure == MeasureUnit::Other {
            return KitchenMeasurement {
                display: format_plain(amount, unit),
                amount,
                unit: unit.to_string(),
                range,
            };
        }

        let clamped = range.map_or(amount, |r| r.clamp(amount));
        let table = match measure {
            MeasureUnit::Grams => self.tables.weight_table(item),
            _ => &self.tables.volume,
        };
        let shown = table.lookup(clamped).to_string();

        tracing::debug!(
            "Converted {} {} of '{}' (clamped {}) to '{}'",
            amount,
            unit,
            item,
            clamped,
            shown
        );

        KitchenMeasurement {
            display: shown,
            amount: clamped,
            unit: unit.to_string(),
            range,
        }
    }
}

/// Decimal fallback for units without a table
fn format_plain(amount: f64, unit: &str) -> String {
    if amount >= 100.0 {
        format!("{:.0} {}", amount, unit)
    } else {
        format!("{:.1} {}", amount, unit)
    }
}
