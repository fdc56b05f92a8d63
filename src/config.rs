//! Table configuration
//!
//! The reference tables can be extended or replaced by a JSON file named in
//! `CIBOZER_PORTION_TABLES`:
//!
//! ```json
//! {
//!   "volume": [{"threshold": 5, "display": "1 tsp"}, {"threshold": 250, "display": "1 cup"}],
//!   "weights": {"tempeh": [{"threshold": 85, "display": "3 oz"}]},
//!   "ranges": {"tempeh": {"min": 60, "max": 150, "ideal": 85}}
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::portions::{
    ingredient_key, KitchenConverter, MeasurementTable, RealisticRange, RealisticRanges,
    TableError, ThresholdTable,
};

/// Environment variable holding the override file path
pub const TABLES_ENV_VAR: &str = "CIBOZER_PORTION_TABLES";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read table file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse table file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid table: {0}")]
    Table(#[from] TableError),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Overrides layered on top of the reference tables
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableOverrides {
    /// Replaces the volume table
    pub volume: Option<ThresholdTable>,
    /// Replaces the default weight table
    pub default_weight: Option<ThresholdTable>,
    /// Adds or replaces per-ingredient weight tables
    #[serde(default)]
    pub weights: HashMap<String, ThresholdTable>,
    /// Adds or replaces realistic ranges
    #[serde(default)]
    pub ranges: BTreeMap<String, RealisticRange>,
}

impl TableOverrides {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Layer these overrides onto existing tables
    pub fn apply(
        self,
        mut tables: MeasurementTable,
        mut ranges: RealisticRanges,
    ) -> Result<(MeasurementTable, RealisticRanges), TableError> {
        if let Some(volume) = self.volume {
            tables.volume = volume;
        }
        if let Some(default_weight) = self.default_weight {
            tables.default_weight = default_weight;
        }
        for (item, table) in self.weights {
            tables.weights.insert(ingredient_key(&item), table);
        }
        for (item, range) in self.ranges {
            ranges.insert(&item, range)?;
        }
        Ok((tables, ranges))
    }
}

/// Get the override file path from the environment, if set
pub fn get_tables_path() -> Option<PathBuf> {
    std::env::var(TABLES_ENV_VAR)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}

/// Build a converter from the reference tables plus an optional override file
pub fn load_converter_from(path: Option<&Path>) -> ConfigResult<KitchenConverter> {
    let tables = MeasurementTable::builtin();
    let ranges = RealisticRanges::builtin();

    let Some(path) = path else {
        return Ok(KitchenConverter::new(tables, ranges));
    };

    let overrides = TableOverrides::from_file(path)?;
    let (tables, ranges) = overrides.apply(tables, ranges)?;
    tracing::info!(
        "Loaded portion tables from {} ({} weight tables, {} ranges)",
        path.display(),
        tables.weights.len(),
        ranges.len()
    );
    Ok(KitchenConverter::new(tables, ranges))
}
