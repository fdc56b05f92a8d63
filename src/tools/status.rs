//! Portions Status Tool
//!
//! Provides runtime status information about the portions service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Portion normalization instructions for AI assistants
pub const PORTION_INSTRUCTIONS: &str = r#"
# Cibozer Portion Normalization

Generated meal plans sometimes ask for absurd amounts (300g of soy sauce,
a kilo of oats). These tools pull amounts back into realistic single-serving
ranges and add a kitchen measurement a home cook can follow.

## Tools

- `fix_meal_portions` - pass the whole plan (`{"days": [{"meals": [{"ingredients": [...]}]}]}`).
  Returns the corrected plan plus a report of every change.
- `convert_to_kitchen_measurement` - convert a single `amount`/`unit`/`item`.
- `list_realistic_ranges` - the min/max/ideal table used for clamping.

## Ingredient Records

| Field | Type | Notes |
|-------|------|-------|
| item | string | Matched case-insensitively; "Soy Sauce" finds soy_sauce |
| amount | number | Required; records without it are skipped |
| unit | string | "g" or "ml" get kitchen units; defaults to "g" |

## Correction Rules

For ingredients with a realistic range:
- more than 2x the max -> replaced with the ideal amount
- above max -> clamped to max
- below min -> clamped to min

The generator's values are kept in `original_amount` / `original_unit`.
Running the tool again on a corrected plan changes nothing.
"#;

/// Runtime status of the portions service
#[derive(Debug, Clone, Serialize)]
pub struct PortionsStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Table information
    pub tables_path: Option<String>,
    pub realistic_ranges: usize,
    pub weight_tables: usize,

    /// Usage counters
    pub plans_normalized: u64,
    pub ingredients_corrected: u64,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    tables_path: Option<PathBuf>,
    plans_normalized: u64,
    ingredients_corrected: u64,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(tables_path: Option<PathBuf>) -> Self {
        Self {
            start_time: Instant::now(),
            tables_path,
            plans_normalized: 0,
            ingredients_corrected: 0,
        }
    }

    /// Record one normalized plan
    pub fn record_plan(&mut self, corrections: usize) {
        self.plans_normalized += 1;
        self.ingredients_corrected += corrections as u64;
    }

    /// Get the current status
    pub fn get_status(&self, realistic_ranges: usize, weight_tables: usize) -> PortionsStatus {
        let build_info = BuildInfo::current();

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        PortionsStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            tables_path: self.tables_path.as_ref().map(|p| p.display().to_string()),
            realistic_ranges,
            weight_tables,
            plans_normalized: self.plans_normalized,
            ingredients_corrected: self.ingredients_corrected,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
