//! Portions MCP Server Implementation
//!
//! Exposes the portion normalizer and kitchen converter as MCP tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::portions::PortionNormalizer;
use crate::tools::portions;
use crate::tools::status::StatusTracker;

/// Portions MCP Service
#[derive(Clone)]
pub struct PortionsService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    normalizer: Arc<PortionNormalizer>,
    tool_router: ToolRouter<PortionsService>,
}

impl PortionsService {
    pub fn new(tables_path: Option<PathBuf>, normalizer: PortionNormalizer) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(tables_path))),
            normalizer: Arc::new(normalizer),
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FixMealPortionsParams {
    /// Meal plan: {"days": [{"meals": [{"ingredients": [{"item", "amount", "unit"}]}]}]}
    pub plan: serde_json::Value,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertParams {
    /// Amount in the given unit
    pub amount: f64,
    /// Unit: "g" and "ml" map to kitchen units, anything else is formatted as-is
    #[serde(default = "default_unit")]
    pub unit: String,
    /// Ingredient name, e.g. "soy_sauce" or "Soy Sauce"
    #[serde(default)]
    pub item: String,
}

fn default_unit() -> String {
    "g".to_string()
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl PortionsService {
    // --- Status ---

    #[tool(description = "Get the current status of the portions service including build info, table sizes, and usage counters")]
    async fn portions_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let converter = self.normalizer.converter();
        let status = tracker.get_status(converter.ranges().len(), converter.tables().weights.len());
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get instructions for normalizing meal plan portions. Call this before using fix_meal_portions for the first time.")]
    fn portion_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::PORTION_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(PORTION_INSTRUCTIONS)]))
    }

    // --- Portions ---

    #[tool(description = "Normalize a generated meal plan: clamp ingredient amounts into realistic ranges and add kitchen measurements (cups, tbsp, oz). Returns the corrected plan and a report of every change.")]
    async fn fix_meal_portions(&self, Parameters(p): Parameters<FixMealPortionsParams>) -> Result<CallToolResult, McpError> {
        let result = portions::fix_meal_portions(&self.normalizer, p.plan)
            .map_err(|e| McpError::invalid_params(e, None))?;
        self.status_tracker.lock().await.record_plan(result.report.corrections.len());
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Convert one ingredient amount to a kitchen measurement, clamping to the ingredient's realistic range first")]
    fn convert_to_kitchen_measurement(&self, Parameters(p): Parameters<ConvertParams>) -> Result<CallToolResult, McpError> {
        let result = portions::convert_to_kitchen_measurement(&self.normalizer, p.amount, &p.unit, &p.item);
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List the realistic per-serving ranges (min, max, ideal) used to clamp ingredient amounts")]
    fn list_realistic_ranges(&self) -> Result<CallToolResult, McpError> {
        let result = portions::list_realistic_ranges(&self.normalizer);
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for PortionsService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "cibozer-portions".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Cibozer Portions".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Cibozer Portions - realistic portion sizes and kitchen measurements for generated meal plans. \
                 Call portion_instructions first. \
                 Plans: fix_meal_portions. \
                 Single amounts: convert_to_kitchen_measurement. \
                 Reference data: list_realistic_ranges. \
                 Service: portions_status."
                    .into(),
            ),
        }
    }
}
