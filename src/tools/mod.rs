//! MCP tool implementations
//!
//! Plain functions behind each MCP tool.

pub mod portions;
pub mod status;
