//! MCP server module
//!
//! Stdio MCP surface for the portion tools.

mod server;

pub use server::PortionsService;
