//! Cibozer Portions MCP server
//!
//! Serves the portion tools over stdio.

use cibozer_portions::mcp::PortionsService;
use cibozer_portions::{build_info, config, PortionNormalizer};
use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging goes to stderr so it cannot corrupt the MCP stdio stream
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("cibozer_portions=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner("MCP server");
    eprintln!("Starting MCP server on stdio...");

    let tables_path = config::get_tables_path();
    match &tables_path {
        Some(path) => eprintln!("Portion tables: {}", path.display()),
        None => eprintln!("Portion tables: built-in"),
    }

    let converter = config::load_converter_from(tables_path.as_deref())?;
    let service = PortionsService::new(tables_path, PortionNormalizer::new(converter));

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
