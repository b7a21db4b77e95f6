//! FitTrack Core
//!
//! An MCP server for health metrics and nearby-store ingredient search.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing::info;
use tracing_subscriber::EnvFilter;

use fittrack::build_info;
use fittrack::config::Config;
use fittrack::db;
use fittrack::mcp::FitTrackService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Log to stderr so stdout stays clean for MCP stdio
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("fittrack=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();

    let config = Config::from_env();
    info!(path = %config.database_path.display(), "opening database");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = db::Database::new(&config.database_path)?;
    database.with_conn(|conn| {
        db::run_migrations(conn)?;
        let version = db::get_schema_version(conn)?;
        info!(version, "database ready");
        Ok(())
    })?;

    let service = FitTrackService::new(config, database);

    info!("starting MCP server on stdio");
    let server = service.serve((stdin(), stdout())).await?;
    server.waiting().await?;

    Ok(())
}
