//! `ingestd`: the telemetry ingestion server.
//!
//! Usage:
//!   ingestd [-c <context-name-or-path>] [--listen <addr>]
//!
//! The context name resolves to `/etc/ingest/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.
//! Without `-c` the built-in demo fleet is served.

mod bootstrap;
mod config;
mod routes;

use clap::Parser;
use ingest::IngestModule;
use ingest_core::Module;
use tracing::info;

use config::ServerConfig;

/// Telemetry ingestion server.
#[derive(Parser, Debug)]
#[command(name = "ingestd", about = "Telemetry ingestion server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config")]
    config: Option<String>,

    /// Listen address (overrides server.listen from the config).
    #[arg(long = "listen")]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let server_config = match &cli.config {
        Some(name) => {
            let config_path = ServerConfig::resolve_path(name);
            info!("Loading configuration from {}", config_path.display());
            ServerConfig::load(&config_path)?
        }
        None => {
            info!("No configuration given, using the built-in fleet");
            ServerConfig::builtin()?
        }
    };

    // Verify configuration is valid.
    bootstrap::verify_config(&server_config)?;

    let service_config = server_config.service_config(cli.listen.as_deref());
    let listen = service_config.listen.clone();
    info!(
        allowed_skew_ms = service_config.allowed_skew_ms,
        future_skew_ms = service_config.future_skew_ms(),
        max_body_bytes = service_config.max_body_bytes,
        schema_version = service_config.schema_version,
        "Ingest policy"
    );

    let service = bootstrap::build_service(&server_config, service_config)?;
    bootstrap::log_fleet(&service);

    let ingest_module = IngestModule::new(service);
    info!("Ingest module initialized");

    let module_routes = vec![(ingest_module.name(), ingest_module.routes())];
    let app = routes::build_router(module_routes);

    // Start server.
    let listener = tokio::net::TcpListener::bind(&listen).await?;
    info!("Ingest server listening on {}", listen);
    info!("Manifest example: GET /manifest/<deviceId>");
    axum::serve(listener, app).await?;

    Ok(())
}
