//! adlens-server - Marketing ROI analytics service
//!
//! Authenticated HTTP API over the spend/sales/accounts store: CSV
//! ingestion, ad platform sync, and on-demand ROI reports.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use adlens_server::config::PlatformConfig;
use adlens_server::{build_router, AppState};

#[derive(Debug, Parser)]
#[command(name = "adlens-server", version, about = "Marketing ROI analytics service")]
struct Args {
    /// Listen address
    #[arg(long, env = "ADLENS_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Listen port
    #[arg(long, env = "ADLENS_PORT", default_value_t = 8245)]
    port: u16,

    /// SQLite database file (overrides config file and environment)
    #[arg(long)]
    database: Option<String>,

    /// Configuration file (defaults to ~/.config/adlens/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting adlens-server (Marketing ROI analytics)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let toml_config = adlens_common::config::load_toml_config(args.config.as_ref())?;

    let db_path =
        adlens_common::config::resolve_database_path(args.database.as_deref(), &toml_config);
    info!("Database: {}", db_path.display());

    let db_pool = adlens_common::db::init::init_database(&db_path).await?;
    info!("Database connection established");

    let platforms = PlatformConfig::resolve(&toml_config);
    if platforms.google.is_none() {
        info!("Google Ads credentials not configured; Google account syncs will fail until set");
    }

    let state = AppState::new(db_pool, &platforms)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port)).await?;
    info!("Listening on http://{}:{}", args.host, args.port);
    info!("Health check: http://{}:{}/health", args.host, args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
