//! adlens-server library interface
//!
//! Exposes the application state, router, and service modules for
//! integration testing.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use crate::config::PlatformConfig;
use crate::services::sync::SyncService;
use axum::Router;
use sqlx::SqlitePool;
use std::time::Duration;
use tower_http::trace::TraceLayer;

const USER_AGENT: &str = concat!("AdLens/", env!("CARGO_PKG_VERSION"));
const HTTP_TIMEOUT_SECS: u64 = 30;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Platform sync adapters
    pub sync: SyncService,
}

impl AppState {
    pub fn new(db: SqlitePool, platforms: &PlatformConfig) -> anyhow::Result<Self> {
        // One outbound client shared by both adapters; platform-level
        // timeouts are the only waiting this service does
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            db,
            sync: SyncService::new(http, platforms),
        })
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::roi_routes())
        .merge(api::sync_routes())
        .merge(api::upload_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
