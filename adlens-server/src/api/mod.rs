//! HTTP API for adlens-server
//!
//! Route builders per module, merged in `build_router`. Everything under
//! `/api` requires a valid bearer session (the `AuthedUser` extractor);
//! `/health` is open.

pub mod auth;
pub mod health;
pub mod roi;
pub mod sync;
pub mod upload;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;

pub use auth::AuthedUser;

/// ROI report routes
pub fn roi_routes() -> Router<AppState> {
    Router::new().route("/api/roi", get(roi::compute_roi_report))
}

/// Platform sync routes
pub fn sync_routes() -> Router<AppState> {
    Router::new().route("/api/integrations/sync", post(sync::run_account_sync))
}

/// CSV upload routes
pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/api/upload/spend", post(upload::upload_spend))
        .route("/api/upload/sales", post(upload::upload_sales))
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health::health_check))
}
