//! Platform sync endpoint

use crate::api::AuthedUser;
use crate::models::SyncReport;
use crate::{db, ApiResult, AppState};
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::json;
use tracing::info;

/// POST /api/integrations/sync
///
/// Fans out one adapter call per active account and reports each outcome
/// independently; a failing account never aborts its siblings.
pub async fn run_account_sync(
    State(state): State<AppState>,
    AuthedUser(owner): AuthedUser,
) -> ApiResult<Response> {
    let accounts = db::accounts::list_active_for_owner(&state.db, owner).await?;

    if accounts.is_empty() {
        return Ok(Json(json!({
            "message": "No active ad accounts found. Please connect an account first."
        }))
        .into_response());
    }

    info!(%owner, accounts = accounts.len(), "Starting ad account sync");

    let summary = state.sync.sync_all(&state.db, &accounts).await;

    Ok(Json(SyncReport {
        success: true,
        summary,
        synced_at: Utc::now().to_rfc3339(),
    })
    .into_response())
}
