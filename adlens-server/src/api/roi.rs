//! ROI report endpoint
//!
//! Reads the owner's spend and sales rows and aggregates them on demand;
//! nothing is cached or persisted.

use crate::api::AuthedUser;
use crate::models::RoiReport;
use crate::services::ledger;
use crate::{db, ApiResult, AppState};
use adlens_common::Error;
use axum::extract::State;
use axum::Json;
use tracing::warn;

const SCHEMA_MISSING_MESSAGE: &str =
    "Tables 'ad_spend' or 'sales' do not exist yet. Upload data or run a sync to create them.";

/// GET /api/roi
///
/// A fresh deployment without the underlying tables still gets a valid
/// zero-filled report, not an error.
pub async fn compute_roi_report(
    State(state): State<AppState>,
    AuthedUser(owner): AuthedUser,
) -> ApiResult<Json<RoiReport>> {
    let spend = match db::spend::list_for_owner(&state.db, owner).await {
        Ok(rows) => rows,
        Err(Error::SchemaMissing(msg)) => {
            warn!(%owner, "ROI requested before schema exists: {}", msg);
            return Ok(Json(RoiReport::empty(Some(
                SCHEMA_MISSING_MESSAGE.to_string(),
            ))));
        }
        Err(e) => return Err(e.into()),
    };

    let sales = match db::sales::list_for_owner(&state.db, owner).await {
        Ok(rows) => rows,
        Err(Error::SchemaMissing(msg)) => {
            warn!(%owner, "ROI requested before schema exists: {}", msg);
            return Ok(Json(RoiReport::empty(Some(
                SCHEMA_MISSING_MESSAGE.to_string(),
            ))));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(ledger::compute_roi(&spend, &sales)))
}
