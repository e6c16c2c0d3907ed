//! CSV upload endpoints
//!
//! Multipart uploads with a single `file` field. Parse-level failures
//! reject the whole file with the parser's diagnostics; value-level
//! failures follow the lenient coercion policy inside the ingest service.

use crate::api::AuthedUser;
use crate::models::UploadResponse;
use crate::services::ingest::{self, IngestError};
use crate::{db, ApiError, ApiResult, AppState};
use axum::extract::{Multipart, State};
use axum::Json;
use chrono::Utc;
use tracing::info;

/// POST /api/upload/spend
pub async fn upload_spend(
    State(state): State<AppState>,
    AuthedUser(owner): AuthedUser,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let csv_text = read_file_field(multipart).await?;

    // Rows without a date land on the day of upload
    let today = Utc::now().date_naive().to_string();
    let rows = ingest::parse_spend_rows(&csv_text, owner, &today).map_err(parse_rejection)?;

    db::spend::insert_rows(&state.db, &rows).await?;

    info!(%owner, rows = rows.len(), "Spend CSV ingested");

    Ok(Json(UploadResponse {
        success: true,
        message: format!("Successfully uploaded {} rows to ad_spend.", rows.len()),
    }))
}

/// POST /api/upload/sales
pub async fn upload_sales(
    State(state): State<AppState>,
    AuthedUser(owner): AuthedUser,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let csv_text = read_file_field(multipart).await?;

    let today = Utc::now().date_naive().to_string();
    let rows = ingest::parse_sale_rows(&csv_text, owner, &today).map_err(parse_rejection)?;

    db::sales::insert_rows(&state.db, &rows).await?;

    info!(%owner, rows = rows.len(), "Sales CSV ingested");

    Ok(Json(UploadResponse {
        success: true,
        message: format!("Successfully uploaded {} rows to sales.", rows.len()),
    }))
}

/// Pull the uploaded file's text out of the multipart body
async fn read_file_field(mut multipart: Multipart) -> Result<String, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        let is_file = field.name() == Some("file") || field.file_name().is_some();
        if is_file {
            return field
                .text()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Unreadable upload: {}", e)));
        }
    }

    Err(ApiError::BadRequest("No file uploaded".to_string()))
}

fn parse_rejection(err: IngestError) -> ApiError {
    let IngestError::Parse { details } = err;
    ApiError::ParseFailure {
        message: "Failed to parse CSV".to_string(),
        details,
    }
}
