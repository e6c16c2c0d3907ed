//! Meta Ads (Facebook/Instagram) sync adapter
//!
//! Long-lived token model: no refresh step, the stored token is used
//! as-is against the Graph API insights endpoint.

use super::{deactivate_account, SyncError, SyncOutcome};
use crate::config::PlatformConfig;
use crate::db;
use adlens_common::db::models::{AdAccount, SpendRecord};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::debug;

/// Sentinel campaign id marking rows written by this adapter
pub const CAMPAIGN_SENTINEL: &str = "meta_ads_sync";

/// Graph error code: access token expired, revoked, or invalidated
const GRAPH_CODE_TOKEN_EXPIRED: i64 = 190;
/// Graph error code: user request limit reached
const GRAPH_CODE_RATE_LIMIT: i64 = 17;

#[derive(Debug, Deserialize)]
pub struct InsightsResponse {
    #[serde(default)]
    pub data: Vec<InsightRow>,
}

#[derive(Debug, Deserialize)]
pub struct InsightRow {
    /// Spend serializes as a decimal string
    pub spend: Option<String>,
    pub date_start: String,
}

#[derive(Debug, Deserialize)]
struct GraphErrorEnvelope {
    error: Option<GraphError>,
}

#[derive(Debug, Default, Deserialize)]
struct GraphError {
    code: Option<i64>,
    #[serde(rename = "type")]
    kind: Option<String>,
    message: Option<String>,
}

/// Meta Graph API client
#[derive(Clone)]
pub struct MetaAdsConnector {
    http: reqwest::Client,
    api_base: String,
}

impl MetaAdsConnector {
    pub fn new(http: reqwest::Client, config: &PlatformConfig) -> Self {
        Self {
            http,
            api_base: config.meta_api_base.clone(),
        }
    }

    /// Sync the trailing 30 days of spend for one account
    pub async fn sync(
        &self,
        pool: &SqlitePool,
        account: &AdAccount,
    ) -> Result<SyncOutcome, SyncError> {
        let url = format!("{}/act_{}/insights", self.api_base, account.external_account_id);

        debug!(account = %account.external_account_id, "Fetching Meta Ads insights");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("access_token", account.access_token.as_str()),
                ("date_preset", "last_30d"),
                // Daily breakdown
                ("time_increment", "1"),
                ("fields", "spend,date_start,account_id"),
            ])
            .send()
            .await
            .map_err(|e| SyncError::Unknown(format!("insights request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = classify_graph_failure(status.as_u16(), &body);
            if matches!(err, SyncError::CredentialExpired) {
                deactivate_account(pool, account).await;
            }
            return Err(err);
        }

        let parsed: InsightsResponse = response
            .json()
            .await
            .map_err(|e| SyncError::Unknown(format!("insights parse failed: {}", e)))?;

        let records = normalize_insight_rows(account, &parsed.data);

        db::spend::upsert_sync_rows(pool, &records)
            .await
            .map_err(|e| SyncError::Unknown(e.to_string()))?;

        Ok(SyncOutcome {
            count: records.len(),
        })
    }
}

/// Map a Graph error body onto the shared failure taxonomy
pub fn classify_graph_failure(status: u16, body: &str) -> SyncError {
    let parsed: GraphErrorEnvelope =
        serde_json::from_str(body).unwrap_or(GraphErrorEnvelope { error: None });
    let error = parsed.error.unwrap_or_default();

    if error.code == Some(GRAPH_CODE_TOKEN_EXPIRED) {
        return SyncError::CredentialExpired;
    }

    if status == 400
        && error.kind.as_deref() == Some("OAuthException")
        && error.code == Some(GRAPH_CODE_RATE_LIMIT)
    {
        return SyncError::RateLimited;
    }

    SyncError::Unknown(
        error
            .message
            .unwrap_or_else(|| format!("insights request returned {}: {}", status, body)),
    )
}

/// Map insight rows into spend records. Spend strings follow the lenient
/// numeric policy: unparseable becomes 0, never a failed sync.
pub fn normalize_insight_rows(account: &AdAccount, rows: &[InsightRow]) -> Vec<SpendRecord> {
    rows.iter()
        .map(|row| SpendRecord {
            owner_id: account.owner_id,
            date: row.date_start.clone(),
            spend_amount: row
                .spend
                .as_deref()
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .unwrap_or(0.0),
            campaign_id: Some(CAMPAIGN_SENTINEL.to_string()),
            impressions: None,
        })
        .collect()
}
