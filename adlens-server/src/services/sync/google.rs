//! Google Ads sync adapter
//!
//! OAuth2 refresh-token flow: the stored refresh token buys a fresh access
//! token before each report call. The refreshed token is written back to
//! the account only after the sync succeeds, so a crash mid-sync leaves
//! the old credentials in place and the next run simply refreshes again.

use super::{deactivate_account, SyncError, SyncOutcome};
use crate::config::{GoogleAdsCredentials, PlatformConfig};
use crate::db;
use adlens_common::db::models::{AdAccount, SpendRecord};
use chrono::{Duration, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::debug;

/// Sentinel campaign id marking rows written by this adapter; the report
/// endpoint carries no per-campaign breakdown
pub const CAMPAIGN_SENTINEL: &str = "google_ads_sync";

/// Daily spend for the trailing window. The API filters the window
/// server-side; one call, no pagination.
const SPEND_QUERY: &str = "\
SELECT segments.date, metrics.cost_micros \
FROM ad_group \
WHERE segments.date DURING LAST_30_DAYS";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Seconds until expiry
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorBody {
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchRow>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRow {
    pub segments: RowSegments,
    pub metrics: RowMetrics,
}

#[derive(Debug, Deserialize)]
pub struct RowSegments {
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct RowMetrics {
    /// int64 in the REST encoding, which serializes as a JSON string;
    /// accept either shape
    #[serde(rename = "costMicros")]
    pub cost_micros: Option<serde_json::Value>,
}

/// Google Ads API client
#[derive(Clone)]
pub struct GoogleAdsConnector {
    http: reqwest::Client,
    credentials: Option<GoogleAdsCredentials>,
    token_url: String,
    api_base: String,
}

impl GoogleAdsConnector {
    pub fn new(http: reqwest::Client, config: &PlatformConfig) -> Self {
        Self {
            http,
            credentials: config.google.clone(),
            token_url: config.google_token_url.clone(),
            api_base: config.google_api_base.clone(),
        }
    }

    /// Sync the trailing 30 days of spend for one account
    pub async fn sync(
        &self,
        pool: &SqlitePool,
        account: &AdAccount,
    ) -> Result<SyncOutcome, SyncError> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            SyncError::Unknown("Google Ads credentials not configured".to_string())
        })?;
        let refresh_token = account.refresh_token.as_deref().ok_or_else(|| {
            SyncError::Unknown("account has no stored refresh token".to_string())
        })?;

        // Refresh proactively; the stored access token may already be stale
        let token = self
            .refresh_access_token(pool, account, credentials, refresh_token)
            .await?;

        let rows = self
            .fetch_spend_report(account, credentials, &token.access_token)
            .await?;
        let records = normalize_search_rows(account, &rows);

        db::spend::upsert_sync_rows(pool, &records)
            .await
            .map_err(|e| SyncError::Unknown(e.to_string()))?;

        // Write-after-use: only a sync that made it this far persists the
        // refreshed token
        if token.access_token != account.access_token {
            let expires_at = token
                .expires_in
                .map(|secs| (Utc::now() + Duration::seconds(secs)).to_rfc3339());
            db::accounts::update_token(
                pool,
                account.id,
                &token.access_token,
                expires_at.as_deref(),
            )
            .await
            .map_err(|e| SyncError::Unknown(e.to_string()))?;
        }

        Ok(SyncOutcome {
            count: records.len(),
        })
    }

    async fn refresh_access_token(
        &self,
        pool: &SqlitePool,
        account: &AdAccount,
        credentials: &GoogleAdsCredentials,
        refresh_token: &str,
    ) -> Result<TokenResponse, SyncError> {
        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("refresh_token", refresh_token),
        ];

        debug!(account = %account.external_account_id, "Refreshing Google Ads access token");

        let response = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| SyncError::Unknown(format!("token refresh failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if let Some(err) = classify_refresh_failure(status.as_u16(), &body) {
                if matches!(err, SyncError::CredentialExpired) {
                    deactivate_account(pool, account).await;
                }
                return Err(err);
            }
            return Err(SyncError::Unknown(format!(
                "token refresh returned {}: {}",
                status, body
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| SyncError::Unknown(format!("token response parse failed: {}", e)))
    }

    async fn fetch_spend_report(
        &self,
        account: &AdAccount,
        credentials: &GoogleAdsCredentials,
        access_token: &str,
    ) -> Result<Vec<SearchRow>, SyncError> {
        let url = format!(
            "{}/customers/{}/googleAds:search",
            self.api_base, account.external_account_id
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .header("developer-token", &credentials.developer_token)
            // Usually the queried account; differs for manager accounts
            .header("login-customer-id", &account.external_account_id)
            .json(&serde_json::json!({ "query": SPEND_QUERY }))
            .send()
            .await
            .map_err(|e| SyncError::Unknown(format!("report request failed: {}", e)))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(SyncError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Unknown(format!(
                "report request returned {}: {}",
                status, body
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| SyncError::Unknown(format!("report parse failed: {}", e)))?;

        Ok(parsed.results)
    }
}

/// Refresh-endpoint rejections that mean the grant itself is dead
pub fn classify_refresh_failure(status: u16, body: &str) -> Option<SyncError> {
    if status != 400 && status != 401 {
        return None;
    }
    let parsed: TokenErrorBody = serde_json::from_str(body).unwrap_or(TokenErrorBody { error: None });
    match parsed.error.as_deref() {
        Some("invalid_grant") => Some(SyncError::CredentialExpired),
        _ => None,
    }
}

/// Map report rows into spend records: micros to currency, the sync
/// sentinel as campaign id, the account's owner stamped on
pub fn normalize_search_rows(account: &AdAccount, rows: &[SearchRow]) -> Vec<SpendRecord> {
    rows.iter()
        .map(|row| SpendRecord {
            owner_id: account.owner_id,
            date: row.segments.date.clone(),
            spend_amount: micros_to_currency(row.metrics.cost_micros.as_ref()),
            campaign_id: Some(CAMPAIGN_SENTINEL.to_string()),
            impressions: None,
        })
        .collect()
}

/// cost_micros arrives as a JSON string (int64) or a bare number; either
/// way it is micros of the account currency
fn micros_to_currency(value: Option<&serde_json::Value>) -> f64 {
    let micros = match value {
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        _ => 0.0,
    };
    micros / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use adlens_common::db::models::Platform;
    use uuid::Uuid;

    fn account() -> AdAccount {
        AdAccount {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            platform: Platform::Google,
            external_account_id: "123-456-7890".to_string(),
            access_token: "old-token".to_string(),
            refresh_token: Some("refresh".to_string()),
            token_expires_at: None,
            is_active: true,
        }
    }

    fn row(date: &str, micros: serde_json::Value) -> SearchRow {
        SearchRow {
            segments: RowSegments {
                date: date.to_string(),
            },
            metrics: RowMetrics {
                cost_micros: Some(micros),
            },
        }
    }

    #[test]
    fn micros_divide_to_currency() {
        let account = account();
        let rows = vec![row("2024-05-01", serde_json::json!("12340000"))];
        let records = normalize_search_rows(&account, &rows);
        assert_eq!(records[0].spend_amount, 12.34);
    }

    #[test]
    fn numeric_micros_also_accepted() {
        let account = account();
        let rows = vec![row("2024-05-01", serde_json::json!(2_500_000))];
        let records = normalize_search_rows(&account, &rows);
        assert_eq!(records[0].spend_amount, 2.5);
    }

    #[test]
    fn unparseable_micros_coerce_to_zero() {
        let account = account();
        let rows = vec![row("2024-05-01", serde_json::json!("garbage"))];
        let records = normalize_search_rows(&account, &rows);
        assert_eq!(records[0].spend_amount, 0.0);
    }

    #[test]
    fn rows_carry_owner_and_sentinel() {
        let account = account();
        let rows = vec![row("2024-05-01", serde_json::json!("1000000"))];
        let records = normalize_search_rows(&account, &rows);
        assert_eq!(records[0].owner_id, account.owner_id);
        assert_eq!(records[0].campaign_id.as_deref(), Some(CAMPAIGN_SENTINEL));
        assert_eq!(records[0].date, "2024-05-01");
    }

    #[test]
    fn invalid_grant_classifies_as_credential_expired() {
        let err = classify_refresh_failure(400, r#"{"error":"invalid_grant"}"#);
        assert!(matches!(err, Some(SyncError::CredentialExpired)));
    }

    #[test]
    fn other_refresh_failures_stay_unclassified() {
        assert!(classify_refresh_failure(400, r#"{"error":"invalid_client"}"#).is_none());
        assert!(classify_refresh_failure(500, "oops").is_none());
        assert!(classify_refresh_failure(400, "not json").is_none());
    }
}
