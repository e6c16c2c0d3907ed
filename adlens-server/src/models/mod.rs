//! Derived report types
//!
//! Nothing here is persisted; reports are rebuilt from the spend and sales
//! collections on every request.

use adlens_common::db::models::Platform;
use serde::{Deserialize, Serialize};

/// One date's aggregated spend/revenue/profit/ROI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLedgerEntry {
    pub date: String,
    pub spend: f64,
    pub revenue: f64,
    pub profit: f64,
    /// Rounded to the nearest whole percent for display; 0 on zero-spend
    /// days regardless of revenue
    pub roi: i64,
}

/// Report-wide totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoiTotals {
    pub revenue: f64,
    pub spend: f64,
    pub profit: f64,
    pub avg_roi: i64,
}

/// Full ROI report as returned by `GET /api/roi`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiReport {
    pub success: bool,
    pub data: Vec<DailyLedgerEntry>,
    pub totals: RoiTotals,
    /// Set when the report was produced from a missing-schema fallback
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RoiReport {
    /// Well-formed zero report (fresh deployment, no tables yet)
    pub fn empty(message: Option<String>) -> Self {
        Self {
            success: true,
            data: Vec::new(),
            totals: RoiTotals::default(),
            message,
        }
    }
}

/// Per-account outcome within a batch sync response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSyncSummary {
    pub platform: Platform,
    /// The platform-side account identifier
    pub id: String,
    pub status: SyncStatus,
    /// Rows upserted, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Classified error kind and message, present on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Success,
    Error,
}

/// Response body for `POST /api/integrations/sync`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub success: bool,
    pub summary: Vec<AccountSyncSummary>,
    pub synced_at: String,
}

/// Response body for the upload endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
}
