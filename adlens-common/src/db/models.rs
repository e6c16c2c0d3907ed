//! Persisted-record models
//!
//! All records are scoped by `owner_id`; nothing in the service operates
//! across owners. Amounts are plain f64 (the ingestion path coerces
//! leniently, never rejects on a bad number) and dates are fixed-width ISO
//! `YYYY-MM-DD` strings, which order lexically.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// One ad-spend row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendRecord {
    pub owner_id: Uuid,
    /// Calendar day, `YYYY-MM-DD`, no time component
    pub date: String,
    pub spend_amount: f64,
    /// Opaque campaign identifier; sync adapters write a platform sentinel
    pub campaign_id: Option<String>,
    pub impressions: Option<i64>,
}

/// One sales row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub owner_id: Uuid,
    pub date: String,
    pub sale_amount: f64,
    pub order_id: Option<String>,
    pub customer_email: Option<String>,
}

/// Supported ad platforms
///
/// A closed set: adding a platform is a reviewed code change, not a
/// runtime registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Google,
    Meta,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Google => "google",
            Platform::Meta => "meta",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(Platform::Google),
            "meta" => Ok(Platform::Meta),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown ad platform '{}'",
                other
            ))),
        }
    }
}

/// A connected ad platform account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdAccount {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub platform: Platform,
    pub external_account_id: String,
    pub access_token: String,
    /// Present for platforms with an OAuth2 refresh flow (Google);
    /// long-lived-token platforms (Meta) have none.
    pub refresh_token: Option<String>,
    /// RFC 3339 expiry of the current access token, when known
    pub token_expires_at: Option<String>,
    /// Cleared when the platform reports the credential revoked, so later
    /// sync runs skip the account until it is re-authorized
    pub is_active: bool,
}
