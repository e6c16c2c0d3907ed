//! Ad platform synchronization
//!
//! One adapter per platform behind a shared contract: fetch a
//! last-30-days daily spend breakdown, normalize it into spend records,
//! and upsert them on the (owner, date, campaign) key. Failures are
//! classified, never retried here; the caller decides whether and when to
//! retry.

pub mod google;
pub mod meta;

use crate::config::PlatformConfig;
use crate::models::{AccountSyncSummary, SyncStatus};
use adlens_common::db::models::{AdAccount, Platform};
use futures::future::join_all;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};

pub use google::GoogleAdsConnector;
pub use meta::MetaAdsConnector;

/// Classified sync failures, distinguishable to the caller
#[derive(Debug, Error)]
pub enum SyncError {
    /// The platform signalled a rate limit; retry later, never here
    #[error("RATE_LIMIT_EXCEEDED")]
    RateLimited,

    /// The platform reported the credential expired or revoked; the
    /// account has been deactivated as a side effect
    #[error("AUTH_TOKEN_EXPIRED")]
    CredentialExpired,

    /// Anything else, propagated verbatim for operator visibility
    #[error("{0}")]
    Unknown(String),
}

/// Successful sync result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Rows upserted into the spend collection
    pub count: usize,
}

/// Platform adapters behind one dispatch point.
///
/// The platform set is closed: routing is an exhaustive match, and a new
/// platform is a reviewed code change here, not a runtime registration.
#[derive(Clone)]
pub struct SyncService {
    google: GoogleAdsConnector,
    meta: MetaAdsConnector,
}

impl SyncService {
    pub fn new(http: reqwest::Client, config: &PlatformConfig) -> Self {
        Self {
            google: GoogleAdsConnector::new(http.clone(), config),
            meta: MetaAdsConnector::new(http, config),
        }
    }

    /// Sync one account through its platform adapter
    pub async fn sync_account(
        &self,
        pool: &SqlitePool,
        account: &AdAccount,
    ) -> Result<SyncOutcome, SyncError> {
        match account.platform {
            Platform::Google => self.google.sync(pool, account).await,
            Platform::Meta => self.meta.sync(pool, account).await,
        }
    }

    /// Sync every account, concurrently, capturing each outcome
    /// independently: one account's failure never aborts its siblings.
    pub async fn sync_all(
        &self,
        pool: &SqlitePool,
        accounts: &[AdAccount],
    ) -> Vec<AccountSyncSummary> {
        let tasks = accounts.iter().map(|account| async move {
            match self.sync_account(pool, account).await {
                Ok(outcome) => {
                    info!(
                        platform = %account.platform,
                        account = %account.external_account_id,
                        count = outcome.count,
                        "Ad spend sync succeeded"
                    );
                    AccountSyncSummary {
                        platform: account.platform,
                        id: account.external_account_id.clone(),
                        status: SyncStatus::Success,
                        count: Some(outcome.count),
                        error: None,
                    }
                }
                Err(err) => {
                    warn!(
                        platform = %account.platform,
                        account = %account.external_account_id,
                        error = %err,
                        "Ad spend sync failed"
                    );
                    AccountSyncSummary {
                        platform: account.platform,
                        id: account.external_account_id.clone(),
                        status: SyncStatus::Error,
                        count: None,
                        error: Some(err.to_string()),
                    }
                }
            }
        });

        join_all(tasks).await
    }
}

/// Deactivate an account after a credential-expired signal. Best-effort:
/// a failed write is logged, and the classified error still reaches the
/// caller.
async fn deactivate_account(pool: &SqlitePool, account: &AdAccount) {
    if let Err(e) = crate::db::accounts::mark_inactive(pool, account.id).await {
        warn!(
            account = %account.external_account_id,
            error = %e,
            "Failed to deactivate account after credential expiry"
        );
    }
}
