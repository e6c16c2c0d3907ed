//! Ad account persistence
//!
//! Accounts are mutated only by the sync adapters: token write-back after
//! a successful sync, and deactivation when the platform reports the
//! credential revoked.

use adlens_common::db::models::{AdAccount, Platform};
use adlens_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Active ad accounts for an owner, in insertion order
pub async fn list_active_for_owner(pool: &SqlitePool, owner_id: Uuid) -> Result<Vec<AdAccount>> {
    let rows = sqlx::query(
        r#"
        SELECT id, platform, external_account_id, access_token,
               refresh_token, token_expires_at, is_active
        FROM ad_accounts
        WHERE owner_id = ? AND is_active = 1
        ORDER BY rowid
        "#,
    )
    .bind(owner_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let id_str: String = row.get("id");
            let id = Uuid::parse_str(&id_str)
                .map_err(|e| Error::Internal(format!("invalid account id '{}': {}", id_str, e)))?;
            let platform: Platform = row.get::<String, _>("platform").parse()?;

            Ok(AdAccount {
                id,
                owner_id,
                platform,
                external_account_id: row.get("external_account_id"),
                access_token: row.get("access_token"),
                refresh_token: row.get("refresh_token"),
                token_expires_at: row.get("token_expires_at"),
                is_active: row.get::<i64, _>("is_active") != 0,
            })
        })
        .collect()
}

/// Insert a connected account (used by account linking and by tests)
pub async fn insert(pool: &SqlitePool, account: &AdAccount) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO ad_accounts
            (id, owner_id, platform, external_account_id, access_token,
             refresh_token, token_expires_at, is_active)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(account.id.to_string())
    .bind(account.owner_id.to_string())
    .bind(account.platform.as_str())
    .bind(&account.external_account_id)
    .bind(&account.access_token)
    .bind(&account.refresh_token)
    .bind(&account.token_expires_at)
    .bind(account.is_active as i64)
    .execute(pool)
    .await?;

    Ok(())
}

/// Persist a refreshed access token and its expiry.
///
/// Called only after a successful sync: a refreshed-but-unpersisted token
/// is safe across a crash (the next run refreshes again), whereas
/// persisting before use could strand a stale token.
pub async fn update_token(
    pool: &SqlitePool,
    account_id: Uuid,
    access_token: &str,
    token_expires_at: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE ad_accounts
        SET access_token = ?, token_expires_at = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(access_token)
    .bind(token_expires_at)
    .bind(account_id.to_string())
    .execute(pool)
    .await?;

    Ok(())
}

/// Deactivate an account whose credential the platform reported revoked;
/// future sync runs skip it until re-authorized
pub async fn mark_inactive(pool: &SqlitePool, account_id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE ad_accounts
        SET is_active = 0, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(account_id.to_string())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load a single account (test/ops helper)
pub async fn get(pool: &SqlitePool, account_id: Uuid) -> Result<Option<AdAccount>> {
    let row = sqlx::query(
        r#"
        SELECT owner_id, platform, external_account_id, access_token,
               refresh_token, token_expires_at, is_active
        FROM ad_accounts
        WHERE id = ?
        "#,
    )
    .bind(account_id.to_string())
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let owner_str: String = row.get("owner_id");
            let owner_id = Uuid::parse_str(&owner_str)
                .map_err(|e| Error::Internal(format!("invalid owner id '{}': {}", owner_str, e)))?;
            let platform: Platform = row.get::<String, _>("platform").parse()?;

            Ok(Some(AdAccount {
                id: account_id,
                owner_id,
                platform,
                external_account_id: row.get("external_account_id"),
                access_token: row.get("access_token"),
                refresh_token: row.get("refresh_token"),
                token_expires_at: row.get("token_expires_at"),
                is_active: row.get::<i64, _>("is_active") != 0,
            }))
        }
        None => Ok(None),
    }
}
