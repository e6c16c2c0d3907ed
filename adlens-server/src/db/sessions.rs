//! Session token lookup
//!
//! Session issuance belongs to the external identity service; the handlers
//! only validate presented bearer tokens against this table.
//! `create_session` exists for provisioning (tests, ops tooling).

use adlens_common::Result;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const TOKEN_LEN: usize = 48;

/// Resolve a bearer token to its owner, if the session exists
pub async fn lookup_owner(pool: &SqlitePool, token: &str) -> Result<Option<Uuid>> {
    let row = sqlx::query("SELECT owner_id FROM sessions WHERE token = ?")
        .bind(token)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let owner_str: String = row.get("owner_id");
            let owner = Uuid::parse_str(&owner_str).map_err(|e| {
                adlens_common::Error::Internal(format!("invalid owner id '{}': {}", owner_str, e))
            })?;
            Ok(Some(owner))
        }
        None => Ok(None),
    }
}

/// Provision a session for an owner and return its bearer token
pub async fn create_session(pool: &SqlitePool, owner_id: Uuid) -> Result<String> {
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect();

    sqlx::query("INSERT INTO sessions (token, owner_id) VALUES (?, ?)")
        .bind(&token)
        .bind(owner_id.to_string())
        .execute(pool)
        .await?;

    Ok(token)
}
