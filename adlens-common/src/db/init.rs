//! Database initialization
//!
//! Opens (or creates) the SQLite database and sets up the schema. Table
//! creation is idempotent; each `create_*_table` function is public so
//! tests can initialize exactly the tables they exercise.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_ad_spend_table(&pool).await?;
    create_sales_table(&pool).await?;
    create_ad_accounts_table(&pool).await?;
    create_sessions_table(&pool).await?;

    info!("Database tables initialized (ad_spend, sales, ad_accounts, sessions)");

    Ok(pool)
}

/// Ad spend rows, written by CSV upload and by the platform sync adapters.
///
/// The unique index over (owner_id, date, campaign_id) is the sync upsert
/// key. SQLite treats NULL as distinct in unique indexes, so uploaded rows
/// without a campaign id remain additive per date.
pub async fn create_ad_spend_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ad_spend (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner_id TEXT NOT NULL,
            date TEXT NOT NULL,
            spend_amount REAL NOT NULL DEFAULT 0,
            campaign_id TEXT,
            impressions INTEGER,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_ad_spend_upsert_key
        ON ad_spend (owner_id, date, campaign_id)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Sales rows, written by CSV upload. Additive per date.
pub async fn create_sales_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sales (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner_id TEXT NOT NULL,
            date TEXT NOT NULL,
            sale_amount REAL NOT NULL DEFAULT 0,
            order_id TEXT,
            customer_email TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_sales_owner_date
        ON sales (owner_id, date)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Connected ad platform accounts and their credentials
pub async fn create_ad_accounts_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ad_accounts (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL,
            platform TEXT NOT NULL,
            external_account_id TEXT NOT NULL,
            access_token TEXT NOT NULL,
            refresh_token TEXT,
            token_expires_at TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Bearer session tokens. Issuance belongs to the external identity
/// service; this service only validates presented tokens.
pub async fn create_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
