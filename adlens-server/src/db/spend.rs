//! Ad spend persistence

use adlens_common::db::classify_query_error;
use adlens_common::db::models::SpendRecord;
use adlens_common::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Load all spend rows for an owner.
///
/// Distinguishes "table not created yet" (`Error::SchemaMissing`) from an
/// empty result so the ROI caller can fall back to a zeroed report.
pub async fn list_for_owner(pool: &SqlitePool, owner_id: Uuid) -> Result<Vec<SpendRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT date, spend_amount, campaign_id, impressions
        FROM ad_spend
        WHERE owner_id = ?
        "#,
    )
    .bind(owner_id.to_string())
    .fetch_all(pool)
    .await
    .map_err(|e| classify_query_error(e, "ad_spend"))?;

    Ok(rows
        .into_iter()
        .map(|row| SpendRecord {
            owner_id,
            date: row.get("date"),
            spend_amount: row.get("spend_amount"),
            campaign_id: row.get("campaign_id"),
            impressions: row.get("impressions"),
        })
        .collect())
}

/// Bulk-insert uploaded rows.
///
/// Runs in one transaction: a failing row (e.g. a unique-key violation)
/// rolls back the whole upload, matching the no-partial-ingestion rule.
pub async fn insert_rows(pool: &SqlitePool, rows: &[SpendRecord]) -> Result<()> {
    let mut tx = pool.begin().await?;

    for record in rows {
        sqlx::query(
            r#"
            INSERT INTO ad_spend (owner_id, date, spend_amount, campaign_id, impressions)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.owner_id.to_string())
        .bind(&record.date)
        .bind(record.spend_amount)
        .bind(&record.campaign_id)
        .bind(record.impressions)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Upsert sync-adapter rows keyed by (owner_id, date, campaign_id):
/// replace-on-match, insert-on-no-match. Repeated syncs of the same day
/// are idempotent.
pub async fn upsert_sync_rows(pool: &SqlitePool, rows: &[SpendRecord]) -> Result<()> {
    let mut tx = pool.begin().await?;

    for record in rows {
        sqlx::query(
            r#"
            INSERT INTO ad_spend (owner_id, date, spend_amount, campaign_id, impressions)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(owner_id, date, campaign_id) DO UPDATE SET
                spend_amount = excluded.spend_amount,
                impressions = excluded.impressions,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(record.owner_id.to_string())
        .bind(&record.date)
        .bind(record.spend_amount)
        .bind(&record.campaign_id)
        .bind(record.impressions)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}
