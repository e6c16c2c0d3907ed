//! Sales persistence

use adlens_common::db::classify_query_error;
use adlens_common::db::models::SaleRecord;
use adlens_common::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Load all sales rows for an owner; "table missing" is distinguishable
/// from "no rows yet"
pub async fn list_for_owner(pool: &SqlitePool, owner_id: Uuid) -> Result<Vec<SaleRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT date, sale_amount, order_id, customer_email
        FROM sales
        WHERE owner_id = ?
        "#,
    )
    .bind(owner_id.to_string())
    .fetch_all(pool)
    .await
    .map_err(|e| classify_query_error(e, "sales"))?;

    Ok(rows
        .into_iter()
        .map(|row| SaleRecord {
            owner_id,
            date: row.get("date"),
            sale_amount: row.get("sale_amount"),
            order_id: row.get("order_id"),
            customer_email: row.get("customer_email"),
        })
        .collect())
}

/// Bulk-insert uploaded rows in one transaction (all or nothing)
pub async fn insert_rows(pool: &SqlitePool, rows: &[SaleRecord]) -> Result<()> {
    let mut tx = pool.begin().await?;

    for record in rows {
        sqlx::query(
            r#"
            INSERT INTO sales (owner_id, date, sale_amount, order_id, customer_email)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.owner_id.to_string())
        .bind(&record.date)
        .bind(record.sale_amount)
        .bind(&record.order_id)
        .bind(&record.customer_email)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}
