//! Unit tests for the spend/sales/accounts/sessions query modules

mod helpers;

use adlens_common::db::models::{AdAccount, Platform, SaleRecord, SpendRecord};
use adlens_common::Error;
use adlens_server::db::{accounts, sales, sessions, spend};
use sqlx::Row;
use uuid::Uuid;

fn spend_row(owner: Uuid, date: &str, amount: f64, campaign: Option<&str>) -> SpendRecord {
    SpendRecord {
        owner_id: owner,
        date: date.to_string(),
        spend_amount: amount,
        campaign_id: campaign.map(str::to_string),
        impressions: None,
    }
}

#[tokio::test]
async fn upsert_replaces_on_matching_key() {
    let pool = helpers::full_schema_pool().await;
    let owner = Uuid::new_v4();

    spend::upsert_sync_rows(&pool, &[spend_row(owner, "2024-05-01", 10.0, Some("google_ads_sync"))])
        .await
        .unwrap();
    spend::upsert_sync_rows(&pool, &[spend_row(owner, "2024-05-01", 25.0, Some("google_ads_sync"))])
        .await
        .unwrap();

    let rows = spend::list_for_owner(&pool, owner).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].spend_amount, 25.0);
}

#[tokio::test]
async fn upsert_inserts_on_new_keys() {
    let pool = helpers::full_schema_pool().await;
    let owner = Uuid::new_v4();

    spend::upsert_sync_rows(
        &pool,
        &[
            spend_row(owner, "2024-05-01", 10.0, Some("google_ads_sync")),
            spend_row(owner, "2024-05-02", 20.0, Some("google_ads_sync")),
            // same date, other platform: distinct key
            spend_row(owner, "2024-05-01", 5.0, Some("meta_ads_sync")),
        ],
    )
    .await
    .unwrap();

    let rows = spend::list_for_owner(&pool, owner).await.unwrap();
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn uploaded_rows_without_campaign_stay_additive() {
    let pool = helpers::full_schema_pool().await;
    let owner = Uuid::new_v4();

    // two uploads for the same day must both persist (summed at read time)
    spend::insert_rows(&pool, &[spend_row(owner, "2024-05-01", 10.0, None)])
        .await
        .unwrap();
    spend::insert_rows(&pool, &[spend_row(owner, "2024-05-01", 15.0, None)])
        .await
        .unwrap();

    let rows = spend::list_for_owner(&pool, owner).await.unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn failed_bulk_insert_rolls_back_wholesale() {
    let pool = helpers::full_schema_pool().await;
    let owner = Uuid::new_v4();

    // second row trips the unique index; the first must not survive
    let result = spend::insert_rows(
        &pool,
        &[
            spend_row(owner, "2024-05-01", 10.0, Some("summer")),
            spend_row(owner, "2024-05-01", 20.0, Some("summer")),
        ],
    )
    .await;
    assert!(result.is_err());

    let rows = spend::list_for_owner(&pool, owner).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn missing_table_is_classified_as_schema_missing() {
    let pool = helpers::memory_pool().await;
    let owner = Uuid::new_v4();

    match spend::list_for_owner(&pool, owner).await {
        Err(Error::SchemaMissing(msg)) => assert!(msg.contains("ad_spend")),
        other => panic!("expected SchemaMissing, got {:?}", other),
    }

    match sales::list_for_owner(&pool, owner).await {
        Err(Error::SchemaMissing(msg)) => assert!(msg.contains("sales")),
        other => panic!("expected SchemaMissing, got {:?}", other),
    }
}

#[tokio::test]
async fn queries_are_scoped_by_owner() {
    let pool = helpers::full_schema_pool().await;
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    spend::insert_rows(&pool, &[spend_row(alice, "2024-05-01", 10.0, None)])
        .await
        .unwrap();
    sales::insert_rows(
        &pool,
        &[SaleRecord {
            owner_id: bob,
            date: "2024-05-01".to_string(),
            sale_amount: 99.0,
            order_id: None,
            customer_email: None,
        }],
    )
    .await
    .unwrap();

    assert_eq!(spend::list_for_owner(&pool, alice).await.unwrap().len(), 1);
    assert!(spend::list_for_owner(&pool, bob).await.unwrap().is_empty());
    assert!(sales::list_for_owner(&pool, alice).await.unwrap().is_empty());
    assert_eq!(sales::list_for_owner(&pool, bob).await.unwrap().len(), 1);
}

fn test_account(owner: Uuid, platform: Platform, external_id: &str) -> AdAccount {
    AdAccount {
        id: Uuid::new_v4(),
        owner_id: owner,
        platform,
        external_account_id: external_id.to_string(),
        access_token: "token".to_string(),
        refresh_token: Some("refresh".to_string()),
        token_expires_at: None,
        is_active: true,
    }
}

#[tokio::test]
async fn inactive_accounts_are_skipped() {
    let pool = helpers::full_schema_pool().await;
    let owner = Uuid::new_v4();

    let active = test_account(owner, Platform::Google, "111");
    let revoked = test_account(owner, Platform::Meta, "222");
    accounts::insert(&pool, &active).await.unwrap();
    accounts::insert(&pool, &revoked).await.unwrap();
    accounts::mark_inactive(&pool, revoked.id).await.unwrap();

    let listed = accounts::list_active_for_owner(&pool, owner).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].external_account_id, "111");

    let reloaded = accounts::get(&pool, revoked.id).await.unwrap().unwrap();
    assert!(!reloaded.is_active);
}

#[tokio::test]
async fn token_update_persists_token_and_expiry() {
    let pool = helpers::full_schema_pool().await;
    let owner = Uuid::new_v4();

    let account = test_account(owner, Platform::Google, "111");
    accounts::insert(&pool, &account).await.unwrap();

    accounts::update_token(&pool, account.id, "fresh", Some("2024-06-01T00:00:00Z"))
        .await
        .unwrap();

    let reloaded = accounts::get(&pool, account.id).await.unwrap().unwrap();
    assert_eq!(reloaded.access_token, "fresh");
    assert_eq!(
        reloaded.token_expires_at.as_deref(),
        Some("2024-06-01T00:00:00Z")
    );
    // refresh token is never touched by the write-back
    assert_eq!(reloaded.refresh_token.as_deref(), Some("refresh"));
}

#[tokio::test]
async fn session_lookup_round_trips() {
    let pool = helpers::full_schema_pool().await;
    let owner = Uuid::new_v4();

    let token = sessions::create_session(&pool, owner).await.unwrap();
    assert_eq!(sessions::lookup_owner(&pool, &token).await.unwrap(), Some(owner));
    assert_eq!(sessions::lookup_owner(&pool, "bogus").await.unwrap(), None);
}

#[tokio::test]
async fn unknown_platform_string_fails_the_listing() {
    let pool = helpers::full_schema_pool().await;
    let owner = Uuid::new_v4();

    sqlx::query(
        "INSERT INTO ad_accounts (id, owner_id, platform, external_account_id, access_token)
         VALUES (?, ?, 'tiktok', '999', 't')",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(owner.to_string())
    .execute(&pool)
    .await
    .unwrap();

    assert!(accounts::list_active_for_owner(&pool, owner).await.is_err());

    // sanity: the row itself is there
    let row = sqlx::query("SELECT COUNT(*) AS n FROM ad_accounts")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row.get::<i64, _>("n"), 1);
}
