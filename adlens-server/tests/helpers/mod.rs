//! Shared test utilities
#![allow(dead_code)]

use adlens_common::db::init;
use adlens_server::config::{GoogleAdsCredentials, PlatformConfig};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// Single-connection pool so every query sees the same in-memory database
pub async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .unwrap()
}

/// In-memory pool with the full schema created
pub async fn full_schema_pool() -> SqlitePool {
    let pool = memory_pool().await;
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .unwrap();
    init::create_ad_spend_table(&pool).await.unwrap();
    init::create_sales_table(&pool).await.unwrap();
    init::create_ad_accounts_table(&pool).await.unwrap();
    init::create_sessions_table(&pool).await.unwrap();
    pool
}

/// Platform config pointing at a dead endpoint; used where no adapter
/// call should happen
pub fn offline_platforms() -> PlatformConfig {
    PlatformConfig {
        google: None,
        google_token_url: "http://127.0.0.1:9/token".to_string(),
        google_api_base: "http://127.0.0.1:9".to_string(),
        meta_api_base: "http://127.0.0.1:9/v19.0".to_string(),
    }
}

/// Platform config pointing both adapters at a mock server
pub fn platforms_against(base: &str) -> PlatformConfig {
    PlatformConfig {
        google: Some(GoogleAdsCredentials {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            developer_token: "test-dev-token".to_string(),
        }),
        google_token_url: format!("{}/token", base),
        google_api_base: base.to_string(),
        meta_api_base: format!("{}/v19.0", base),
    }
}

/// Serve a mock upstream on an ephemeral port, returning its base URL
pub async fn spawn_mock(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Multipart request body with one `file` field
pub fn multipart_file(boundary: &str, filename: &str, content: &str) -> String {
    format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {c}\r\n\
         --{b}--\r\n",
        b = boundary,
        f = filename,
        c = content,
    )
}
