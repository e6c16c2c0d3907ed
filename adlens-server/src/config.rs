//! Platform credential and endpoint resolution
//!
//! Credentials resolve ENV > TOML; endpoints default to the live platform
//! hosts and are overridable so tests can point the adapters at a local
//! mock server.

use adlens_common::config::TomlConfig;
use tracing::warn;

/// Google OAuth2 token endpoint
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
/// Google Ads REST base (reporting API)
pub const GOOGLE_ADS_API_BASE: &str = "https://googleads.googleapis.com/v17";
/// Meta Graph API host
pub const META_GRAPH_BASE: &str = "https://graph.facebook.com";
/// Default Graph API version segment
pub const META_DEFAULT_API_VERSION: &str = "v19.0";

/// Google Ads API credentials (OAuth2 client + developer token)
#[derive(Debug, Clone)]
pub struct GoogleAdsCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub developer_token: String,
}

/// Resolved platform configuration handed to the sync adapters
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// None until the operator configures all three Google values; Google
    /// accounts then fail their sync with a classified error instead of
    /// blocking the batch
    pub google: Option<GoogleAdsCredentials>,
    pub google_token_url: String,
    pub google_api_base: String,
    pub meta_api_base: String,
}

impl PlatformConfig {
    /// Resolve from environment (wins) and the TOML config
    pub fn resolve(toml_config: &TomlConfig) -> Self {
        let google = resolve_google_credentials(toml_config);

        let meta_version = std::env::var("META_GRAPH_API_VERSION")
            .ok()
            .or_else(|| toml_config.meta_ads.api_version.clone())
            .unwrap_or_else(|| META_DEFAULT_API_VERSION.to_string());

        Self {
            google,
            google_token_url: GOOGLE_TOKEN_URL.to_string(),
            google_api_base: GOOGLE_ADS_API_BASE.to_string(),
            meta_api_base: format!("{}/{}", META_GRAPH_BASE, meta_version),
        }
    }
}

fn resolve_google_credentials(toml_config: &TomlConfig) -> Option<GoogleAdsCredentials> {
    let section = &toml_config.google_ads;

    let client_id = env_or("GOOGLE_CLIENT_ID", section.client_id.as_deref());
    let client_secret = env_or("GOOGLE_CLIENT_SECRET", section.client_secret.as_deref());
    let developer_token = env_or("GOOGLE_DEVELOPER_TOKEN", section.developer_token.as_deref());

    match (client_id, client_secret, developer_token) {
        (Some(client_id), Some(client_secret), Some(developer_token)) => {
            Some(GoogleAdsCredentials {
                client_id,
                client_secret,
                developer_token,
            })
        }
        (None, None, None) => None,
        _ => {
            warn!(
                "Google Ads credentials partially configured; set GOOGLE_CLIENT_ID, \
                 GOOGLE_CLIENT_SECRET and GOOGLE_DEVELOPER_TOKEN (or the [google_ads] \
                 config section). Google account syncs will fail until then."
            );
            None
        }
    }
}

/// Non-empty environment value, else the non-empty TOML value
fn env_or(var: &str, toml_value: Option<&str>) -> Option<String> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| {
            toml_value
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string)
        })
}
