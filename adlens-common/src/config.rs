//! Configuration loading and database path resolution
//!
//! Resolution follows a fixed priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming the database file
pub const DATABASE_ENV_VAR: &str = "ADLENS_DATABASE";

/// TOML configuration file contents (`~/.config/adlens/config.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Path to the SQLite database file
    pub database_path: Option<String>,

    /// Google Ads API credentials
    #[serde(default)]
    pub google_ads: GoogleAdsSection,

    /// Meta Graph API settings
    #[serde(default)]
    pub meta_ads: MetaAdsSection,
}

/// `[google_ads]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoogleAdsSection {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub developer_token: Option<String>,
}

/// `[meta_ads]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetaAdsSection {
    /// Graph API version segment, e.g. "v19.0"
    pub api_version: Option<String>,
}

/// Resolve the database file path
///
/// Priority: CLI argument, then `ADLENS_DATABASE`, then the TOML config,
/// then the OS data directory default.
pub fn resolve_database_path(cli_arg: Option<&str>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    if let Ok(path) = std::env::var(DATABASE_ENV_VAR) {
        return PathBuf::from(path);
    }

    if let Some(path) = &config.database_path {
        return PathBuf::from(path);
    }

    default_database_path()
}

/// OS-dependent default database location
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("adlens").join("adlens.db"))
        .unwrap_or_else(|| PathBuf::from("./adlens.db"))
}

/// Default configuration file path for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("adlens").join("config.toml"))
}

/// Load the TOML config file, falling back to defaults when absent
///
/// A missing file is not an error (fresh installs have none); a present but
/// malformed file is.
pub fn load_toml_config(path: Option<&PathBuf>) -> Result<TomlConfig> {
    let path = match path.cloned().or_else(default_config_path) {
        Some(p) => p,
        None => return Ok(TomlConfig::default()),
    };

    if !path.exists() {
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read config failed ({}): {}", path.display(), e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse config failed ({}): {}", path.display(), e)))?;

    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}
