//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_KEYCHAIN_SERVICE, DEFAULT_USER_PROFILE_FILE};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Configuration pointing at `base_url` with every other knob defaulted.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig::with_base_url(base_url),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Remote API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request timeout
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Upper bound on a single refresh-token call
    #[serde(default = "default_refresh_timeout_seconds")]
    pub refresh_timeout_seconds: u64,
    /// Refresh cycles a single logical request may trigger
    #[serde(default = "default_max_refresh_cycles")]
    pub max_refresh_cycles: u32,
    /// Transport attempts per send (1 = no transport-level retry)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

impl ApiConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds: default_timeout_seconds(),
            refresh_timeout_seconds: default_refresh_timeout_seconds(),
            max_refresh_cycles: default_max_refresh_cycles(),
            max_attempts: default_max_attempts(),
        }
    }
}

/// Local persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Keychain service the bearer token is stored under
    #[serde(default = "default_keychain_service")]
    pub keychain_service: String,
    /// JSON file holding the cached user profile
    #[serde(default = "default_user_profile_path")]
    pub user_profile_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            keychain_service: default_keychain_service(),
            user_profile_path: default_user_profile_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info,ignitegym_core=debug`
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_log_filter(), json: false }
    }
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_refresh_timeout_seconds() -> u64 {
    15
}

fn default_max_refresh_cycles() -> u32 {
    1
}

fn default_max_attempts() -> usize {
    1
}

fn default_keychain_service() -> String {
    DEFAULT_KEYCHAIN_SERVICE.to_string()
}

fn default_user_profile_path() -> String {
    DEFAULT_USER_PROFILE_FILE.to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}
