//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `IGNITE_API_BASE_URL` is missing, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `IGNITE_API_BASE_URL`: API base URL (required)
//! - `IGNITE_API_TIMEOUT`: Per-request timeout in seconds
//! - `IGNITE_REFRESH_TIMEOUT`: Refresh call timeout in seconds
//! - `IGNITE_MAX_REFRESH_CYCLES`: Refresh cycles per logical request
//! - `IGNITE_HTTP_MAX_ATTEMPTS`: Transport attempts per send
//! - `IGNITE_KEYCHAIN_SERVICE`: Keychain service for the bearer token
//! - `IGNITE_USER_PROFILE_PATH`: JSON file caching the user profile
//! - `IGNITE_LOG_FILTER`: `EnvFilter` directive
//! - `IGNITE_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./ignitegym.{json,toml}` or `./config.{json,toml}` (current working
//!    directory)
//! 2. `../config.{json,toml}` (parent directory)
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ignitegym_domain::{Config, IgniteError, Result};

const BASE_URL_VAR: &str = "IGNITE_API_BASE_URL";

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `IgniteError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - A variable or field has an invalid value
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `IGNITE_API_BASE_URL` is required; every other knob keeps its
/// default when unset.
///
/// # Errors
/// Returns `IgniteError::Config` if the base URL is missing or a variable
/// has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::with_base_url(env_var(BASE_URL_VAR)?);

    if let Some(timeout) = env_parse("IGNITE_API_TIMEOUT")? {
        config.api.timeout_seconds = timeout;
    }
    if let Some(timeout) = env_parse("IGNITE_REFRESH_TIMEOUT")? {
        config.api.refresh_timeout_seconds = timeout;
    }
    if let Some(cycles) = env_parse("IGNITE_MAX_REFRESH_CYCLES")? {
        config.api.max_refresh_cycles = cycles;
    }
    if let Some(attempts) = env_parse("IGNITE_HTTP_MAX_ATTEMPTS")? {
        config.api.max_attempts = attempts;
    }
    if let Ok(service) = std::env::var("IGNITE_KEYCHAIN_SERVICE") {
        config.storage.keychain_service = service;
    }
    if let Ok(path) = std::env::var("IGNITE_USER_PROFILE_PATH") {
        config.storage.user_profile_path = path;
    }
    if let Ok(filter) = std::env::var("IGNITE_LOG_FILTER") {
        config.logging.filter = filter;
    }
    config.logging.json = env_bool("IGNITE_LOG_JSON", config.logging.json);

    validate(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Format is detected by file extension.
///
/// # Errors
/// Returns `IgniteError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(IgniteError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            IgniteError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| IgniteError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path).and_then(validate)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| IgniteError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| IgniteError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(IgniteError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Reject settings that would disable or break token refresh
///
/// # Errors
/// Returns `IgniteError::Config` for an empty base URL, a zero refresh
/// timeout or zero refresh cycles.
pub fn validate(config: Config) -> Result<Config> {
    if config.api.base_url.trim().is_empty() {
        return Err(IgniteError::Config("api.base_url must not be empty".to_string()));
    }
    if config.api.refresh_timeout_seconds == 0 {
        return Err(IgniteError::Config(
            "api.refresh_timeout_seconds must be greater than zero".to_string(),
        ));
    }
    if config.api.max_refresh_cycles == 0 {
        return Err(IgniteError::Config(
            "api.max_refresh_cycles must be greater than zero".to_string(),
        ));
    }
    Ok(config)
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 4] = ["ignitegym.json", "ignitegym.toml", "config.json", "config.toml"];

    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(NAMES.iter().map(|name| cwd.join(name)));
        candidates.push(cwd.join("../config.json"));
        candidates.push(cwd.join("../config.toml"));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(NAMES.iter().map(|name| exe_dir.join(name)));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        IgniteError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional numeric environment variable.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| IgniteError::Config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
