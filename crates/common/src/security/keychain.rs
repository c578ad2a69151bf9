//! Generic keychain provider for secure credential storage
//!
//! Thin wrapper over the platform keychain for storing arbitrary secrets
//! across macOS (Keychain Access), Windows (Credential Manager), and Linux
//! (Secret Service API).
//!
//! Without the `native-keychain` feature the `keyring` crate falls back to its
//! in-process mock store, where every entry handle is independent. Builds that
//! must persist across restarts enable the feature.
//!
//! ## Usage
//!
//! ```no_run
//! use ignitegym_common::security::keychain::KeychainProvider;
//!
//! let keychain = KeychainProvider::new("IgniteGym.session");
//! let token = keychain.entry("auth.token")?;
//! token.set("eyJhbGciOi...")?;
//! assert!(token.find()?.is_some());
//! # Ok::<(), ignitegym_common::security::KeychainError>(())
//! ```

use keyring::Entry;
use thiserror::Error;
use tracing::debug;

/// Generic keychain provider for secure credential storage
#[derive(Debug, Clone)]
pub struct KeychainProvider {
    service_name: String,
}

impl KeychainProvider {
    /// Create a new keychain provider for a specific service
    ///
    /// # Arguments
    /// * `service_name` - Service identifier (e.g., "IgniteGym.session")
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into() }
    }

    /// Service identifier entries are stored under
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Open a long-lived handle on one secret
    ///
    /// Reuse the handle for repeated access: with keyring's mock store a
    /// secret is only visible through the handle that wrote it.
    ///
    /// # Errors
    /// Returns `KeychainError::AccessFailed` if the entry cannot be created
    pub fn entry(&self, key: &str) -> Result<KeychainEntry, KeychainError> {
        let entry = Entry::new(&self.service_name, key).map_err(|e| {
            KeychainError::AccessFailed(format!("Failed to create keychain entry: {}", e))
        })?;

        Ok(KeychainEntry { service_name: self.service_name.clone(), key: key.to_string(), entry })
    }

    /// Store a secret value in the platform keychain
    ///
    /// # Errors
    /// Returns `KeychainError::AccessFailed` if keychain access fails
    pub fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError> {
        self.entry(key)?.set(value)
    }

    /// Retrieve a secret value from the platform keychain
    ///
    /// # Errors
    /// Returns `KeychainError::NotFound` if secret doesn't exist
    /// Returns `KeychainError::AccessFailed` if keychain access fails
    pub fn get_secret(&self, key: &str) -> Result<String, KeychainError> {
        self.entry(key)?.get()
    }

    /// Retrieve a secret, mapping a missing entry to `None`
    ///
    /// # Errors
    /// Returns `KeychainError::AccessFailed` if keychain access fails
    pub fn find_secret(&self, key: &str) -> Result<Option<String>, KeychainError> {
        self.entry(key)?.find()
    }

    /// Delete a secret from the platform keychain (idempotent)
    ///
    /// # Errors
    /// Returns `KeychainError::AccessFailed` if the entry exists but cannot be
    /// removed
    pub fn delete_secret(&self, key: &str) -> Result<(), KeychainError> {
        self.entry(key)?.delete()
    }
}

/// Handle on a single keychain secret
pub struct KeychainEntry {
    service_name: String,
    key: String,
    entry: Entry,
}

impl KeychainEntry {
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// # Errors
    /// Returns `KeychainError::AccessFailed` if keychain access fails
    pub fn set(&self, value: &str) -> Result<(), KeychainError> {
        debug!(service = %self.service_name, key = %self.key, "Storing secret in keychain");

        self.entry.set_password(value).map_err(|e| {
            KeychainError::AccessFailed(format!("Failed to store secret for {}: {}", self.key, e))
        })
    }

    /// # Errors
    /// Returns `KeychainError::NotFound` if secret doesn't exist
    /// Returns `KeychainError::AccessFailed` if keychain access fails
    pub fn get(&self) -> Result<String, KeychainError> {
        debug!(service = %self.service_name, key = %self.key, "Retrieving secret from keychain");

        self.entry.get_password().map_err(|e| {
            if matches!(e, keyring::Error::NoEntry) {
                KeychainError::NotFound
            } else {
                KeychainError::AccessFailed(format!(
                    "Failed to retrieve secret for {}: {}",
                    self.key, e
                ))
            }
        })
    }

    /// # Errors
    /// Returns `KeychainError::AccessFailed` if keychain access fails
    pub fn find(&self) -> Result<Option<String>, KeychainError> {
        match self.get() {
            Ok(secret) => Ok(Some(secret)),
            Err(KeychainError::NotFound) => Ok(None),
            Err(other) => Err(other),
        }
    }

    /// Idempotent: deleting a missing secret succeeds.
    ///
    /// # Errors
    /// Returns `KeychainError::AccessFailed` if the entry exists but cannot be
    /// removed
    pub fn delete(&self) -> Result<(), KeychainError> {
        debug!(service = %self.service_name, key = %self.key, "Deleting secret from keychain");

        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(KeychainError::AccessFailed(format!(
                "Failed to delete secret for {}: {}",
                self.key, e
            ))),
        }
    }
}

impl std::fmt::Debug for KeychainEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeychainEntry")
            .field("service_name", &self.service_name)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Keychain error types
#[derive(Debug, Error)]
pub enum KeychainError {
    /// Keychain access failed (permission denied, not available, etc.)
    #[error("Keychain access failed: {0}")]
    AccessFailed(String),

    /// Entry not found in keychain
    #[error("Entry not found")]
    NotFound,
}
