//! Bearer token persistence in the platform keychain

use std::sync::Arc;

use async_trait::async_trait;
use ignitegym_common::{KeychainEntry, KeychainProvider};
use ignitegym_core::TokenStore;
use ignitegym_domain::constants::TOKEN_ACCOUNT;
use ignitegym_domain::{IgniteError, Result as DomainResult};
use tokio::task;

use crate::errors::InfraError;

/// Keychain-backed implementation of `TokenStore`
///
/// Keychain calls block, so each one runs on the blocking pool.
pub struct KeychainTokenStore {
    entry: Arc<KeychainEntry>,
}

impl KeychainTokenStore {
    /// Store the token under `service` / [`TOKEN_ACCOUNT`].
    pub fn new(service: impl Into<String>) -> DomainResult<Self> {
        let provider = KeychainProvider::new(service);
        let entry = provider.entry(TOKEN_ACCOUNT).map_err(InfraError::from)?;
        Ok(Self { entry: Arc::new(entry) })
    }

    pub fn service_name(&self) -> &str {
        self.entry.service_name()
    }
}

#[async_trait]
impl TokenStore for KeychainTokenStore {
    async fn get(&self) -> DomainResult<Option<String>> {
        let entry = Arc::clone(&self.entry);

        task::spawn_blocking(move || -> DomainResult<Option<String>> {
            Ok(entry.find().map_err(InfraError::from)?)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn save(&self, token: &str) -> DomainResult<()> {
        let entry = Arc::clone(&self.entry);
        let token = token.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            Ok(entry.set(&token).map_err(InfraError::from)?)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn remove(&self) -> DomainResult<()> {
        let entry = Arc::clone(&self.entry);

        task::spawn_blocking(move || -> DomainResult<()> {
            Ok(entry.delete().map_err(InfraError::from)?)
        })
        .await
        .map_err(map_join_error)?
    }
}

impl std::fmt::Debug for KeychainTokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeychainTokenStore").field("entry", &self.entry).finish()
    }
}

pub(crate) fn map_join_error(err: task::JoinError) -> IgniteError {
    IgniteError::Internal(format!("Task join error: {err}"))
}
