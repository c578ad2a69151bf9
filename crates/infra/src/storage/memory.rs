//! In-memory stores for ephemeral sessions and tests

use async_trait::async_trait;
use ignitegym_core::{TokenStore, UserStore};
use ignitegym_domain::{Result as DomainResult, UserProfile};
use tokio::sync::RwLock;

/// Token store that forgets everything when dropped
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self { token: RwLock::new(Some(token.into())) }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> DomainResult<Option<String>> {
        Ok(self.token.read().await.clone())
    }

    async fn save(&self, token: &str) -> DomainResult<()> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn remove(&self) -> DomainResult<()> {
        self.token.write().await.take();
        Ok(())
    }
}

/// User store that forgets everything when dropped
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    user: RwLock<Option<UserProfile>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(user: UserProfile) -> Self {
        Self { user: RwLock::new(Some(user)) }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get(&self) -> DomainResult<Option<UserProfile>> {
        Ok(self.user.read().await.clone())
    }

    async fn save(&self, user: &UserProfile) -> DomainResult<()> {
        *self.user.write().await = Some(user.clone());
        Ok(())
    }

    async fn remove(&self) -> DomainResult<()> {
        self.user.write().await.take();
        Ok(())
    }
}
