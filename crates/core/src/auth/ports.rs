//! Port interfaces for session persistence and notifications

use async_trait::async_trait;
use ignitegym_domain::{Result, UserProfile};

/// Durable storage for the current bearer token
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read the stored token. `Ok(None)` when nothing is stored.
    async fn get(&self) -> Result<Option<String>>;

    async fn save(&self, token: &str) -> Result<()>;

    /// Remove the stored token. Removing an absent token succeeds.
    async fn remove(&self) -> Result<()>;
}

/// Durable storage for the signed-in user's profile
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self) -> Result<Option<UserProfile>>;

    async fn save(&self, user: &UserProfile) -> Result<()>;

    async fn remove(&self) -> Result<()>;
}

/// Receives session events raised by the refresh coordinator
///
/// Callbacks run synchronously on the task that raised the event, so
/// implementations must not block. Spawn if real work is needed.
pub trait SessionListener: Send + Sync {
    /// The server rejected the session and it cannot be recovered.
    fn on_sign_out(&self);

    /// A refresh produced a new token, already persisted and installed.
    fn on_token_refreshed(&self, token: &str);
}
