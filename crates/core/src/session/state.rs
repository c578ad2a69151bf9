//! Session state published to the UI

use std::fmt;

use ignitegym_domain::UserProfile;

/// Point-in-time view of the session
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub user: Option<UserProfile>,
    pub token: Option<String>,
    /// A load (hydrate, sign-in, sign-out) is in progress
    pub is_loading: bool,
    /// Last token delivered by a refresh
    pub refreshed_token: Option<String>,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }
}

impl fmt::Debug for SessionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSnapshot")
            .field("user", &self.user.as_ref().map(|user| &user.id))
            .field("has_token", &self.token.is_some())
            .field("is_loading", &self.is_loading)
            .field("has_refreshed_token", &self.refreshed_token.is_some())
            .finish()
    }
}
