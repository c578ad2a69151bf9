//! User profile types
//!
//! Profile returned by the sessions endpoint and cached on the device.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated user's profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    /// File name of the uploaded avatar, if any
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Minimal profile, mostly useful for fixtures.
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            avatar: None,
            created_at: None,
            updated_at: None,
        }
    }
}
