//! Session endpoint payloads

use serde::{Deserialize, Serialize};

use super::user::UserProfile;

/// Body of `POST /sessions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Response of `POST /sessions`
///
/// Both fields are optional on the wire; a session only starts when the
/// server returns both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignInResponse {
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Body of `POST /sessions/refresh-token`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub token: String,
}

/// Response of `POST /sessions/refresh-token`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshTokenResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Error body returned by the API on failure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Extract the error body from raw response bytes.
    ///
    /// Bodies that are not JSON objects, or that lack a string `message`,
    /// yield `None`.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_slice(bytes).ok()?;
        let message = value.get("message")?.as_str()?.to_string();
        Some(Self { message: Some(message) })
    }
}
