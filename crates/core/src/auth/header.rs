//! Default `Authorization` header shared by every outgoing request

use ignitegym_domain::constants::BEARER_PREFIX;
use tokio::sync::{Mutex, MutexGuard};

use crate::http::ApiRequest;

#[derive(Debug, Default)]
struct HeaderState {
    token: Option<String>,
    epoch: u64,
}

/// Default bearer token plus a session epoch
///
/// Sign-in and sign-out start a new epoch. A refresh remembers the epoch it
/// started in and installs its token only if the epoch is unchanged, so a
/// refresh that finishes after sign-out cannot bring the old session back.
#[derive(Debug, Default)]
pub struct AuthorizationHeader {
    state: Mutex<HeaderState>,
}

impl AuthorizationHeader {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn token(&self) -> Option<String> {
        self.state.lock().await.token.clone()
    }

    /// Full header value, `Bearer <token>`.
    pub async fn value(&self) -> Option<String> {
        self.token().await.map(|token| format!("{}{}", BEARER_PREFIX, token))
    }

    pub async fn epoch(&self) -> u64 {
        self.state.lock().await.epoch
    }

    /// Install the token of a new session.
    pub async fn begin_session(&self, token: &str) {
        let mut state = self.state.lock().await;
        state.token = Some(token.to_string());
        state.epoch += 1;
    }

    /// Drop the token and invalidate any refresh still running.
    pub async fn end_session(&self) {
        let mut state = self.state.lock().await;
        state.token = None;
        state.epoch += 1;
    }

    /// Exclusive access for a compare-and-rotate.
    pub async fn lock(&self) -> HeaderGuard<'_> {
        HeaderGuard { state: self.state.lock().await }
    }

    /// Stamp the default header on `request` unless it already carries one.
    pub async fn apply(&self, request: &mut ApiRequest) {
        if request.has_authorization() {
            return;
        }
        if let Some(token) = self.state.lock().await.token.as_deref() {
            request.set_bearer(token);
        }
    }
}

/// Held lock on the header
pub struct HeaderGuard<'a> {
    state: MutexGuard<'a, HeaderState>,
}

impl HeaderGuard<'_> {
    pub fn epoch(&self) -> u64 {
        self.state.epoch
    }

    pub fn token(&self) -> Option<&str> {
        self.state.token.as_deref()
    }

    /// Replace the token within the current session.
    pub fn rotate(&mut self, token: String) {
        self.state.token = Some(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn session_changes_bump_epoch() {
        let header = AuthorizationHeader::new();
        assert_eq!(header.epoch().await, 0);

        header.begin_session("T1").await;
        assert_eq!(header.value().await.as_deref(), Some("Bearer T1"));
        assert_eq!(header.epoch().await, 1);

        header.end_session().await;
        assert_eq!(header.token().await, None);
        assert_eq!(header.epoch().await, 2);
    }

    #[tokio::test]
    async fn rotate_keeps_epoch() {
        let header = AuthorizationHeader::new();
        header.begin_session("T1").await;

        {
            let mut guard = header.lock().await;
            assert_eq!(guard.token(), Some("T1"));
            guard.rotate("T2".to_string());
            assert_eq!(guard.epoch(), 1);
        }

        assert_eq!(header.token().await.as_deref(), Some("T2"));
    }

    #[tokio::test]
    async fn apply_keeps_explicit_header() {
        let header = AuthorizationHeader::new();
        header.begin_session("default").await;

        let mut plain = ApiRequest::get("/exercises/bygroup/costas");
        header.apply(&mut plain).await;
        assert_eq!(plain.bearer_token(), Some("default"));

        let mut explicit = ApiRequest::get("/history").with_header("authorization", "Bearer mine");
        header.apply(&mut explicit).await;
        assert_eq!(explicit.bearer_token(), Some("mine"));
    }

    #[tokio::test]
    async fn apply_without_session_leaves_request_bare() {
        let header = AuthorizationHeader::new();
        let mut request = ApiRequest::get("/groups");
        header.apply(&mut request).await;
        assert!(!request.has_authorization());
    }
}
