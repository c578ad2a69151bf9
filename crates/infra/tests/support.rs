//! Shared fixtures for the HTTP end-to-end tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ignitegym_core::{
    ListenerRegistration, RefreshCoordinator, RefreshPolicy, SessionListener, TokenStore,
};
use ignitegym_infra::{HttpClient, MemoryTokenStore};
use serde_json::json;
use wiremock::{MockServer, Request, ResponseTemplate};

pub const PROTECTED_PATH: &str = "/history";
pub const REFRESH_PATH: &str = "/sessions/refresh-token";

/// Responder for a protected endpoint that only accepts `Bearer {valid}`.
pub fn accepts_only(
    valid: &'static str,
) -> impl Fn(&Request) -> ResponseTemplate + Send + Sync + 'static {
    move |req: &Request| {
        let expected = format!("Bearer {valid}");
        let authorized = req
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value == expected);

        if authorized {
            ResponseTemplate::new(200).set_body_json(json!({"path": req.url.path()}))
        } else {
            ResponseTemplate::new(401).set_body_json(json!({"message": "token.expired"}))
        }
    }
}

pub struct Fixture {
    pub tokens: Arc<MemoryTokenStore>,
    pub coordinator: Arc<RefreshCoordinator>,
    pub listener: Arc<RecordingListener>,
    _registration: ListenerRegistration,
}

/// Coordinator over a real `HttpClient` pointed at `server`, with a session
/// started on `token`.
pub async fn fixture(server: &MockServer, token: &str) -> Fixture {
    let http = HttpClient::builder(server.uri())
        .timeout(Duration::from_secs(5))
        .build()
        .expect("http client");
    let tokens = Arc::new(MemoryTokenStore::with_token(token));
    let store: Arc<dyn TokenStore> = tokens.clone();
    let coordinator =
        Arc::new(RefreshCoordinator::new(Arc::new(http), store, RefreshPolicy::default()));
    coordinator.header().begin_session(token).await;

    let listener = Arc::new(RecordingListener::default());
    let registration = coordinator.register(listener.clone());

    Fixture { tokens, coordinator, listener, _registration: registration }
}

/// Listener that records every event it receives
#[derive(Default)]
pub struct RecordingListener {
    pub sign_outs: AtomicUsize,
    pub refreshed: Mutex<Vec<String>>,
}

impl RecordingListener {
    pub fn sign_out_count(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }

    pub fn refreshed_tokens(&self) -> Vec<String> {
        self.refreshed.lock().expect("listener mutex").clone()
    }
}

impl SessionListener for RecordingListener {
    fn on_sign_out(&self) {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
    }

    fn on_token_refreshed(&self, token: &str) {
        self.refreshed.lock().expect("listener mutex").push(token.to_string());
    }
}
