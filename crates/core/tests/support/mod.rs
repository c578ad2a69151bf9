//! Shared test helpers for `ignitegym-core` integration tests.
//!
//! `FakeApi` is a scripted in-process transport: protected endpoints accept
//! exactly one bearer token, the refresh endpoint can be held, rejected or
//! left hanging, and every request is logged.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use ignitegym_core::{
    ApiRequest, ApiResponse, AuthorizationHeader, HttpTransport, RefreshCoordinator,
    RefreshPolicy, SessionListener, TokenStore, TransportError, UserStore,
};
use ignitegym_domain::constants::{REFRESH_TOKEN_PATH, SESSIONS_PATH};
use ignitegym_domain::{IgniteError, Result as DomainResult, UserProfile};
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::Semaphore;

pub const EMAIL: &str = "ana@example.com";
pub const PASSWORD: &str = "123456";

pub fn profile() -> UserProfile {
    UserProfile::new("1", "Ana", EMAIL)
}

/// How the refresh endpoint answers
#[derive(Debug, Clone)]
pub enum RefreshReply {
    /// 200 with this token; protected endpoints accept it from then on
    Issue(String),
    /// Error status with a `message` body
    Reject { status: u16, message: String },
    /// 200 without a token
    Malformed,
    /// Never answers
    Hang,
}

/// One protected request as the server saw it
#[derive(Debug, Clone)]
pub struct Observed {
    pub path: String,
    pub bearer: Option<String>,
    /// Client default header at the moment the request arrived
    pub default_header: Option<String>,
}

pub struct FakeApi {
    valid_token: Mutex<String>,
    reject_code: Mutex<String>,
    reject_everything: AtomicBool,
    refresh_reply: Mutex<RefreshReply>,
    refresh_gate: Semaphore,
    refresh_calls: AtomicUsize,
    sign_in_user: Mutex<Option<UserProfile>>,
    observed: Mutex<Vec<Observed>>,
    header: Mutex<Option<Arc<AuthorizationHeader>>>,
}

impl FakeApi {
    /// Server accepting `T1` and refreshing to `T2`.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::build(Semaphore::MAX_PERMITS))
    }

    /// Like [`Self::new`], but refresh calls wait for
    /// [`Self::release_refresh`].
    pub fn with_held_refresh() -> Arc<Self> {
        Arc::new(Self::build(0))
    }

    fn build(refresh_permits: usize) -> Self {
        Self {
            valid_token: Mutex::new("T1".to_string()),
            reject_code: Mutex::new("token.expired".to_string()),
            reject_everything: AtomicBool::new(false),
            refresh_reply: Mutex::new(RefreshReply::Issue("T2".to_string())),
            refresh_gate: Semaphore::new(refresh_permits),
            refresh_calls: AtomicUsize::new(0),
            sign_in_user: Mutex::new(Some(profile())),
            observed: Mutex::new(Vec::new()),
            header: Mutex::new(None),
        }
    }

    pub fn release_refresh(&self) {
        self.refresh_gate.add_permits(1);
    }

    pub fn set_refresh_reply(&self, reply: RefreshReply) {
        *self.refresh_reply.lock() = reply;
    }

    pub fn set_reject_code(&self, code: &str) {
        *self.reject_code.lock() = code.to_string();
    }

    /// Protected endpoints reject every token, even freshly refreshed ones.
    pub fn reject_everything(&self) {
        self.reject_everything.store(true, Ordering::SeqCst);
    }

    pub fn set_sign_in_user(&self, user: Option<UserProfile>) {
        *self.sign_in_user.lock() = user;
    }

    /// Record the client's default header with every protected request.
    pub fn observe_header(&self, header: Arc<AuthorizationHeader>) {
        *self.header.lock() = Some(header);
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn observed(&self) -> Vec<Observed> {
        self.observed.lock().clone()
    }

    pub fn observed_with(&self, token: &str) -> Vec<Observed> {
        self.observed().into_iter().filter(|o| o.bearer.as_deref() == Some(token)).collect()
    }

    async fn refresh(&self) -> Result<ApiResponse, TransportError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        let permit = self
            .refresh_gate
            .acquire()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        permit.forget();

        let reply = self.refresh_reply.lock().clone();
        match reply {
            RefreshReply::Issue(token) => {
                *self.valid_token.lock() = token.clone();
                Ok(ApiResponse::json_body(200, &json!({ "token": token })))
            }
            RefreshReply::Reject { status, message } => {
                Ok(ApiResponse::json_body(status, &json!({ "status": "error", "message": message })))
            }
            RefreshReply::Malformed => Ok(ApiResponse::json_body(200, &json!({}))),
            RefreshReply::Hang => std::future::pending().await,
        }
    }

    fn sign_in(&self, request: &ApiRequest) -> ApiResponse {
        let body = request.body.clone().unwrap_or_default();
        let credentials_match = body["email"] == EMAIL && body["password"] == PASSWORD;
        if !credentials_match {
            return ApiResponse::json_body(
                401,
                &json!({ "status": "error", "message": "E-mail e/ou senha incorreta." }),
            );
        }

        let token = self.valid_token.lock().clone();
        match self.sign_in_user.lock().clone() {
            Some(user) => ApiResponse::json_body(200, &json!({ "user": user, "token": token })),
            None => ApiResponse::json_body(200, &json!({ "token": token })),
        }
    }

    async fn protected(&self, request: &ApiRequest) -> ApiResponse {
        let header = self.header.lock().clone();
        let default_header = match header {
            Some(header) => header.value().await,
            None => None,
        };
        let bearer = request.bearer_token().map(str::to_string);
        self.observed.lock().push(Observed {
            path: request.path.clone(),
            bearer: bearer.clone(),
            default_header,
        });

        let accepted = !self.reject_everything.load(Ordering::SeqCst)
            && bearer.as_deref() == Some(self.valid_token.lock().as_str());
        if !accepted {
            let code = self.reject_code.lock().clone();
            return ApiResponse::json_body(401, &json!({ "status": "error", "message": code }));
        }

        ApiResponse::json_body(200, &json!({ "path": request.path, "token": bearer }))
    }
}

#[async_trait]
impl HttpTransport for FakeApi {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        match request.path.as_str() {
            REFRESH_TOKEN_PATH => self.refresh().await,
            SESSIONS_PATH => Ok(self.sign_in(&request)),
            "/offline" => Err(TransportError::Connect("connection refused".to_string())),
            "/missing" => Ok(ApiResponse::json_body(
                404,
                &json!({ "status": "error", "message": "Exercício não encontrado." }),
            )),
            "/crash" => Ok(ApiResponse::new(500, "Internal Server Error")),
            _ => Ok(self.protected(&request).await),
        }
    }
}

/// Token store with call counters and failure injection
#[derive(Default)]
pub struct MockTokenStore {
    token: Mutex<Option<String>>,
    pub saves: AtomicUsize,
    pub removes: AtomicUsize,
    fail_get: AtomicBool,
    fail_remove: AtomicBool,
    sign_out_on_read: Mutex<Option<Arc<AuthorizationHeader>>>,
}

impl MockTokenStore {
    pub fn with_token(token: &str) -> Arc<Self> {
        let store = Self::default();
        *store.token.lock() = Some(token.to_string());
        Arc::new(store)
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn current(&self) -> Option<String> {
        self.token.lock().clone()
    }

    pub fn fail_reads(&self) {
        self.fail_get.store(true, Ordering::SeqCst);
    }

    pub fn fail_removes(&self) {
        self.fail_remove.store(true, Ordering::SeqCst);
    }

    /// The next read returns the stored token, then ends the session on
    /// `header` and clears the slot, as a concurrent sign-out would.
    pub fn sign_out_on_next_read(&self, header: Arc<AuthorizationHeader>) {
        *self.sign_out_on_read.lock() = Some(header);
    }
}

#[async_trait]
impl TokenStore for MockTokenStore {
    async fn get(&self) -> DomainResult<Option<String>> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(IgniteError::Storage("token store unavailable".to_string()));
        }
        let token = self.token.lock().clone();
        let sign_out = self.sign_out_on_read.lock().take();
        if let Some(header) = sign_out {
            header.end_session().await;
            *self.token.lock() = None;
        }
        Ok(token)
    }

    async fn save(&self, token: &str) -> DomainResult<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.token.lock() = Some(token.to_string());
        Ok(())
    }

    async fn remove(&self) -> DomainResult<()> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(IgniteError::Storage("token store locked".to_string()));
        }
        *self.token.lock() = None;
        Ok(())
    }
}

/// User store with call counters and failure injection
#[derive(Default)]
pub struct MockUserStore {
    user: Mutex<Option<UserProfile>>,
    pub saves: AtomicUsize,
    pub removes: AtomicUsize,
    fail_remove: AtomicBool,
}

impl MockUserStore {
    pub fn with_user(user: UserProfile) -> Arc<Self> {
        let store = Self::default();
        *store.user.lock() = Some(user);
        Arc::new(store)
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn current(&self) -> Option<UserProfile> {
        self.user.lock().clone()
    }

    pub fn fail_removes(&self) {
        self.fail_remove.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for MockUserStore {
    async fn get(&self) -> DomainResult<Option<UserProfile>> {
        Ok(self.user.lock().clone())
    }

    async fn save(&self, user: &UserProfile) -> DomainResult<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.user.lock() = Some(user.clone());
        Ok(())
    }

    async fn remove(&self) -> DomainResult<()> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(IgniteError::Storage("user store locked".to_string()));
        }
        *self.user.lock() = None;
        Ok(())
    }
}

/// Listener counting every event it receives
#[derive(Default)]
pub struct RecordingListener {
    sign_outs: AtomicUsize,
    refreshed: Mutex<Vec<String>>,
}

impl RecordingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sign_outs(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }

    pub fn refreshed(&self) -> Vec<String> {
        self.refreshed.lock().clone()
    }
}

impl SessionListener for RecordingListener {
    fn on_sign_out(&self) {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
    }

    fn on_token_refreshed(&self, token: &str) {
        self.refreshed.lock().push(token.to_string());
    }
}

/// Coordinator over `api` and `store` with its default header set to the
/// stored token.
pub async fn coordinator(
    api: &Arc<FakeApi>,
    store: &Arc<MockTokenStore>,
    policy: RefreshPolicy,
) -> Arc<RefreshCoordinator> {
    let coordinator = Arc::new(RefreshCoordinator::new(api.clone(), store.clone(), policy));
    if let Some(token) = store.current() {
        coordinator.header().begin_session(&token).await;
    }
    api.observe_header(Arc::clone(coordinator.header()));
    coordinator
}
