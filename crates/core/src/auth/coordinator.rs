//! Single-flight token refresh
//!
//! Every response of an authenticated call passes through
//! [`RefreshCoordinator::intercept`]. Responses are classified once and then:
//!
//! - successes pass through unchanged, transport errors are returned as-is
//! - non-auth failures are rejected with the server's message when it sent one
//! - a 401 that no refresh can fix signs the session out
//! - a refreshable 401 either starts the one refresh allowed at a time, or
//!   waits for the refresh already running, then replays the request with the
//!   new token
//!
//! The in-flight flag and the queue of waiting callers live under one
//! `parking_lot` mutex that is never held across an `.await`. Settling clears
//! the flag and drains the queue in one critical section, then runs the
//! continuations in enqueue order outside the lock.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use ignitegym_domain::constants::REFRESH_TOKEN_PATH;
use ignitegym_domain::{ApiConfig, ApiErrorBody, RefreshTokenResponse};
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::classify::{classify, raw_error, rejection, RefreshableCode, ResponseClass};
use super::errors::{ApiError, RefreshFailure};
use super::header::AuthorizationHeader;
use super::listeners::{ListenerRegistration, ListenerRegistry};
use super::pending::{PendingQueue, PendingRequest, RefreshOutcome};
use super::ports::{SessionListener, TokenStore};
use crate::http::{ApiRequest, ApiResponse, HttpTransport, TransportError};

/// Tunables of the refresh cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshPolicy {
    /// Path of the refresh endpoint, relative to the API base URL
    pub refresh_path: String,
    /// Upper bound on the refresh HTTP call
    pub refresh_timeout: Duration,
    /// Refresh cycles one logical request may go through. A refreshable 401
    /// beyond this is handled like any other 401.
    pub max_refresh_cycles: u32,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            refresh_path: REFRESH_TOKEN_PATH.to_string(),
            refresh_timeout: Duration::from_secs(15),
            max_refresh_cycles: 1,
        }
    }
}

impl From<&ApiConfig> for RefreshPolicy {
    fn from(config: &ApiConfig) -> Self {
        Self {
            refresh_path: REFRESH_TOKEN_PATH.to_string(),
            refresh_timeout: Duration::from_secs(config.refresh_timeout_seconds),
            max_refresh_cycles: config.max_refresh_cycles,
        }
    }
}

#[derive(Debug, Default)]
struct RefreshState {
    in_flight: bool,
    queue: PendingQueue,
}

enum Admission {
    /// A refresh is already running; wait for its outcome.
    Queued(oneshot::Receiver<RefreshOutcome>),
    /// This caller runs the refresh.
    Leader(InFlightGuard),
}

/// Proof that the holder owns the in-flight refresh
///
/// Dropping it unsettled (the refreshing task was cancelled) fails every
/// queued caller with [`RefreshFailure::Abandoned`].
struct InFlightGuard {
    state: Arc<Mutex<RefreshState>>,
    settled: bool,
}

impl InFlightGuard {
    fn settle(mut self, outcome: &RefreshOutcome) {
        self.release(outcome);
    }

    fn release(&mut self, outcome: &RefreshOutcome) {
        if self.settled {
            return;
        }
        self.settled = true;

        let waiting = {
            let mut state = self.state.lock();
            state.in_flight = false;
            state.queue.drain()
        };
        if !waiting.is_empty() {
            debug!(waiting = waiting.len(), success = outcome.is_ok(), "Settling queued requests");
        }
        waiting.settle_all(outcome);
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Token refresh abandoned before settling");
        }
        self.release(&Err(RefreshFailure::Abandoned));
    }
}

/// Response interceptor owning the refresh state machine
pub struct RefreshCoordinator {
    transport: Arc<dyn HttpTransport>,
    token_store: Arc<dyn TokenStore>,
    header: Arc<AuthorizationHeader>,
    listeners: Arc<ListenerRegistry>,
    state: Arc<Mutex<RefreshState>>,
    policy: RefreshPolicy,
}

impl RefreshCoordinator {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        token_store: Arc<dyn TokenStore>,
        policy: RefreshPolicy,
    ) -> Self {
        Self {
            transport,
            token_store,
            header: Arc::new(AuthorizationHeader::new()),
            listeners: Arc::new(ListenerRegistry::new()),
            state: Arc::new(Mutex::new(RefreshState::default())),
            policy,
        }
    }

    /// Subscribe to sign-out and token-refreshed events.
    pub fn register(&self, listener: Arc<dyn SessionListener>) -> ListenerRegistration {
        self.listeners.register(listener)
    }

    /// The default `Authorization` header stamped by [`Self::execute`].
    pub fn header(&self) -> &Arc<AuthorizationHeader> {
        &self.header
    }

    pub fn policy(&self) -> &RefreshPolicy {
        &self.policy
    }

    pub fn is_refreshing(&self) -> bool {
        self.state.lock().in_flight
    }

    /// Callers currently waiting on the in-flight refresh.
    pub fn pending_len(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Stamp the default header, send `request` and intercept the result.
    ///
    /// # Errors
    /// See [`Self::intercept`]
    pub async fn execute(&self, mut request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.header.apply(&mut request).await;
        let result = self.transport.send(request.clone()).await;
        self.intercept(request, result).await
    }

    /// Decide what happens to the outcome of `request`.
    ///
    /// `request` must be the request exactly as it was sent; it is replayed
    /// with a new bearer token when a refresh recovers it.
    ///
    /// # Errors
    /// - `ApiError::Transport` when no response was received
    /// - `ApiError::Authentication` for error responses carrying a message
    /// - `ApiError::Status` for error responses without one, and for a
    ///   refreshable 401 when no token is stored
    /// - `ApiError::Refresh` when the refresh this request waited on failed
    /// - `ApiError::Storage` when the stored token cannot be read
    pub async fn intercept(
        &self,
        request: ApiRequest,
        result: Result<ApiResponse, TransportError>,
    ) -> Result<ApiResponse, ApiError> {
        self.intercept_at(request, result, 0).await
    }

    async fn intercept_at(
        &self,
        request: ApiRequest,
        result: Result<ApiResponse, TransportError>,
        cycle: u32,
    ) -> Result<ApiResponse, ApiError> {
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                debug!(path = %request.path, error = %err, "Transport error passed through");
                return Err(ApiError::Transport(err));
            }
        };

        match classify(&response) {
            ResponseClass::Success => Ok(response),
            ResponseClass::Failure { message } => {
                debug!(path = %request.path, status = response.status, "Request failed");
                Err(rejection(&response, message))
            }
            ResponseClass::Unauthorized { message } => {
                warn!(path = %request.path, code = ?message, "Unrecoverable 401, signing out");
                self.listeners.notify_sign_out();
                Err(rejection(&response, message))
            }
            ResponseClass::Refreshable(code) if cycle >= self.policy.max_refresh_cycles => {
                warn!(
                    path = %request.path,
                    %code,
                    cycle,
                    "Token rejected again after refresh, signing out"
                );
                self.listeners.notify_sign_out();
                Err(rejection(&response, Some(code.to_string())))
            }
            ResponseClass::Refreshable(code) => self.recover(request, &response, code, cycle).await,
        }
    }

    async fn recover(
        &self,
        mut request: ApiRequest,
        response: &ApiResponse,
        code: RefreshableCode,
        cycle: u32,
    ) -> Result<ApiResponse, ApiError> {
        // Taken before the stored token is read so a sign-out in between
        // fails the refresh instead of reviving the session.
        let epoch = self.header.epoch().await;
        let Some(stored) = self.token_store.get().await? else {
            warn!(path = %request.path, %code, "No stored token to refresh, signing out");
            self.listeners.notify_sign_out();
            return Err(raw_error(response));
        };

        let token = match self.admit() {
            Admission::Queued(waiter) => {
                debug!(path = %request.path, "Refresh in flight, queueing request");
                waiter.await.unwrap_or(Err(RefreshFailure::Abandoned))?
            }
            Admission::Leader(guard) => {
                debug!(path = %request.path, %code, "Starting token refresh");
                let outcome = self.refresh(&stored, epoch).await;
                guard.settle(&outcome);
                outcome?
            }
        };

        request.set_bearer(&token);
        self.dispatch(request, cycle + 1).await
    }

    fn dispatch(&self, request: ApiRequest, cycle: u32) -> BoxFuture<'_, Result<ApiResponse, ApiError>> {
        Box::pin(async move {
            debug!(path = %request.path, cycle, "Replaying request with refreshed token");
            let result = self.transport.send(request.clone()).await;
            self.intercept_at(request, result, cycle).await
        })
    }

    fn admit(&self) -> Admission {
        let mut state = self.state.lock();
        if state.in_flight {
            let (pending, waiter) = PendingRequest::channel();
            state.queue.push(pending);
            return Admission::Queued(waiter);
        }

        state.in_flight = true;
        Admission::Leader(InFlightGuard { state: Arc::clone(&self.state), settled: false })
    }

    /// Exchange `stored` for a new token, then persist it, install it as
    /// the default header and notify listeners.
    ///
    /// Bypasses interception: a 401 from the refresh endpoint is a
    /// `RefreshFailure::Rejected`. Any session change after `epoch` fails
    /// with `RefreshFailure::SessionEnded`.
    async fn refresh(&self, stored: &str, epoch: u64) -> RefreshOutcome {
        let mut request =
            ApiRequest::post(self.policy.refresh_path.as_str()).with_body(json!({ "token": stored }));
        request.set_bearer(stored);

        let response =
            match tokio::time::timeout(self.policy.refresh_timeout, self.transport.send(request))
                .await
            {
                Err(_) => {
                    warn!(timeout = ?self.policy.refresh_timeout, "Token refresh timed out");
                    return Err(RefreshFailure::Timeout(self.policy.refresh_timeout));
                }
                Ok(Err(err)) => {
                    warn!(error = %err, "Token refresh request failed");
                    return Err(RefreshFailure::Transport(err));
                }
                Ok(Ok(response)) => response,
            };

        if !response.is_success() {
            let message = ApiErrorBody::parse(&response.body).and_then(|body| body.message);
            warn!(status = response.status, code = ?message, "Token refresh rejected");
            return Err(RefreshFailure::Rejected { status: response.status, message });
        }

        let token = response
            .json::<RefreshTokenResponse>()
            .ok()
            .and_then(|body| body.token)
            .filter(|token| !token.is_empty())
            .ok_or(RefreshFailure::MissingToken)?;

        {
            let mut header = self.header.lock().await;
            if header.epoch() != epoch {
                warn!("Session changed during token refresh, discarding new token");
                return Err(RefreshFailure::SessionEnded);
            }
            self.token_store
                .save(&token)
                .await
                .map_err(|e| RefreshFailure::Storage(e.to_string()))?;
            header.rotate(token.clone());
        }

        info!("Token refreshed");
        self.listeners.notify_token_refreshed(&token);
        Ok(token)
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("policy", &self.policy)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}
