//! Session façade used by the UI layer
//!
//! Owns the in-memory session, mirrors it to the user and token stores, and
//! reacts to the refresh coordinator's sign-out and token-refreshed events.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use ignitegym_domain::constants::SESSIONS_PATH;
use ignitegym_domain::{SignInRequest, SignInResponse, UserProfile};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::state::SessionSnapshot;
use crate::auth::{
    ApiError, ListenerRegistration, RefreshCoordinator, SessionListener, TokenStore, UserStore,
};
use crate::http::ApiRequest;

/// Session state shared between the manager and its coordinator hooks
struct SessionShared {
    coordinator: Arc<RefreshCoordinator>,
    token_store: Arc<dyn TokenStore>,
    user_store: Arc<dyn UserStore>,
    state: watch::Sender<SessionSnapshot>,
    loads: AtomicUsize,
}

impl SessionShared {
    async fn hydrate(&self) -> Result<bool, ApiError> {
        let _loading = LoadingGuard::start(self);

        let user = self.user_store.get().await?;
        let token = self.token_store.get().await?;

        let (Some(user), Some(token)) = (user, token) else {
            debug!("No stored session to restore");
            return Ok(false);
        };

        self.coordinator.header().begin_session(&token).await;
        self.state.send_modify(|session| {
            session.user = Some(user);
            session.token = Some(token);
        });
        info!("Session restored from storage");
        Ok(true)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<bool, ApiError> {
        let _loading = LoadingGuard::start(self);

        let request = ApiRequest::post(SESSIONS_PATH).with_json(&SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        let body: SignInResponse = self.coordinator.execute(request).await?.json()?;

        let (Some(user), Some(token)) = (body.user, body.token) else {
            warn!("Sign-in response lacked user or token");
            return Ok(false);
        };

        self.coordinator.header().begin_session(&token).await;
        self.state.send_modify(|session| {
            session.user = Some(user.clone());
            session.token = Some(token.clone());
        });

        self.user_store.save(&user).await?;
        self.token_store.save(&token).await?;
        info!(user_id = %user.id, "Signed in");
        Ok(true)
    }

    async fn sign_out(&self) -> Result<(), ApiError> {
        let _loading = LoadingGuard::start(self);

        self.coordinator.header().end_session().await;
        self.state.send_modify(|session| {
            session.user = None;
            session.token = None;
            session.refreshed_token = None;
        });

        let user_removed = self.user_store.remove().await;
        let token_removed = self.token_store.remove().await;
        if let Err(err) = &user_removed {
            warn!(error = %err, "Failed to remove stored user");
        }
        if let Err(err) = &token_removed {
            warn!(error = %err, "Failed to remove stored token");
        }
        user_removed.and(token_removed)?;

        info!("Signed out");
        Ok(())
    }

    async fn update_profile(&self, profile: UserProfile) -> Result<(), ApiError> {
        self.state.send_modify(|session| session.user = Some(profile.clone()));
        self.user_store.save(&profile).await?;
        Ok(())
    }

    fn on_token_refreshed(&self, token: &str) {
        self.state.send_modify(|session| {
            session.refreshed_token = Some(token.to_string());
            if session.user.is_some() {
                session.token = Some(token.to_string());
            }
        });
    }
}

/// Keeps `is_loading` raised while at least one load is running
struct LoadingGuard<'a> {
    shared: &'a SessionShared,
}

impl<'a> LoadingGuard<'a> {
    fn start(shared: &'a SessionShared) -> Self {
        shared.loads.fetch_add(1, Ordering::AcqRel);
        shared.state.send_if_modified(|session| !std::mem::replace(&mut session.is_loading, true));
        Self { shared }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.shared.loads.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.shared
                .state
                .send_if_modified(|session| std::mem::replace(&mut session.is_loading, false));
        }
    }
}

/// Coordinator listener forwarding events to a live session
///
/// Holds a weak reference: once the manager is gone, events are ignored.
struct SessionHooks {
    shared: Weak<SessionShared>,
}

impl SessionListener for SessionHooks {
    fn on_sign_out(&self) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    if let Err(err) = shared.sign_out().await {
                        warn!(error = %err, "Forced sign-out did not complete cleanly");
                    }
                });
            }
            Err(_) => warn!("No async runtime available, forced sign-out skipped"),
        }
    }

    fn on_token_refreshed(&self, token: &str) {
        if let Some(shared) = self.shared.upgrade() {
            shared.on_token_refreshed(token);
        }
    }
}

/// Owner of the user's session
///
/// Call [`attach`](Self::attach) once to receive the coordinator's events
/// and [`hydrate`](Self::hydrate) at startup to restore a stored session.
/// Dropping the manager detaches it.
pub struct SessionManager {
    shared: Arc<SessionShared>,
    registration: Mutex<Option<ListenerRegistration>>,
}

impl SessionManager {
    pub fn new(
        coordinator: Arc<RefreshCoordinator>,
        token_store: Arc<dyn TokenStore>,
        user_store: Arc<dyn UserStore>,
    ) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self {
            shared: Arc::new(SessionShared {
                coordinator,
                token_store,
                user_store,
                state,
                loads: AtomicUsize::new(0),
            }),
            registration: Mutex::new(None),
        }
    }

    /// Restore the stored session, if both user and token are present.
    ///
    /// Returns `true` when a session was restored.
    ///
    /// # Errors
    /// Returns `ApiError::Storage` if either store cannot be read
    pub async fn hydrate(&self) -> Result<bool, ApiError> {
        self.shared.hydrate().await
    }

    /// Authenticate against `POST /sessions`.
    ///
    /// Returns `true` when the server answered with both a user and a token
    /// and the session was started. A reply missing either leaves the
    /// session untouched.
    ///
    /// # Errors
    /// - `ApiError::Authentication` with the server's message for rejected
    ///   credentials
    /// - `ApiError::Transport` when the server is unreachable
    /// - `ApiError::Storage` if the new session could not be persisted
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<bool, ApiError> {
        self.shared.sign_in(email, password).await
    }

    /// End the session in memory and in both stores.
    ///
    /// Both removals are attempted even if the first fails.
    ///
    /// # Errors
    /// Returns the first removal error
    pub async fn sign_out(&self) -> Result<(), ApiError> {
        self.shared.sign_out().await
    }

    /// # Errors
    /// Returns `ApiError::Storage` if the profile could not be persisted
    pub async fn update_profile(&self, profile: UserProfile) -> Result<(), ApiError> {
        self.shared.update_profile(profile).await
    }

    pub fn on_token_refreshed(&self, token: &str) {
        self.shared.on_token_refreshed(token);
    }

    /// Register with the coordinator. Attaching twice is a no-op.
    pub fn attach(&self) {
        let mut registration = self.registration.lock();
        if registration.is_some() {
            return;
        }

        let hooks = Arc::new(SessionHooks { shared: Arc::downgrade(&self.shared) });
        *registration = Some(self.shared.coordinator.register(hooks));
        debug!("Session manager attached");
    }

    /// Stop receiving coordinator events. Safe to call repeatedly.
    pub fn detach(&self) {
        if let Some(registration) = self.registration.lock().take() {
            registration.deregister();
            debug!("Session manager detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.registration.lock().is_some()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.shared.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.shared.state.borrow().is_authenticated()
    }

    pub fn coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.shared.coordinator
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session", &*self.shared.state.borrow())
            .field("attached", &self.is_attached())
            .finish()
    }
}
