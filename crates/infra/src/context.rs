//! Composition root
//!
//! Wires the reqwest transport, the token and user stores, the refresh
//! coordinator and the session manager from a single [`Config`].

use std::sync::Arc;

use ignitegym_common::init_logging;
use ignitegym_core::{RefreshCoordinator, RefreshPolicy, SessionManager, TokenStore, UserStore};
use ignitegym_domain::{Config, IgniteError, Result as DomainResult};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::http::HttpClient;
use crate::storage::{FileUserStore, KeychainTokenStore};

/// Everything a UI layer needs to talk to the API
pub struct ClientContext {
    config: Config,
    coordinator: Arc<RefreshCoordinator>,
    session: SessionManager,
    api: ApiClient,
}

impl ClientContext {
    pub fn builder(config: Config) -> ClientContextBuilder {
        ClientContextBuilder::new(config)
    }

    /// Build with the default stores, attach the session manager and
    /// restore any persisted session.
    ///
    /// # Errors
    /// Returns `IgniteError::Config` for an unusable configuration and the
    /// store error if the persisted session cannot be read.
    pub async fn bootstrap(config: Config) -> DomainResult<Self> {
        Self::builder(config).init_logging(true).build().await
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.coordinator
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}

impl std::fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientContext")
            .field("base_url", &self.config.api.base_url)
            .field("coordinator", &self.coordinator)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ClientContext`]
pub struct ClientContextBuilder {
    config: Config,
    init_logging: bool,
    token_store: Option<Arc<dyn TokenStore>>,
    user_store: Option<Arc<dyn UserStore>>,
}

impl ClientContextBuilder {
    fn new(config: Config) -> Self {
        Self { config, init_logging: false, token_store: None, user_store: None }
    }

    /// Install the global tracing subscriber from `config.logging`.
    pub fn init_logging(mut self, enabled: bool) -> Self {
        self.init_logging = enabled;
        self
    }

    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    pub fn user_store(mut self, store: Arc<dyn UserStore>) -> Self {
        self.user_store = Some(store);
        self
    }

    /// # Errors
    /// See [`ClientContext::bootstrap`].
    pub async fn build(self) -> DomainResult<ClientContext> {
        let Self { config, init_logging: wants_logging, token_store, user_store } = self;
        let config = crate::config::validate(config)?;

        if wants_logging {
            // Another subscriber may already be installed by the host app.
            if let Err(err) = init_logging(&config.logging.filter, config.logging.json) {
                warn!(error = %err, "logging not initialised");
            }
        }

        let transport = HttpClient::from_config(&config.api)?;

        let token_store: Arc<dyn TokenStore> = match token_store {
            Some(store) => store,
            None => Arc::new(KeychainTokenStore::new(config.storage.keychain_service.clone())?),
        };
        let user_store: Arc<dyn UserStore> = match user_store {
            Some(store) => store,
            None => Arc::new(FileUserStore::new(config.storage.user_profile_path.clone())),
        };

        let coordinator = Arc::new(RefreshCoordinator::new(
            Arc::new(transport),
            Arc::clone(&token_store),
            RefreshPolicy::from(&config.api),
        ));
        let session = SessionManager::new(Arc::clone(&coordinator), token_store, user_store);
        session.attach();

        let restored = session.hydrate().await.map_err(IgniteError::from)?;

        info!(base_url = %config.api.base_url, restored, "client context ready");

        let api = ApiClient::new(Arc::clone(&coordinator));
        Ok(ClientContext { config, coordinator, session, api })
    }
}

impl std::fmt::Debug for ClientContextBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientContextBuilder")
            .field("base_url", &self.config.api.base_url)
            .field("init_logging", &self.init_logging)
            .field("custom_token_store", &self.token_store.is_some())
            .field("custom_user_store", &self.user_store.is_some())
            .finish()
    }
}
