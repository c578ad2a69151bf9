//! # Ignite Gym Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - A transport-neutral request/response model and the `HttpTransport` port
//! - Storage and listener ports (`TokenStore`, `UserStore`,
//!   `SessionListener`)
//! - The `RefreshCoordinator`: response classification, single-flight token
//!   refresh, pending-request queue and replay
//! - The `SessionManager` façade used by the UI layer
//!
//! ## Architecture Principles
//! - Only depends on `ignitegym-domain`
//! - No reqwest, keychain, or filesystem code
//! - All external dependencies via traits

pub mod auth;
pub mod http;
pub mod session;

// Re-export specific items to avoid ambiguity
pub use auth::{
    classify, ApiError, ApiErrorCategory, AuthorizationHeader, ListenerRegistration,
    PendingQueue, PendingRequest, RefreshCoordinator, RefreshFailure, RefreshOutcome,
    RefreshPolicy, RefreshableCode, ResponseClass, SessionListener, TokenStore, UserStore,
};
pub use http::{ApiRequest, ApiResponse, HttpMethod, HttpTransport, TransportError};
pub use session::{SessionManager, SessionSnapshot};
