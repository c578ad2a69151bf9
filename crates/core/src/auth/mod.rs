//! Authenticated access: classification, token refresh and session ports

pub mod classify;
pub mod coordinator;
pub mod errors;
pub mod header;
pub mod listeners;
pub mod pending;
pub mod ports;

pub use classify::{classify, RefreshableCode, ResponseClass};
pub use coordinator::{RefreshCoordinator, RefreshPolicy};
pub use errors::{ApiError, ApiErrorCategory, RefreshFailure};
pub use header::{AuthorizationHeader, HeaderGuard};
pub use listeners::{ListenerRegistration, ListenerRegistry};
pub use pending::{PendingQueue, PendingRequest, RefreshOutcome};
pub use ports::{SessionListener, TokenStore, UserStore};
