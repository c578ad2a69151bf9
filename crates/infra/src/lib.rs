//! # Ignite Gym Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - reqwest HTTP transport with retry and timeouts
//! - Keychain token store, JSON-file user store, in-memory stores
//! - Configuration loading (environment, JSON, TOML)
//! - Typed JSON API client and the `ClientContext` composition root
//!
//! ## Architecture
//! - Implements traits defined in `ignitegym-core`
//! - Depends on `ignitegym-common`, `ignitegym-domain` and `ignitegym-core`
//! - Contains all "impure" code (network, keychain, filesystem)

pub mod api;
pub mod config;
pub mod context;
pub mod errors;
pub mod http;
pub mod storage;

// Re-export commonly used items
pub use api::ApiClient;
pub use context::{ClientContext, ClientContextBuilder};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use storage::{FileUserStore, KeychainTokenStore, MemoryTokenStore, MemoryUserStore};
