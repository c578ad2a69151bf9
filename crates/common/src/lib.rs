//! Common utilities shared across Ignite Gym crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `observability`: tracing subscriber bootstrap
//! - `platform`: platform keychain access
//! - `native-keychain`: back the keychain with the OS credential stores
//! - `test-utils`: async test helpers

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

#[cfg(feature = "observability")]
pub mod observability;

#[cfg(feature = "platform")]
pub mod security;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

#[cfg(feature = "observability")]
pub use observability::{init_logging, LoggingInitError};
#[cfg(feature = "platform")]
pub use security::{KeychainEntry, KeychainError, KeychainProvider};
