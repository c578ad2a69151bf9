//! Security primitives
//!
//! - **[`keychain`]**: Generic secret storage via the platform keychain
//!   (macOS Keychain, Windows Credential Manager, Linux Secret Service)

pub mod keychain;

pub use keychain::{KeychainEntry, KeychainError, KeychainProvider};
