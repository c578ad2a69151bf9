//! # Ignite Gym Domain
//!
//! Domain types shared by every Ignite Gym crate.
//!
//! This crate contains:
//! - Wire DTOs (user profile, sign-in and refresh payloads, API error body)
//! - Domain error type and Result definition
//! - Configuration structures
//! - Wire constants (endpoint paths, token error codes)
//!
//! ## Architecture
//! - No dependencies on other Ignite Gym crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
