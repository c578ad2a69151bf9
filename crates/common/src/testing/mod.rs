//! Testing utilities and helpers
//!
//! - **[`async_utils`]**: Async test utilities for fire-and-forget side
//!   effects (eventual assertions, polling, bounded waits)

pub mod async_utils;

// Note: Macros exported with #[macro_export] are available at crate root
pub use async_utils::{poll_until, timeout_ok};
