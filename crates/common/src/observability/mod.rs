//! Observability bootstrap
//!
//! Everything in the workspace logs through `tracing` macros with structured
//! fields; this module installs the subscriber that renders them.

pub mod logging;

pub use logging::{init_logging, LoggingInitError};
