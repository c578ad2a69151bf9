//! Port interface for the HTTP transport

use async_trait::async_trait;
use thiserror::Error;

use super::request::{ApiRequest, ApiResponse};

/// Failure to obtain any response from the server
///
/// HTTP error statuses are *not* transport errors: they arrive as an
/// [`ApiResponse`] and are classified by the refresh coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// Trait for sending requests to the Ignite Gym API
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a request exactly as described, headers included.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}
