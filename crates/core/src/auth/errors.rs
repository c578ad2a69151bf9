//! Errors surfaced to API callers
//!
//! Every variant is `Clone`: one refresh failure is handed to every caller
//! that was waiting on it.

use std::time::Duration;

use ignitegym_domain::IgniteError;
use thiserror::Error;

use crate::http::TransportError;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Rejected credentials or a failed token refresh
    Authentication,
    /// 4xx other than authentication
    Client,
    /// 5xx
    Server,
    /// No response was received
    Network,
    /// Local failure: serialization, storage or configuration
    Local,
}

/// API operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was received. Passed through exactly as the transport
    /// reported it.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Error response whose body carried a human readable `message`
    #[error("{message}")]
    Authentication { status: u16, message: String },

    /// Error response without a usable `message`
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The token refresh this request depended on failed
    #[error("Token refresh failed: {0}")]
    Refresh(#[from] RefreshFailure),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Transport(_) => ApiErrorCategory::Network,
            Self::Refresh(_) => ApiErrorCategory::Authentication,
            Self::Authentication { status, .. } | Self::Status { status, .. } => {
                match *status {
                    401 | 403 => ApiErrorCategory::Authentication,
                    500..=599 => ApiErrorCategory::Server,
                    _ => ApiErrorCategory::Client,
                }
            }
            Self::Serialization(_) | Self::Storage(_) | Self::Config(_) => ApiErrorCategory::Local,
        }
    }

    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Refresh(RefreshFailure::Rejected { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for showing to the user.
    ///
    /// Only server supplied messages are shown; anything else yields
    /// `fallback`.
    pub fn display_message<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            Self::Authentication { message, .. } => message,
            Self::Refresh(RefreshFailure::Rejected { message: Some(message), .. }) => message,
            _ => fallback,
        }
    }
}

impl From<IgniteError> for ApiError {
    fn from(err: IgniteError) -> Self {
        match err {
            IgniteError::Network(msg) => Self::Transport(TransportError::Request(msg)),
            IgniteError::Serialization(msg) => Self::Serialization(msg),
            IgniteError::Config(msg) => Self::Config(msg),
            other => Self::Storage(other.to_string()),
        }
    }
}

impl From<ApiError> for IgniteError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Transport(inner) => Self::Network(inner.to_string()),
            ApiError::Serialization(msg) => Self::Serialization(msg),
            ApiError::Storage(msg) => Self::Storage(msg),
            ApiError::Config(msg) => Self::Config(msg),
            other => Self::Auth(other.to_string()),
        }
    }
}

/// Why a token refresh failed
///
/// Shared verbatim by the caller that triggered the refresh and by every
/// caller queued behind it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshFailure {
    #[error("refresh request failed: {0}")]
    Transport(TransportError),

    /// The refresh endpoint answered with an error status
    #[error("refresh rejected with status {status}")]
    Rejected { status: u16, message: Option<String> },

    /// The refresh endpoint answered 2xx without a token
    #[error("refresh response did not contain a token")]
    MissingToken,

    #[error("refresh did not complete within {0:?}")]
    Timeout(Duration),

    #[error("could not persist refreshed token: {0}")]
    Storage(String),

    /// A sign-in or sign-out happened while the refresh was in flight
    #[error("session changed while the token was being refreshed")]
    SessionEnded,

    /// The refreshing task was cancelled before it settled
    #[error("refresh was abandoned")]
    Abandoned,
}
