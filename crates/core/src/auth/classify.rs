//! Response classification
//!
//! Each intercepted response is classified exactly once; the coordinator then
//! acts on the resulting [`ResponseClass`].

use ignitegym_domain::impl_wire_code_conversions;
use ignitegym_domain::ApiErrorBody;

use super::errors::ApiError;
use crate::http::ApiResponse;

/// 401 codes that a token refresh can fix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshableCode {
    Expired,
    Invalid,
}

impl_wire_code_conversions!(RefreshableCode {
    Expired => "token.expired",
    Invalid => "token.invalid",
});

/// Outcome of classifying one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseClass {
    /// Below 400, returned unchanged
    Success,
    /// Error status other than 401
    Failure { message: Option<String> },
    /// 401 that no refresh can fix
    Unauthorized { message: Option<String> },
    /// 401 carrying `token.expired` or `token.invalid`
    Refreshable(RefreshableCode),
}

/// Classify a response by status and error body.
pub fn classify(response: &ApiResponse) -> ResponseClass {
    if response.is_success() {
        return ResponseClass::Success;
    }

    let message = ApiErrorBody::parse(&response.body).and_then(|body| body.message);

    if response.status != 401 {
        return ResponseClass::Failure { message };
    }

    match message.as_deref().map(str::parse::<RefreshableCode>) {
        Some(Ok(code)) => ResponseClass::Refreshable(code),
        _ => ResponseClass::Unauthorized { message },
    }
}

/// The response as an error, with no interpretation of its body.
pub(crate) fn raw_error(response: &ApiResponse) -> ApiError {
    ApiError::Status { status: response.status, body: response.text() }
}

/// Error for a failure that will not be retried: the server's message when
/// the body has one, the raw response otherwise.
pub(crate) fn rejection(response: &ApiResponse, message: Option<String>) -> ApiError {
    match message {
        Some(message) => ApiError::Authentication { status: response.status, message },
        None => raw_error(response),
    }
}
