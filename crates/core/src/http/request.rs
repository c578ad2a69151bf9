//! Request and response values exchanged with an [`HttpTransport`]
//!
//! [`HttpTransport`]: super::HttpTransport

use std::collections::BTreeMap;
use std::fmt;

use ignitegym_domain::constants::{AUTHORIZATION_HEADER, BEARER_PREFIX};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::ApiError;

/// HTTP verbs used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outgoing request
///
/// `path` is relative to the API base URL. Header names are matched
/// case-insensitively.
#[derive(Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), headers: BTreeMap::new(), body: None }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    /// Returns `ApiError::Serialization` if `body` cannot be encoded
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::Serialization(format!("Failed to serialize body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Insert or replace a header, whatever the case of the existing name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Rewrite the `Authorization` header to carry `token`.
    pub fn set_bearer(&mut self, token: &str) {
        self.set_header(AUTHORIZATION_HEADER, format!("{}{}", BEARER_PREFIX, token));
    }

    pub fn has_authorization(&self) -> bool {
        self.header(AUTHORIZATION_HEADER).is_some()
    }

    /// Token carried in the `Authorization` header, if it is a bearer token.
    pub fn bearer_token(&self) -> Option<&str> {
        self.header(AUTHORIZATION_HEADER)?.strip_prefix(BEARER_PREFIX)
    }
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Credentials stay out of logs.
        let headers: Vec<&str> = self.headers.keys().map(String::as_str).collect();
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("headers", &headers)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// Response as received from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, headers: BTreeMap::new(), body: body.into() }
    }

    /// Response with a JSON body.
    pub fn json_body(status: u16, body: &serde_json::Value) -> Self {
        let mut response = Self::new(status, body.to_string());
        response.headers.insert("content-type".to_string(), "application/json".to_string());
        response
    }

    /// Anything below 400 passes through interception untouched.
    pub fn is_success(&self) -> bool {
        self.status < 400
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    ///
    /// 204/205 and empty bodies decode from `null`, so `()` and `Option<T>`
    /// targets work for endpoints without content.
    ///
    /// # Errors
    /// Returns `ApiError::Serialization` if the body does not match `T`
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        if self.status == 204 || self.status == 205 || self.body.is_empty() {
            return serde_json::from_value(serde_json::Value::Null).map_err(|_| {
                ApiError::Serialization(format!(
                    "No content response ({}), but response type cannot be deserialized from empty body",
                    self.status
                ))
            });
        }

        serde_json::from_slice(&self.body)
            .map_err(|e| ApiError::Serialization(format!("Failed to parse response: {}", e)))
    }
}
