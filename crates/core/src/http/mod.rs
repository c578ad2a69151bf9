//! Transport-neutral HTTP model
//!
//! The core never talks to reqwest directly. Requests are described with
//! [`ApiRequest`] (path relative to the API base URL), answered with
//! [`ApiResponse`], and carried by an [`HttpTransport`] implementation from
//! the infrastructure layer.

pub mod ports;
pub mod request;

pub use ports::{HttpTransport, TransportError};
pub use request::{ApiRequest, ApiResponse, HttpMethod};
