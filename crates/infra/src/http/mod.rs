//! reqwest implementation of the core HTTP transport

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
