//! Typed access to protected API endpoints

pub mod client;

pub use client::ApiClient;
