//! Conversions from external infrastructure errors into domain errors.

use ignitegym_common::KeychainError;
use ignitegym_core::TransportError;
use ignitegym_domain::IgniteError;
use keyring::Error as KeyringError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub IgniteError);

impl From<InfraError> for IgniteError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<IgniteError> for InfraError {
    fn from(value: IgniteError) -> Self {
        InfraError(value)
    }
}

trait IntoIgniteError {
    fn into_ignite(self) -> IgniteError;
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → IgniteError */
/* -------------------------------------------------------------------------- */

impl IntoIgniteError for KeyringError {
    fn into_ignite(self) -> IgniteError {
        use KeyringError::*;

        let description = self.to_string();

        match self {
            NoEntry => IgniteError::NotFound("keychain entry not found".into()),
            BadEncoding(_) => {
                IgniteError::Storage("credential in keychain is not valid UTF-8".into())
            }
            PlatformFailure(err) => IgniteError::Storage(format!("keychain platform error: {err}")),
            NoStorageAccess(err) => {
                IgniteError::Storage(format!("unable to access secure storage: {err}"))
            }
            _ => IgniteError::Storage(description),
        }
    }
}

impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        InfraError(value.into_ignite())
    }
}

impl IntoIgniteError for KeychainError {
    fn into_ignite(self) -> IgniteError {
        match self {
            KeychainError::NotFound => IgniteError::NotFound("keychain entry not found".into()),
            KeychainError::AccessFailed(message) => IgniteError::Storage(message),
        }
    }
}

impl From<KeychainError> for InfraError {
    fn from(value: KeychainError) -> Self {
        InfraError(value.into_ignite())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json / io → IgniteError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(IgniteError::Serialization(value.to_string()))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        let error = match value.kind() {
            std::io::ErrorKind::NotFound => IgniteError::NotFound(value.to_string()),
            _ => IgniteError::Storage(value.to_string()),
        };
        InfraError(error)
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → IgniteError / TransportError */
/* -------------------------------------------------------------------------- */

impl IntoIgniteError for HttpError {
    fn into_ignite(self) -> IgniteError {
        if self.is_builder() {
            return IgniteError::Config(format!("invalid HTTP client configuration: {self}"));
        }
        IgniteError::Network(transport_error(&self).to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_ignite())
    }
}

/// Classify a reqwest failure for the core transport port.
pub fn transport_error(err: &HttpError) -> TransportError {
    if err.is_timeout() {
        return TransportError::Timeout("HTTP request timed out".into());
    }

    #[cfg(not(target_arch = "wasm32"))]
    if err.is_connect() {
        return TransportError::Connect(format!("HTTP connection failure: {err}"));
    }

    if err.is_body() || err.is_decode() {
        return TransportError::Body(err.to_string());
    }

    TransportError::Request(err.to_string())
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::Client;

    use super::*;

    #[test]
    fn keyring_no_entry_maps_to_not_found() {
        let mapped: IgniteError = InfraError::from(KeyringError::NoEntry).into();
        match mapped {
            IgniteError::NotFound(msg) => assert!(msg.contains("keychain")),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[test]
    fn keychain_access_failure_maps_to_storage() {
        let err = KeychainError::AccessFailed("locked".to_string());
        let mapped: IgniteError = InfraError::from(err).into();
        assert_eq!(mapped, IgniteError::Storage("locked".to_string()));
    }

    #[test]
    fn io_not_found_keeps_kind() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let mapped: IgniteError = InfraError::from(err).into();
        assert!(matches!(mapped, IgniteError::NotFound(_)));

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let mapped: IgniteError = InfraError::from(denied).into();
        assert!(matches!(mapped, IgniteError::Storage(_)));
    }

    #[test]
    fn json_errors_map_to_serialization() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let mapped: IgniteError = InfraError::from(err).into();
        assert!(matches!(mapped, IgniteError::Serialization(_)));
    }

    #[tokio::test]
    async fn refused_connection_maps_to_connect() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::builder().no_proxy().build().unwrap();
        let err = client.get(format!("http://{}", addr)).send().await.unwrap_err();

        assert!(matches!(transport_error(&err), TransportError::Connect(_)));
        let mapped: IgniteError = InfraError::from(err).into();
        assert!(matches!(mapped, IgniteError::Network(_)));
    }
}
