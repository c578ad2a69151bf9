//! Typed JSON API client
//!
//! Every call goes through the [`RefreshCoordinator`], so requests carry the
//! current bearer token and recover from expired sessions transparently.

use std::sync::Arc;

use ignitegym_core::{ApiError, ApiRequest, HttpMethod, RefreshCoordinator};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

/// JSON client for protected Ignite Gym endpoints
#[derive(Debug, Clone)]
pub struct ApiClient {
    coordinator: Arc<RefreshCoordinator>,
}

impl ApiClient {
    pub fn new(coordinator: Arc<RefreshCoordinator>) -> Self {
        Self { coordinator }
    }

    pub fn coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.coordinator
    }

    /// Execute a GET request
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be
    /// deserialized
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.call(ApiRequest::get(path)).await
    }

    /// Execute a POST request with a JSON body
    ///
    /// # Errors
    ///
    /// Returns error if the body cannot be serialized, the request fails or
    /// the response cannot be deserialized
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<T, R>(&self, path: &str, body: &T) -> Result<R, ApiError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.call(ApiRequest::post(path).with_json(body)?).await
    }

    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn put<T, R>(&self, path: &str, body: &T) -> Result<R, ApiError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.call(ApiRequest::put(path).with_json(body)?).await
    }

    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn patch<T, R>(&self, path: &str, body: &T) -> Result<R, ApiError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.call(ApiRequest::patch(path).with_json(body)?).await
    }

    /// Execute a DELETE request, discarding any response body
    #[instrument(skip(self), fields(path = %path))]
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.coordinator.execute(ApiRequest::new(HttpMethod::Delete, path)).await?;
        debug!(path = %path, "DELETE request successful");
        Ok(())
    }

    async fn call<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let method = request.method;
        let response = self.coordinator.execute(request).await?;
        debug!(%method, status = response.status, "request successful");
        response.json()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ignitegym_core::{RefreshPolicy, TokenStore};
    use serde::Deserialize;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::http::HttpClient;
    use crate::storage::MemoryTokenStore;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Exercise {
        id: String,
        name: String,
    }

    async fn client_for(server: &MockServer) -> ApiClient {
        let http = HttpClient::builder(server.uri()).build().expect("http client");
        let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::with_token("T1"));
        let coordinator = RefreshCoordinator::new(Arc::new(http), tokens, RefreshPolicy::default());
        coordinator.header().begin_session("T1").await;
        ApiClient::new(Arc::new(coordinator))
    }

    #[tokio::test]
    async fn get_decodes_json_with_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/exercises/1"))
            .and(header("Authorization", "Bearer T1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "1",
                "name": "Supino"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let exercise: Exercise = client.get("/exercises/1").await.expect("exercise");

        assert_eq!(exercise, Exercise { id: "1".into(), name: "Supino".into() });
    }

    #[tokio::test]
    async fn post_sends_json_and_accepts_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/history"))
            .and(body_json(json!({"exercise_id": "1"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let () = client.post("/history", &json!({"exercise_id": "1"})).await.expect("posted");
    }

    #[tokio::test]
    async fn error_status_surfaces_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"message": "Exercício não encontrado."})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.get::<Exercise>("/exercises/9").await.expect_err("not found");

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.display_message("fallback"), "Exercício não encontrado.");
    }

    #[tokio::test]
    async fn delete_ignores_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/history/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("deleted"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        client.delete("/history/1").await.expect("deleted");
    }
}
