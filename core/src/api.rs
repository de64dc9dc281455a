//! Async client issuing requests against the configured upstream.
//!
//! # Design
//! `ApiClient` combines the stateless `TodoClient` builder, a `Transport` and
//! the `ResponseInterceptor`. The blocking round trip runs on tokio's
//! blocking pool so awaiting a call never stalls the caller's runtime. Every
//! call is attempted exactly once.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::client::TodoClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::interceptor::{Notifier, ResponseInterceptor, TracingNotifier};
use crate::transport::{Transport, UreqTransport};
use crate::types::Todo;

static GLOBAL: OnceCell<ApiClient> = OnceCell::new();

#[derive(Clone)]
pub struct ApiClient {
    requests: TodoClient,
    transport: Arc<dyn Transport>,
    interceptor: ResponseInterceptor,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, transport: Arc<dyn Transport>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            requests: TodoClient::new(&config.base_url),
            transport,
            interceptor: ResponseInterceptor::new(notifier),
        }
    }

    /// ureq transport and tracing notifications, base URL from the
    /// environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = ClientConfig::load()?;
        Ok(Self::new(&config, Arc::new(UreqTransport::new()), Arc::new(TracingNotifier)))
    }

    /// Process-wide client, built by [`ApiClient::from_env`] on first use.
    pub fn global() -> Result<&'static ApiClient, ConfigError> {
        GLOBAL.get_or_try_init(Self::from_env)
    }

    pub fn base_url(&self) -> &str {
        self.requests.base_url()
    }

    /// The request builder bound to this client's base URL.
    pub fn requests(&self) -> &TodoClient {
        &self.requests
    }

    /// Execute `request` and pass the outcome through the interceptor.
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = %request.method, url = %request.url, "issuing request");
        let transport = Arc::clone(&self.transport);
        let outcome = match tokio::task::spawn_blocking(move || transport.execute(&request)).await {
            Ok(outcome) => outcome,
            Err(join) => Err(TransportError::Aborted(join.to_string())),
        };
        self.interceptor.intercept(outcome)
    }

    pub async fn list_todos(&self, query: Option<&str>) -> Result<Vec<Todo>, ApiError> {
        let response = self.send(self.requests.build_list_todos(query)).await?;
        self.requests.parse_list_todos(response)
    }

    pub async fn create_todo(&self, draft: &Todo) -> Result<Todo, ApiError> {
        let response = self.send(self.requests.build_create_todo(draft)?).await?;
        self.requests.parse_create_todo(response)
    }

    pub async fn update_todo(&self, todo: &Todo) -> Result<Todo, ApiError> {
        let response = self.send(self.requests.build_update_todo(todo)?).await?;
        self.requests.parse_update_todo(response)
    }

    pub async fn delete_todo(&self, id: &str) -> Result<serde_json::Value, ApiError> {
        let response = self.send(self.requests.build_delete_todo(id)).await?;
        self.requests.parse_delete_todo(response)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use parking_lot::Mutex;

    /// Answers every request with a fixed response and records what it saw.
    struct Canned {
        response: HttpResponse,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Transport for Canned {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.lock().push(request.clone());
            Ok(self.response.clone())
        }
    }

    fn client_with(response: HttpResponse) -> (ApiClient, Arc<Canned>, Arc<Mutex<Vec<String>>>) {
        let transport = Arc::new(Canned {
            response,
            seen: Mutex::new(Vec::new()),
        });
        let notes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&notes);
        let config = ClientConfig::new("http://todo.test/api").unwrap();
        let client = ApiClient::new(
            &config,
            transport.clone(),
            Arc::new(move |m: &str| sink.lock().push(m.to_string())),
        );
        (client, transport, notes)
    }

    #[tokio::test]
    async fn requests_resolve_against_configured_base() {
        let (client, transport, _) = client_with(HttpResponse::new(200, r#"{"data":[]}"#));
        client.list_todos(Some("milk")).await.unwrap();
        client.delete_todo("42").await.unwrap();

        let seen = transport.seen.lock();
        assert_eq!(seen[0].url, "http://todo.test/api/todos?q=milk");
        assert_eq!(seen[1].method, HttpMethod::Delete);
        assert_eq!(seen[1].url, "http://todo.test/api/todo/42");
    }

    #[tokio::test]
    async fn server_error_is_notified_once_and_returned() {
        let (client, transport, notes) =
            client_with(HttpResponse::new(500, r#"{"error":"database unavailable"}"#));
        let err = client.create_todo(&Todo::draft("x")).await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(*notes.lock(), vec!["Error: 500 - database unavailable".to_string()]);
        assert_eq!(transport.seen.lock().len(), 1);
    }

    #[test]
    fn global_client_is_built_once_from_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("TODO_API_BASE_URL", "http://global.test/");
            let first = ApiClient::global().map_err(|e| e.to_string())?;
            assert_eq!(first.base_url(), "http://global.test");

            jail.set_env("TODO_API_BASE_URL", "http://other.test");
            let second = ApiClient::global().map_err(|e| e.to_string())?;
            assert!(std::ptr::eq(first, second));
            Ok(())
        });
    }

    #[tokio::test]
    async fn success_response_is_returned_unchanged() {
        let response = HttpResponse::new(200, r#"{"anything":true}"#);
        let (client, _, notes) = client_with(response.clone());
        let request = client.requests().build(HttpMethod::Get, "/health");
        let out = client.send(request).await.unwrap();

        assert_eq!(out, response);
        assert!(notes.lock().is_empty());
    }
}
