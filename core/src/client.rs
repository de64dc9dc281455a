//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! `ApiClient` glues the two halves together around a `Transport`; callers
//! that run their own I/O can use this type directly.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ErrorBody, Todo, TodoList};

/// Synchronous, stateless request builder for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve `path` against the base URL. Paths are appended, so a base
    /// URL with a path prefix keeps it.
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Build a request without a body.
    pub fn build(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            url: self.resolve(path),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Build a request carrying `body` as JSON.
    pub fn build_json<T: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            url: self.resolve(path),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    /// `GET /todos`, with `?q=` when a query is given (even an empty one).
    pub fn build_list_todos(&self, query: Option<&str>) -> HttpRequest {
        let path = match query {
            Some(q) => {
                let encoded = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("q", q)
                    .finish();
                format!("/todos?{encoded}")
            }
            None => "/todos".to_string(),
        };
        self.build(HttpMethod::Get, &path)
    }

    pub fn build_create_todo(&self, draft: &Todo) -> Result<HttpRequest, ApiError> {
        self.build_json(HttpMethod::Post, "/todo", draft)
    }

    /// `PUT /todo/{id}` with the full todo as body.
    pub fn build_update_todo(&self, todo: &Todo) -> Result<HttpRequest, ApiError> {
        self.build_json(HttpMethod::Put, &format!("/todo/{}", todo.id), todo)
    }

    pub fn build_delete_todo(&self, id: &str) -> HttpRequest {
        self.build(HttpMethod::Delete, &format!("/todo/{id}"))
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        let list: TodoList = parse_json(&response)?;
        Ok(list.data)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(&response)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(&response)
    }

    /// The acknowledgement body as loose JSON; an empty body becomes `Null`.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<serde_json::Value, ApiError> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}

fn parse_json<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    check_status(response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map a non-2xx response to `ApiError::Server`.
///
/// The message is the body's `error` field; bodies without one fall back to
/// their raw text.
pub fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let message = match serde_json::from_str::<ErrorBody>(&response.body) {
        Ok(body) => body.error,
        Err(_) => response.body.trim().to_string(),
    };
    Err(ApiError::Server {
        status: response.status,
        message,
    })
}
