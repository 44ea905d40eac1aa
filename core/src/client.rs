//! Stateless HTTP request builder and response parser for the todo store.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each store function is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The host executes the actual HTTP round-trip, keeping the core
//! deterministic and free of I/O dependencies.

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Created, Deleted, NewTodo, OrderUpdate, ReorderTodos, Snapshot, Todo, TodoEdit};

/// Synchronous, stateless client for the todo store's HTTP surface.
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

    pub fn build_list_todos(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, "/todos".to_string())
    }

    /// Long-poll for the next snapshot. With `after = None` the store answers
    /// immediately; otherwise it holds the request until its version moves
    /// past `after` or its watch timeout elapses.
    pub fn build_watch_todos(&self, after: Option<u64>) -> HttpRequest {
        let path = match after {
            Some(version) => format!("/todos/watch?after={version}"),
            None => "/todos/watch".to_string(),
        };
        self.bare(HttpMethod::Get, path)
    }

    pub fn build_create_todo(&self, input: &NewTodo) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, "/todos".to_string(), input)
    }

    pub fn build_toggle_todo(&self, id: Uuid) -> HttpRequest {
        self.bare(HttpMethod::Post, format!("/todos/{id}/toggle"))
    }

    pub fn build_update_todo(&self, id: Uuid, input: &TodoEdit) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Put, format!("/todos/{id}"), input)
    }

    pub fn build_delete_todo(&self, id: Uuid) -> HttpRequest {
        self.bare(HttpMethod::Delete, format!("/todos/{id}"))
    }

    pub fn build_reorder_todos(&self, updates: &[OrderUpdate]) -> Result<HttpRequest, ApiError> {
        let input = ReorderTodos {
            updates: updates.to_vec(),
        };
        self.json(HttpMethod::Put, "/todos/order".to_string(), &input)
    }

    pub fn build_delete_completed(&self) -> HttpRequest {
        self.bare(HttpMethod::Delete, "/todos/completed".to_string())
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        decode(&response, 200)
    }

    pub fn parse_watch_todos(&self, response: HttpResponse) -> Result<Snapshot, ApiError> {
        decode(&response, 200)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Uuid, ApiError> {
        decode::<Created>(&response, 201).map(|created| created.id)
    }

    pub fn parse_toggle_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        decode(&response, 200)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        decode(&response, 200)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    pub fn parse_reorder_todos(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    pub fn parse_delete_completed(&self, response: HttpResponse) -> Result<usize, ApiError> {
        decode::<Deleted>(&response, 200).map(|deleted| deleted.deleted)
    }

    fn bare(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn json<T: Serialize>(&self, method: HttpMethod, path: String, input: &T) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
