//! Error types for the todo store client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers treat "the todo is
//! already gone" as satisfied rather than fatal. All other non-2xx responses
//! land in `HttpError` with the raw status code and body for debugging.
//! Input validation failures are a separate type: they never reach the store.

use thiserror::Error;

/// Errors returned by `TodoClient` parse methods and `TodoStore` calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The store returned 404: the todo does not exist.
    #[error("resource not found")]
    NotFound,

    /// The store returned a status other than the expected one.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The host transport could not complete the round-trip.
    #[error("transport failed: {0}")]
    Transport(String),
}

/// Rejected form input. Raised before any store call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("a todo needs a title or a description")]
    EmptyTodo,
}
