//! The store boundary: one live query plus six mutations.
//!
//! # Design
//! The store pushes whole-list snapshots; nothing here polls on a timer.
//! A [`Subscription`] wraps a `tokio::sync::watch` receiver, so a slow
//! reader only ever sees the latest snapshot and never a backlog. Dropping
//! every subscription lets the store stop its watcher.
//!
//! Mutations resolve when the store acknowledges them. Their effect shows up
//! in a later snapshot, never in the return value (apart from the id of a
//! created todo).

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use uuid::Uuid;

use crate::error::ApiError;
use crate::types::{NewTodo, OrderUpdate, Todo, TodoEdit};

/// State of the live todo query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feed {
    /// No snapshot has arrived yet.
    Loading,
    /// The full list, sorted ascending by `order`.
    Ready(Arc<Vec<Todo>>),
    /// The store became unreachable. The watcher has stopped.
    Failed(String),
}

/// Receiving end of the live todo query.
#[derive(Debug, Clone)]
pub struct Subscription {
    rx: watch::Receiver<Feed>,
}

impl Subscription {
    pub fn new(rx: watch::Receiver<Feed>) -> Self {
        Self { rx }
    }

    /// The most recent feed state, without waiting.
    pub fn current(&self) -> Feed {
        self.rx.borrow().clone()
    }

    /// Wait for the next change. Returns `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Feed> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

/// The hosted reactive store, seen from the client.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Subscribe to the live, ordered todo list.
    fn subscribe(&self) -> Subscription;

    /// Create a todo. The store assigns id, order, status and creation time.
    async fn create(&self, todo: NewTodo) -> Result<Uuid, ApiError>;

    /// Flip a todo between `onProgress` and `Completed`.
    async fn toggle(&self, id: Uuid) -> Result<(), ApiError>;

    async fn remove(&self, id: Uuid) -> Result<(), ApiError>;

    /// Overwrite text, description and due date. Status and order are kept.
    async fn update(&self, id: Uuid, edit: TodoEdit) -> Result<(), ApiError>;

    /// Apply a batch of absolute order assignments atomically: either every
    /// id exists and all are applied, or none is.
    async fn reorder(&self, updates: Vec<OrderUpdate>) -> Result<(), ApiError>;

    /// Delete every completed todo. Returns how many were removed.
    async fn remove_completed(&self) -> Result<usize, ApiError>;
}
