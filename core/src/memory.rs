//! In-process implementation of [`TodoStore`].
//!
//! One write lock guards the collection for the whole of each mutation, and
//! the new snapshot is published before the lock is released. Readers
//! therefore never observe a half-applied reorder batch.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{watch, RwLock};
use uuid::Uuid;

use crate::error::ApiError;
use crate::store::{Feed, Subscription, TodoStore};
use crate::types::{sort_canonical, NewTodo, OrderUpdate, Status, Todo, TodoEdit};

#[derive(Debug, Default)]
struct Collection {
    todos: HashMap<Uuid, Todo>,
    last_created: i64,
}

impl Collection {
    fn sorted(&self) -> Vec<Todo> {
        let mut todos: Vec<Todo> = self.todos.values().cloned().collect();
        sort_canonical(&mut todos);
        todos
    }

    fn next_order(&self) -> i64 {
        self.todos.values().map(|t| t.order).max().map_or(0, |max| max + 1)
    }

    /// Wall-clock millis, bumped so creation times are strictly increasing.
    fn next_created_at(&mut self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        self.last_created = now.max(self.last_created + 1);
        self.last_created
    }
}

/// A todo store living entirely in memory.
#[derive(Debug)]
pub struct MemoryStore {
    collection: RwLock<Collection>,
    feed: watch::Sender<Feed>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_todos(Vec::new())
    }

    /// Seed the store with existing records.
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        let last_created = todos.iter().map(|t| t.created_at).max().unwrap_or(0);
        let collection = Collection {
            todos: todos.into_iter().map(|t| (t.id, t)).collect(),
            last_created,
        };
        let (feed, _) = watch::channel(Feed::Ready(Arc::new(collection.sorted())));
        Self {
            collection: RwLock::new(collection),
            feed,
        }
    }

    /// The current list in display order.
    pub async fn snapshot(&self) -> Vec<Todo> {
        self.collection.read().await.sorted()
    }

    fn publish(&self, collection: &Collection) {
        self.feed.send_replace(Feed::Ready(Arc::new(collection.sorted())));
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    fn subscribe(&self) -> Subscription {
        Subscription::new(self.feed.subscribe())
    }

    async fn create(&self, todo: NewTodo) -> Result<Uuid, ApiError> {
        let mut collection = self.collection.write().await;
        let record = Todo {
            id: Uuid::new_v4(),
            text: todo.text,
            description: todo.description.unwrap_or_default(),
            due_date: todo.due_date.unwrap_or_default(),
            status: Status::OnProgress,
            order: collection.next_order(),
            created_at: collection.next_created_at(),
        };
        let id = record.id;
        collection.todos.insert(id, record);
        self.publish(&collection);
        Ok(id)
    }

    async fn toggle(&self, id: Uuid) -> Result<(), ApiError> {
        let mut collection = self.collection.write().await;
        let todo = collection.todos.get_mut(&id).ok_or(ApiError::NotFound)?;
        todo.status = todo.status.toggled();
        self.publish(&collection);
        Ok(())
    }

    async fn remove(&self, id: Uuid) -> Result<(), ApiError> {
        let mut collection = self.collection.write().await;
        collection.todos.remove(&id).ok_or(ApiError::NotFound)?;
        self.publish(&collection);
        Ok(())
    }

    async fn update(&self, id: Uuid, edit: TodoEdit) -> Result<(), ApiError> {
        let mut collection = self.collection.write().await;
        let todo = collection.todos.get_mut(&id).ok_or(ApiError::NotFound)?;
        todo.text = edit.text;
        todo.description = edit.description.unwrap_or_default();
        todo.due_date = edit.due_date.unwrap_or_default();
        self.publish(&collection);
        Ok(())
    }

    async fn reorder(&self, updates: Vec<OrderUpdate>) -> Result<(), ApiError> {
        let mut collection = self.collection.write().await;
        if updates.iter().any(|u| !collection.todos.contains_key(&u.id)) {
            return Err(ApiError::NotFound);
        }
        for update in &updates {
            if let Some(todo) = collection.todos.get_mut(&update.id) {
                todo.order = update.order;
            }
        }
        self.publish(&collection);
        Ok(())
    }

    async fn remove_completed(&self) -> Result<usize, ApiError> {
        let mut collection = self.collection.write().await;
        let before = collection.todos.len();
        collection.todos.retain(|_, todo| !todo.is_completed());
        let removed = before - collection.todos.len();
        self.publish(&collection);
        Ok(removed)
    }
}
