use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{
    net::TcpListener,
    sync::{watch, RwLock},
};
use tracing::{debug, info};
use uuid::Uuid;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_WATCH_TIMEOUT: Duration = Duration::from_secs(25);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    pub description: String,
    pub due_date: String,
    pub status: String,
    pub order: i64,
    pub created_at: i64,
}

pub const ON_PROGRESS: &str = "onProgress";
pub const COMPLETED: &str = "Completed";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoFields {
    pub text: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
}

#[derive(Deserialize)]
pub struct OrderUpdate {
    pub id: Uuid,
    pub order: i64,
}

#[derive(Deserialize)]
pub struct ReorderTodos {
    pub updates: Vec<OrderUpdate>,
}

#[derive(Deserialize)]
pub struct WatchParams {
    pub after: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u64,
    pub todos: Vec<Todo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Deleted {
    pub deleted: usize,
}

/// Environment-driven server settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub watch_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            watch_timeout: DEFAULT_WATCH_TIMEOUT,
        }
    }
}

impl ServerConfig {
    /// Read `PORT` and `WATCH_TIMEOUT_SECS`; unset or unparsable values
    /// keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let port = lookup("PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.port);
        let watch_timeout = lookup("WATCH_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.watch_timeout);
        Self { port, watch_timeout }
    }
}

/// The persisted collection plus a version bumped on every commit.
#[derive(Debug, Default)]
pub struct Collection {
    todos: HashMap<Uuid, Todo>,
    version: u64,
    last_created: i64,
}

impl Collection {
    /// All todos ascending by `order`, ties by creation time then id.
    pub fn sorted(&self) -> Vec<Todo> {
        let mut todos: Vec<Todo> = self.todos.values().cloned().collect();
        todos.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        todos
    }

    fn next_created_at(&mut self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        self.last_created = now.max(self.last_created + 1);
        self.last_created
    }
}

pub type Db = Arc<RwLock<Collection>>;

#[derive(Clone)]
pub struct AppState {
    db: Db,
    changes: Arc<watch::Sender<u64>>,
    watch_timeout: Duration,
}

impl AppState {
    fn new(watch_timeout: Duration) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            db: Arc::new(RwLock::new(Collection::default())),
            changes: Arc::new(changes),
            watch_timeout,
        }
    }

    /// Bump the version while the write lock is still held, so a watcher
    /// woken by the bump reads the committed state.
    fn commit(&self, collection: &mut Collection) {
        collection.version += 1;
        self.changes.send_replace(collection.version);
    }
}

pub fn app() -> Router {
    app_with(&ServerConfig::default())
}

pub fn app_with(config: &ServerConfig) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/watch", get(watch_todos))
        .route("/todos/order", put(reorder_todos))
        .route("/todos/completed", delete(delete_completed))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
        .route("/todos/{id}/toggle", post(toggle_todo))
        .with_state(AppState::new(config.watch_timeout))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, &ServerConfig::default()).await
}

pub async fn run_with(listener: TcpListener, config: &ServerConfig) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, watch_timeout = ?config.watch_timeout, "mock store serving");
    }
    axum::serve(listener, app_with(config)).await
}

async fn list_todos(State(state): State<AppState>) -> Json<Vec<Todo>> {
    Json(state.db.read().await.sorted())
}

/// Long-poll: answer once the version passes `after`, or at the timeout
/// with the unchanged snapshot.
async fn watch_todos(State(state): State<AppState>, Query(params): Query<WatchParams>) -> Json<Snapshot> {
    if let Some(after) = params.after {
        let mut rx = state.changes.subscribe();
        let woke = tokio::time::timeout(state.watch_timeout, rx.wait_for(|v| *v > after))
            .await
            .is_ok_and(|r| r.is_ok());
        debug!(after, woke, "watch released");
    }
    let collection = state.db.read().await;
    Json(Snapshot {
        version: collection.version,
        todos: collection.sorted(),
    })
}

async fn create_todo(State(state): State<AppState>, Json(input): Json<TodoFields>) -> (StatusCode, Json<Created>) {
    let mut collection = state.db.write().await;
    let order = collection.todos.values().map(|t| t.order).max().map_or(0, |max| max + 1);
    let todo = Todo {
        id: Uuid::new_v4(),
        text: input.text,
        description: input.description.unwrap_or_default(),
        due_date: input.due_date.unwrap_or_default(),
        status: ON_PROGRESS.to_string(),
        order,
        created_at: collection.next_created_at(),
    };
    let id = todo.id;
    collection.todos.insert(id, todo);
    state.commit(&mut collection);
    debug!(%id, order, "todo created");
    (StatusCode::CREATED, Json(Created { id }))
}

async fn toggle_todo(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Todo>, StatusCode> {
    let mut collection = state.db.write().await;
    let todo = collection.todos.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    let next = if todo.status == ON_PROGRESS { COMPLETED } else { ON_PROGRESS };
    todo.status = next.to_string();
    let todo = todo.clone();
    state.commit(&mut collection);
    Ok(Json(todo))
}

async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<TodoFields>,
) -> Result<Json<Todo>, StatusCode> {
    let mut collection = state.db.write().await;
    let todo = collection.todos.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    todo.text = input.text;
    todo.description = input.description.unwrap_or_default();
    todo.due_date = input.due_date.unwrap_or_default();
    let todo = todo.clone();
    state.commit(&mut collection);
    Ok(Json(todo))
}

async fn delete_todo(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, StatusCode> {
    let mut collection = state.db.write().await;
    collection.todos.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    state.commit(&mut collection);
    Ok(StatusCode::NO_CONTENT)
}

/// The whole batch is checked before any of it is applied, and published as
/// a single version.
async fn reorder_todos(State(state): State<AppState>, Json(input): Json<ReorderTodos>) -> StatusCode {
    let mut collection = state.db.write().await;
    if input.updates.iter().any(|u| !collection.todos.contains_key(&u.id)) {
        return StatusCode::NOT_FOUND;
    }
    for update in &input.updates {
        if let Some(todo) = collection.todos.get_mut(&update.id) {
            todo.order = update.order;
        }
    }
    state.commit(&mut collection);
    debug!(batch = input.updates.len(), "todos reordered");
    StatusCode::NO_CONTENT
}

async fn delete_completed(State(state): State<AppState>) -> Json<Deleted> {
    let mut collection = state.db.write().await;
    let before = collection.todos.len();
    collection.todos.retain(|_, todo| todo.status != COMPLETED);
    let deleted = before - collection.todos.len();
    state.commit(&mut collection);
    Json(Deleted { deleted })
}
