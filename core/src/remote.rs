//! [`TodoStore`] over the store's HTTP surface.
//!
//! # Design
//! `RemoteStore` never opens a socket. Every call goes through
//! [`TodoClient`] to build a request, through the host's [`Transport`] to
//! execute it, and back through `TodoClient` to parse the response.
//!
//! The live query is a long-poll loop running on the tokio runtime. It is
//! started by the first `subscribe` and ends when every subscription has been
//! dropped or when the store fails. A failure is published as
//! [`Feed::Failed`]; the loop does not retry on its own. Subscribing again
//! after a failure starts a fresh loop.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::store::{Feed, Subscription, TodoStore};
use crate::types::{sort_canonical, NewTodo, OrderUpdate, TodoEdit};

/// Executes one HTTP round-trip on behalf of the core.
///
/// Non-2xx statuses must be returned as data, not as `Err`; only failures to
/// complete the exchange at all map to [`ApiError::Transport`].
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// A todo store reached through a host transport.
pub struct RemoteStore<T> {
    client: TodoClient,
    transport: Arc<T>,
    feed: Arc<watch::Sender<Feed>>,
    watching: Arc<Mutex<bool>>,
}

impl<T: Transport> RemoteStore<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        let (feed, _) = watch::channel(Feed::Loading);
        Self {
            client,
            transport: Arc::new(transport),
            feed: Arc::new(feed),
            watching: Arc::new(Mutex::new(false)),
        }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    async fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), path = %request.path, "store request");
        self.transport.execute(request).await
    }

    fn start_watcher(&self) {
        let mut watching = lock(&self.watching);
        if *watching {
            return;
        }
        *watching = true;
        if matches!(*self.feed.borrow(), Feed::Failed(_)) {
            self.feed.send_replace(Feed::Loading);
        }
        let client = self.client.clone();
        let transport = Arc::clone(&self.transport);
        let feed = Arc::clone(&self.feed);
        let flag = Arc::clone(&self.watching);
        tokio::spawn(async move {
            watch_loop(&client, transport.as_ref(), &feed, &flag).await;
        });
    }
}

fn lock(flag: &Mutex<bool>) -> MutexGuard<'_, bool> {
    flag.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs until every subscription is gone or the store fails.
///
/// `watching` is cleared in the same critical section that publishes the
/// final state, so a `subscribe` racing the exit either keeps this loop
/// alive or starts a new one.
async fn watch_loop<T: Transport>(
    client: &TodoClient,
    transport: &T,
    feed: &watch::Sender<Feed>,
    watching: &Mutex<bool>,
) {
    let mut after = None;
    loop {
        {
            let mut running = lock(watching);
            if feed.is_closed() {
                *running = false;
                debug!("all subscribers gone, watch stopped");
                return;
            }
        }
        let result = match transport.execute(client.build_watch_todos(after)).await {
            Ok(response) => client.parse_watch_todos(response),
            Err(e) => Err(e),
        };
        match result {
            Ok(snapshot) => {
                if after == Some(snapshot.version) {
                    continue;
                }
                debug!(version = snapshot.version, todos = snapshot.todos.len(), "snapshot received");
                after = Some(snapshot.version);
                let mut todos = snapshot.todos;
                sort_canonical(&mut todos);
                feed.send_replace(Feed::Ready(Arc::new(todos)));
            }
            Err(e) => {
                warn!(error = %e, "store watch failed");
                let mut running = lock(watching);
                *running = false;
                feed.send_replace(Feed::Failed(e.to_string()));
                return;
            }
        }
    }
}

#[async_trait]
impl<T: Transport> TodoStore for RemoteStore<T> {
    /// Must be called from within a tokio runtime.
    fn subscribe(&self) -> Subscription {
        let subscription = Subscription::new(self.feed.subscribe());
        self.start_watcher();
        subscription
    }

    async fn create(&self, todo: NewTodo) -> Result<Uuid, ApiError> {
        let request = self.client.build_create_todo(&todo)?;
        let response = self.round_trip(request).await?;
        self.client.parse_create_todo(response)
    }

    async fn toggle(&self, id: Uuid) -> Result<(), ApiError> {
        let response = self.round_trip(self.client.build_toggle_todo(id)).await?;
        self.client.parse_toggle_todo(response).map(|_| ())
    }

    async fn remove(&self, id: Uuid) -> Result<(), ApiError> {
        let response = self.round_trip(self.client.build_delete_todo(id)).await?;
        self.client.parse_delete_todo(response)
    }

    async fn update(&self, id: Uuid, edit: TodoEdit) -> Result<(), ApiError> {
        let request = self.client.build_update_todo(id, &edit)?;
        let response = self.round_trip(request).await?;
        self.client.parse_update_todo(response).map(|_| ())
    }

    async fn reorder(&self, updates: Vec<OrderUpdate>) -> Result<(), ApiError> {
        let request = self.client.build_reorder_todos(&updates)?;
        let response = self.round_trip(request).await?;
        self.client.parse_reorder_todos(response)
    }

    async fn remove_completed(&self) -> Result<usize, ApiError> {
        let response = self.round_trip(self.client.build_delete_completed()).await?;
        self.client.parse_delete_completed(response)
    }
}
