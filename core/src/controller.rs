//! Main-screen state and the translation of user intents into store calls.
//!
//! # Design
//! The controller owns only ephemeral UI state: filter, search, theme, the
//! create form and the open detail view. The todo list itself is whatever
//! the last snapshot said; mutations never touch it locally; their effect
//! arrives with the next snapshot.
//!
//! The store is injected as an `Arc<S>` so several screens (or tests) can
//! share one connection without a process-wide singleton.
//!
//! `NotFound` from a mutation means another client got there first. It is
//! treated as satisfied and drops any selection that pointed at the todo.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::composer::Composer;
use crate::error::ApiError;
use crate::reorder::plan_reorder;
use crate::session::{DetailSession, Draft};
use crate::store::{Feed, Subscription, TodoStore};
use crate::types::Todo;
use crate::view::{filter_todos, Filter, ListView, Theme};

/// Health of the live query, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    Loading,
    Live,
    Failed(String),
}

pub struct TodoController<S: ?Sized> {
    store: Arc<S>,
    todos: Arc<Vec<Todo>>,
    connection: Connection,
    filter: Filter,
    search_query: String,
    show_search: bool,
    theme: Theme,
    composer: Composer,
    detail: Option<DetailSession>,
}

impl<S: TodoStore + ?Sized> TodoController<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            todos: Arc::new(Vec::new()),
            connection: Connection::Loading,
            filter: Filter::default(),
            search_query: String::new(),
            show_search: false,
            theme: Theme::default(),
            composer: Composer::default(),
            detail: None,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Subscribe to the store and apply whatever it already has.
    pub fn subscribe(&mut self) -> Subscription {
        let subscription = self.store.subscribe();
        self.apply(subscription.current());
        subscription
    }

    /// Wait for the next store change and apply it. Returns `false` once the
    /// store has gone away.
    pub async fn sync(&mut self, subscription: &mut Subscription) -> bool {
        match subscription.changed().await {
            Some(feed) => {
                self.apply(feed);
                true
            }
            None => false,
        }
    }

    /// Fold one feed state into the controller.
    ///
    /// A failure keeps the last known list on screen. A fresh snapshot
    /// re-resolves the open detail view by id and closes it if the todo is
    /// gone.
    pub fn apply(&mut self, feed: Feed) {
        match feed {
            Feed::Loading => self.connection = Connection::Loading,
            Feed::Failed(message) => {
                warn!(%message, "todo feed failed");
                self.connection = Connection::Failed(message);
            }
            Feed::Ready(todos) => {
                self.connection = Connection::Live;
                self.todos = todos;
                let Some(detail) = &mut self.detail else {
                    return;
                };
                let id = detail.id();
                match self.todos.iter().find(|t| t.id == id) {
                    Some(latest) => {
                        detail.refresh(latest);
                    }
                    None => {
                        debug!(%id, "selected todo disappeared, closing detail");
                        self.detail = None;
                    }
                }
            }
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn show_search(&self) -> bool {
        self.show_search
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn detail(&self) -> Option<&DetailSession> {
        self.detail.as_ref()
    }

    /// The displayed list: status filter, then search.
    pub fn visible(&self) -> Vec<&Todo> {
        filter_todos(&self.todos, self.filter, &self.search_query)
    }

    pub fn view(&self) -> ListView {
        ListView::build(&self.todos, self.filter, &self.search_query)
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.to_string();
    }

    /// Open the search bar, or close it and clear the query.
    pub fn toggle_search(&mut self) {
        if self.show_search {
            self.collapse_search();
        } else {
            self.show_search = true;
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    /// Composing and searching are mutually exclusive.
    fn collapse_search(&mut self) {
        self.show_search = false;
        self.search_query.clear();
    }

    pub fn focus_composer(&mut self) {
        self.composer.show_details = true;
        self.collapse_search();
    }

    pub fn set_title(&mut self, title: &str) {
        self.composer.title = title.to_string();
        if !title.trim().is_empty() {
            self.collapse_search();
        }
    }

    pub fn set_description(&mut self, description: &str) {
        self.composer.description = description.to_string();
    }

    pub fn set_due_date(&mut self, due_date: &str) {
        self.composer.due_date = due_date.to_string();
    }

    pub fn cancel_composer(&mut self) {
        self.composer.reset();
        self.collapse_search();
    }

    /// Create a todo from the form and clear it.
    ///
    /// Blank input makes no store call and returns `Ok(None)`.
    pub async fn submit(&mut self) -> Result<Option<Uuid>, ApiError> {
        let input = match self.composer.take() {
            Ok(input) => input,
            Err(e) => {
                debug!(error = %e, "create suppressed");
                return Ok(None);
            }
        };
        match self.store.create(input).await {
            Ok(id) => Ok(Some(id)),
            Err(e) => {
                warn!(error = %e, "create failed");
                Err(e)
            }
        }
    }

    pub async fn toggle(&mut self, id: Uuid) -> Result<(), ApiError> {
        let result = self.store.toggle(id).await;
        self.settle(id, "toggle", result)
    }

    /// Delete a todo. Closes the detail view if it was showing it.
    pub async fn remove(&mut self, id: Uuid) -> Result<(), ApiError> {
        let result = self.store.remove(id).await;
        self.settle(id, "remove", result)?;
        self.forget(id);
        Ok(())
    }

    pub async fn clear_completed(&mut self) -> Result<usize, ApiError> {
        self.store.remove_completed().await.inspect_err(|e| {
            warn!(error = %e, "clear completed failed");
        })
    }

    /// Drag the displayed item at `source` to `destination`.
    ///
    /// Returns whether a reorder batch was submitted.
    pub async fn drag(&mut self, source: usize, destination: usize) -> Result<bool, ApiError> {
        let visible: Vec<Uuid> = self.visible().into_iter().map(|t| t.id).collect();
        let Some(updates) = plan_reorder(&self.todos, &visible, source, destination) else {
            return Ok(false);
        };
        debug!(source, destination, batch = updates.len(), "submitting reorder");
        match self.store.reorder(updates).await {
            Ok(()) => Ok(true),
            Err(ApiError::NotFound) => {
                debug!("reorder raced with a delete, waiting for next snapshot");
                Ok(false)
            }
            Err(e) => {
                warn!(error = %e, "reorder failed");
                Err(e)
            }
        }
    }

    /// Open the detail view for a todo in the current list.
    pub fn open_detail(&mut self, id: Uuid) -> bool {
        match self.todos.iter().find(|t| t.id == id) {
            Some(todo) => {
                self.detail = Some(DetailSession::new(todo.clone()));
                true
            }
            None => false,
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn begin_edit(&mut self) {
        if let Some(detail) = &mut self.detail {
            detail.begin_edit();
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        self.detail.as_mut().and_then(DetailSession::draft_mut)
    }

    pub fn cancel_edit(&mut self) {
        if let Some(detail) = &mut self.detail {
            detail.cancel();
        }
    }

    /// Submit the open draft. Returns whether an update was sent; a blank
    /// draft is not sent and stays open.
    pub async fn save_edit(&mut self) -> Result<bool, ApiError> {
        let Some(detail) = &mut self.detail else {
            return Ok(false);
        };
        let id = detail.id();
        let edit = match detail.save() {
            Ok(Some(edit)) => edit,
            Ok(None) => return Ok(false),
            Err(e) => {
                debug!(%id, error = %e, "update suppressed");
                return Ok(false);
            }
        };
        let result = self.store.update(id, edit).await;
        self.settle(id, "update", result)?;
        Ok(true)
    }

    pub async fn toggle_selected(&mut self) -> Result<(), ApiError> {
        match self.detail.as_ref().map(DetailSession::id) {
            Some(id) => self.toggle(id).await,
            None => Ok(()),
        }
    }

    /// Delete the todo shown in the detail view and close it.
    pub async fn delete_selected(&mut self) -> Result<(), ApiError> {
        match self.detail.as_ref().map(DetailSession::id) {
            Some(id) => self.remove(id).await,
            None => Ok(()),
        }
    }

    fn forget(&mut self, id: Uuid) {
        if self.detail.as_ref().is_some_and(|d| d.id() == id) {
            self.detail = None;
        }
    }

    fn settle(&mut self, id: Uuid, action: &'static str, result: Result<(), ApiError>) -> Result<(), ApiError> {
        match result {
            Ok(()) => Ok(()),
            Err(ApiError::NotFound) => {
                debug!(%id, action, "todo already gone");
                self.forget(id);
                Ok(())
            }
            Err(e) => {
                warn!(%id, action, error = %e, "store call failed");
                Err(e)
            }
        }
    }
}
