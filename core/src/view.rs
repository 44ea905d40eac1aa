//! Filtering and the derived list view model.
//!
//! The filter pipeline is a pure function of the canonical list, the status
//! filter and the search query. Everything the list screen shows (rows,
//! search banner, empty-state text, remaining count) is derived here so the
//! UI layer only has to lay it out.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::types::{Status, Todo};

const TITLE_LIMIT: usize = 50;
const DESCRIPTION_LIMIT: usize = 80;

/// Status filter selected in the filter bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const OPTIONS: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }

    pub fn admits(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => todo.status == Status::OnProgress,
            Filter::Completed => todo.status == Status::Completed,
        }
    }
}

/// Colour scheme of the app chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Trimmed, lower-cased search needle. Empty means "no search".
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Apply the status filter, then the search filter. Both must pass.
pub fn filter_todos<'a>(todos: &'a [Todo], filter: Filter, query: &str) -> Vec<&'a Todo> {
    let needle = normalize_query(query);
    todos
        .iter()
        .filter(|todo| filter.admits(todo))
        .filter(|todo| needle.is_empty() || todo.matches_query(&needle))
        .collect()
}

/// Cut `text` to at most `limit` characters, marking the cut with `...`.
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Human-readable due date, e.g. `Mar 5, 2026`. Strings that are not
/// `YYYY-MM-DD` dates are shown as entered.
pub fn due_label(due_date: &str) -> Option<String> {
    let due_date = due_date.trim();
    if due_date.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(due_date, "%Y-%m-%d") {
        Ok(date) => Some(date.format("%b %-d, %Y").to_string()),
        Err(_) => Some(due_date.to_string()),
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// One rendered line of the todo list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due: Option<String>,
    pub completed: bool,
}

impl Row {
    fn from_todo(todo: &Todo) -> Self {
        Self {
            id: todo.id,
            title: truncate(&todo.text, TITLE_LIMIT),
            description: (!todo.description.is_empty()).then(|| truncate(&todo.description, DESCRIPTION_LIMIT)),
            due: due_label(&todo.due_date),
            completed: todo.is_completed(),
        }
    }
}

/// Everything the list screen needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub rows: Vec<Row>,
    /// Search summary, present only while a search query is active.
    pub banner: Option<String>,
    /// Shown instead of rows when nothing passes the filters.
    pub empty_message: Option<&'static str>,
    pub items_left: String,
}

impl ListView {
    pub fn build(todos: &[Todo], filter: Filter, query: &str) -> Self {
        let visible = filter_todos(todos, filter, query);
        let searching = !normalize_query(query).is_empty();

        let banner = searching.then(|| {
            if visible.is_empty() {
                format!("No results for \"{query}\"")
            } else {
                format!("Showing {} for \"{query}\"", plural(visible.len(), "result", "results"))
            }
        });
        let empty_message = visible.is_empty().then_some(if searching {
            "Try a different search term."
        } else {
            "No todos available."
        });
        let active = todos.iter().filter(|t| !t.is_completed()).count();

        Self {
            rows: visible.into_iter().map(Row::from_todo).collect(),
            banner,
            empty_message,
            items_left: format!("{} left", plural(active, "item", "items")),
        }
    }
}
