//! Detail view of one selected todo, with a local edit buffer.

use uuid::Uuid;

use crate::error::InputError;
use crate::types::{Todo, TodoEdit};

/// Editable copy of a todo's text fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Draft {
    pub text: String,
    pub description: String,
    pub due_date: String,
}

impl Draft {
    fn of(todo: &Todo) -> Self {
        Self {
            text: todo.text.clone(),
            description: todo.description.clone(),
            due_date: todo.due_date.clone(),
        }
    }
}

/// The open detail view. Holds the latest canonical copy of the selected
/// todo and, while editing, a draft that store updates never overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSession {
    todo: Todo,
    draft: Option<Draft>,
}

impl DetailSession {
    pub fn new(todo: Todo) -> Self {
        Self { todo, draft: None }
    }

    pub fn id(&self) -> Uuid {
        self.todo.id
    }

    pub fn todo(&self) -> &Todo {
        &self.todo
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        self.draft.as_mut()
    }

    /// Enter edit mode, seeding the draft from the canonical values.
    /// Does nothing if already editing.
    pub fn begin_edit(&mut self) {
        if self.draft.is_none() {
            self.draft = Some(Draft::of(&self.todo));
        }
    }

    /// Leave edit mode and drop the draft.
    pub fn cancel(&mut self) {
        self.draft = None;
    }

    /// Turn the draft into an update payload and leave edit mode.
    ///
    /// Returns `Ok(None)` when not editing. A blank draft is rejected and
    /// edit mode is kept so the user can fix it.
    pub fn save(&mut self) -> Result<Option<TodoEdit>, InputError> {
        let Some(draft) = &self.draft else {
            return Ok(None);
        };
        let edit = TodoEdit::from_input(&draft.text, &draft.description, &draft.due_date)?;
        self.draft = None;
        Ok(Some(edit))
    }

    /// Replace the canonical copy if the store's version differs.
    /// Returns whether anything changed.
    pub fn refresh(&mut self, latest: &Todo) -> bool {
        if latest.id != self.todo.id || *latest == self.todo {
            return false;
        }
        self.todo = latest.clone();
        true
    }
}
