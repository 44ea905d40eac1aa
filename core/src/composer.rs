//! The "create a new todo" form.

use crate::error::InputError;
use crate::types::NewTodo;

/// Buffer behind the create form. `show_details` expands the description
/// and due-date fields once the title field gains focus.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Composer {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub show_details: bool,
}

impl Composer {
    /// The search button is offered only while the form is collapsed and
    /// nothing has been typed.
    pub fn show_search_icon(&self) -> bool {
        !self.show_details && self.title.trim().is_empty()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Build the create payload and clear the form. The form is cleared even
    /// when the input is rejected.
    pub fn take(&mut self) -> Result<NewTodo, InputError> {
        let input = NewTodo::from_input(&self.title, &self.description, &self.due_date);
        self.reset();
        input
    }
}
