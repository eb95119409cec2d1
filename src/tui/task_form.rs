//! Task form handling for the terminal user interface.
//!
//! `TaskForm` holds the on-screen state (cursors, focused field) for the add
//! and edit screens and converts to and from the planner's `Draft`.

use crate::fields::Priority;
use crate::task::Draft;
use crate::tui::input::InputField;

/// Field order, top to bottom.
pub const TITLE_ORDER: usize = 0;
pub const DESCRIPTION_ORDER: usize = 1;
pub const DUE_ORDER: usize = 2;
pub const PRIORITY_ORDER: usize = 3;

const FIELD_COUNT: usize = 4;

/// Task form for editing fields
pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub due: InputField,
    /// Index into `priorities`.
    pub priority: usize,
    pub priorities: Vec<Priority>,
    pub current_field: usize,
}

impl TaskForm {
    /// Form populated from a draft, title focused.
    pub fn from_draft(draft: &Draft) -> Self {
        let priorities = Priority::ALL.to_vec();
        let priority = priorities.iter().position(|&p| p == draft.priority).unwrap_or(1);
        let mut form = Self {
            title: InputField::with_value(&draft.title),
            description: InputField::with_value(&draft.description),
            due: InputField::with_value(&draft.due),
            priority,
            priorities,
            current_field: TITLE_ORDER,
        };
        form.update_active_field();
        form
    }

    /// Current contents as a draft.
    pub fn to_draft(&self) -> Draft {
        Draft {
            title: self.title.value.clone(),
            description: self.description.value.clone(),
            priority: self.selected_priority(),
            due: self.due.value.clone(),
        }
    }

    pub fn selected_priority(&self) -> Priority {
        self.priorities.get(self.priority).copied().unwrap_or_default()
    }

    /// The focused text input, if the focus is not on the priority selector.
    fn active_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            TITLE_ORDER => Some(&mut self.title),
            DESCRIPTION_ORDER => Some(&mut self.description),
            DUE_ORDER => Some(&mut self.due),
            _ => None,
        }
    }

    /// Move to the next field in the form.
    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
        self.update_active_field();
    }

    /// Move to the previous field in the form.
    pub fn prev_field(&mut self) {
        self.current_field = (self.current_field + FIELD_COUNT - 1) % FIELD_COUNT;
        self.update_active_field();
    }

    /// Update which field is currently active for editing.
    pub fn update_active_field(&mut self) {
        self.title.active = self.current_field == TITLE_ORDER;
        self.description.active = self.current_field == DESCRIPTION_ORDER;
        self.due.active = self.current_field == DUE_ORDER;
    }

    pub fn handle_char(&mut self, c: char) {
        if let Some(field) = self.active_input() {
            field.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_delete();
        }
    }

    pub fn handle_home_end(&mut self, end: bool) {
        if let Some(field) = self.active_input() {
            if end { field.move_end() } else { field.move_home() }
        }
    }

    /// Left/right moves the cursor, or cycles the priority selector.
    pub fn handle_left_right(&mut self, right: bool) {
        if self.current_field == PRIORITY_ORDER {
            let n = self.priorities.len();
            self.priority = if right { (self.priority + 1) % n } else { (self.priority + n - 1) % n };
            return;
        }
        if let Some(field) = self.active_input() {
            if right { field.move_cursor_right() } else { field.move_cursor_left() }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_draft() {
        let draft = Draft {
            title: "Read".into(),
            description: "chapter 3".into(),
            priority: Priority::Low,
            due: "tomorrow".into(),
        };
        assert_eq!(TaskForm::from_draft(&draft).to_draft(), draft);
    }

    #[test]
    fn test_typing_goes_to_focused_field() {
        let mut form = TaskForm::from_draft(&Draft::default());
        form.handle_char('a');
        form.next_field();
        form.handle_char('b');
        form.next_field();
        form.handle_char('c');
        form.next_field();
        form.handle_char('z');
        let d = form.to_draft();
        assert_eq!((d.title.as_str(), d.description.as_str(), d.due.as_str()), ("a", "b", "c"));
    }

    #[test]
    fn test_priority_selector_wraps() {
        let mut form = TaskForm::from_draft(&Draft::default());
        assert_eq!(form.selected_priority(), Priority::Medium);
        form.prev_field();
        assert_eq!(form.current_field, PRIORITY_ORDER);
        form.handle_left_right(true);
        assert_eq!(form.selected_priority(), Priority::Low);
        form.handle_left_right(true);
        assert_eq!(form.selected_priority(), Priority::High);
        form.handle_left_right(false);
        assert_eq!(form.selected_priority(), Priority::Low);
    }
}
