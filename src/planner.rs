//! Application state and the update operations that act on it.
//!
//! `Planner` owns the task collection plus the transient add form, view
//! settings and the (single, optional) edit session. Every user action goes
//! through [`Planner::dispatch`], which reports whether the persisted
//! collection changed so the caller knows when to save.

use chrono::{NaiveDate, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::dates::parse_due_input;
use crate::fields::{FilterMode, SortBy, SortSpec};
use crate::task::{Draft, Task};
use crate::view::{self, ViewState};

/// An open edit: which task, and the text being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub task_id: Uuid,
    pub draft: Draft,
}

/// Discrete user actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Create a task from the add form.
    Add,
    Toggle(Uuid),
    Remove(Uuid),
    StartEdit(Uuid),
    SaveEdit(Uuid),
    CancelEdit,
    SetQuery(String),
    SetFilter(FilterMode),
    SetSort(SortSpec),
    SetSortBy(SortBy),
    ToggleSortDir,
}

/// What an action did to the persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// The collection changed and should be saved.
    Tasks,
    /// Only transient state (form, view, edit session) changed, or nothing did.
    None,
}

impl Change {
    pub fn needs_save(self) -> bool {
        self == Change::Tasks
    }
}

/// The whole application state.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    /// Newest-created first.
    pub tasks: Vec<Task>,
    /// Fields of the add form.
    pub form: Draft,
    pub view: ViewState,
    pub active_edit: Option<EditSession>,
}

impl Planner {
    /// Planner over a loaded collection, with fresh transient state.
    pub fn new(tasks: Vec<Task>) -> Self {
        Planner { tasks, ..Planner::default() }
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: Uuid) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Id of the task currently being edited, if any.
    pub fn editing_id(&self) -> Option<Uuid> {
        self.active_edit.as_ref().map(|s| s.task_id)
    }

    /// Mutable access to the open draft.
    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        self.active_edit.as_mut().map(|s| &mut s.draft)
    }

    /// Visible tasks under the current view settings.
    pub fn visible(&self) -> Vec<&Task> {
        view::derive_visible(&self.tasks, &self.view)
    }

    pub fn completion(&self) -> u8 {
        view::completion(&self.tasks)
    }

    /// Apply one action.
    pub fn dispatch(&mut self, action: Action) -> Change {
        debug!(?action, "dispatch");
        match action {
            Action::Add => match self.add_at(Utc::now().timestamp_millis()) {
                Some(_) => Change::Tasks,
                None => Change::None,
            },
            Action::Toggle(id) => self.toggle(id),
            Action::Remove(id) => self.remove(id),
            Action::StartEdit(id) => {
                self.start_edit(id);
                Change::None
            }
            Action::SaveEdit(id) => self.save_edit(id),
            Action::CancelEdit => {
                self.cancel_edit();
                Change::None
            }
            Action::SetQuery(q) => {
                self.view.query = q;
                Change::None
            }
            Action::SetFilter(f) => {
                self.view.filter = f;
                Change::None
            }
            Action::SetSort(s) => {
                self.view.sort = s;
                Change::None
            }
            Action::SetSortBy(by) => {
                self.view.sort.by = by;
                Change::None
            }
            Action::ToggleSortDir => {
                self.view.sort.dir = self.view.sort.dir.flip();
                Change::None
            }
        }
    }

    /// Create a task from the add form, stamped `now_ms` (or later).
    ///
    /// Returns the new id, or `None` when the form is invalid (blank title or
    /// a due date that does not parse); the form is left as typed.
    pub fn add_at(&mut self, now_ms: i64) -> Option<Uuid> {
        let title = self.form.title.trim();
        if title.is_empty() {
            return None;
        }
        let due = parse_optional_due(&self.form.due)?;

        // Keep timestamps strictly increasing so created order is total.
        let newest = self.tasks.iter().map(|t| t.created_at).max();
        let created_at = newest.map_or(now_ms, |n| now_ms.max(n.saturating_add(1)));

        let task = Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: self.form.description.trim().to_string(),
            created_at,
            due,
            priority: self.form.priority,
            done: false,
        };
        let id = task.id;
        self.tasks.insert(0, task);
        self.form = Draft::default();
        Some(id)
    }

    pub fn toggle(&mut self, id: Uuid) -> Change {
        match self.get_mut(id) {
            Some(t) => {
                t.done = !t.done;
                Change::Tasks
            }
            None => Change::None,
        }
    }

    pub fn remove(&mut self, id: Uuid) -> Change {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.editing_id() == Some(id) {
            self.active_edit = None;
        }
        if self.tasks.len() == before {
            Change::None
        } else {
            Change::Tasks
        }
    }

    /// Open the edit session on `id`, replacing any session already open.
    pub fn start_edit(&mut self, id: Uuid) {
        if let Some(task) = self.get(id) {
            let draft = Draft::from_task(task);
            self.active_edit = Some(EditSession { task_id: id, draft });
        }
    }

    /// Commit the open draft into task `id` and close the session.
    ///
    /// A no-op unless the open session is on `id`.
    pub fn save_edit(&mut self, id: Uuid) -> Change {
        if self.editing_id() != Some(id) {
            return Change::None;
        }
        let Some(EditSession { draft, .. }) = self.active_edit.take() else {
            return Change::None;
        };
        let Some(task) = self.get_mut(id) else {
            return Change::None;
        };
        let title = draft.title.trim();
        if !title.is_empty() {
            task.title = title.to_string();
        }
        task.description = draft.description.trim().to_string();
        task.priority = draft.priority;
        if let Some(due) = parse_optional_due(&draft.due) {
            task.due = due;
        }
        Change::Tasks
    }

    pub fn cancel_edit(&mut self) {
        self.active_edit = None;
    }

    /// Resolve a task identifier: full id, unique id prefix, or exact title.
    pub fn resolve(&self, identifier: &str) -> Result<Uuid, String> {
        let ident = identifier.trim();
        if let Ok(id) = Uuid::parse_str(ident) {
            return self
                .get(id)
                .map(|t| t.id)
                .ok_or_else(|| format!("Task with ID {id} not found"));
        }

        let lower = ident.to_lowercase();
        let mut matches: Vec<&Task> = Vec::new();
        if lower.len() >= 4 {
            matches = self
                .tasks
                .iter()
                .filter(|t| t.id.to_string().starts_with(&lower))
                .collect();
        }
        if matches.is_empty() {
            matches = self
                .tasks
                .iter()
                .filter(|t| t.title.to_lowercase() == lower)
                .collect();
        }

        match matches.len() {
            0 => Err(format!("No task found matching '{ident}'")),
            1 => Ok(matches[0].id),
            _ => {
                let mut msg = format!("Multiple tasks match '{ident}':\n");
                for t in matches {
                    msg.push_str(&format!("  {}  {}\n", t.id, t.title));
                }
                msg.push_str("Please use a longer ID instead.");
                Err(msg)
            }
        }
    }
}

/// Empty text is "no due date" (`Some(None)`); anything else must parse, or `None`.
fn parse_optional_due(text: &str) -> Option<Option<NaiveDate>> {
    if text.trim().is_empty() {
        return Some(None);
    }
    parse_due_input(text).map(Some)
}
