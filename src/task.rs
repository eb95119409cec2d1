//! Task data structure and the editable draft that mirrors it.
//!
//! `Task` is the persisted record. `Draft` holds the editable fields as
//! plain text while the user is typing, both for the add form and for an
//! edit session.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fields::Priority;

/// A single to-do item.
///
/// Serialized with camelCase field names. `desc` and `prio` are accepted on
/// read so collections written by the browser edition still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default, alias = "desc")]
    pub description: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
    #[serde(default)]
    pub due: Option<NaiveDate>,
    #[serde(alias = "prio")]
    pub priority: Priority,
    #[serde(default)]
    pub done: bool,
}

/// Editable task fields, kept as raw text until committed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due: String,
}

impl Draft {
    /// Seed a draft from a task. Missing optional fields become empty strings.
    pub fn from_task(task: &Task) -> Self {
        Draft {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            due: task.due.map(|d| d.to_string()).unwrap_or_default(),
        }
    }
}
