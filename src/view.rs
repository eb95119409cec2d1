//! Task list derivation: search, filter, sort and the completion metric.
//!
//! Everything here is a pure function of the task collection and the
//! current `ViewState`; nothing mutates the collection.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::fields::{FilterMode, SortBy, SortDir, SortSpec};
use crate::task::Task;

/// Transient list settings. Reset every session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub query: String,
    pub filter: FilterMode,
    pub sort: SortSpec,
}

/// Date an undated task sorts as, so it lands after every real date ascending.
pub fn undated_sentinel() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Case-insensitive match of `query` against title or description.
pub fn matches_query(task: &Task, query_lower: &str) -> bool {
    query_lower.is_empty()
        || task.title.to_lowercase().contains(query_lower)
        || task.description.to_lowercase().contains(query_lower)
}

pub fn passes_filter(task: &Task, filter: FilterMode) -> bool {
    match filter {
        FilterMode::All => true,
        FilterMode::Open => !task.done,
        FilterMode::Done => task.done,
    }
}

/// Ascending comparator for a sort key.
pub fn compare_by(a: &Task, b: &Task, by: SortBy) -> Ordering {
    match by {
        SortBy::Created => a.created_at.cmp(&b.created_at),
        SortBy::Due => {
            let sentinel = undated_sentinel();
            a.due.unwrap_or(sentinel).cmp(&b.due.unwrap_or(sentinel))
        }
        SortBy::Priority => a.priority.rank().cmp(&b.priority.rank()),
    }
}

/// Derive the visible, ordered task list.
///
/// The sort is stable: tasks with equal keys keep their collection order in
/// both directions.
pub fn derive_visible<'a>(tasks: &'a [Task], view: &ViewState) -> Vec<&'a Task> {
    let q = view.query.to_lowercase();
    let mut list: Vec<&Task> = tasks
        .iter()
        .filter(|t| matches_query(t, &q))
        .filter(|t| passes_filter(t, view.filter))
        .collect();

    let SortSpec { by, dir } = view.sort;
    list.sort_by(|a, b| {
        let ord = compare_by(a, b, by);
        match dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    });
    list
}

/// Percentage of done tasks, rounded; 0 for an empty collection.
pub fn completion(tasks: &[Task]) -> u8 {
    let done = tasks.iter().filter(|t| t.done).count();
    let total = tasks.len().max(1);
    ((done as f64 / total as f64) * 100.0).round() as u8
}
