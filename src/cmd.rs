//! Command implementations for the CLI interface.
//!
//! Each handler works on a loaded `Session`: it dispatches planner actions
//! (which save on change) and prints the result. Unknown task identifiers
//! are reported on stderr and otherwise ignored.

use std::io::Write;

use clap::Subcommand;
use clap_complete::{generate, Shell};
use tracing::info;

use crate::display::*;
use crate::fields::*;
use crate::planner::Action;
use crate::session::Session;
use crate::store::Storage;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI (default).
    Ui,

    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "fri", or "in Nd".
        #[arg(long)]
        due: Option<String>,
        /// Priority: high | medium | low.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
    },

    /// List tasks through the search/filter/sort pipeline.
    List {
        /// Case-insensitive text to find in title or description.
        #[arg(long, default_value = "")]
        search: String,
        /// Completion filter.
        #[arg(long, value_enum, default_value_t = FilterMode::All)]
        filter: FilterMode,
        /// Sort key.
        #[arg(long, value_enum, default_value_t = SortBy::Created)]
        sort: SortBy,
        /// Sort direction.
        #[arg(long, value_enum, default_value_t = SortDir::Desc)]
        dir: SortDir,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// View a single task.
    View {
        /// Task ID, ID prefix, or exact title.
        id: String,
    },

    /// Flip a task between open and done.
    Toggle {
        /// Task ID, ID prefix, or exact title.
        id: String,
    },

    /// Delete a task.
    Remove {
        /// Task ID, ID prefix, or exact title.
        id: String,
    },

    /// Edit fields on a task. A blank title keeps the current one.
    Edit {
        /// Task ID, ID prefix, or exact title.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Clear the due date.
        #[arg(long)]
        clear_due: bool,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
    },

    /// Show totals and completion.
    Stats,

    /// Delete every task.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Add a new task via the planner's add form.
pub fn cmd_add<S: Storage>(
    session: &mut Session<S>,
    title: String,
    desc: Option<String>,
    due: Option<String>,
    priority: Priority,
) -> anyhow::Result<()> {
    let form = &mut session.planner.form;
    form.title = title;
    form.description = desc.unwrap_or_default();
    form.due = due.unwrap_or_default();
    form.priority = priority;

    if !session.dispatch(Action::Add).needs_save() {
        let form = &session.planner.form;
        if form.title.trim().is_empty() {
            anyhow::bail!("title is required");
        }
        anyhow::bail!(
            "unrecognised due date '{}'. Use YYYY-MM-DD, 'today', 'tomorrow', or 'in Nd'.",
            form.due
        );
    }
    if let Some(task) = session.planner.tasks.first() {
        info!(id = %task.id, "added task");
        println!("Added task {} ({})", short_id(task), task.title);
    }
    Ok(())
}

/// List tasks with optional search, filter and sort.
pub fn cmd_list<S: Storage>(
    session: &mut Session<S>,
    search: String,
    filter: FilterMode,
    sort: SortBy,
    dir: SortDir,
    limit: Option<usize>,
) {
    let spec = SortSpec { by: sort, dir };
    session.dispatch(Action::SetQuery(search));
    session.dispatch(Action::SetFilter(filter));
    session.dispatch(Action::SetSort(spec));

    let mut visible = session.planner.visible();
    if let Some(n) = limit {
        visible.truncate(n);
    }

    if visible.is_empty() {
        println!("No tasks yet.");
    } else {
        print_table(&visible);
    }
    println!();
    println!(
        "{} of {} shown ({}, {}) | {}",
        visible.len(),
        session.planner.tasks.len(),
        format_filter(filter),
        format_sort(spec),
        progress_bar(session.planner.completion(), 20)
    );
}

/// View detailed information about a task.
pub fn cmd_view<S: Storage>(session: &Session<S>, id: String) {
    match session.planner.resolve(&id) {
        Ok(task_id) => {
            if let Some(task) = session.planner.get(task_id) {
                print_task(task);
            }
        }
        Err(e) => eprintln!("{e}"),
    }
}

/// Flip a task's completion flag.
pub fn cmd_toggle<S: Storage>(session: &mut Session<S>, id: String) {
    let task_id = match session.planner.resolve(&id) {
        Ok(task_id) => task_id,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    session.dispatch(Action::Toggle(task_id));
    if let Some(t) = session.planner.get(task_id) {
        println!("{} {}", done_marker(t.done), t.title);
    }
}

/// Delete a task.
pub fn cmd_remove<S: Storage>(session: &mut Session<S>, id: String) {
    let task_id = match session.planner.resolve(&id) {
        Ok(task_id) => task_id,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    if session.dispatch(Action::Remove(task_id)).needs_save() {
        println!("Deleted.");
    }
}

/// Edit a task: open an edit session, overlay the given fields, save.
pub fn cmd_edit<S: Storage>(
    session: &mut Session<S>,
    id: String,
    title: Option<String>,
    desc: Option<String>,
    due: Option<String>,
    clear_due: bool,
    priority: Option<Priority>,
) {
    let task_id = match session.planner.resolve(&id) {
        Ok(task_id) => task_id,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };

    session.dispatch(Action::StartEdit(task_id));
    let Some(draft) = session.planner.draft_mut() else {
        return;
    };
    if let Some(t) = title {
        draft.title = t;
    }
    if let Some(d) = desc {
        draft.description = d;
    }
    if clear_due {
        draft.due.clear();
    }
    if let Some(d) = due {
        draft.due = d;
    }
    if let Some(p) = priority {
        draft.priority = p;
    }
    let bad_due = !draft.due.trim().is_empty()
        && crate::dates::parse_due_input(&draft.due).is_none();

    session.dispatch(Action::SaveEdit(task_id));
    if bad_due {
        eprintln!("Unrecognised due date; kept the previous one.");
    }
    if let Some(task) = session.planner.get(task_id) {
        println!("Updated task {} ({})", short_id(task), task.title);
    }
}

/// Print totals and the completion metric.
pub fn cmd_stats<S: Storage>(session: &Session<S>) {
    let tasks = &session.planner.tasks;
    let done = tasks.iter().filter(|t| t.done).count();
    println!("{:<10} {}", "Total", tasks.len());
    println!("{:<10} {}", "Open", tasks.len() - done);
    println!("{:<10} {}", "Done", done);
    println!("{:<10} {}", "Complete", progress_bar(session.planner.completion(), 20));
}

/// Delete every task, asking first unless `yes` is set.
///
/// With nothing loaded the stored key is still removed without asking, so an
/// unreadable file does not linger.
pub fn cmd_clear<S: Storage>(session: &mut Session<S>, yes: bool) -> anyhow::Result<()> {
    let count = session.planner.tasks.len();
    if count == 0 {
        session.reset()?;
        println!("No tasks yet.");
        return Ok(());
    }
    if !yes {
        print!("Delete all {count} tasks? [y/N] ");
        std::io::stdout().flush()?;
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }
    session.reset()?;
    println!("Deleted {count} tasks.");
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStorage;

    fn session() -> Session<MemoryStorage> {
        Session::open(MemoryStorage::new(), "pp_tasks")
    }

    #[test]
    fn test_cmd_add_rejects_blank_title() {
        let mut s = session();
        assert!(cmd_add(&mut s, "  ".into(), None, None, Priority::High).is_err());
        assert!(s.planner.tasks.is_empty());
    }

    #[test]
    fn test_cmd_add_rejects_bad_due() {
        let mut s = session();
        let err = cmd_add(&mut s, "Call".into(), None, Some("soonish".into()), Priority::Low)
            .unwrap_err();
        assert!(err.to_string().contains("soonish"));
    }

    #[test]
    fn test_cmd_edit_overlays_only_given_fields() {
        let mut s = session();
        cmd_add(&mut s, "Plan trip".into(), Some("Lisbon".into()), Some("2031-01-01".into()), Priority::Low)
            .unwrap();
        cmd_edit(&mut s, "plan trip".into(), None, None, None, true, Some(Priority::High));
        let t = &s.planner.tasks[0];
        assert_eq!(t.title, "Plan trip");
        assert_eq!(t.description, "Lisbon");
        assert_eq!(t.due, None);
        assert_eq!(t.priority, Priority::High);
        assert!(s.planner.active_edit.is_none());
    }

    #[test]
    fn test_cmd_list_applies_view_without_saving() {
        let mut s = session();
        cmd_add(&mut s, "Low one".into(), None, None, Priority::Low).unwrap();
        cmd_add(&mut s, "High one".into(), None, None, Priority::High).unwrap();
        cmd_list(&mut s, "one".into(), FilterMode::Open, SortBy::Priority, SortDir::Asc, Some(1));
        assert_eq!(s.planner.view.sort, SortSpec { by: SortBy::Priority, dir: SortDir::Asc });
        let titles: Vec<&str> = s.planner.visible().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Low one", "High one"]);
    }

    #[test]
    fn test_cmd_clear_with_yes_empties_store() {
        let mut s = session();
        cmd_add(&mut s, "One".into(), None, None, Priority::Low).unwrap();
        cmd_clear(&mut s, true).unwrap();
        assert!(s.planner.tasks.is_empty());
        assert_eq!(s.store().storage().get_item("pp_tasks").unwrap(), None);
    }

    #[test]
    fn test_cmd_clear_removes_unreadable_collection() {
        let mut storage = MemoryStorage::new();
        storage.set_item("pp_tasks", "[{\"id\": broken").unwrap();
        let mut s = Session::open(storage, "pp_tasks");
        assert!(s.planner.tasks.is_empty());
        cmd_clear(&mut s, false).unwrap();
        assert_eq!(s.store().storage().get_item("pp_tasks").unwrap(), None);
    }

    #[test]
    fn test_cmd_edit_keeps_due_on_out_of_range_offset() {
        let mut s = session();
        cmd_add(&mut s, "Renew passport".into(), None, Some("2031-02-03".into()), Priority::Medium)
            .unwrap();
        cmd_edit(&mut s, "renew passport".into(), None, None, Some("in 999999999999999999m".into()), false, None);
        assert_eq!(s.planner.tasks[0].due, chrono::NaiveDate::from_ymd_opt(2031, 2, 3));
    }

    #[test]
    fn test_cmd_toggle_and_remove_unknown_are_noops() {
        let mut s = session();
        cmd_add(&mut s, "Keep".into(), None, None, Priority::Medium).unwrap();
        cmd_toggle(&mut s, "missing".into());
        cmd_remove(&mut s, "missing".into());
        assert_eq!(s.planner.tasks.len(), 1);
        assert!(!s.planner.tasks[0].done);
        cmd_toggle(&mut s, "keep".into());
        assert!(s.planner.tasks[0].done);
        cmd_remove(&mut s, "keep".into());
        assert!(s.planner.tasks.is_empty());
    }
}
