//! Plain-text formatting for CLI output.

use chrono::{Local, NaiveDate};

use crate::dates::{format_created, format_due_relative};
use crate::fields::{FilterMode, Priority, SortBy, SortDir, SortSpec};
use crate::task::Task;

/// Format a priority for display.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::High => "High",
        Priority::Medium => "Medium",
        Priority::Low => "Low",
    }
}

pub fn format_filter(f: FilterMode) -> &'static str {
    match f {
        FilterMode::All => "All",
        FilterMode::Open => "Open",
        FilterMode::Done => "Done",
    }
}

pub fn format_sort(s: SortSpec) -> String {
    let by = match s.by {
        SortBy::Created => "Created",
        SortBy::Due => "Due date",
        SortBy::Priority => "Priority",
    };
    let dir = match s.dir {
        SortDir::Asc => "Asc",
        SortDir::Desc => "Desc",
    };
    format!("{by} {dir}")
}

/// Check mark used in lists.
pub fn done_marker(done: bool) -> &'static str {
    if done { "✓" } else { "○" }
}

/// First 8 characters of an id, enough to address a task from the CLI.
pub fn short_id(task: &Task) -> String {
    task.id.to_string()[..8].to_string()
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Render a text progress bar, e.g. `[#####-----] 50%`.
pub fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (percent.min(100) as usize * width + 50) / 100;
    format!("[{}{}] {}%", "#".repeat(filled), "-".repeat(width - filled), percent)
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task]) {
    let today = Local::now().date_naive();
    for line in table_lines(tasks, today) {
        println!("{line}");
    }
}

fn table_lines(tasks: &[&Task], today: NaiveDate) -> Vec<String> {
    let mut lines = vec![format!(
        "{:<8} {:<2} {:<7} {:<10} {}",
        "ID", "", "Pri", "Due", "Title"
    )];
    for t in tasks {
        lines.push(format!(
            "{:<8} {:<2} {:<7} {:<10} {}",
            short_id(t),
            done_marker(t.done),
            format_priority(t.priority),
            format_due_relative(t.due, today),
            truncate(&t.title, 60),
        ));
    }
    lines
}

/// Print every field of one task.
pub fn print_task(task: &Task) {
    let today = Local::now().date_naive();
    println!("ID:           {}", task.id);
    println!("Title:        {}", task.title);
    println!("Done:         {}", if task.done { "yes" } else { "no" });
    println!("Priority:     {}", format_priority(task.priority));
    println!(
        "Due:          {}",
        match task.due {
            Some(d) => format!("{d} ({})", format_due_relative(Some(d), today)),
            None => "-".into(),
        }
    );
    println!("Added:        {}", format_created(task.created_at));
    println!(
        "Description:\n{}",
        if task.description.is_empty() { "-" } else { task.description.as_str() }
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("this is far too long", 8), "this is…");
        assert_eq!(truncate("ééééé", 3), "éé…");
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0, 10), "[----------] 0%");
        assert_eq!(progress_bar(25, 4), "[#---] 25%");
        assert_eq!(progress_bar(100, 5), "[#####] 100%");
    }

    #[test]
    fn test_table_lines() {
        let task = Task {
            id: Uuid::parse_str("12345678-0000-4000-8000-000000000000").unwrap(),
            title: "Buy milk".into(),
            description: String::new(),
            created_at: 0,
            due: None,
            priority: Priority::High,
            done: true,
        };
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let lines = table_lines(&[&task], today);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("12345678 ✓"));
        assert!(lines[1].contains("High"));
        assert!(lines[1].ends_with("Buy milk"));
    }

    #[test]
    fn test_format_sort() {
        assert_eq!(format_sort(SortSpec::default()), "Created Desc");
    }
}
