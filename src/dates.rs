//! Date parsing and relative formatting for due dates and timestamps.

use chrono::{Datelike, Duration, Local, NaiveDate, TimeZone};

/// Parse human-readable due date input with natural language support.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "monday".."sunday" and short forms, with optional "next"/"this"
/// - "this weekend", "end of week", "end of month"
/// - "in 3d", "in 2w", "in 1m"
/// - "YYYY-MM-DD" format
pub fn parse_due_input(s: &str) -> Option<NaiveDate> {
    parse_due_relative_to(s, Local::now().date_naive())
}

/// Same as [`parse_due_input`] with an explicit "today".
pub fn parse_due_relative_to(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return today.succ_opt(),
        "yesterday" => return today.pred_opt(),
        "end of week" | "eow" => {
            let (_, end) = start_end_of_this_week(today);
            return Some(end);
        }
        "end of month" | "eom" => {
            let (year, month) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            let first_of_next = NaiveDate::from_ymd_opt(year, month, 1)?;
            return Some(first_of_next - Duration::days(1));
        }
        "this weekend" | "weekend" => {
            let days_until_saturday = (5 + 7 - today.weekday().num_days_from_monday()) % 7;
            return today.checked_add_signed(Duration::days(days_until_saturday as i64));
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        // Offsets past the calendar range are rejected, not wrapped.
        let rest = rest.trim();
        if let Some(n) = rest.strip_suffix('d').and_then(|n| n.trim().parse::<i64>().ok()) {
            return Duration::try_days(n).and_then(|d| today.checked_add_signed(d));
        }
        if let Some(n) = rest.strip_suffix('w').and_then(|n| n.trim().parse::<i64>().ok()) {
            return Duration::try_weeks(n).and_then(|d| today.checked_add_signed(d));
        }
        if let Some(n) = rest.strip_suffix('m').and_then(|n| n.trim().parse::<i64>().ok()) {
            // Approximate: 30 days per month
            return n
                .checked_mul(30)
                .and_then(Duration::try_days)
                .and_then(|d| today.checked_add_signed(d));
        }
    }

    let weekdays = [
        ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
        ("friday", 4), ("saturday", 5), ("sunday", 6),
        ("mon", 0), ("tue", 1), ("wed", 2), ("thu", 3),
        ("fri", 4), ("sat", 5), ("sun", 6),
    ];
    let (next, name) = match s.strip_prefix("next ") {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix("this ").unwrap_or(&s)),
    };
    if let Some(&(_, target)) = weekdays.iter().find(|(day, _)| *day == name) {
        let current = today.weekday().num_days_from_monday() as i64;
        let ahead = (target + 7 - current) % 7;
        let ahead = if next { ahead + 7 } else { ahead };
        return today.checked_add_signed(Duration::days(ahead));
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Calculate the start and end dates of the current ISO week (Monday to Sunday).
pub fn start_end_of_this_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let weekday = today.weekday().num_days_from_monday() as i64;
    let start = today - Duration::days(weekday);
    (start, start + Duration::days(6))
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let days = (d - today).num_days();
            match days {
                0 => "today".into(),
                1 => "tomorrow".into(),
                n if n > 1 => format!("in {n}d"),
                n => format!("{}d late", -n),
            }
        }
    }
}

/// Render an epoch-millisecond timestamp in local time.
pub fn format_created(created_at_ms: i64) -> String {
    Local
        .timestamp_millis_opt(created_at_ms)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_iso_and_keywords() {
        // 2025-03-05 is a Wednesday.
        let today = d("2025-03-05");
        assert_eq!(parse_due_relative_to("2025-12-25", today), Some(d("2025-12-25")));
        assert_eq!(parse_due_relative_to(" Tomorrow ", today), Some(d("2025-03-06")));
        assert_eq!(parse_due_relative_to("in 3d", today), Some(d("2025-03-08")));
        assert_eq!(parse_due_relative_to("in 2w", today), Some(d("2025-03-19")));
        assert_eq!(parse_due_relative_to("eom", today), Some(d("2025-03-31")));
        assert_eq!(parse_due_relative_to("eow", today), Some(d("2025-03-09")));
        assert_eq!(parse_due_relative_to("weekend", today), Some(d("2025-03-08")));
    }

    #[test]
    fn test_parse_weekdays() {
        let today = d("2025-03-05");
        assert_eq!(parse_due_relative_to("fri", today), Some(d("2025-03-07")));
        assert_eq!(parse_due_relative_to("wednesday", today), Some(today));
        assert_eq!(parse_due_relative_to("next monday", today), Some(d("2025-03-17")));
        assert_eq!(parse_due_relative_to("this friday", today), Some(d("2025-03-07")));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let today = d("2025-03-05");
        assert_eq!(parse_due_relative_to("someday", today), None);
        assert_eq!(parse_due_relative_to("2025-13-40", today), None);
        assert_eq!(parse_due_relative_to("", today), None);
    }

    #[test]
    fn test_parse_rejects_offsets_out_of_range() {
        let today = d("2025-03-05");
        assert_eq!(parse_due_relative_to("in 99999999999d", today), None);
        assert_eq!(parse_due_relative_to("in 999999999999999999w", today), None);
        assert_eq!(parse_due_relative_to("in 999999999999999999m", today), None);
        assert_eq!(parse_due_relative_to("in -3d", today), Some(d("2025-03-02")));
    }

    #[test]
    fn test_format_due_relative() {
        let today = d("2025-03-05");
        assert_eq!(format_due_relative(None, today), "-");
        assert_eq!(format_due_relative(Some(today), today), "today");
        assert_eq!(format_due_relative(Some(d("2025-03-06")), today), "tomorrow");
        assert_eq!(format_due_relative(Some(d("2025-03-10")), today), "in 5d");
        assert_eq!(format_due_relative(Some(d("2025-03-03")), today), "2d late");
    }
}
