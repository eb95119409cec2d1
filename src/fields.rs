//! Enumerations and field types for task planning.
//!
//! This module defines the small closed sets the planner works with: task
//! priorities and the filter/sort selections of the task list view.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Task importance.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    #[serde(alias = "High")]
    High,
    #[default]
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "Low")]
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Numeric rank used by the priority sort: high outranks medium outranks low.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// Which tasks the list shows by completion state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FilterMode {
    #[default]
    All,
    Open,
    Done,
}

impl FilterMode {
    /// Next mode in the all → open → done cycle.
    pub fn cycle(self) -> Self {
        match self {
            FilterMode::All => FilterMode::Open,
            FilterMode::Open => FilterMode::Done,
            FilterMode::Done => FilterMode::All,
        }
    }
}

/// Available sorting keys for the task list.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    #[default]
    Created,
    Due,
    Priority,
}

impl SortBy {
    pub fn cycle(self) -> Self {
        match self {
            SortBy::Created => SortBy::Due,
            SortBy::Due => SortBy::Priority,
            SortBy::Priority => SortBy::Created,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

impl SortDir {
    pub fn flip(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

/// Sort key plus direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortSpec {
    pub by: SortBy,
    pub dir: SortDir,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_rank_order() {
        assert!(Priority::High.rank() > Priority::Medium.rank());
        assert!(Priority::Medium.rank() > Priority::Low.rank());
    }

    #[test]
    fn test_defaults_match_initial_view() {
        assert_eq!(Priority::default(), Priority::Medium);
        assert_eq!(FilterMode::default(), FilterMode::All);
        assert_eq!(SortSpec::default(), SortSpec { by: SortBy::Created, dir: SortDir::Desc });
    }

    #[test]
    fn test_cycles_return_to_start() {
        assert_eq!(FilterMode::All.cycle().cycle().cycle(), FilterMode::All);
        assert_eq!(SortBy::Created.cycle().cycle().cycle(), SortBy::Created);
        assert_eq!(SortDir::Asc.flip().flip(), SortDir::Asc);
    }

    #[test]
    fn test_priority_serde_accepts_legacy_case() {
        let p: Priority = serde_json::from_str("\"High\"").unwrap();
        assert_eq!(p, Priority::High);
        assert_eq!(serde_json::to_string(&Priority::Low).unwrap(), "\"low\"");
    }
}
