//! Enumerations for TUI state management.

/// Which screen the terminal user interface is showing.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    TaskList,
    AddTask,
    EditTask,
    Help,
    Confirm,
}

/// Input mode for text entry.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputMode {
    None,
    Text,
}
