//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::Priority;

/// Accent for the focused field and header bar.
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// High priority badge.
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
/// Medium priority badge.
pub const SLATE: Color = Color::Rgb(71, 85, 105);
/// Low priority badge.
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
/// Text of completed tasks.
pub const MUTED: Color = Color::Rgb(100, 116, 139);

/// Badge background for a priority.
pub fn priority_color(p: Priority) -> Color {
    match p {
        Priority::High => DARK_RED,
        Priority::Medium => SLATE,
        Priority::Low => DARK_GREEN,
    }
}
