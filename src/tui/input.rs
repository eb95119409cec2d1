//! Input field handling for the terminal user interface.

/// A single-line text input with a cursor.
///
/// The cursor counts characters, not bytes, so multi-byte input edits cleanly.
#[derive(Clone, Debug, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
    pub active: bool,
}

impl InputField {
    /// Create an input field with initial text, cursor at the end.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
            active: false,
        }
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn len_chars(&self) -> usize {
        self.value.chars().count()
    }

    /// Insert a character at the current cursor position.
    pub fn handle_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_index(self.cursor - 1);
            self.value.remove(at);
            self.cursor -= 1;
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.len_chars() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.len_chars() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len_chars();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_in_the_middle_of_multibyte_text() {
        let mut f = InputField::with_value("café");
        assert_eq!(f.cursor, 4);
        f.move_cursor_left();
        f.handle_char('x');
        assert_eq!(f.value, "cafxé");
        f.handle_backspace();
        f.handle_backspace();
        assert_eq!(f.value, "caé");
        f.handle_delete();
        assert_eq!(f.value, "ca");
        f.handle_delete();
        assert_eq!(f.value, "ca");
    }

    #[test]
    fn test_cursor_bounds() {
        let mut f = InputField::default();
        f.move_cursor_left();
        f.move_cursor_right();
        assert_eq!(f.cursor, 0);
        f.handle_char('a');
        f.handle_char('b');
        f.move_home();
        f.handle_char('_');
        assert_eq!(f.value, "_ab");
        f.move_end();
        assert_eq!(f.cursor, 3);
    }
}
