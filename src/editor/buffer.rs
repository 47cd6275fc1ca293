use ropey::Rope;

/// Cursor position in the editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column (byte offset within the line).
    pub col: usize,
    /// Remembered column for vertical movement (sticky column).
    col_memory: usize,
}

impl Cursor {
    /// Create a cursor at line 0, column 0.
    pub const fn new() -> Self {
        Self {
            line: 0,
            col: 0,
            col_memory: 0,
        }
    }

    /// Create a cursor at a specific position.
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            col_memory: col,
        }
    }

    /// Update column and reset column memory to match.
    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.col_memory = col;
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// The diagram source buffer, backed by a rope.
///
/// Owns the text the renderer consumes. Every mutation goes through the
/// cursor, and the full source is snapshotted with [`EditorBuffer::text`]
/// whenever a render is attempted.
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
}

impl EditorBuffer {
    /// Create a new buffer from a string.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::new(),
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The current cursor position.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let s = self.rope.line(line_idx).to_string();
        Some(s.trim_end_matches('\n').trim_end_matches('\r').to_string())
    }

    /// Length of a line in bytes (without trailing newline).
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.len())
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Whether the buffer holds only whitespace.
    pub fn is_blank(&self) -> bool {
        self.rope.chars().all(char::is_whitespace)
    }

    /// Discard all content and move the cursor to the origin.
    pub fn clear(&mut self) {
        self.rope = Rope::from_str("");
        self.cursor = Cursor::new();
    }

    /// Insert a character at the cursor position.
    pub fn insert_char(&mut self, ch: char) {
        let char_idx = self.cursor_char_idx();
        self.rope.insert_char(char_idx, ch);
        self.cursor.set_col(self.cursor.col + ch.len_utf8());
    }

    /// Insert a string at the cursor position (e.g. a paste).
    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        let char_idx = self.cursor_char_idx();
        self.rope.insert(char_idx, s);

        // Move cursor to end of inserted text
        let lines: Vec<&str> = s.split('\n').collect();
        if lines.len() > 1 {
            self.cursor.line += lines.len() - 1;
            self.cursor.set_col(lines.last().map_or(0, |l| l.len()));
        } else {
            self.cursor.set_col(self.cursor.col + s.len());
        }
    }

    /// Split the current line at the cursor (Enter key).
    pub fn split_line(&mut self) {
        let char_idx = self.cursor_char_idx();
        self.rope.insert_char(char_idx, '\n');
        self.cursor.line += 1;
        self.cursor.set_col(0);
    }

    /// Delete the character before the cursor (Backspace).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.cursor.col == 0 && self.cursor.line == 0 {
            return false;
        }

        if self.cursor.col == 0 {
            // Join with previous line
            let prev_line_len = self.line_len(self.cursor.line - 1);
            let char_idx = self.cursor_char_idx();
            // Delete the newline at end of previous line
            self.rope.remove(char_idx - 1..char_idx);
            self.cursor.line -= 1;
            self.cursor.set_col(prev_line_len);
        } else {
            let char_idx = self.cursor_char_idx();
            // Byte length of the character before the cursor
            let line = self.rope.line(self.cursor.line).to_string();
            let before = &line[..self.cursor.col];
            let prev_char_len = before.chars().next_back().map_or(1, char::len_utf8);
            self.rope.remove(char_idx - 1..char_idx);
            self.cursor.set_col(self.cursor.col - prev_char_len);
        }
        true
    }

    /// Delete the character at the cursor (Delete key).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_forward(&mut self) -> bool {
        let line_len = self.line_len(self.cursor.line);

        if self.cursor.col >= line_len && self.cursor.line + 1 >= self.line_count() {
            return false;
        }

        let char_idx = self.cursor_char_idx();
        self.rope.remove(char_idx..=char_idx);
        true
    }

    /// Move the cursor in the given direction.
    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Up => self.move_up(),
            Direction::Down => self.move_down(),
        }
    }

    /// Move cursor to the beginning of the line (Home).
    pub const fn move_home(&mut self) {
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the line (End).
    pub fn move_end(&mut self) {
        let len = self.line_len(self.cursor.line);
        self.cursor.set_col(len);
    }

    /// Move cursor one word to the left (Ctrl+Left).
    pub fn move_word_left(&mut self) {
        if self.cursor.col == 0 {
            if self.cursor.line > 0 {
                self.cursor.line -= 1;
                self.cursor.set_col(self.line_len(self.cursor.line));
            }
            return;
        }

        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let before = &line[..self.cursor.col];
        let trimmed = before.trim_end();

        if trimmed.is_empty() {
            self.cursor.set_col(0);
            return;
        }

        let pos = trimmed
            .rfind(|c: char| !c.is_alphanumeric() && c != '_')
            .map_or(0, |i| i + 1);
        self.cursor.set_col(pos);
    }

    /// Move cursor one word to the right (Ctrl+Right).
    pub fn move_word_right(&mut self) {
        let line_len = self.line_len(self.cursor.line);

        if self.cursor.col >= line_len {
            if self.cursor.line + 1 < self.line_count() {
                self.cursor.line += 1;
                self.cursor.set_col(0);
            }
            return;
        }

        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let after = &line[self.cursor.col..];

        let word_end = after
            .find(|c: char| !c.is_alphanumeric() && c != '_')
            .unwrap_or(after.len());
        let rest = &after[word_end..];
        let space_end = rest
            .find(|c: char| c.is_alphanumeric() || c == '_')
            .unwrap_or(rest.len());

        self.cursor.set_col(self.cursor.col + word_end + space_end);
    }

    /// Move cursor to a specific line and column, clamping both.
    pub fn move_to(&mut self, line: usize, col: usize) {
        let max_line = self.line_count().saturating_sub(1);
        self.cursor.line = line.min(max_line);
        let max_col = self.line_len(self.cursor.line);
        self.cursor.set_col(col.min(max_col));
    }

    /// Move cursor to the start of the buffer (Ctrl+Home).
    pub const fn move_to_start(&mut self) {
        self.cursor.line = 0;
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the buffer (Ctrl+End).
    pub fn move_to_end(&mut self) {
        let last_line = self.line_count().saturating_sub(1);
        self.cursor.line = last_line;
        self.cursor.set_col(self.line_len(last_line));
    }

    // --- Private helpers ---

    /// Convert cursor position to a ropey char index.
    fn cursor_char_idx(&self) -> usize {
        let line_start = self.rope.line_to_char(self.cursor.line);
        let line_str: String = self.rope.line(self.cursor.line).chars().collect();
        // Convert byte offset to char offset within the line
        let byte_col = self.cursor.col.min(line_str.len());
        let char_offset = line_str[..byte_col].chars().count();
        line_start + char_offset
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            let line = self.line_at(self.cursor.line).unwrap_or_default();
            let before = &line[..self.cursor.col];
            let prev_char_len = before.chars().next_back().map_or(1, char::len_utf8);
            self.cursor.set_col(self.cursor.col - prev_char_len);
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.set_col(self.line_len(self.cursor.line));
        }
    }

    fn move_right(&mut self) {
        let line_len = self.line_len(self.cursor.line);
        if self.cursor.col < line_len {
            let line = self.line_at(self.cursor.line).unwrap_or_default();
            let next_char_len = line[self.cursor.col..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            self.cursor.set_col(self.cursor.col + next_char_len);
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.set_col(0);
        }
    }

    fn move_up(&mut self) {
        if self.cursor.line > 0 {
            self.cursor.line -= 1;
            let max_col = self.line_len(self.cursor.line);
            self.cursor.col = self.cursor.col_memory.min(max_col);
        }
    }

    fn move_down(&mut self) {
        if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            let max_col = self.line_len(self.cursor.line);
            self.cursor.col = self.cursor.col_memory.min(max_col);
        }
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("cursor", &self.cursor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Construction and basic queries ---

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = EditorBuffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some(String::new()));
    }

    #[test]
    fn test_from_text_preserves_content() {
        let buf = EditorBuffer::from_text("graph TD\n    A --> B");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(0), Some("graph TD".to_string()));
        assert_eq!(buf.line_at(1), Some("    A --> B".to_string()));
    }

    #[test]
    fn test_line_at_out_of_bounds_returns_none() {
        let buf = EditorBuffer::from_text("graph TD");
        assert_eq!(buf.line_at(1), None);
    }

    #[test]
    fn test_text_roundtrip() {
        let content = "graph TD\n    A --> B\n    B --> C";
        let buf = EditorBuffer::from_text(content);
        assert_eq!(buf.text(), content);
    }

    // --- Blankness ---

    #[test]
    fn test_empty_buffer_is_blank() {
        assert!(EditorBuffer::empty().is_blank());
    }

    #[test]
    fn test_whitespace_only_buffer_is_blank() {
        assert!(EditorBuffer::from_text("  \n\t \n").is_blank());
    }

    #[test]
    fn test_buffer_with_content_is_not_blank() {
        assert!(!EditorBuffer::from_text("graph TD").is_blank());
    }

    // --- Clear ---

    #[test]
    fn test_clear_empties_buffer_and_resets_cursor() {
        let mut buf = EditorBuffer::from_text("graph TD\n    A --> B");
        buf.move_to(1, 4);
        buf.clear();
        assert!(buf.is_blank());
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
    }

    // --- Character insertion ---

    #[test]
    fn test_insert_char_advances_cursor() {
        let mut buf = EditorBuffer::empty();
        buf.insert_char('g');
        buf.insert_char('r');
        assert_eq!(buf.line_at(0), Some("gr".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
    }

    #[test]
    fn test_insert_char_in_middle() {
        let mut buf = EditorBuffer::from_text("gaph");
        buf.move_cursor(Direction::Right);
        buf.insert_char('r');
        assert_eq!(buf.line_at(0), Some("graph".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
    }

    #[test]
    fn test_insert_multibyte_char() {
        let mut buf = EditorBuffer::from_text("node");
        buf.move_end();
        buf.insert_char('é');
        assert_eq!(buf.line_at(0), Some("nodeé".to_string()));
        assert_eq!(buf.cursor().col, 6);
    }

    // --- String insertion ---

    #[test]
    fn test_insert_str_multiline_moves_cursor_to_end() {
        let mut buf = EditorBuffer::empty();
        buf.insert_str("graph TD\n    A --> B");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.cursor(), Cursor::at(1, 12));
    }

    #[test]
    fn test_insert_str_empty_is_noop() {
        let mut buf = EditorBuffer::from_text("graph");
        buf.insert_str("");
        assert_eq!(buf.text(), "graph");
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
    }

    // --- Line splitting (Enter) ---

    #[test]
    fn test_split_line_in_middle() {
        let mut buf = EditorBuffer::from_text("graph TD");
        buf.move_to(0, 5);
        buf.split_line();
        assert_eq!(buf.line_at(0), Some("graph".to_string()));
        assert_eq!(buf.line_at(1), Some(" TD".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_split_line_at_end_appends_empty_line() {
        let mut buf = EditorBuffer::from_text("graph TD");
        buf.move_end();
        buf.split_line();
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(1), Some(String::new()));
    }

    // --- Deletion ---

    #[test]
    fn test_delete_back_at_origin_is_noop() {
        let mut buf = EditorBuffer::from_text("graph");
        assert!(!buf.delete_back());
        assert_eq!(buf.text(), "graph");
    }

    #[test]
    fn test_delete_back_removes_char() {
        let mut buf = EditorBuffer::from_text("graph");
        buf.move_end();
        assert!(buf.delete_back());
        assert_eq!(buf.line_at(0), Some("grap".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 4));
    }

    #[test]
    fn test_delete_back_joins_lines() {
        let mut buf = EditorBuffer::from_text("graph\nTD");
        buf.move_to(1, 0);
        buf.delete_back();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some("graphTD".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_delete_back_multibyte() {
        let mut buf = EditorBuffer::from_text("café");
        buf.move_end();
        buf.delete_back();
        assert_eq!(buf.line_at(0), Some("caf".to_string()));
    }

    #[test]
    fn test_delete_forward_at_buffer_end_is_noop() {
        let mut buf = EditorBuffer::from_text("graph");
        buf.move_end();
        assert!(!buf.delete_forward());
    }

    #[test]
    fn test_delete_forward_joins_lines() {
        let mut buf = EditorBuffer::from_text("graph\nTD");
        buf.move_to(0, 5);
        buf.delete_forward();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some("graphTD".to_string()));
    }

    // --- Cursor movement ---

    #[test]
    fn test_move_left_wraps_to_prev_line() {
        let mut buf = EditorBuffer::from_text("graph\nTD");
        buf.move_to(1, 0);
        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_move_right_wraps_to_next_line() {
        let mut buf = EditorBuffer::from_text("graph\nTD");
        buf.move_to(0, 5);
        buf.move_cursor(Direction::Right);
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_vertical_movement_clamps_to_line_length() {
        let mut buf = EditorBuffer::from_text("graph TD\nA\nsubgraph S");
        buf.move_to(0, 7);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().col, 1);
    }

    #[test]
    fn test_sticky_column_restored_past_short_line() {
        let mut buf = EditorBuffer::from_text("graph TD\nA\nsubgraph S");
        buf.move_to(0, 7);
        buf.move_cursor(Direction::Down); // "A" clamps to col 1
        buf.move_cursor(Direction::Down); // restored from memory
        assert_eq!(buf.cursor().line, 2);
        assert_eq!(buf.cursor().col, 7);
    }

    #[test]
    fn test_move_home_and_end() {
        let mut buf = EditorBuffer::from_text("graph TD");
        buf.move_to(0, 4);
        buf.move_home();
        assert_eq!(buf.cursor().col, 0);
        buf.move_end();
        assert_eq!(buf.cursor().col, 8);
    }

    #[test]
    fn test_move_word_right_then_left() {
        let mut buf = EditorBuffer::from_text("graph TD");
        buf.move_word_right();
        assert_eq!(buf.cursor().col, 6); // start of "TD"
        buf.move_word_left();
        assert_eq!(buf.cursor().col, 0);
    }

    #[test]
    fn test_move_word_right_wraps_at_line_end() {
        let mut buf = EditorBuffer::from_text("graph\nTD");
        buf.move_to(0, 5);
        buf.move_word_right();
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_move_to_clamps_line_and_col() {
        let mut buf = EditorBuffer::from_text("graph");
        buf.move_to(100, 100);
        assert_eq!(buf.cursor().line, 0);
        assert_eq!(buf.cursor().col, 5);
    }

    #[test]
    fn test_move_to_start_and_end_of_buffer() {
        let mut buf = EditorBuffer::from_text("graph\nTD");
        buf.move_to_end();
        assert_eq!(buf.cursor(), Cursor::at(1, 2));
        buf.move_to_start();
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
    }

    // --- Editing sequences ---

    #[test]
    fn test_type_backspace_type_sequence() {
        let mut buf = EditorBuffer::empty();
        for ch in "grapj".chars() {
            buf.insert_char(ch);
        }
        buf.delete_back();
        buf.insert_char('h');
        assert_eq!(buf.line_at(0), Some("graph".to_string()));
    }

    #[test]
    fn test_split_and_rejoin() {
        let mut buf = EditorBuffer::from_text("graphTD");
        buf.move_to(0, 5);
        buf.split_line();
        assert_eq!(buf.line_count(), 2);
        buf.delete_back();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some("graphTD".to_string()));
    }
}
