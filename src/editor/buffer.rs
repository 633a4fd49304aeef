use ropey::Rope;
use thiserror::Error;

/// A selection range in char offsets, normalized so `start <= end`.
///
/// An empty selection (`start == end`) is a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Inclusive start offset in chars.
    pub start: usize,
    /// Exclusive end offset in chars.
    pub end: usize,
}

impl Selection {
    /// Create a collapsed selection (caret) at `offset`.
    pub const fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Create a selection from two offsets in either order.
    pub const fn span(a: usize, b: usize) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Whether the selection is a caret.
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Selection length in chars.
    pub const fn len(&self) -> usize {
        self.end - self.start
    }
}

/// Cursor position derived from the selection head, 1-based for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub line: usize,
    pub column: usize,
}

/// Errors from buffer edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    /// The edit range falls outside the document or is not ordered.
    #[error("range {start}..{end} is invalid for a document of {len} chars")]
    InvalidRange {
        start: usize,
        end: usize,
        len: usize,
    },
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// The markdown document plus its active selection.
///
/// Backed by a rope for efficient edits. The selection is kept as an
/// anchor/head pair so extension (shift+movement) knows which side moves;
/// [`TextBuffer::selection`] exposes the normalized range. Every mutation
/// bumps a revision counter so callers can observe document changes without
/// diffing text.
pub struct TextBuffer {
    rope: Rope,
    anchor: usize,
    head: usize,
    /// Remembered column for vertical movement (sticky column).
    col_memory: usize,
    revision: u64,
    dirty: bool,
}

impl TextBuffer {
    /// Create a buffer from a string with the caret at the start.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            anchor: 0,
            head: 0,
            col_memory: 0,
            revision: 0,
            dirty: false,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The full document text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Document length in chars.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// The normalized selection range.
    pub const fn selection(&self) -> Selection {
        Selection::span(self.anchor, self.head)
    }

    /// The text covered by the current selection.
    pub fn selected_text(&self) -> String {
        let sel = self.selection();
        self.rope.slice(sel.start..sel.end).to_string()
    }

    /// Counter bumped on every document mutation.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the document has changed since the last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean after a save.
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Set the selection, clamping both ends to the document length.
    pub fn set_selection(&mut self, selection: Selection) {
        let len = self.rope.len_chars();
        self.anchor = selection.start.min(len);
        self.head = selection.end.min(len);
        self.col_memory = self.head_column();
    }

    /// Select the entire document.
    pub fn select_all(&mut self) {
        self.anchor = 0;
        self.head = self.rope.len_chars();
        self.col_memory = self.head_column();
    }

    /// Cursor position derived from the selection head (1-based).
    pub fn cursor_position(&self) -> CursorPosition {
        let line = self.rope.char_to_line(self.head);
        let column = self.head - self.rope.line_to_char(line);
        CursorPosition {
            line: line + 1,
            column: column + 1,
        }
    }

    /// Replace `range` with `replacement`, collapsing the selection at
    /// `range.start + replacement.chars().count()`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidRange`] (leaving the buffer untouched)
    /// when the range is not ordered or extends past the document.
    pub fn apply(&mut self, range: Selection, replacement: &str) -> Result<(), BufferError> {
        let caret = range.start + replacement.chars().count();
        self.apply_with_cursor(range, replacement, caret)
    }

    /// Replace `range` with `replacement` and place the caret at an explicit
    /// offset. The formatting transforms use this to land the caret inside
    /// placeholder markers.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidRange`] when the range is out of bounds.
    pub fn apply_with_cursor(
        &mut self,
        range: Selection,
        replacement: &str,
        caret: usize,
    ) -> Result<(), BufferError> {
        let len = self.rope.len_chars();
        if range.start > range.end || range.end > len {
            return Err(BufferError::InvalidRange {
                start: range.start,
                end: range.end,
                len,
            });
        }
        self.rope.remove(range.start..range.end);
        self.rope.insert(range.start, replacement);
        let caret = caret.min(self.rope.len_chars());
        self.anchor = caret;
        self.head = caret;
        self.col_memory = self.head_column();
        self.revision += 1;
        self.dirty = true;
        Ok(())
    }

    /// Replace the whole document. Selection collapses to the start.
    pub fn replace_all(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.anchor = 0;
        self.head = 0;
        self.col_memory = 0;
        self.revision += 1;
        self.dirty = true;
    }

    /// Insert text at the selection, replacing any selected range.
    pub fn insert(&mut self, text: &str) {
        // The live selection is always in bounds, so apply cannot fail here.
        let _ = self.apply(self.selection(), text);
    }

    /// Insert a single character at the selection.
    pub fn insert_char(&mut self, ch: char) {
        let mut tmp = [0_u8; 4];
        self.insert(ch.encode_utf8(&mut tmp));
    }

    /// Delete the selection, or the char before the caret (Backspace).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_back(&mut self) -> bool {
        let sel = self.selection();
        if !sel.is_empty() {
            let _ = self.apply(sel, "");
            return true;
        }
        if sel.start == 0 {
            return false;
        }
        let _ = self.apply(Selection::span(sel.start - 1, sel.start), "");
        true
    }

    /// Delete the selection, or the char at the caret (Delete).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_forward(&mut self) -> bool {
        let sel = self.selection();
        if !sel.is_empty() {
            let _ = self.apply(sel, "");
            return true;
        }
        if sel.start >= self.rope.len_chars() {
            return false;
        }
        let _ = self.apply(Selection::span(sel.start, sel.start + 1), "");
        true
    }

    /// Move the selection head; collapse unless `extend` is set.
    pub fn move_cursor(&mut self, direction: Direction, extend: bool) {
        match direction {
            Direction::Left => self.move_horizontal(-1, extend),
            Direction::Right => self.move_horizontal(1, extend),
            Direction::Up => self.move_vertical(-1, extend),
            Direction::Down => self.move_vertical(1, extend),
        }
    }

    /// Move to the beginning of the current line.
    pub fn move_home(&mut self, extend: bool) {
        let line = self.rope.char_to_line(self.head);
        self.place_head(self.rope.line_to_char(line), extend);
    }

    /// Move to the end of the current line.
    pub fn move_end(&mut self, extend: bool) {
        let line = self.rope.char_to_line(self.head);
        let target = self.rope.line_to_char(line) + self.line_len_chars(line);
        self.place_head(target, extend);
    }

    /// Move to the start of the document.
    pub fn move_doc_start(&mut self, extend: bool) {
        self.place_head(0, extend);
    }

    /// Move to the end of the document.
    pub fn move_doc_end(&mut self, extend: bool) {
        self.place_head(self.rope.len_chars(), extend);
    }

    /// Number of lines in the document.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Char offset of the first char of a line (for mapping the selection
    /// onto visible lines).
    pub fn line_start(&self, line_idx: usize) -> usize {
        let line = line_idx.min(self.rope.len_lines().saturating_sub(1));
        self.rope.line_to_char(line)
    }

    /// Content of a line without its trailing newline.
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let s = self.rope.line(line_idx).to_string();
        Some(s.trim_end_matches('\n').trim_end_matches('\r').to_string())
    }

    /// Word count of the trimmed document.
    pub fn word_count(&self) -> usize {
        let text = self.text();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            0
        } else {
            trimmed.split_whitespace().count()
        }
    }

    /// Char count of the trimmed document.
    pub fn char_count(&self) -> usize {
        self.text().trim().chars().count()
    }

    fn place_head(&mut self, target: usize, extend: bool) {
        self.head = target.min(self.rope.len_chars());
        if !extend {
            self.anchor = self.head;
        }
        self.col_memory = self.head_column();
    }

    fn head_column(&self) -> usize {
        let line = self.rope.char_to_line(self.head);
        self.head - self.rope.line_to_char(line)
    }

    fn line_len_chars(&self, line_idx: usize) -> usize {
        let line = self.rope.line(line_idx);
        let mut len = line.len_chars();
        let mut chars = line.chars_at(len);
        while let Some(ch) = chars.prev() {
            if ch == '\n' || ch == '\r' {
                len -= 1;
            } else {
                break;
            }
        }
        len
    }

    fn move_horizontal(&mut self, delta: isize, extend: bool) {
        let sel = self.selection();
        // Plain left/right with an active selection collapses to its edge.
        if !extend && !sel.is_empty() {
            let target = if delta < 0 { sel.start } else { sel.end };
            self.place_head(target, false);
            return;
        }
        let target = if delta < 0 {
            self.head.saturating_sub(1)
        } else {
            (self.head + 1).min(self.rope.len_chars())
        };
        self.place_head(target, extend);
    }

    fn move_vertical(&mut self, delta: isize, extend: bool) {
        let line = self.rope.char_to_line(self.head);
        let target_line = if delta < 0 {
            let Some(prev) = line.checked_sub(1) else {
                return;
            };
            prev
        } else {
            let next = line + 1;
            if next >= self.rope.len_lines() {
                return;
            }
            next
        };
        let col = self.col_memory.min(self.line_len_chars(target_line));
        self.head = self.rope.line_to_char(target_line) + col;
        if !extend {
            self.anchor = self.head;
        }
        // col_memory intentionally kept so a short line doesn't lose the column.
    }
}

impl std::fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextBuffer")
            .field(
                "rope",
                &format_args!("Rope({} chars)", self.rope.len_chars()),
            )
            .field("selection", &self.selection())
            .field("revision", &self.revision)
            .field("dirty", &self.dirty)
            .finish()
    }
}
