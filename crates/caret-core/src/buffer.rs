/// Text buffer wrapping `ropey::Rope`, plus a shared handle that exposes it
/// as a [`Line`] provider.
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use anyhow::Result;
use ropey::Rope;

use crate::line::Line;
use crate::point::Position;

/// A text buffer backed by a rope data structure for efficient editing.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    rope: Rope,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rope)
    }
}

impl TextBuffer {
    /// Creates an empty text buffer.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Returns the number of lines in the buffer.
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    fn check_line(&self, line_idx: usize) -> Result<()> {
        if line_idx >= self.rope.len_lines() {
            anyhow::bail!(
                "line index {} out of bounds (buffer has {} lines)",
                line_idx,
                self.rope.len_lines()
            );
        }
        Ok(())
    }

    /// Returns the length of a line in characters, excluding any trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if the line index is out of bounds.
    pub fn line_len_chars(&self, line_idx: usize) -> Result<usize> {
        self.check_line(line_idx)?;
        let line = self.rope.line(line_idx);
        let len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            // Also strip \r in \r\n (CRLF) sequences
            if len > 1 && line.char(len - 2) == '\r' {
                return Ok(len - 2);
            }
            return Ok(len - 1);
        }
        Ok(len)
    }

    /// Returns the text of a line without its line ending.
    ///
    /// # Errors
    ///
    /// Returns an error if the line index is out of bounds.
    pub fn line_content(&self, line_idx: usize) -> Result<String> {
        let len = self.line_len_chars(line_idx)?;
        Ok(self.rope.line(line_idx).slice(..len).to_string())
    }

    /// Converts a logical position to a char index.
    ///
    /// # Errors
    ///
    /// Returns an error if the row is out of bounds or the column lies past
    /// the end of the row.
    pub fn position_to_char(&self, pos: Position) -> Result<usize> {
        let len = self.line_len_chars(pos.row)?;
        if pos.column > len {
            anyhow::bail!(
                "column {} out of bounds (line {} has {} chars)",
                pos.column,
                pos.row,
                len
            );
        }
        Ok(self.rope.line_to_char(pos.row) + pos.column)
    }

    /// Inserts text at the given char index.
    ///
    /// # Errors
    ///
    /// Returns an error if the char index is out of bounds.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> Result<()> {
        if char_idx > self.rope.len_chars() {
            anyhow::bail!(
                "insert position {} out of bounds (buffer has {} chars)",
                char_idx,
                self.rope.len_chars()
            );
        }
        self.rope.insert(char_idx, text);
        Ok(())
    }

    /// Removes the character range [start..end) from the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is out of bounds.
    pub fn remove(&mut self, start: usize, end: usize) -> Result<()> {
        self.check_range(start, end)?;
        self.rope.remove(start..end);
        Ok(())
    }

    /// Returns the text in the char range [start..end).
    ///
    /// # Errors
    ///
    /// Returns an error if the range is out of bounds.
    pub fn slice_to_string(&self, start: usize, end: usize) -> Result<String> {
        self.check_range(start, end)?;
        Ok(self.rope.slice(start..end).to_string())
    }

    fn check_range(&self, start: usize, end: usize) -> Result<()> {
        if start > end {
            anyhow::bail!("invalid range: start ({}) > end ({})", start, end);
        }
        if end > self.rope.len_chars() {
            anyhow::bail!(
                "range end {} out of bounds (buffer has {} chars)",
                end,
                self.rope.len_chars()
            );
        }
        Ok(())
    }
}

/// Shared, single-threaded handle to a [`TextBuffer`].
///
/// Cloning the handle shares the buffer, so a cursor's row provider and a
/// selection can read and edit the same text.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Rc<RefCell<TextBuffer>>,
}

impl From<&str> for SharedBuffer {
    fn from(text: &str) -> Self {
        Self::new(TextBuffer::from(text))
    }
}

impl SharedBuffer {
    pub fn new(buffer: TextBuffer) -> Self {
        Self {
            inner: Rc::new(RefCell::new(buffer)),
        }
    }

    /// Borrows the buffer for reading.
    pub fn borrow(&self) -> Ref<'_, TextBuffer> {
        self.inner.borrow()
    }

    /// Borrows the buffer for editing.
    pub fn borrow_mut(&self) -> RefMut<'_, TextBuffer> {
        self.inner.borrow_mut()
    }
}

impl Line for SharedBuffer {
    fn content(&self, row: usize) -> String {
        self.inner.borrow().line_content(row).unwrap_or_default()
    }

    fn row_count(&self) -> usize {
        self.inner.borrow().len_lines()
    }
}
