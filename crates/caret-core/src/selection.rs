/// Selection contract consumed by the cursor, and a buffer-backed
/// implementation of it.
use anyhow::Result;

use crate::buffer::SharedBuffer;
use crate::point::{Point, Position};

/// How many rows a selection spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    /// No selection, or a collapsed one.
    NotExist,
    /// Start and end on the same row.
    Single,
    /// End on the row right after start.
    Double,
    /// Three or more rows.
    Multiple,
}

impl SelectionKind {
    /// Classifies the range between `start` and `end`, in either order.
    pub fn of(start: Position, end: Position) -> Self {
        if start == end {
            return Self::NotExist;
        }
        match end.row.abs_diff(start.row) {
            0 => Self::Single,
            1 => Self::Double,
            _ => Self::Multiple,
        }
    }
}

/// How far the text after a removed range moved back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemovalDelta {
    pub row_delta: isize,
    pub column_delta: isize,
}

/// Highlighted column range `[from, to)` of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    pub row: usize,
    pub from: usize,
    pub to: usize,
}

/// Selection state machine as seen by the cursor.
pub trait Selection {
    fn kind(&self) -> SelectionKind;

    fn exists(&self) -> bool {
        self.kind() != SelectionKind::NotExist
    }

    /// Starts a selection at `point`, creating it if needed.
    fn set_anchor(&mut self, point: &Point);

    fn set_start(&mut self, point: &Point);

    fn set_end(&mut self, point: &Point);

    /// # Errors
    ///
    /// Returns an error if no selection has been anchored.
    fn start(&self) -> Result<Position>;

    /// # Errors
    ///
    /// Returns an error if no selection has been anchored.
    fn end(&self) -> Result<Position>;

    /// Deletes the selected text and collapses the selection to its start.
    ///
    /// # Errors
    ///
    /// Returns an error if no selection has been anchored or the text could
    /// not be edited.
    fn remove_content(&mut self) -> Result<RemovalDelta>;

    /// Extends the selection from its anchor to `point`.
    fn update_position(&mut self, point: &Point);

    /// Rebuilds the selection's view. With `validate`, a selection that no
    /// longer exists drops its view instead.
    fn refresh_view(&mut self, validate: bool);

    /// # Errors
    ///
    /// Returns an error if no selection has been anchored or its range is
    /// no longer valid for the text.
    fn content(&self) -> Result<String>;

    /// Forgets the selection.
    fn clear(&mut self);
}

/// A single contiguous selection over a [`SharedBuffer`].
#[derive(Debug, Clone)]
pub struct RangeSelection {
    buffer: SharedBuffer,
    anchor: Option<Position>,
    start: Position,
    end: Position,
    spans: Vec<RowSpan>,
}

impl RangeSelection {
    pub fn new(buffer: SharedBuffer) -> Self {
        Self {
            buffer,
            anchor: None,
            start: Position::default(),
            end: Position::default(),
            spans: Vec::new(),
        }
    }

    /// Returns the anchor, if a selection has been started.
    pub fn anchor(&self) -> Option<Position> {
        self.anchor
    }

    /// Returns the highlight spans computed by the last view refresh.
    pub fn spans(&self) -> &[RowSpan] {
        &self.spans
    }

    fn anchored(&self) -> Result<Position> {
        match self.anchor {
            Some(anchor) => Ok(anchor),
            None => anyhow::bail!("no selection has been anchored"),
        }
    }

    fn char_range(&self) -> Result<(usize, usize)> {
        let buffer = self.buffer.borrow();
        let start = buffer.position_to_char(self.start)?;
        let end = buffer.position_to_char(self.end)?;
        Ok((start, end))
    }
}

impl Selection for RangeSelection {
    fn kind(&self) -> SelectionKind {
        match self.anchor {
            Some(_) => SelectionKind::of(self.start, self.end),
            None => SelectionKind::NotExist,
        }
    }

    fn set_anchor(&mut self, point: &Point) {
        let pos = point.position();
        self.anchor = Some(pos);
        self.start = pos;
        self.end = pos;
    }

    fn set_start(&mut self, point: &Point) {
        let pos = point.position();
        if self.anchor.is_none() {
            self.anchor = Some(pos);
        }
        self.start = pos;
        if self.end < pos {
            self.end = pos;
        }
    }

    fn set_end(&mut self, point: &Point) {
        let pos = point.position();
        if self.anchor.is_none() {
            self.anchor = Some(pos);
        }
        self.end = pos;
        if self.start > pos {
            self.start = pos;
        }
    }

    fn start(&self) -> Result<Position> {
        self.anchored()?;
        Ok(self.start)
    }

    fn end(&self) -> Result<Position> {
        self.anchored()?;
        Ok(self.end)
    }

    fn remove_content(&mut self) -> Result<RemovalDelta> {
        self.anchored()?;
        let (start_char, end_char) = self.char_range()?;
        self.buffer.borrow_mut().remove(start_char, end_char)?;

        let delta = RemovalDelta {
            row_delta: self.end.row as isize - self.start.row as isize,
            column_delta: self.end.column as isize - self.start.column as isize,
        };
        tracing::debug!(
            "Removed {} chars, selection collapsed to {:?}",
            end_char - start_char,
            self.start
        );
        self.end = self.start;
        self.anchor = Some(self.start);
        Ok(delta)
    }

    fn update_position(&mut self, point: &Point) {
        let pos = point.position();
        match self.anchor {
            Some(anchor) => {
                self.start = anchor.min(pos);
                self.end = anchor.max(pos);
            }
            None => self.set_anchor(point),
        }
    }

    fn refresh_view(&mut self, validate: bool) {
        self.spans.clear();
        if self.anchor.is_none() || (validate && !self.exists()) {
            return;
        }
        let buffer = self.buffer.borrow();
        for row in self.start.row..=self.end.row {
            let from = if row == self.start.row {
                self.start.column
            } else {
                0
            };
            let to = if row == self.end.row {
                self.end.column
            } else {
                buffer.line_len_chars(row).unwrap_or(0)
            };
            self.spans.push(RowSpan { row, from, to });
        }
    }

    fn content(&self) -> Result<String> {
        self.anchored()?;
        let (start_char, end_char) = self.char_range()?;
        self.buffer.borrow().slice_to_string(start_char, end_char)
    }

    fn clear(&mut self) {
        self.anchor = None;
        self.start = Position::default();
        self.end = Position::default();
    }
}
