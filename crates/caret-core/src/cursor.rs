/// The movable caret: logical/physical coordinate state, movement offsets,
/// remembered column and selection delegation.
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use anyhow::Result;

use crate::detector::Detector;
use crate::line::Line;
use crate::point::{Point, Position};
use crate::selection::{RemovalDelta, Selection};
use crate::transform::{self, HitColumn, Metrics};
use crate::view::{CaretState, CaretView, NullView};

/// An optional pixel X offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelAnchor(Option<f32>);

impl PixelAnchor {
    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    pub fn set(&mut self, pixel_x: f32) {
        self.0 = Some(pixel_x);
    }

    pub fn reset(&mut self) {
        self.0 = None;
    }

    pub fn get(&self) -> Option<f32> {
        self.0
    }
}

/// Row content split at the caret.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentAround {
    pub before: String,
    pub after: String,
}

/// The caret of one editing context.
///
/// Every coordinate setter updates the logical and physical halves of the
/// point together and notifies the view before returning. The row provider,
/// detector and selection are shared with the rest of the editor; the cursor
/// only reads rows and measures glyphs, and re-reads row content on every
/// derivation.
///
/// Logical rows are not clamped. Callers keep them inside
/// `0..line.row_count()`; an out-of-range row yields a physical row outside
/// the visible area and empty content.
pub struct Cursor {
    metrics: Metrics,
    line: Rc<dyn Line>,
    detector: Rc<dyn Detector>,
    selection: Rc<RefCell<dyn Selection>>,
    view: Box<dyn CaretView>,
    point: Point,
    /// Signed row displacement since the last offset reset.
    offset_row: isize,
    /// Signed column displacement since the last offset reset.
    offset_column: isize,
    /// Visual column kept across a run of vertical moves.
    remembered_column: PixelAnchor,
    /// Pixel X anchor for horizontal drag handling.
    horizontal_anchor: PixelAnchor,
    state: CaretState,
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("metrics", &self.metrics)
            .field("point", &self.point)
            .field("offset_row", &self.offset_row)
            .field("offset_column", &self.offset_column)
            .field("remembered_column", &self.remembered_column)
            .field("horizontal_anchor", &self.horizontal_anchor)
            .field("state", &self.state)
            .finish()
    }
}

impl Cursor {
    /// Creates a cursor at the origin with a view that ignores notifications.
    pub fn new(
        metrics: Metrics,
        line: Rc<dyn Line>,
        detector: Rc<dyn Detector>,
        selection: Rc<RefCell<dyn Selection>>,
    ) -> Self {
        Self {
            metrics,
            line,
            detector,
            selection,
            view: Box::new(NullView),
            point: Point::default(),
            offset_row: 0,
            offset_column: 0,
            remembered_column: PixelAnchor::default(),
            horizontal_anchor: PixelAnchor::default(),
            state: CaretState::default(),
        }
    }

    /// Replaces the render surface notified on coordinate changes.
    pub fn with_view(mut self, view: Box<dyn CaretView>) -> Self {
        self.view = view;
        self
    }

    pub fn point(&self) -> Point {
        self.point
    }

    /// Returns the current logical position.
    pub fn position(&self) -> Position {
        self.point.position()
    }

    // ── Coordinate transform ─────────────────────────────────────────

    fn current_content(&self) -> String {
        self.line.content(self.point.logical_row)
    }

    fn pixel_x_from_column(&self, column: usize) -> f32 {
        transform::pixel_x_from_column(&self.current_content(), column, &*self.detector)
    }

    fn column_from_pixel_x(&self, pixel_x: f32) -> HitColumn {
        transform::column_from_pixel_x(&self.current_content(), pixel_x, &*self.detector)
    }

    fn notify(&mut self) {
        tracing::trace!(
            "Caret at {:?} ({}, {})",
            self.point.position(),
            self.point.physical_column,
            self.point.physical_row
        );
        let (x, y) = (self.point.physical_column, self.point.physical_row);
        self.view.caret_moved(x, y);
    }

    // ── Coordinate properties ────────────────────────────────────────

    pub fn logical_row(&self) -> usize {
        self.point.logical_row
    }

    pub fn logical_column(&self) -> usize {
        self.point.logical_column
    }

    pub fn physical_row(&self) -> f32 {
        self.point.physical_row
    }

    pub fn physical_column(&self) -> f32 {
        self.point.physical_column
    }

    /// Moves to `row`, counting the move in the row offset.
    ///
    /// The logical column is kept as is; its pixel offset is re-derived
    /// against the new row's content.
    pub fn set_logical_row(&mut self, row: usize) {
        self.offset_row += row as isize - self.point.logical_row as isize;
        self.set_row_without_offset(row);
    }

    /// Moves to `column` of the current row, counting the move in the
    /// column offset.
    pub fn set_logical_column(&mut self, column: usize) {
        self.offset_column += column as isize - self.point.logical_column as isize;
        self.set_column_without_offset(column);
    }

    /// Moves to the row containing `pixel_y`, through [`Self::set_logical_row`].
    pub fn set_physical_row(&mut self, pixel_y: f32) {
        let row = self.metrics.row_from_pixel_y(pixel_y);
        self.set_logical_row(row);
    }

    /// Moves to the character boundary of the current row nearest to
    /// `pixel_x`.
    ///
    /// The snapped pixel offset is stored, never the raw input. The column
    /// offset is left untouched. Ends any run of vertical moves.
    pub fn set_physical_column(&mut self, pixel_x: f32) {
        self.remembered_column.reset();
        let hit = self.column_from_pixel_x(pixel_x);
        self.point.physical_column = hit.pixel_x;
        self.point.logical_column = hit.column;
        self.notify();
    }

    /// Moves to `row` without counting it as user movement.
    pub fn set_row_without_offset(&mut self, row: usize) {
        self.point.logical_row = row;
        self.point.physical_row = self.metrics.pixel_y_from_row(row);
        self.point.physical_column = self.pixel_x_from_column(self.point.logical_column);
        self.notify();
    }

    /// Moves to `column` without counting it as user movement.
    pub fn set_column_without_offset(&mut self, column: usize) {
        self.point.logical_column = column;
        self.point.physical_column = self.pixel_x_from_column(column);
        self.notify();
    }

    /// Resolves a click: row first, then the nearest column on that row.
    pub fn set_physical_position(&mut self, pixel_x: f32, pixel_y: f32) {
        self.set_physical_row(pixel_y);
        self.set_physical_column(pixel_x);
    }

    /// Re-sends the current pixel position to the view.
    pub fn update_view(&mut self) {
        self.notify();
    }

    // ── Offsets ──────────────────────────────────────────────────────

    pub fn offset_row(&self) -> isize {
        self.offset_row
    }

    pub fn offset_column(&self) -> isize {
        self.offset_column
    }

    pub fn reset_offset(&mut self) {
        self.offset_row = 0;
        self.offset_column = 0;
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Moves to the last row.
    pub fn move_to_row_end(&mut self) {
        self.set_logical_row(self.line.row_count().saturating_sub(1));
    }

    pub fn move_to_row_start(&mut self) {
        self.set_logical_row(0);
    }

    /// Moves after the last character of the current row.
    pub fn move_to_column_end(&mut self) {
        self.remembered_column.reset();
        let len = self.current_content().chars().count();
        self.set_logical_column(len);
    }

    pub fn move_to_column_start(&mut self) {
        self.remembered_column.reset();
        self.set_logical_column(0);
    }

    /// Moves one character left within the current row.
    pub fn move_left(&mut self) {
        self.remembered_column.reset();
        if self.point.logical_column > 0 {
            self.set_logical_column(self.point.logical_column - 1);
        }
    }

    /// Moves one character right within the current row.
    pub fn move_right(&mut self) {
        self.remembered_column.reset();
        let len = self.current_content().chars().count();
        if self.point.logical_column < len {
            self.set_logical_column(self.point.logical_column + 1);
        }
    }

    /// Moves one row up, keeping the visual column of the current run of
    /// vertical moves.
    pub fn move_up(&mut self) {
        if self.point.logical_row == 0 {
            return;
        }
        self.move_vertically(self.point.logical_row - 1);
    }

    /// Moves one row down, keeping the visual column of the current run of
    /// vertical moves.
    pub fn move_down(&mut self) {
        if self.point.logical_row + 1 >= self.line.row_count() {
            return;
        }
        self.move_vertically(self.point.logical_row + 1);
    }

    fn move_vertically(&mut self, row: usize) {
        let pixel_x = match self.remembered_column.get() {
            Some(x) => x,
            None => {
                let x = self.point.physical_column;
                self.remembered_column.set(x);
                x
            }
        };
        self.set_logical_row(row);
        let hit = self.column_from_pixel_x(pixel_x);
        self.set_logical_column(hit.column);
    }

    /// Splits the current row at the caret.
    pub fn content_around(&self) -> ContentAround {
        let content = self.current_content();
        let split = content
            .char_indices()
            .nth(self.point.logical_column)
            .map_or(content.len(), |(idx, _)| idx);
        ContentAround {
            before: content[..split].to_string(),
            after: content[split..].to_string(),
        }
    }

    // ── Remembered column and horizontal anchor ──────────────────────

    pub fn remembered_column(&self) -> PixelAnchor {
        self.remembered_column
    }

    pub fn remembered_column_mut(&mut self) -> &mut PixelAnchor {
        &mut self.remembered_column
    }

    pub fn horizontal_anchor(&self) -> PixelAnchor {
        self.horizontal_anchor
    }

    pub fn horizontal_anchor_mut(&mut self) -> &mut PixelAnchor {
        &mut self.horizontal_anchor
    }

    // ── Activation ───────────────────────────────────────────────────

    pub fn state(&self) -> CaretState {
        self.state
    }

    pub fn activate(&mut self) {
        self.state = CaretState::Active;
        self.view.caret_state_changed(self.state);
    }

    pub fn deactivate(&mut self) {
        self.state = CaretState::Inactive;
        self.view.caret_state_changed(self.state);
    }

    // ── Selection delegation ─────────────────────────────────────────
    //
    // Point arguments default to the caret's own point when `None`.

    pub fn has_selection(&self) -> bool {
        self.selection.borrow().exists()
    }

    pub fn set_selection_anchor(&mut self, point: Option<Point>) {
        let point = point.unwrap_or(self.point);
        tracing::debug!("Selection anchored at {:?}", point.position());
        self.selection.borrow_mut().set_anchor(&point);
    }

    pub fn set_selection_start(&mut self, point: Option<Point>) {
        let point = point.unwrap_or(self.point);
        self.selection.borrow_mut().set_start(&point);
    }

    pub fn set_selection_end(&mut self, point: Option<Point>) {
        let point = point.unwrap_or(self.point);
        self.selection.borrow_mut().set_end(&point);
    }

    /// Moves to the selection start as user movement.
    ///
    /// # Errors
    ///
    /// Propagates the selection's error when it has no start.
    pub fn jump_to_selection_start(&mut self) -> Result<()> {
        let start = self.selection.borrow().start()?;
        self.remembered_column.reset();
        self.set_logical_row(start.row);
        self.set_logical_column(start.column);
        Ok(())
    }

    /// Moves to the selection end as user movement.
    ///
    /// # Errors
    ///
    /// Propagates the selection's error when it has no end.
    pub fn jump_to_selection_end(&mut self) -> Result<()> {
        let end = self.selection.borrow().end()?;
        self.remembered_column.reset();
        self.set_logical_row(end.row);
        self.set_logical_column(end.column);
        Ok(())
    }

    /// Extends the selection from its anchor to `point`.
    pub fn update_selection_anchor(&mut self, point: Option<Point>) {
        let point = point.unwrap_or(self.point);
        self.selection.borrow_mut().update_position(&point);
    }

    pub fn refresh_selection_view(&mut self, validate: bool) {
        self.selection.borrow_mut().refresh_view(validate);
    }

    /// # Errors
    ///
    /// Propagates the selection's error.
    pub fn selected_content(&self) -> Result<String> {
        self.selection.borrow().content()
    }

    /// Deletes the selected text and snaps the caret to the collapsed start.
    ///
    /// The snap does not count as movement, and the offsets are then wound
    /// back by the removed span so consumers see the same displacement
    /// whether or not the caret already sat on the selection start.
    ///
    /// # Errors
    ///
    /// Propagates the selection's error; the caret is left untouched then.
    pub fn delete_selected_content(&mut self) -> Result<RemovalDelta> {
        let delta = self.selection.borrow_mut().remove_content()?;
        let start = self.selection.borrow().start()?;

        self.remembered_column.reset();
        self.set_row_without_offset(start.row);
        self.set_column_without_offset(start.column);

        // Known sharp edge: compensation for the offset-free snap above.
        self.offset_row -= delta.row_delta;
        self.offset_column -= delta.column_delta;

        tracing::debug!(
            "Deleted selection ({:?}), caret snapped to {:?}",
            delta,
            start
        );
        self.selection.borrow_mut().refresh_view(true);
        Ok(delta)
    }

    /// Forgets the selection and refreshes its view without validation.
    pub fn clear_selection(&mut self) {
        let mut selection = self.selection.borrow_mut();
        selection.clear();
        selection.refresh_view(false);
    }
}
