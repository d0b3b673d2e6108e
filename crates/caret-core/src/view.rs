//! Render notifications emitted by the cursor.

/// Presentational activation state of the caret (maps to a blink toggle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaretState {
    /// The caret is shown and blinking.
    Active,
    /// The caret is hidden or drawn dimmed.
    #[default]
    Inactive,
}

/// Render surface that places the caret.
///
/// Coordinates never flow back from the view; it only observes.
pub trait CaretView {
    /// Called after any coordinate change with the caret's pixel position.
    fn caret_moved(&mut self, x: f32, y: f32);

    /// Called when the caret is activated or deactivated.
    fn caret_state_changed(&mut self, state: CaretState);
}

/// A view that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullView;

impl CaretView for NullView {
    fn caret_moved(&mut self, _x: f32, _y: f32) {}

    fn caret_state_changed(&mut self, _state: CaretState) {}
}
