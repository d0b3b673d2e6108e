//! Read-only view of the rows a caret moves over.

/// Row content provider consumed by the cursor.
///
/// The cursor re-reads row content on every coordinate derivation, so an
/// implementation may change its text between calls.
pub trait Line {
    /// Returns the text of `row` without its line terminator.
    ///
    /// Rows past the end yield an empty string.
    fn content(&self, row: usize) -> String;

    /// Returns the number of rows.
    fn row_count(&self) -> usize;
}

impl Line for Vec<String> {
    fn content(&self, row: usize) -> String {
        self.get(row).cloned().unwrap_or_default()
    }

    fn row_count(&self) -> usize {
        self.len()
    }
}
