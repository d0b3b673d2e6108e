//! Logical and physical caret coordinates.

/// A logical position in the text as row and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Position {
    /// 0-indexed row number.
    pub row: usize,
    /// 0-indexed column (char offset within the row, 0 = before first char).
    pub column: usize,
}

impl Position {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.row.cmp(&other.row).then(self.column.cmp(&other.column))
    }
}

/// The state of a single caret position.
///
/// The physical fields are caches of the logical ones: `physical_row` is
/// always `row_height * logical_row` and `physical_column` the summed glyph
/// widths of the row content before `logical_column`. Only [`crate::Cursor`]
/// mutates a point, and it always updates both halves together.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub logical_row: usize,
    pub logical_column: usize,
    /// Pixel Y offset of the row's top edge.
    pub physical_row: f32,
    /// Pixel X offset of the caret.
    pub physical_column: f32,
}

impl Point {
    /// Returns the logical half of the point.
    pub fn position(&self) -> Position {
        Position::new(self.logical_row, self.logical_column)
    }
}

impl From<Point> for Position {
    fn from(point: Point) -> Self {
        point.position()
    }
}
