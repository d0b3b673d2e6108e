/// Logical <-> physical coordinate transform.
///
/// Pure functions over one row of content at a time. Nothing here holds
/// state besides the row metrics, so every function is deterministic given
/// the row content, the detector and the metrics.
use crate::detector::Detector;

/// Downward bias applied before converting a pixel Y to a row.
///
/// A click exactly on the lower edge of a row must select that row instead
/// of rounding into the next one (which may not exist).
pub const DEFAULT_BOUNDARY_BIAS: f32 = 0.1;

/// Default fixed pixel height of a text row.
pub const DEFAULT_ROW_HEIGHT: f32 = 20.0;

/// Fixed row metrics used for vertical conversions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// Pixel height of every row.
    pub row_height: f32,
    /// Pixels subtracted from a Y offset before it is resolved to a row.
    pub boundary_bias: f32,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            boundary_bias: DEFAULT_BOUNDARY_BIAS,
        }
    }
}

impl Metrics {
    pub fn new(row_height: f32, boundary_bias: f32) -> Self {
        Self {
            row_height,
            boundary_bias,
        }
    }

    /// Resolves a pixel Y offset to the row containing it.
    ///
    /// The quotient is truncated toward zero, and anything that would land
    /// above row 0 saturates to row 0. Rows are capped at `isize::MAX` so
    /// they stay representable as signed offsets; keeping the row inside the
    /// text is up to the caller.
    pub fn row_from_pixel_y(&self, pixel_y: f32) -> usize {
        let row = ((pixel_y - self.boundary_bias) / self.row_height).trunc() as usize;
        row.min(isize::MAX as usize)
    }

    /// Returns the pixel Y offset of the top edge of `row`.
    pub fn pixel_y_from_row(&self, row: usize) -> f32 {
        self.row_height * row as f32
    }
}

/// Result of hit-testing a pixel X against a row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitColumn {
    /// The character boundary the hit snapped to, in pixels.
    pub pixel_x: f32,
    /// The column of that boundary.
    pub column: usize,
}

/// Sums the widths of the first `column` characters of `content`.
///
/// `column` may equal the content length (caret after the last character).
/// Columns past the end only count the characters that exist.
pub fn pixel_x_from_column(content: &str, column: usize, detector: &dyn Detector) -> f32 {
    content
        .chars()
        .take(column)
        .map(|ch| detector.measure(ch))
        .sum()
}

/// Hit-tests `pixel_x` against `content`, snapping to the nearest character
/// boundary.
///
/// Scans left to right; at the first character whose right edge reaches the
/// target, the hit snaps to the right edge only when it is strictly closer,
/// so an exact tie lands on the left edge. A target past the end of the row
/// resolves to the end of the row.
pub fn column_from_pixel_x(content: &str, pixel_x: f32, detector: &dyn Detector) -> HitColumn {
    let mut current_width = 0.0f32;
    let mut column = 0usize;

    for ch in content.chars() {
        let char_width = detector.measure(ch);
        current_width += char_width;

        if current_width >= pixel_x {
            let point_right = current_width;
            let point_left = current_width - char_width;

            let offset_right = point_right - pixel_x;
            let offset_left = pixel_x - point_left;

            return if offset_right < offset_left {
                HitColumn {
                    pixel_x: point_right,
                    column: column + 1,
                }
            } else {
                HitColumn {
                    pixel_x: point_left,
                    column,
                }
            };
        }
        column += 1;
    }

    HitColumn {
        pixel_x: current_width,
        column,
    }
}
