/// Glyph width measurement.
use std::collections::HashMap;

use unicode_width::UnicodeWidthChar;

/// Per-character pixel width measurement service.
pub trait Detector {
    /// Returns the rendered width of `ch` in pixels.
    fn measure(&self, ch: char) -> f32;
}

/// Measures every character as a multiple of a fixed cell width.
///
/// The multiple is the character's display width in terminal cells, so wide
/// CJK glyphs take two cells and combining marks take none. Control
/// characters (tab included) count as one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformDetector {
    pub cell_width: f32,
}

impl UniformDetector {
    pub fn new(cell_width: f32) -> Self {
        Self { cell_width }
    }
}

impl Detector for UniformDetector {
    fn measure(&self, ch: char) -> f32 {
        let cells = UnicodeWidthChar::width(ch).unwrap_or(1);
        cells as f32 * self.cell_width
    }
}

/// Measures characters from an explicit width table.
///
/// Characters missing from the table measure `fallback`. Useful when widths
/// were measured elsewhere (e.g. by a font shaper) or for deterministic tests.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    widths: HashMap<char, f32>,
    fallback: f32,
}

impl TableDetector {
    pub fn new(fallback: f32) -> Self {
        Self {
            widths: HashMap::new(),
            fallback,
        }
    }

    /// Adds or replaces the width of `ch`.
    pub fn with_width(mut self, ch: char, width: f32) -> Self {
        self.widths.insert(ch, width);
        self
    }
}

impl Detector for TableDetector {
    fn measure(&self, ch: char) -> f32 {
        self.widths.get(&ch).copied().unwrap_or(self.fallback)
    }
}
