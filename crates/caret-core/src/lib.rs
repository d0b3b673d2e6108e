//! Caret and selection coordinate engine.
//!
//! Translates between logical positions (row/column indices into the text)
//! and physical positions (pixel offsets used for rendering and hit-testing),
//! and keeps a blinking caret consistent with a selection range while the
//! underlying text changes.
pub mod buffer;
pub mod cursor;
pub mod detector;
pub mod line;
pub mod point;
pub mod selection;
pub mod transform;
pub mod view;

pub use buffer::{SharedBuffer, TextBuffer};
pub use cursor::{ContentAround, Cursor, PixelAnchor};
pub use detector::{Detector, TableDetector, UniformDetector};
pub use line::Line;
pub use point::{Point, Position};
pub use selection::{RangeSelection, RemovalDelta, RowSpan, Selection, SelectionKind};
pub use transform::{HitColumn, Metrics};
pub use view::{CaretState, CaretView, NullView};
