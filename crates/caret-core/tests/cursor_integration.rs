// Integration tests for the caret engine.
//
// These tests drive a Cursor wired to a shared rope buffer, a width table and
// a buffer-backed selection, the way an editor widget would.

use std::cell::RefCell;
use std::rc::Rc;

use caret_core::transform::{column_from_pixel_x, pixel_x_from_column};
use caret_core::{
    Cursor, Metrics, Position, RangeSelection, Selection, SelectionKind, SharedBuffer,
    TableDetector, UniformDetector,
};

const ROW_HEIGHT: f32 = 18.0;

struct Editor {
    buffer: SharedBuffer,
    selection: Rc<RefCell<RangeSelection>>,
    cursor: Cursor,
}

fn editor(text: &str) -> Editor {
    editor_with(text, TableDetector::new(1.0).with_width('é', 2.0))
}

fn editor_with(text: &str, detector: TableDetector) -> Editor {
    let buffer = SharedBuffer::from(text);
    let selection = Rc::new(RefCell::new(RangeSelection::new(buffer.clone())));
    let cursor = Cursor::new(
        Metrics::new(ROW_HEIGHT, 0.1),
        Rc::new(buffer.clone()),
        Rc::new(detector),
        selection.clone(),
    );
    Editor {
        buffer,
        selection,
        cursor,
    }
}

// ── Hit testing ────────────────────────────────────────────────────────

#[test]
fn test_variable_width_scenario() {
    let mut ed = editor("héllo");
    ed.cursor.set_logical_column(3);
    assert!((ed.cursor.physical_column() - 4.0).abs() < f32::EPSILON);

    // Edges of the third char ('l') are 4 and 5: 0.4 left vs 0.6 right.
    ed.cursor.set_physical_column(4.4);
    assert_eq!(ed.cursor.logical_column(), 3);
    assert!((ed.cursor.physical_column() - 4.0).abs() < f32::EPSILON);
}

#[test]
fn test_click_on_row_lower_edge_stays_on_row() {
    let mut ed = editor("one\ntwo\nthree");
    for k in 1..=3usize {
        ed.cursor.set_physical_row(ROW_HEIGHT * k as f32 - 0.05);
        assert_eq!(ed.cursor.logical_row(), k - 1);
        ed.cursor.set_physical_row(ROW_HEIGHT * k as f32);
        assert_eq!(ed.cursor.logical_row(), k - 1);
    }
}

#[test]
fn test_click_past_last_row_edge_does_not_leave_buffer() {
    let mut ed = editor("one\ntwo");
    ed.cursor.set_physical_position(100.0, ROW_HEIGHT * 2.0);
    assert_eq!(ed.cursor.position(), Position::new(1, 3));
    assert!((ed.cursor.physical_row() - ROW_HEIGHT).abs() < f32::EPSILON);
}

#[test]
fn test_exact_tie_snaps_left() {
    let mut ed = editor("aéb");
    // 'é' spans [1, 3); its midpoint is 2.
    ed.cursor.set_physical_column(2.0);
    assert_eq!(ed.cursor.logical_column(), 1);
    assert!((ed.cursor.physical_column() - 1.0).abs() < f32::EPSILON);
}

#[test]
fn test_round_trip_on_proportional_widths() {
    let detector = TableDetector::new(7.0)
        .with_width('i', 3.0)
        .with_width('m', 11.0)
        .with_width('W', 12.5);
    let content = "Wimmi will swim";
    let len = content.chars().count();
    for col in 0..=len {
        let x = pixel_x_from_column(content, col, &detector);
        assert_eq!(column_from_pixel_x(content, x, &detector).column, col);
    }
}

#[test]
fn test_empty_row_resolves_to_origin() {
    let mut ed = editor("text\n\nmore");
    ed.cursor.set_physical_position(30.0, ROW_HEIGHT + 1.0);
    assert_eq!(ed.cursor.position(), Position::new(1, 0));
    assert!(ed.cursor.physical_column().abs() < f32::EPSILON);
}

// ── Offsets ────────────────────────────────────────────────────────────

#[test]
fn test_offsets_follow_tracked_setters_only() {
    let mut ed = editor("0123456789\n0123456789\n0123456789");
    ed.cursor.set_logical_row(2);
    ed.cursor.set_logical_column(5);
    assert_eq!(ed.cursor.offset_row(), 2);
    assert_eq!(ed.cursor.offset_column(), 5);

    ed.cursor.set_row_without_offset(0);
    ed.cursor.set_column_without_offset(9);
    assert_eq!(ed.cursor.offset_row(), 2);
    assert_eq!(ed.cursor.offset_column(), 5);

    ed.cursor.reset_offset();
    assert_eq!(ed.cursor.offset_row(), 0);
    assert_eq!(ed.cursor.offset_column(), 0);
    assert_eq!(ed.cursor.position(), Position::new(0, 9));
}

// ── Vertical navigation ────────────────────────────────────────────────

#[test]
fn test_remembered_column_survives_short_row() {
    let mut ed = editor_with("abcdefghij\nabc\nabcdefghij", TableDetector::new(1.0));
    ed.cursor.set_logical_column(8);

    ed.cursor.move_down();
    ed.cursor.move_down();
    assert_eq!(ed.cursor.position(), Position::new(2, 8));
    ed.cursor.move_up();
    assert_eq!(ed.cursor.position(), Position::new(1, 3));
    ed.cursor.move_up();
    assert_eq!(ed.cursor.position(), Position::new(0, 8));
}

#[test]
fn test_remembered_column_is_visual_not_logical() {
    // Row 1 starts with a double-width glyph, so column 4 on row 0 (x = 4)
    // lines up with column 3 on row 1.
    let mut ed = editor("abcdef\néxyz");
    ed.cursor.set_logical_column(4);
    ed.cursor.move_down();
    assert_eq!(ed.cursor.position(), Position::new(1, 3));
    assert!((ed.cursor.physical_column() - 4.0).abs() < f32::EPSILON);
}

#[test]
fn test_cjk_rows_with_uniform_detector() {
    let buffer = SharedBuffer::from("漢字かな\nabcdefgh");
    let selection = Rc::new(RefCell::new(RangeSelection::new(buffer.clone())));
    let mut cursor = Cursor::new(
        Metrics::default(),
        Rc::new(buffer),
        Rc::new(UniformDetector::new(8.0)),
        selection,
    );
    cursor.move_to_column_end();
    assert!((cursor.physical_column() - 64.0).abs() < f32::EPSILON);
    cursor.move_down();
    assert_eq!(cursor.position(), Position::new(1, 8));
}

// ── Selection ──────────────────────────────────────────────────────────

#[test]
fn test_shift_select_then_delete() {
    let mut ed = editor("hello world");
    ed.cursor.set_logical_column(2);
    ed.cursor.set_selection_anchor(None);
    ed.cursor.set_logical_column(5);
    ed.cursor.update_selection_anchor(None);
    assert_eq!(ed.selection.borrow().kind(), SelectionKind::Single);
    assert_eq!(ed.cursor.selected_content().unwrap(), "llo");

    let before = ed.cursor.offset_column();
    let delta = ed.cursor.delete_selected_content().unwrap();
    assert_eq!(delta.row_delta, 0);
    assert_eq!(delta.column_delta, 3);
    assert_eq!(ed.cursor.position(), Position::new(0, 2));
    assert_eq!(ed.cursor.offset_column(), before - 3);
    assert_eq!(ed.buffer.borrow().to_string(), "he world");
}

#[test]
fn test_multi_row_selection_delete() {
    let mut ed = editor("first\nsecond\nthird\nfourth");
    ed.cursor.set_logical_row(3);
    ed.cursor.set_logical_column(2);
    ed.cursor.set_selection_anchor(None);
    ed.cursor.set_physical_position(3.0, 1.0);
    ed.cursor.update_selection_anchor(None);
    assert_eq!(ed.selection.borrow().kind(), SelectionKind::Multiple);

    ed.cursor.delete_selected_content().unwrap();
    assert_eq!(ed.buffer.borrow().to_string(), "firurth");
    assert_eq!(ed.cursor.position(), Position::new(0, 3));
    let around = ed.cursor.content_around();
    assert_eq!(around.before, "fir");
    assert_eq!(around.after, "urth");
}

#[test]
fn test_clear_selection_then_delete_fails_cleanly() {
    let mut ed = editor("abc");
    ed.cursor.set_selection_anchor(None);
    ed.cursor.move_to_column_end();
    ed.cursor.update_selection_anchor(None);
    ed.cursor.clear_selection();
    assert!(!ed.cursor.has_selection());
    assert!(ed.cursor.delete_selected_content().is_err());
    assert_eq!(ed.buffer.borrow().to_string(), "abc");
    assert_eq!(ed.cursor.position(), Position::new(0, 3));
}
