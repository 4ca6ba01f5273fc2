//! Engine control surface: host notifications, re-windowing and focus.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{click, col_x, engine, press_with, row_y, HostEvent};
use gridview::{
    CaretPlacement, Coordinate, GridConfig, GridEngine, GridError, Key, Modifiers, PointerButton, PointerEvent,
    RowEvent, SelectionRect,
};

// =============================================================================
// CONSTRUCTION
// =============================================================================

#[test]
fn test_invalid_config_is_rejected() {
    let config = GridConfig {
        cell_height: -1.0,
        ..GridConfig::default()
    };
    let err = GridEngine::new(common::MockHost::new(10, 2), config).unwrap_err();
    assert!(matches!(err, GridError::Config(_)));
}

#[test]
fn test_fresh_engine_is_idle() {
    let grid = engine(10, 3);
    assert!(!grid.has_active_selection());
    assert!(!grid.editor().is_editing());
    assert!(!grid.is_focused());
    assert_eq!(grid.bounds().rows, 10);
    assert_eq!(grid.bounds().cols, 3);
}

// =============================================================================
// HOST NOTIFICATIONS
// =============================================================================

#[test]
fn test_right_click_opens_context_menu() {
    let mut grid = engine(10, 3);
    let event = PointerEvent::primary(col_x(1), row_y(4)).with_button(PointerButton::Secondary);
    assert!(grid.pointer_down(event));
    assert_eq!(
        grid.host().events,
        vec![HostEvent::ContextMenu { row: 4, col: 1 }]
    );
    // the cell under the pointer becomes the selection
    assert_eq!(
        grid.selection().rect(),
        Some(SelectionRect::single(Coordinate::new(4, 1)))
    );
    assert!(!grid.is_dragging());
}

#[test]
fn test_right_click_keeps_existing_range() {
    let mut grid = engine(10, 3);
    click(&mut grid, 1, 0);
    let ctrl_shift = Modifiers {
        shift: true,
        ..Modifiers::CTRL
    };
    press_with(&mut grid, Key::End, ctrl_shift);
    let event = PointerEvent::primary(col_x(1), row_y(4)).with_button(PointerButton::Secondary);
    grid.pointer_down(event);
    assert_eq!(grid.selection().anchor(), Some(Coordinate::new(1, 0)));
    assert_eq!(grid.selection().focus(), Some(Coordinate::new(9, 2)));
}

#[test]
fn test_insert_and_delete_requests() {
    let mut grid = engine(10, 3);
    click(&mut grid, 6, 1);
    assert!(press_with(&mut grid, Key::Insert, Modifiers::NONE));
    // plain delete is not a row command
    assert!(!press_with(&mut grid, Key::Delete, Modifiers::NONE));
    assert!(press_with(&mut grid, Key::Delete, Modifiers::CTRL));

    let expected = RowEvent {
        row: Some(6),
        source_id: None,
        as_child: false,
    };
    assert_eq!(
        grid.host().events,
        vec![
            HostEvent::AddRow(expected.clone()),
            HostEvent::DeleteRow(expected)
        ]
    );
}

#[test]
fn test_insert_without_selection_has_no_row() {
    let mut grid = engine(10, 3);
    press_with(&mut grid, Key::Insert, Modifiers::NONE);
    let HostEvent::AddRow(event) = &grid.host().events[0] else {
        panic!("expected an add-row request");
    };
    assert_eq!(event.row, None);
}

// =============================================================================
// RE-WINDOWING
// =============================================================================

#[test]
fn test_every_render_gets_a_new_epoch() {
    let mut grid = engine(100, 3);
    let first = grid.render().epoch;
    assert!(!grid.needs_render());
    grid.force_rerender();
    assert!(grid.needs_render());
    let second = grid.render().epoch;
    assert_eq!(second, first.wrapping_add(1));
}

#[test]
fn test_shrinking_rows_clamps_scroll_and_selection() {
    let mut grid = engine(1_000, 3);
    grid.scroll_to(0.0, 20_000.0);
    grid.animation_frame();
    // row 805 sits fifth from the top of the scrolled window
    grid.pointer_down(PointerEvent::primary(col_x(2), row_y(5)));
    assert_eq!(grid.selection().focus(), Some(Coordinate::new(805, 2)));

    grid.host_mut().rows = 50;
    grid.recompute_after_resize();
    assert_eq!(grid.viewport().scroll_top, 750.0);
    assert_eq!(grid.window().start_row, 30);
    assert_eq!(grid.selection().focus(), Some(Coordinate::new(49, 2)));

    grid.host_mut().rows = 0;
    grid.recompute_after_resize();
    assert!(!grid.has_active_selection());
    assert!(grid.window().is_empty());
}

#[test]
fn test_row_insertion_shifts_selection() {
    let mut grid = engine(100, 3);
    click(&mut grid, 3, 1);
    grid.host_mut().rows = 102;
    grid.recompute_after_row_insertion(2);
    assert_eq!(grid.selection().focus(), Some(Coordinate::new(5, 1)));
    grid.host_mut().rows = 101;
    grid.recompute_after_row_insertion(-1);
    assert_eq!(grid.selection().focus(), Some(Coordinate::new(4, 1)));
}

#[test]
fn test_row_insertion_below_selection_leaves_it() {
    let mut grid = engine(100, 3);
    click(&mut grid, 3, 1);
    grid.host_mut().rows = 101;
    grid.recompute_after_row_insertion_at(10, 1);
    assert_eq!(grid.selection().focus(), Some(Coordinate::new(3, 1)));
}

#[test]
fn test_viewport_resize_changes_window() {
    let mut grid = engine(1_000, 3);
    assert_eq!(grid.window().visible_count, 20);
    grid.resize_viewport(800.0, 1_025.0);
    assert_eq!(grid.window().visible_count, 40);
}

#[test]
fn test_resolve_row_index_from_pointer() {
    let mut grid = engine(1_000, 3);
    assert_eq!(grid.resolve_row_index_from_pointer(10.0, 10.0), None);
    assert_eq!(grid.resolve_row_index_from_pointer(10.0, row_y(3)), Some(3));
    grid.scroll_to(0.0, 250.0);
    grid.animation_frame();
    assert_eq!(grid.resolve_row_index_from_pointer(10.0, row_y(3)), Some(13));
}

#[test]
fn test_scrollbar_gutter_has_no_row() {
    let config = GridConfig {
        scrollbar_size: 10.0,
        ..GridConfig::default()
    };
    let grid = common::engine_with(common::MockHost::new(1_000, 10), config);
    assert_eq!(grid.resolve_row_index_from_pointer(400.0, row_y(3)), Some(3));
    assert_eq!(grid.resolve_row_index_from_pointer(795.0, row_y(3)), None);
    assert_eq!(grid.resolve_row_index_from_pointer(400.0, 520.0), None);
}

// =============================================================================
// FOCUS
// =============================================================================

#[test]
fn test_focus_and_blur() {
    let mut grid = engine(10, 3);
    grid.focus();
    assert!(grid.is_focused());
    grid.blur();
    assert!(!grid.is_focused());
}

#[test]
fn test_pointer_down_focuses_grid() {
    let mut grid = engine(10, 3);
    click(&mut grid, 1, 1);
    assert!(grid.is_focused());
}

#[test]
fn test_dom_key_names() {
    let mut grid = engine(10, 3);
    click(&mut grid, 1, 1);
    assert!(grid.key_down_dom("ArrowDown", Modifiers::NONE));
    assert_eq!(grid.selection().focus(), Some(Coordinate::new(2, 1)));
    assert!(grid.key_down_dom("ArrowRight", Modifiers::SHIFT));
    assert_eq!(grid.selection().anchor(), Some(Coordinate::new(2, 1)));
    assert_eq!(grid.selection().focus(), Some(Coordinate::new(2, 2)));
    assert!(!grid.key_down_dom("Unidentified", Modifiers::NONE));
}

// =============================================================================
// ROLLBACK
// =============================================================================

#[test]
fn test_rollback_restores_interaction_state() {
    let mut grid = engine(1_000, 3);
    click(&mut grid, 3, 1);
    let checkpoint = grid.checkpoint();
    let epoch = grid.render().epoch;

    grid.key_down_dom("ArrowDown", Modifiers::NONE);
    grid.scroll_to(0.0, 500.0);
    grid.animation_frame();
    grid.open_editor(Coordinate::new(30, 2), CaretPlacement::End);
    grid.blur();

    grid.rollback(checkpoint);
    assert_eq!(grid.selection().focus(), Some(Coordinate::new(3, 1)));
    assert!(!grid.editor().is_editing());
    assert!(grid.is_focused());
    assert_eq!(grid.viewport().scroll_top, 0.0);
    assert_eq!(grid.window().start_row, 0);
    // the render after the checkpoint is undone too
    assert_eq!(grid.render().epoch, epoch);
}
