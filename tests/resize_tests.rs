//! Column resize: drag, clamp, auto-fit and the host notifications.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{engine_with, MockHost};
use gridview::{GridConfig, HitRegion, PointerEvent, ResizeController, ResizePhase};

/// Column 2 spans x = 200..350 with a 150px width.
fn host() -> MockHost {
    MockHost::new(100, 5).with_width(2, 150.0)
}

const HANDLE_X: f32 = 347.0;
const HEADER_Y: f32 = 10.0;

#[test]
fn test_handle_hit_region() {
    let grid = engine_with(host(), GridConfig::default());
    assert_eq!(grid.hit_test(HANDLE_X, HEADER_Y), HitRegion::ResizeHandle(2));
    assert_eq!(grid.hit_test(300.0, HEADER_Y), HitRegion::ColumnHeader(2));
}

#[test]
fn test_drag_resize_grows_then_clamps() {
    let mut grid = engine_with(host(), GridConfig::default());

    grid.pointer_down(PointerEvent::primary(HANDLE_X, HEADER_Y));
    assert!(grid.is_resizing());

    grid.pointer_move(PointerEvent::primary(HANDLE_X + 40.0, HEADER_Y));
    assert_eq!(grid.column_width(2), 190.0);

    grid.pointer_move(PointerEvent::primary(HANDLE_X - 200.0, HEADER_Y));
    assert_eq!(grid.column_width(2), 10.0);

    grid.pointer_up(PointerEvent::primary(HANDLE_X - 200.0, HEADER_Y));
    assert!(!grid.is_resizing());
    assert_eq!(grid.column_width(2), 10.0);

    assert_eq!(
        grid.host().resizes(),
        vec![
            (ResizePhase::Begin, 2, 150.0),
            (ResizePhase::Update, 2, 190.0),
            (ResizePhase::Update, 2, 10.0),
            (ResizePhase::End, 2, 10.0),
        ]
    );
}

#[test]
fn test_resize_does_not_touch_selection() {
    let mut grid = engine_with(host(), GridConfig::default());
    grid.pointer_down(PointerEvent::primary(HANDLE_X, HEADER_Y));
    grid.pointer_move(PointerEvent::primary(HANDLE_X + 10.0, 300.0));
    assert!(!grid.has_active_selection());
}

#[test]
fn test_min_width_from_config() {
    let config = GridConfig {
        min_column_width: 40.0,
        ..GridConfig::default()
    };
    let mut grid = engine_with(host(), config);
    grid.pointer_down(PointerEvent::primary(HANDLE_X, HEADER_Y));
    grid.pointer_up(PointerEvent::primary(0.0, HEADER_Y));
    assert_eq!(grid.column_width(2), 40.0);
}

#[test]
fn test_resized_width_moves_later_columns() {
    let mut grid = engine_with(host(), GridConfig::default());
    grid.pointer_down(PointerEvent::primary(HANDLE_X, HEADER_Y));
    grid.pointer_up(PointerEvent::primary(HANDLE_X + 50.0, HEADER_Y));
    // column 3 now starts at 400
    assert_eq!(grid.hit_test(390.0, 100.0), HitRegion::Cell(gridview::Coordinate::new(2, 2)));
    assert_eq!(grid.hit_test(410.0, 100.0), HitRegion::Cell(gridview::Coordinate::new(2, 3)));
}

#[test]
fn test_double_click_autofits_to_widest_rendered_cell() {
    let mut host = host();
    host.measured.insert((0, 2), 40.0);
    host.measured.insert((7, 2), 120.0);
    // outside the window: ignored
    host.measured.insert((90, 2), 900.0);
    let mut grid = engine_with(host, GridConfig::default());

    grid.pointer_down(PointerEvent::primary(HANDLE_X, HEADER_Y).with_click_count(2));
    assert!(!grid.is_resizing());
    assert_eq!(grid.column_width(2), 136.0);
    assert_eq!(grid.host().resizes(), vec![(ResizePhase::AutoFit, 2, 136.0)]);
}

#[test]
fn test_autofit_without_measurements_keeps_width() {
    let mut grid = engine_with(host(), GridConfig::default());
    assert!(!grid.autofit_column(2));
    assert_eq!(grid.column_width(2), 150.0);
}

#[test]
fn test_reset_column_width() {
    let mut grid = engine_with(host(), GridConfig::default());
    grid.set_column_width(2, 300.0);
    assert_eq!(grid.column_width(2), 300.0);
    grid.reset_column_width(2);
    assert_eq!(grid.column_width(2), 150.0);
}

#[test]
fn test_controller_cancel() {
    let mut ctl = ResizeController::new(10.0);
    ctl.begin(1, 100.0, 80.0);
    let drag = ctl.cancel().unwrap();
    assert_eq!(drag.original_width, 80.0);
    assert!(ctl.end(200.0).is_none());
}
