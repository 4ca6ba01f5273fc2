//! Row windowing: which rows are instantiated for a scroll offset.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_precision_loss
)]

mod common;

use common::{engine, engine_with, MockHost};
use gridview::{compute_window, GridConfig};
use proptest::prelude::*;
use test_case::test_case;

// =============================================================================
// COMPUTE WINDOW
// =============================================================================

#[test_case(1_000 ; "thousand rows")]
#[test_case(1_000_000 ; "million rows")]
#[test_case(u32::MAX ; "max rows")]
fn test_visible_count_independent_of_row_count(total: u32) {
    let w = compute_window(0.0, 500.0, 25.0, total);
    assert_eq!(w.visible_count, 20);
}

#[test_case(0.0, 0 ; "top")]
#[test_case(24.9, 0 ; "inside first row")]
#[test_case(25.0, 1 ; "row boundary")]
#[test_case(312.5, 12 ; "half row")]
fn test_start_row_floors(scroll_top: f32, start: u32) {
    assert_eq!(compute_window(scroll_top, 500.0, 25.0, 1_000).start_row, start);
}

#[test]
fn test_partial_viewport_row_counts() {
    // 510px shows a sliver of a 21st row
    assert_eq!(compute_window(0.0, 510.0, 25.0, 1_000).visible_count, 21);
}

#[test]
fn test_window_near_end_is_capped() {
    let w = compute_window(24_800.0, 500.0, 25.0, 1_000);
    assert_eq!(w.start_row, 992);
    assert_eq!(w.visible_count, 8);
    assert_eq!(w.pixel_offset, 24_800.0);
}

#[test]
fn test_scrolled_past_end_clamps_start() {
    let w = compute_window(1e9, 500.0, 25.0, 10);
    assert_eq!(w.start_row, 9);
    assert_eq!(w.visible_count, 1);
}

#[test]
fn test_degenerate_inputs() {
    assert!(compute_window(0.0, 500.0, 25.0, 0).is_empty());
    assert!(compute_window(0.0, 500.0, 0.0, 10).is_empty());
    assert!(compute_window(0.0, 500.0, f32::NAN, 10).is_empty());
    assert_eq!(compute_window(-50.0, 500.0, 25.0, 10).start_row, 0);
}

#[test]
fn test_overscan_extends_both_sides() {
    let w = compute_window(250.0, 500.0, 25.0, 1_000);
    assert_eq!(w.overscanned(3, 1_000), 7..33);
    assert_eq!(compute_window(0.0, 500.0, 25.0, 22).overscanned(5, 22), 0..22);
}

proptest! {
    #[test]
    fn prop_window_stays_in_bounds(
        scroll_top in 0.0f32..1.0e7,
        viewport in 0.0f32..4_000.0,
        row_height in 1.0f32..200.0,
        total in 0u32..2_000_000,
    ) {
        let w = compute_window(scroll_top, viewport, row_height, total);
        prop_assert!(u64::from(w.start_row) + u64::from(w.visible_count) <= u64::from(total));
        prop_assert!(w.visible_count as f32 <= (viewport / row_height).ceil());
        if total > 0 {
            prop_assert!(w.start_row < total);
        }
    }
}

// =============================================================================
// ENGINE WINDOW
// =============================================================================

#[test]
fn test_engine_renders_only_window() {
    let mut grid = engine(1_000_000, 5);
    let frame = grid.render();
    assert_eq!(frame.window.visible_count, 20);
    assert_eq!(frame.rows.len(), 20);
    assert_eq!(grid.host().render_calls, 20);
}

#[test]
fn test_engine_scroll_moves_window() {
    let mut grid = engine(1_000, 5);
    grid.scroll_to(0.0, 2_500.0);
    grid.animation_frame();
    let frame = grid.render();
    assert_eq!(frame.window.start_row, 100);
    assert_eq!(frame.pixel_offset, 2_500.0);
    assert_eq!(frame.row_indices.first(), Some(&100));
    assert_eq!(frame.row_indices.last(), Some(&119));
    // first row sits right under the header
    assert_eq!(frame.rows[0].top, 25.0);
}

#[test]
fn test_engine_scroll_clamps_to_content() {
    let mut grid = engine(30, 5);
    grid.scroll_to(0.0, 10_000.0);
    grid.animation_frame();
    assert_eq!(grid.viewport().scroll_top, 250.0);
    assert_eq!(grid.window().start_row, 10);
    assert_eq!(grid.window().visible_count, 20);
}

#[test]
fn test_fixed_rows_rendered_outside_window() {
    let config = GridConfig {
        fixed_row_indices: vec![0, 1, 500],
        ..GridConfig::default()
    };
    let mut grid = engine_with(MockHost::new(1_000, 5), config);
    grid.scroll_to(0.0, 5_000.0);
    grid.animation_frame();
    let frame = grid.render();

    assert_eq!(&frame.row_indices[..3], &[0, 1, 500]);
    assert!(frame.rows[..3].iter().all(|r| r.is_fixed));
    // pinned rows stay under the header
    assert_eq!(frame.rows[0].top, 25.0);
    assert_eq!(frame.rows[1].top, 50.0);
    // scrolled block starts after the pinned leading rows
    assert_eq!(frame.window.start_row, 202);
    assert_eq!(frame.rows[3].row, 202);
    assert_eq!(frame.rows[3].top, 75.0);
    // 450px body below two pinned rows
    assert_eq!(frame.rows.len(), 3 + 18);
}

#[test]
fn test_overscan_renders_extra_rows() {
    let config = GridConfig {
        overscan_rows: 2,
        ..GridConfig::default()
    };
    let mut grid = engine_with(MockHost::new(1_000, 5), config);
    grid.scroll_to(0.0, 250.0);
    grid.animation_frame();
    let frame = grid.render();
    assert_eq!(frame.row_indices.first(), Some(&8));
    assert_eq!(frame.row_indices.last(), Some(&31));
}

#[test]
fn test_empty_grid_renders_nothing() {
    let mut grid = engine(0, 5);
    let frame = grid.render();
    assert!(frame.rows.is_empty());
    assert!(frame.window.is_empty());
}
