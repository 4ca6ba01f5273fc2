//! Pixel <-> logical coordinate mapping and hit-region classification.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_precision_loss
)]

use gridview::layout::Geometry;
use gridview::{ColumnHit, Coordinate, GridBounds, GridConfig, HitRegion};
use proptest::prelude::*;
use test_case::test_case;

const H: f32 = 25.0;

fn config() -> GridConfig {
    GridConfig {
        cell_height: H,
        header_height: 30.0,
        fixed_column_pixel_width: 40.0,
        ..GridConfig::default()
    }
}

fn widths(col: u32) -> f32 {
    [80.0, 120.0, 60.0].get(col as usize).copied().unwrap_or(100.0)
}

// =============================================================================
// ROWS
// =============================================================================

// Body y = 0 is the top edge of the first scrolled row (y = 30).
#[test_case(30.0, 0.0, Some(0) ; "top of first row")]
#[test_case(30.0 + 37.0, 0.0, Some(0) ; "just above midline of row 1")]
#[test_case(30.0 + 38.0, 0.0, Some(1) ; "just below midline of row 1")]
#[test_case(30.0 + 62.0, 0.0, Some(1) ; "just above midline of row 2")]
#[test_case(30.0 + 63.0, 0.0, Some(2) ; "just below midline of row 2")]
#[test_case(30.0 + 38.0, 250.0, Some(11) ; "scrolled by ten rows")]
#[test_case(10.0, 0.0, None ; "header band")]
#[test_case(1.0e6, 0.0, Some(99) ; "past the end clamps")]
fn test_pixel_to_row_half_row_bias(y: f32, scroll_top: f32, expected: Option<u32>) {
    let cfg = config();
    let geo = Geometry::new(&cfg, GridBounds::new(100, 3), widths);
    assert_eq!(geo.pixel_to_row(y, scroll_top), expected);
}

#[test]
fn test_pinned_rows_do_not_scroll() {
    let cfg = GridConfig {
        fixed_row_indices: vec![0, 1],
        ..config()
    };
    let geo = Geometry::new(&cfg, GridBounds::new(100, 3), widths);
    assert_eq!(geo.body_top(), 80.0);
    // inside pinned row 1, whatever the scroll
    assert_eq!(geo.pixel_to_row(70.0, 5_000.0), Some(1));
    assert_eq!(geo.row_viewport_y(1, 5_000.0), 55.0);
    // first scrolled row is 2
    assert_eq!(geo.pixel_to_row(80.0, 0.0), Some(2));
    assert_eq!(geo.row_to_pixel(2), 0.0);
    assert_eq!(geo.content_height(), 98.0 * H);
}

#[test]
fn test_empty_grid_has_no_rows() {
    let cfg = config();
    let geo = Geometry::new(&cfg, GridBounds::new(0, 3), widths);
    assert_eq!(geo.pixel_to_row(100.0, 0.0), None);
    assert_eq!(geo.hit_test(100.0, 100.0, 0.0, 0.0, (800.0, 600.0)), HitRegion::Outside);
}

proptest! {
    /// The lower half of a row and the upper half of the next resolve to it.
    #[test]
    fn prop_row_pixel_round_trip(row in 1u32..5_000, lead in 0u32..20, frac in 0.55f32..1.45) {
        let cfg = config();
        let geo = Geometry::new(&cfg, GridBounds::new(10_000, 3), widths);
        let scroll_top = geo.row_to_pixel(row.saturating_sub(lead));
        let y = geo.row_viewport_y(row, scroll_top) + frac * H;
        prop_assert_eq!(geo.pixel_to_row(y, scroll_top), Some(row));
    }

    #[test]
    fn prop_upper_half_resolves_to_previous_row(row in 1u32..5_000, frac in 0.05f32..0.45) {
        let cfg = config();
        let geo = Geometry::new(&cfg, GridBounds::new(10_000, 3), widths);
        let scroll_top = geo.row_to_pixel(row - 1);
        let y = geo.row_viewport_y(row, scroll_top) + frac * H;
        prop_assert_eq!(geo.pixel_to_row(y, scroll_top), Some(row - 1));
    }
}

// =============================================================================
// COLUMNS
// =============================================================================

#[test_case(0.0, 0.0, ColumnHit::Fixed ; "fixed band")]
#[test_case(39.9, 0.0, ColumnHit::Fixed ; "fixed band edge")]
#[test_case(40.0, 0.0, ColumnHit::Column(0) ; "first column")]
#[test_case(120.0, 0.0, ColumnHit::Column(1) ; "second column")]
#[test_case(239.0, 0.0, ColumnHit::Column(1) ; "end of second column")]
#[test_case(240.0, 0.0, ColumnHit::Column(2) ; "third column")]
#[test_case(5_000.0, 0.0, ColumnHit::Column(2) ; "past last clamps")]
#[test_case(41.0, 80.0, ColumnHit::Column(1) ; "scrolled left")]
fn test_pixel_to_column(x: f32, scroll_left: f32, expected: ColumnHit) {
    let cfg = config();
    let geo = Geometry::new(&cfg, GridBounds::new(100, 3), widths);
    assert_eq!(geo.pixel_to_column(x, scroll_left), expected);
}

#[test]
fn test_fixed_band_is_signed_minus_one() {
    assert_eq!(ColumnHit::Fixed.to_signed(), -1);
    assert_eq!(ColumnHit::Column(4).to_signed(), 4);
}

#[test]
fn test_tree_mode_single_column() {
    let cfg = GridConfig {
        is_tree_mode: true,
        ..config()
    };
    let geo = Geometry::new(&cfg, GridBounds::new(100, 1), |_| 500.0);
    assert_eq!(geo.pixel_to_column(400.0, 0.0), ColumnHit::Column(0));
}

#[test]
fn test_column_offsets() {
    let cfg = config();
    let geo = Geometry::new(&cfg, GridBounds::new(100, 3), widths);
    assert_eq!(geo.column_to_pixel(0), 0.0);
    assert_eq!(geo.column_to_pixel(2), 200.0);
    assert_eq!(geo.content_width(), 260.0);
}

// =============================================================================
// HIT REGIONS
// =============================================================================

#[test_case(10.0, 10.0, HitRegion::Corner ; "corner")]
#[test_case(100.0, 10.0, HitRegion::ColumnHeader(0) ; "column header")]
#[test_case(117.0, 10.0, HitRegion::ResizeHandle(0) ; "resize handle")]
#[test_case(10.0, 80.0, HitRegion::RowGutter(1) ; "row gutter")]
#[test_case(150.0, 80.0, HitRegion::Cell(Coordinate::new(1, 1)) ; "cell")]
#[test_case(795.0, 80.0, HitRegion::ScrollbarGutter ; "vertical scrollbar")]
#[test_case(150.0, 595.0, HitRegion::ScrollbarGutter ; "horizontal scrollbar")]
#[test_case(-1.0, 80.0, HitRegion::Outside ; "left of grid")]
#[test_case(150.0, 600.0, HitRegion::Outside ; "below grid")]
fn test_hit_regions(x: f32, y: f32, expected: HitRegion) {
    let cfg = GridConfig {
        scrollbar_size: 10.0,
        ..config()
    };
    let geo = Geometry::new(&cfg, GridBounds::new(100, 3), widths);
    assert_eq!(geo.hit_test(x, y, 0.0, 0.0, (800.0, 600.0)), expected);
}

// =============================================================================
// CONFIG
// =============================================================================

#[test]
fn test_config_from_json() {
    let cfg = GridConfig::from_json(
        r#"{"cellHeight": 30, "fixedRowIndices": [0], "fixedColumnPixelWidth": 48, "isTreeMode": true}"#,
    )
    .unwrap();
    assert_eq!(cfg.cell_height, 30.0);
    assert_eq!(cfg.fixed_row_indices, vec![0]);
    assert_eq!(cfg.fixed_column_pixel_width, 48.0);
    assert!(cfg.is_tree_mode);
    // unspecified fields keep their defaults
    assert_eq!(cfg.header_height, 25.0);
}

#[test]
fn test_config_rejects_bad_values() {
    assert!(GridConfig::from_json(r#"{"cellHeight": 0}"#).is_err());
    assert!(GridConfig::from_json("not json").is_err());
}
