//! Row windowing: which slice of a large row list intersects the viewport.

use std::ops::Range;

use super::f32_to_u32_clamped;
use crate::types::count_to_f32;

/// The contiguous block of rows to instantiate for the current scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Window {
    /// First row of the block
    pub start_row: u32,
    /// Number of rows in the block
    pub visible_count: u32,
    /// Vertical translation that lines the block up with the scroll position
    pub pixel_offset: f32,
}

impl Window {
    /// Row range `[start_row, start_row + visible_count)`.
    pub fn rows(&self) -> Range<u32> {
        self.start_row..self.start_row.saturating_add(self.visible_count)
    }

    pub fn contains(&self, row: u32) -> bool {
        self.rows().contains(&row)
    }

    pub fn is_empty(&self) -> bool {
        self.visible_count == 0
    }

    /// The window widened by `overscan` rows on both sides, clipped to `total_rows`.
    pub fn overscanned(&self, overscan: u32, total_rows: u32) -> Range<u32> {
        if self.is_empty() {
            return self.rows();
        }
        let rows = self.rows();
        rows.start.saturating_sub(overscan)..rows.end.saturating_add(overscan).min(total_rows)
    }
}

/// Compute the visible row window.
///
/// `start_row` floors the scroll offset to a row and is clamped to the last
/// row when scrolled past the end. `visible_count` is the number of rows a
/// viewport can show, capped by the rows remaining after `start_row`.
pub fn compute_window(
    scroll_top: f32,
    viewport_height: f32,
    row_height: f32,
    total_rows: u32,
) -> Window {
    if total_rows == 0 || !row_height.is_finite() || row_height <= 0.0 {
        return Window::default();
    }

    let start_row = f32_to_u32_clamped((scroll_top.max(0.0) / row_height).floor())
        .min(total_rows.saturating_sub(1));
    let capacity = f32_to_u32_clamped((viewport_height.max(0.0) / row_height).ceil());
    let visible_count = capacity.min(total_rows - start_row);

    Window {
        start_row,
        visible_count,
        pixel_offset: count_to_f32(start_row) * row_height,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_window_at_top() {
        let w = compute_window(0.0, 500.0, 25.0, 100);
        assert_eq!(w.start_row, 0);
        assert_eq!(w.visible_count, 20);
        assert_eq!(w.pixel_offset, 0.0);
    }

    #[test]
    fn test_partial_row_rounds_up() {
        let w = compute_window(10.0, 510.0, 25.0, 100);
        assert_eq!(w.start_row, 0);
        assert_eq!(w.visible_count, 21);
    }

    #[test]
    fn test_scrolled_past_end_clamps_start() {
        let w = compute_window(10_000.0, 500.0, 25.0, 10);
        assert_eq!(w.start_row, 9);
        assert_eq!(w.visible_count, 1);
        assert_eq!(w.pixel_offset, 225.0);
    }

    #[test]
    fn test_empty_grid() {
        let w = compute_window(300.0, 500.0, 25.0, 0);
        assert!(w.is_empty());
        assert_eq!(w.start_row, 0);
    }

    #[test]
    fn test_overscan_clipped() {
        let w = compute_window(50.0, 100.0, 25.0, 7);
        assert_eq!(w.rows(), 2..6);
        assert_eq!(w.overscanned(3, 7), 0..7);
    }
}
