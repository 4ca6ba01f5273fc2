//! Pixel <-> logical coordinate mapping and hit-region classification.
//!
//! Screen layout, top to bottom: the column header band, the pinned
//! (frozen) leading rows, then the scrolling body. Left to right: the fixed
//! column band (row gutter), then the scrolling columns.

use super::f32_to_u32_clamped;
use crate::types::{count_to_f32, Coordinate, GridBounds, GridConfig};

/// Result of resolving an x position to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnHit {
    /// Inside the fixed-column band (row gutter / corner)
    Fixed,
    Column(u32),
}

impl ColumnHit {
    pub fn index(self) -> Option<u32> {
        match self {
            Self::Fixed => None,
            Self::Column(col) => Some(col),
        }
    }

    /// JS-facing form: `-1` for the fixed band.
    pub fn to_signed(self) -> i64 {
        match self {
            Self::Fixed => -1,
            Self::Column(col) => i64::from(col),
        }
    }
}

/// What a pointer position lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    /// Header band above the row gutter (select all)
    Corner,
    ColumnHeader(u32),
    /// Grab zone at the right edge of a column header
    ResizeHandle(u32),
    /// Fixed-column band beside a row (select row)
    RowGutter(u32),
    Cell(Coordinate),
    ScrollbarGutter,
    /// Outside the grid, or no row under the pointer
    Outside,
}

/// Pure geometry over a configuration, the grid size and a width function.
pub struct Geometry<'a, W>
where
    W: Fn(u32) -> f32,
{
    config: &'a GridConfig,
    bounds: GridBounds,
    column_width: W,
}

impl<'a, W> Geometry<'a, W>
where
    W: Fn(u32) -> f32,
{
    pub fn new(config: &'a GridConfig, bounds: GridBounds, column_width: W) -> Self {
        Self {
            config,
            bounds,
            column_width,
        }
    }

    fn row_height(&self) -> f32 {
        self.config.cell_height
    }

    fn frozen_rows(&self) -> u32 {
        self.config.frozen_rows().min(self.bounds.rows)
    }

    fn frozen_height(&self) -> f32 {
        count_to_f32(self.frozen_rows()) * self.row_height()
    }

    /// Top of the scrolling body in viewport pixels.
    pub fn body_top(&self) -> f32 {
        self.config.header_height + self.frozen_height()
    }

    /// Resolve a viewport x to a column.
    ///
    /// Widths accumulate left to right from the fixed band's edge; positions
    /// past the last column clamp to it. Tree mode always resolves to
    /// column 0.
    pub fn pixel_to_column(&self, x: f32, scroll_left: f32) -> ColumnHit {
        if x < self.config.fixed_column_pixel_width {
            return ColumnHit::Fixed;
        }
        if self.config.is_tree_mode {
            return ColumnHit::Column(0);
        }
        let content_x = x - self.config.fixed_column_pixel_width + scroll_left.max(0.0);
        match self.column_span_at(content_x) {
            Some((col, _, _)) => ColumnHit::Column(col),
            None => ColumnHit::Column(0),
        }
    }

    /// Column under a content x, with the offset into it and its width.
    fn column_span_at(&self, content_x: f32) -> Option<(u32, f32, f32)> {
        let last = self.bounds.last_col()?;
        let mut left = 0.0_f32;
        for col in 0..=last {
            let width = (self.column_width)(col);
            if content_x < left + width || col == last {
                return Some((col, content_x - left, width));
            }
            left += width;
        }
        None
    }

    /// Resolve a viewport y to a row, or `None` in the header band or for an
    /// empty grid.
    ///
    /// Pinned rows floor directly. Scrolled rows round the absolute body
    /// offset to the nearest row boundary, bias back by one row height and
    /// re-floor: a point just above the midline of row `r` resolves to
    /// `r - 1`, just below it to `r`.
    pub fn pixel_to_row(&self, y: f32, scroll_top: f32) -> Option<u32> {
        let last = self.bounds.last_row()?;
        let body_y = y - self.config.header_height;
        if body_y < 0.0 {
            return None;
        }

        let h = self.row_height();
        let frozen = self.frozen_rows();
        let frozen_height = self.frozen_height();
        if body_y < frozen_height {
            return Some(f32_to_u32_clamped((body_y / h).floor()).min(frozen.saturating_sub(1)));
        }
        if frozen > last {
            return Some(last);
        }

        let absolute = body_y - frozen_height + scroll_top.max(0.0);
        let rounded = (absolute / h).round();
        let biased = ((rounded * h - h) / h).floor();
        let body_row = if biased < 0.0 {
            0
        } else {
            f32_to_u32_clamped(biased)
        };
        Some(frozen.saturating_add(body_row).min(last))
    }

    /// Scroll offset at which `row` sits at the top of the body.
    ///
    /// Pinned rows never scroll and map to 0.
    pub fn row_to_pixel(&self, row: u32) -> f32 {
        let frozen = self.frozen_rows();
        count_to_f32(row.saturating_sub(frozen)) * self.row_height()
    }

    /// Viewport y of the top edge of `row` at the given scroll offset.
    pub fn row_viewport_y(&self, row: u32, scroll_top: f32) -> f32 {
        if row < self.frozen_rows() {
            return self.config.header_height + count_to_f32(row) * self.row_height();
        }
        self.body_top() + self.row_to_pixel(row) - scroll_top.max(0.0)
    }

    /// Horizontal scroll offset at which `col` starts at the band's edge.
    pub fn column_to_pixel(&self, col: u32) -> f32 {
        (0..col.min(self.bounds.cols))
            .map(|c| (self.column_width)(c))
            .sum()
    }

    /// Total width of all scrolling columns.
    pub fn content_width(&self) -> f32 {
        self.column_to_pixel(self.bounds.cols)
    }

    /// Total height of all scrolling rows.
    pub fn content_height(&self) -> f32 {
        count_to_f32(self.bounds.rows.saturating_sub(self.frozen_rows())) * self.row_height()
    }

    /// Classify a viewport point.
    pub fn hit_test(
        &self,
        x: f32,
        y: f32,
        scroll_left: f32,
        scroll_top: f32,
        viewport: (f32, f32),
    ) -> HitRegion {
        let (width, height) = viewport;
        if x < 0.0 || y < 0.0 || x >= width || y >= height {
            return HitRegion::Outside;
        }
        let gutter = self.config.scrollbar_size;
        if gutter > 0.0 && (x >= width - gutter || y >= height - gutter) {
            return HitRegion::ScrollbarGutter;
        }

        let fixed_width = self.config.fixed_column_pixel_width;
        if y < self.config.header_height {
            if x < fixed_width {
                return HitRegion::Corner;
            }
            return self.header_hit(x, scroll_left);
        }

        let Some(row) = self.pixel_to_row(y, scroll_top) else {
            return HitRegion::Outside;
        };
        match self.pixel_to_column(x, scroll_left) {
            ColumnHit::Fixed => HitRegion::RowGutter(row),
            ColumnHit::Column(col) => HitRegion::Cell(Coordinate::new(row, col)),
        }
    }

    fn header_hit(&self, x: f32, scroll_left: f32) -> HitRegion {
        let content_x = x - self.config.fixed_column_pixel_width + scroll_left.max(0.0);
        let Some((col, offset, width)) = self.column_span_at(content_x) else {
            return HitRegion::Outside;
        };
        if offset >= width - self.config.resize_handle_width && offset <= width {
            return HitRegion::ResizeHandle(col);
        }
        if self.config.is_tree_mode {
            return HitRegion::ColumnHeader(0);
        }
        HitRegion::ColumnHeader(col)
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

    fn config() -> GridConfig {
        GridConfig {
            cell_height: 20.0,
            header_height: 30.0,
            fixed_column_pixel_width: 40.0,
            ..GridConfig::default()
        }
    }

    #[test]
    fn test_column_accumulates_widths() {
        let cfg = config();
        let widths = [100.0, 50.0, 80.0];
        let geo = Geometry::new(&cfg, GridBounds::new(10, 3), |c| widths[c as usize]);
        assert_eq!(geo.pixel_to_column(10.0, 0.0), ColumnHit::Fixed);
        assert_eq!(geo.pixel_to_column(40.0, 0.0), ColumnHit::Column(0));
        assert_eq!(geo.pixel_to_column(139.0, 0.0), ColumnHit::Column(0));
        assert_eq!(geo.pixel_to_column(140.0, 0.0), ColumnHit::Column(1));
        assert_eq!(geo.pixel_to_column(5000.0, 0.0), ColumnHit::Column(2));
        // Scrolled 100px right: the band edge now shows column 1
        assert_eq!(geo.pixel_to_column(45.0, 100.0), ColumnHit::Column(1));
    }

    #[test]
    fn test_fixed_band_is_minus_one() {
        assert_eq!(ColumnHit::Fixed.to_signed(), -1);
        assert_eq!(ColumnHit::Column(3).to_signed(), 3);
    }

    #[test]
    fn test_row_half_bias() {
        let cfg = config();
        let geo = Geometry::new(&cfg, GridBounds::new(100, 3), |_| 50.0);
        // Row 5 spans body 100..120, midline 110
        assert_eq!(geo.pixel_to_row(30.0 + 111.0, 0.0), Some(5));
        assert_eq!(geo.pixel_to_row(30.0 + 109.0, 0.0), Some(4));
        assert_eq!(geo.pixel_to_row(10.0, 0.0), None);
    }

    #[test]
    fn test_tree_mode_single_column() {
        let cfg = GridConfig {
            is_tree_mode: true,
            ..config()
        };
        let geo = Geometry::new(&cfg, GridBounds::new(5, 4), |_| 50.0);
        assert_eq!(geo.pixel_to_column(190.0, 0.0), ColumnHit::Column(0));
    }

    #[test]
    fn test_hit_regions() {
        let cfg = GridConfig {
            scrollbar_size: 10.0,
            ..config()
        };
        let geo = Geometry::new(&cfg, GridBounds::new(100, 3), |_| 50.0);
        let vp = (400.0, 300.0);
        assert_eq!(geo.hit_test(5.0, 5.0, 0.0, 0.0, vp), HitRegion::Corner);
        assert_eq!(geo.hit_test(60.0, 5.0, 0.0, 0.0, vp), HitRegion::ColumnHeader(0));
        assert_eq!(geo.hit_test(88.0, 5.0, 0.0, 0.0, vp), HitRegion::ResizeHandle(0));
        assert_eq!(geo.hit_test(5.0, 85.0, 0.0, 0.0, vp), HitRegion::RowGutter(2));
        assert_eq!(
            geo.hit_test(100.0, 85.0, 0.0, 0.0, vp),
            HitRegion::Cell(Coordinate::new(2, 1))
        );
        assert_eq!(geo.hit_test(395.0, 75.0, 0.0, 0.0, vp), HitRegion::ScrollbarGutter);
        assert_eq!(geo.hit_test(-1.0, 75.0, 0.0, 0.0, vp), HitRegion::Outside);
    }
}
