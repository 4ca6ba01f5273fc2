use serde::{Deserialize, Serialize};

/// A logical cell position. Row 0 is the first data row below the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: u32,
    pub col: u32,
}

impl Coordinate {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// Row and column totals used to clamp selection and navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridBounds {
    pub rows: u32,
    pub cols: u32,
}

impl GridBounds {
    pub const fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// True when there is no cell to select.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn last_row(&self) -> Option<u32> {
        self.rows.checked_sub(1)
    }

    pub fn last_col(&self) -> Option<u32> {
        self.cols.checked_sub(1)
    }

    /// Clamp a possibly out-of-range position into the grid.
    ///
    /// Returns `None` only for an empty grid.
    pub fn clamp(&self, row: i64, col: i64) -> Option<Coordinate> {
        let last_row = self.last_row()?;
        let last_col = self.last_col()?;
        Some(Coordinate {
            row: clamp_index(row, last_row),
            col: clamp_index(col, last_col),
        })
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }
}

fn clamp_index(value: i64, last: u32) -> u32 {
    u32::try_from(value.clamp(0, i64::from(last))).unwrap_or(last)
}

/// Type of selection for row/column headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionType {
    /// Standard cell selection (default)
    #[default]
    CellRange,
    /// Entire row(s) selected
    RowRange,
    /// Entire column(s) selected
    ColumnRange,
    /// All cells selected (corner click)
    All,
}

/// The rectangle spanned by an unmoving anchor and a moving focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRect {
    pub anchor: Coordinate,
    pub focus: Coordinate,
}

impl SelectionRect {
    pub const fn new(anchor: Coordinate, focus: Coordinate) -> Self {
        Self { anchor, focus }
    }

    /// A rectangle covering one cell.
    pub const fn single(coord: Coordinate) -> Self {
        Self {
            anchor: coord,
            focus: coord,
        }
    }

    /// Get normalized bounds `(min_row, min_col, max_row, max_col)`
    pub fn bounds(&self) -> (u32, u32, u32, u32) {
        (
            self.anchor.row.min(self.focus.row),
            self.anchor.col.min(self.focus.col),
            self.anchor.row.max(self.focus.row),
            self.anchor.col.max(self.focus.col),
        )
    }

    pub fn top_left(&self) -> Coordinate {
        let (min_row, min_col, _, _) = self.bounds();
        Coordinate::new(min_row, min_col)
    }

    pub fn bottom_right(&self) -> Coordinate {
        let (_, _, max_row, max_col) = self.bounds();
        Coordinate::new(max_row, max_col)
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        let (min_row, min_col, max_row, max_col) = self.bounds();
        (min_row..=max_row).contains(&coord.row) && (min_col..=max_col).contains(&coord.col)
    }

    pub fn contains_row(&self, row: u32) -> bool {
        let (min_row, _, max_row, _) = self.bounds();
        (min_row..=max_row).contains(&row)
    }

    pub fn is_single_cell(&self) -> bool {
        self.anchor == self.focus
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_bounds_are_normalized() {
        let rect = SelectionRect::new(Coordinate::new(5, 4), Coordinate::new(2, 1));
        assert_eq!(rect.bounds(), (2, 1, 5, 4));
        assert_eq!(rect.top_left(), Coordinate::new(2, 1));
        assert_eq!(rect.bottom_right(), Coordinate::new(5, 4));
    }

    #[test]
    fn test_rect_contains_edges() {
        let rect = SelectionRect::new(Coordinate::new(1, 1), Coordinate::new(3, 2));
        assert!(rect.contains(Coordinate::new(1, 1)));
        assert!(rect.contains(Coordinate::new(3, 2)));
        assert!(!rect.contains(Coordinate::new(4, 2)));
        assert!(!rect.contains(Coordinate::new(2, 0)));
    }

    #[test]
    fn test_bounds_clamp() {
        let bounds = GridBounds::new(10, 4);
        assert_eq!(bounds.clamp(-3, 99), Some(Coordinate::new(0, 3)));
        assert_eq!(bounds.clamp(12, 2), Some(Coordinate::new(9, 2)));
        assert_eq!(GridBounds::new(0, 4).clamp(0, 0), None);
    }
}
