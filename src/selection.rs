//! Rectangular selection: an unmoving anchor and a moving focus.
//!
//! Pointer drags and shift-navigation move only the focus; plain keyboard
//! navigation walks anchor and focus together. Every coordinate the model
//! stores is clamped to the grid bounds passed in.

use std::ops::RangeInclusive;

use crate::types::{Coordinate, Direction, GridBounds, SelectionRect, SelectionType};

#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    rect: Option<SelectionRect>,
    kind: SelectionType,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rect(&self) -> Option<SelectionRect> {
        self.rect
    }

    pub fn kind(&self) -> SelectionType {
        self.kind
    }

    pub fn anchor(&self) -> Option<Coordinate> {
        self.rect.map(|r| r.anchor)
    }

    pub fn focus(&self) -> Option<Coordinate> {
        self.rect.map(|r| r.focus)
    }

    pub fn is_active(&self) -> bool {
        self.rect.is_some()
    }

    /// Begin a new single-cell selection at `coord`.
    pub fn start(&mut self, coord: Coordinate, bounds: GridBounds) -> Option<Coordinate> {
        let coord = clamp(coord, bounds)?;
        self.rect = Some(SelectionRect::single(coord));
        self.kind = SelectionType::CellRange;
        tracing::trace!(row = coord.row, col = coord.col, "selection start");
        Some(coord)
    }

    /// Move the focus to `coord` (clamped), keeping the anchor.
    ///
    /// With no selection yet this starts one.
    pub fn extend(&mut self, coord: Coordinate, bounds: GridBounds) -> Option<Coordinate> {
        let coord = clamp(coord, bounds)?;
        match self.rect.as_mut() {
            Some(rect) => rect.focus = coord,
            None => self.rect = Some(SelectionRect::single(coord)),
        }
        Some(coord)
    }

    /// Select a whole row: anchor at its first column, focus at its last.
    pub fn select_row(&mut self, row: u32, bounds: GridBounds) -> bool {
        let (Some(last_row), Some(last_col)) = (bounds.last_row(), bounds.last_col()) else {
            return false;
        };
        let row = row.min(last_row);
        self.rect = Some(SelectionRect::new(
            Coordinate::new(row, 0),
            Coordinate::new(row, last_col),
        ));
        self.kind = SelectionType::RowRange;
        true
    }

    /// Select a whole column: anchor at its first row, focus at its last.
    pub fn select_column(&mut self, col: u32, bounds: GridBounds) -> bool {
        let (Some(last_row), Some(last_col)) = (bounds.last_row(), bounds.last_col()) else {
            return false;
        };
        let col = col.min(last_col);
        self.rect = Some(SelectionRect::new(
            Coordinate::new(0, col),
            Coordinate::new(last_row, col),
        ));
        self.kind = SelectionType::ColumnRange;
        true
    }

    pub fn select_all(&mut self, bounds: GridBounds) -> bool {
        let (Some(last_row), Some(last_col)) = (bounds.last_row(), bounds.last_col()) else {
            return false;
        };
        self.rect = Some(SelectionRect::new(
            Coordinate::new(0, 0),
            Coordinate::new(last_row, last_col),
        ));
        self.kind = SelectionType::All;
        true
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        self.rect.is_some_and(|r| r.contains(coord))
    }

    pub fn contains_row(&self, row: u32) -> bool {
        self.rect.is_some_and(|r| r.contains_row(row))
    }

    /// Rows covered by the selection.
    pub fn selected_rows(&self) -> Option<RangeInclusive<u32>> {
        self.rect.map(|r| {
            let (min_row, _, max_row, _) = r.bounds();
            min_row..=max_row
        })
    }

    pub fn clear(&mut self) {
        self.rect = None;
        self.kind = SelectionType::CellRange;
    }

    /// Collapse to a single cell at the current focus.
    pub fn collapse_to_focus(&mut self) -> bool {
        let Some(focus) = self.focus() else {
            return false;
        };
        self.rect = Some(SelectionRect::single(focus));
        self.kind = SelectionType::CellRange;
        true
    }

    /// Move anchor and focus together one step. No-op at the boundary.
    pub fn walk(&mut self, direction: Direction, bounds: GridBounds) -> bool {
        let Some(target) = self.step_target(direction, bounds) else {
            return false;
        };
        self.rect = Some(SelectionRect::single(target));
        self.kind = SelectionType::CellRange;
        true
    }

    /// Move only the focus one step. No-op at the boundary.
    pub fn extend_by(&mut self, direction: Direction, bounds: GridBounds) -> bool {
        let Some(target) = self.step_target(direction, bounds) else {
            return false;
        };
        match self.rect.as_mut() {
            Some(rect) => rect.focus = target,
            None => self.rect = Some(SelectionRect::single(target)),
        }
        self.kind = SelectionType::CellRange;
        true
    }

    /// Walk or extend straight to `coord` (clamped).
    pub fn jump_to(&mut self, coord: Coordinate, extend: bool, bounds: GridBounds) -> bool {
        if extend && self.rect.is_some() {
            self.kind = SelectionType::CellRange;
            return self.extend(coord, bounds).is_some();
        }
        self.start(coord, bounds).is_some()
    }

    fn step_target(&self, direction: Direction, bounds: GridBounds) -> Option<Coordinate> {
        if bounds.is_empty() {
            return None;
        }
        let Some(focus) = self.focus() else {
            return Some(Coordinate::new(0, 0));
        };
        let (dr, dc) = direction.delta();
        let row = i64::from(focus.row) + dr;
        let col = i64::from(focus.col) + dc;
        if row < 0 || col < 0 || row >= i64::from(bounds.rows) || col >= i64::from(bounds.cols) {
            return None;
        }
        bounds.clamp(row, col)
    }

    /// Keep anchor and focus on the same logical rows after `offset` rows
    /// were inserted (positive) or removed (negative) at `at_row`.
    pub fn shift_rows(&mut self, at_row: u32, offset: i64, bounds: GridBounds) {
        let Some(rect) = self.rect.as_mut() else {
            return;
        };
        for coord in [&mut rect.anchor, &mut rect.focus] {
            if coord.row >= at_row {
                let shifted = (i64::from(coord.row) + offset).max(i64::from(at_row));
                coord.row = u32::try_from(shifted).unwrap_or(coord.row);
            }
        }
        self.clamp_to(bounds);
    }

    /// Re-clamp after the grid shrank; clears the selection if it is empty.
    pub fn clamp_to(&mut self, bounds: GridBounds) {
        let Some(rect) = self.rect else {
            return;
        };
        match (clamp(rect.anchor, bounds), clamp(rect.focus, bounds)) {
            (Some(anchor), Some(focus)) => self.rect = Some(SelectionRect::new(anchor, focus)),
            _ => self.clear(),
        }
    }
}

fn clamp(coord: Coordinate, bounds: GridBounds) -> Option<Coordinate> {
    bounds.clamp(i64::from(coord.row), i64::from(coord.col))
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

    const BOUNDS: GridBounds = GridBounds::new(10, 5);

    #[test]
    fn test_extend_keeps_anchor() {
        let mut sel = SelectionModel::new();
        sel.start(Coordinate::new(2, 2), BOUNDS);
        sel.extend(Coordinate::new(4, 3), BOUNDS);
        assert_eq!(sel.anchor(), Some(Coordinate::new(2, 2)));
        assert_eq!(sel.focus(), Some(Coordinate::new(4, 3)));
        assert!(sel.contains(Coordinate::new(3, 2)));
        assert!(!sel.contains(Coordinate::new(5, 2)));
    }

    #[test]
    fn test_extend_clamps() {
        let mut sel = SelectionModel::new();
        sel.start(Coordinate::new(2, 2), BOUNDS);
        let focus = sel.extend(Coordinate::new(400, 90), BOUNDS);
        assert_eq!(focus, Some(Coordinate::new(9, 4)));
    }

    #[test]
    fn test_row_and_column_shortcuts() {
        let mut sel = SelectionModel::new();
        sel.select_row(3, BOUNDS);
        assert_eq!(sel.anchor(), Some(Coordinate::new(3, 0)));
        assert_eq!(sel.focus(), Some(Coordinate::new(3, 4)));
        assert_eq!(sel.kind(), SelectionType::RowRange);

        sel.select_column(1, BOUNDS);
        assert_eq!(sel.anchor(), Some(Coordinate::new(0, 1)));
        assert_eq!(sel.focus(), Some(Coordinate::new(9, 1)));
        assert_eq!(sel.kind(), SelectionType::ColumnRange);

        sel.select_all(BOUNDS);
        assert!(sel.contains(Coordinate::new(9, 4)));
        assert_eq!(sel.kind(), SelectionType::All);
    }

    #[test]
    fn test_walk_stops_at_boundary() {
        let mut sel = SelectionModel::new();
        sel.start(Coordinate::new(0, 4), BOUNDS);
        assert!(!sel.walk(Direction::Up, BOUNDS));
        assert!(!sel.walk(Direction::Right, BOUNDS));
        assert!(sel.walk(Direction::Down, BOUNDS));
        assert_eq!(sel.rect(), Some(SelectionRect::single(Coordinate::new(1, 4))));
    }

    #[test]
    fn test_walk_collapses_range() {
        let mut sel = SelectionModel::new();
        sel.start(Coordinate::new(2, 2), BOUNDS);
        sel.extend(Coordinate::new(4, 4), BOUNDS);
        sel.walk(Direction::Left, BOUNDS);
        assert_eq!(sel.rect(), Some(SelectionRect::single(Coordinate::new(4, 3))));
    }

    #[test]
    fn test_shift_rows_after_insert() {
        let mut sel = SelectionModel::new();
        sel.start(Coordinate::new(5, 1), BOUNDS);
        sel.shift_rows(3, 2, BOUNDS);
        assert_eq!(sel.focus(), Some(Coordinate::new(7, 1)));
        // rows above the insertion point stay put
        sel.start(Coordinate::new(1, 1), BOUNDS);
        sel.shift_rows(3, 2, BOUNDS);
        assert_eq!(sel.focus(), Some(Coordinate::new(1, 1)));
    }

    #[test]
    fn test_empty_grid_selects_nothing() {
        let mut sel = SelectionModel::new();
        let empty = GridBounds::new(0, 3);
        assert_eq!(sel.start(Coordinate::new(0, 0), empty), None);
        assert!(!sel.select_all(empty));
        assert!(!sel.walk(Direction::Down, empty));
        assert!(!sel.is_active());
    }
}
