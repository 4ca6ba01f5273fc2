//! Editable-cell state machine.
//!
//! At most one cell is in edit mode. The session owns the pending text, so
//! the render layer reads from it instead of being the source of truth.
//! Leaving a session either commits (blur, Enter, navigation, opening
//! another cell) or cancels (Escape); both are no-ops while idle.

use crate::types::Coordinate;

/// Where the editable cell lives, both on screen and in the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditablePosition {
    /// Rendered slot (index within the rendered block); `None` while the
    /// row is outside it
    pub static_row: Option<u32>,
    pub col: u32,
    /// Data row currently occupying the slot
    pub scroll_row: u32,
}

impl EditablePosition {
    pub const fn new(static_row: Option<u32>, col: u32, scroll_row: u32) -> Self {
        Self {
            static_row,
            col,
            scroll_row,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.scroll_row, self.col)
    }
}

/// Caret placement when a session opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaretPlacement {
    /// Caret after the last character (single-click reopen, typing)
    #[default]
    End,
    /// Whole content selected (double-click)
    SelectAll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub position: EditablePosition,
    pub original: String,
    pub pending: String,
    pub caret: CaretPlacement,
}

impl EditSession {
    pub fn is_dirty(&self) -> bool {
        self.pending != self.original
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Idle,
    Editing(EditSession),
}

/// Content handed to the host's edit callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedEdit {
    pub content: String,
    pub row: u32,
    pub col: u32,
    /// False when the content equals what the cell held before
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelledEdit {
    pub position: EditablePosition,
    /// The original content, restored for display
    pub restored: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    /// A new session started; carries the commit of the session it replaced
    Opened { committed: Option<CommittedEdit> },
    /// The cell was already being edited; the session is untouched
    AlreadyEditing,
    /// Fixed row/column: nothing changed
    Rejected,
}

#[derive(Debug, Clone, Default)]
pub struct EditableCell {
    state: EditState,
}

impl EditableCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn session(&self) -> Option<&EditSession> {
        match &self.state {
            EditState::Editing(session) => Some(session),
            EditState::Idle => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing(_))
    }

    pub fn is_editing_cell(&self, coord: Coordinate) -> bool {
        self.session()
            .is_some_and(|s| s.position.coordinate() == coord)
    }

    /// Enter edit mode on `position` holding `content`.
    ///
    /// `fixed` marks a fixed row/column; those are rejected outright.
    /// Opening a different cell while editing commits the current session.
    pub fn open(
        &mut self,
        position: EditablePosition,
        content: String,
        caret: CaretPlacement,
        fixed: bool,
    ) -> OpenOutcome {
        if fixed {
            tracing::debug!(
                row = position.scroll_row,
                col = position.col,
                "edit rejected on fixed cell"
            );
            return OpenOutcome::Rejected;
        }
        if self.is_editing_cell(position.coordinate()) {
            return OpenOutcome::AlreadyEditing;
        }
        let committed = self.commit();
        tracing::debug!(
            row = position.scroll_row,
            col = position.col,
            slot = ?position.static_row,
            "edit open"
        );
        self.state = EditState::Editing(EditSession {
            position,
            pending: content.clone(),
            original: content,
            caret,
        });
        OpenOutcome::Opened { committed }
    }

    /// Leave edit mode keeping the pending content.
    pub fn commit(&mut self) -> Option<CommittedEdit> {
        let EditState::Editing(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        let changed = session.is_dirty();
        tracing::debug!(
            row = session.position.scroll_row,
            col = session.position.col,
            changed,
            "edit commit"
        );
        Some(CommittedEdit {
            content: session.pending,
            row: session.position.scroll_row,
            col: session.position.col,
            changed,
        })
    }

    /// Leave edit mode discarding the pending content.
    pub fn cancel(&mut self) -> Option<CancelledEdit> {
        let EditState::Editing(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        tracing::debug!(
            row = session.position.scroll_row,
            col = session.position.col,
            "edit cancel"
        );
        Some(CancelledEdit {
            position: session.position,
            restored: session.original,
        })
    }

    /// Replace the pending content. Returns false while idle.
    pub fn set_pending(&mut self, text: &str) -> bool {
        match &mut self.state {
            EditState::Editing(session) => {
                text.clone_into(&mut session.pending);
                true
            }
            EditState::Idle => false,
        }
    }

    pub fn push_str(&mut self, text: &str) -> bool {
        match &mut self.state {
            EditState::Editing(session) => {
                session.pending.push_str(text);
                true
            }
            EditState::Idle => false,
        }
    }

    pub fn backspace(&mut self) -> bool {
        match &mut self.state {
            EditState::Editing(session) => session.pending.pop().is_some(),
            EditState::Idle => false,
        }
    }

    /// Track the data row after rows were inserted/removed above it.
    pub fn shift_rows(&mut self, at_row: u32, offset: i64) {
        if let EditState::Editing(session) = &mut self.state {
            let row = session.position.scroll_row;
            if row >= at_row {
                let shifted = (i64::from(row) + offset).max(i64::from(at_row));
                session.position.scroll_row = u32::try_from(shifted).unwrap_or(row);
            }
        }
    }

    /// Record the rendered slot now holding the edited row.
    pub fn relocate(&mut self, slot: Option<u32>) {
        if let EditState::Editing(session) = &mut self.state {
            session.position.static_row = slot;
        }
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

    fn pos(row: u32, col: u32) -> EditablePosition {
        EditablePosition::new(Some(row), col, row)
    }

    #[test]
    fn test_commit_returns_pending() {
        let mut cell = EditableCell::new();
        let outcome = cell.open(pos(5, 2), "old".into(), CaretPlacement::End, false);
        assert_eq!(outcome, OpenOutcome::Opened { committed: None });
        cell.set_pending("Alpha");
        let edit = cell.commit().unwrap();
        assert_eq!(edit.content, "Alpha");
        assert_eq!((edit.row, edit.col), (5, 2));
        assert!(edit.changed);
        assert!(!cell.is_editing());
    }

    #[test]
    fn test_cancel_restores_original() {
        let mut cell = EditableCell::new();
        cell.open(pos(4, 1), "foo".into(), CaretPlacement::SelectAll, false);
        cell.set_pending("bar");
        let cancelled = cell.cancel().unwrap();
        assert_eq!(cancelled.restored, "foo");
        assert_eq!(cancelled.position.coordinate(), Coordinate::new(4, 1));
        assert!(cell.commit().is_none());
    }

    #[test]
    fn test_idle_transitions_are_noops() {
        let mut cell = EditableCell::new();
        assert!(cell.commit().is_none());
        assert!(cell.cancel().is_none());
        assert!(!cell.set_pending("x"));
        assert!(!cell.backspace());
    }

    #[test]
    fn test_opening_other_cell_commits_previous() {
        let mut cell = EditableCell::new();
        cell.open(pos(1, 1), "a".into(), CaretPlacement::End, false);
        cell.push_str("b");
        let outcome = cell.open(pos(2, 1), "z".into(), CaretPlacement::End, false);
        let OpenOutcome::Opened {
            committed: Some(prev),
        } = outcome
        else {
            panic!("expected a commit of the previous session");
        };
        assert_eq!(prev.content, "ab");
        assert!(cell.is_editing_cell(Coordinate::new(2, 1)));
    }

    #[test]
    fn test_reopen_same_cell_keeps_session() {
        let mut cell = EditableCell::new();
        cell.open(pos(3, 0), "orig".into(), CaretPlacement::End, false);
        cell.set_pending("typed");
        let outcome = cell.open(pos(3, 0), "typed".into(), CaretPlacement::SelectAll, false);
        assert_eq!(outcome, OpenOutcome::AlreadyEditing);
        let session = cell.session().unwrap();
        assert_eq!(session.original, "orig");
        assert_eq!(session.pending, "typed");
        assert_eq!(session.caret, CaretPlacement::End);
    }

    #[test]
    fn test_fixed_cell_rejected() {
        let mut cell = EditableCell::new();
        cell.open(pos(3, 0), "a".into(), CaretPlacement::End, false);
        let outcome = cell.open(pos(0, 0), "h".into(), CaretPlacement::End, true);
        assert_eq!(outcome, OpenOutcome::Rejected);
        assert!(cell.is_editing_cell(Coordinate::new(3, 0)));
    }

    #[test]
    fn test_shift_and_relocate() {
        let mut cell = EditableCell::new();
        cell.open(EditablePosition::new(Some(2), 1, 12), "a".into(), CaretPlacement::End, false);
        cell.shift_rows(5, 3);
        cell.relocate(Some(7));
        let position = cell.session().unwrap().position;
        assert_eq!(position.scroll_row, 15);
        assert_eq!(position.static_row, Some(7));

        cell.relocate(None);
        assert_eq!(cell.session().unwrap().position.static_row, None);
    }
}
