//! Pointer and keyboard handlers for `GridEngine`.
//!
//! Every handler returns true when the grid needs a redraw.

use super::{DragMode, DragState, GridEngine, GridHost, RowEvent};
use crate::editor::{CaretPlacement, OpenOutcome};
use crate::layout::{ColumnHit, HitRegion};
use crate::resize::ResizePhase;
use crate::types::{Coordinate, Direction, Key, KeyEvent, Modifiers, PointerButton, PointerEvent};

impl<H: GridHost> GridEngine<H> {
    /// Classify a viewport point at the current scroll offset.
    pub fn hit_test(&self, x: f32, y: f32) -> HitRegion {
        self.geometry().hit_test(
            x,
            y,
            self.viewport.scroll_left,
            self.viewport.scroll_top,
            (self.viewport.width, self.viewport.height),
        )
    }

    pub fn pointer_down(&mut self, event: PointerEvent) -> bool {
        let hit = self.hit_test(event.x, event.y);
        tracing::trace!(?hit, x = event.x, y = event.y, "pointer down");
        self.focused = true;

        let handled = match hit {
            HitRegion::Outside | HitRegion::ScrollbarGutter => false,
            HitRegion::Corner => {
                self.commit_edit();
                let bounds = self.bounds();
                self.drag = None;
                if self.config.is_tree_mode {
                    false
                } else {
                    self.selection.select_all(bounds)
                }
            }
            HitRegion::ResizeHandle(col) => self.resize_pointer_down(col, event),
            HitRegion::ColumnHeader(col) => {
                if self.config.is_tree_mode {
                    return false;
                }
                self.commit_edit();
                let bounds = self.bounds();
                if event.modifiers.shift && self.selection.is_active() {
                    let last_row = bounds.last_row().unwrap_or(0);
                    self.selection.extend(Coordinate::new(last_row, col), bounds);
                } else {
                    self.selection.select_column(col, bounds);
                }
                self.start_drag(DragMode::Columns, event);
                true
            }
            HitRegion::RowGutter(row) => {
                self.commit_edit();
                self.row_pointer_down(row, event);
                true
            }
            HitRegion::Cell(coord) => self.cell_pointer_down(coord, event),
        };
        self.needs_render |= handled;
        handled
    }

    fn start_drag(&mut self, mode: DragMode, event: PointerEvent) {
        self.drag = Some(DragState {
            mode,
            last_x: event.x,
            last_y: event.y,
        });
    }

    fn row_pointer_down(&mut self, row: u32, event: PointerEvent) {
        let bounds = self.bounds();
        if event.modifiers.shift && self.selection.is_active() {
            let last_col = bounds.last_col().unwrap_or(0);
            self.selection.extend(Coordinate::new(row, last_col), bounds);
        } else {
            self.selection.select_row(row, bounds);
        }
        self.start_drag(DragMode::Rows, event);
    }

    fn resize_pointer_down(&mut self, col: u32, event: PointerEvent) -> bool {
        if event.is_double_click() {
            self.resize.cancel();
            return self.autofit_column(col);
        }
        let width = self.column_width(col);
        self.resize.begin(col, event.x, width);
        self.drag = None;
        self.notify_resize(ResizePhase::Begin, col, width);
        false
    }

    fn cell_pointer_down(&mut self, coord: Coordinate, event: PointerEvent) -> bool {
        if self.config.is_tree_mode {
            self.row_pointer_down(coord.row, event);
            if event.is_double_click() {
                self.drag = None;
                self.toggle_row(coord.row);
            }
            return true;
        }

        if event.button == PointerButton::Secondary {
            if !self.selection.contains(coord) {
                self.commit_edit();
                let bounds = self.bounds();
                self.selection.start(coord, bounds);
            }
            self.host.on_cell_context_menu(coord.row, coord.col);
            return true;
        }

        // the caret belongs to the text field while the cell is open
        if self.editor.is_editing_cell(coord) {
            return false;
        }

        if event.is_double_click() {
            let opened = self.open_editor(coord, CaretPlacement::SelectAll);
            return matches!(opened, OpenOutcome::Opened { .. });
        }

        let reopen = !event.modifiers.shift
            && self
                .selection
                .rect()
                .is_some_and(|r| r.is_single_cell() && r.anchor == coord);
        self.commit_edit();
        let bounds = self.bounds();
        if event.modifiers.shift && self.selection.is_active() {
            self.selection.extend(coord, bounds);
        } else {
            self.selection.start(coord, bounds);
        }

        if reopen {
            self.open_editor(coord, CaretPlacement::End);
        } else {
            self.start_drag(DragMode::Cells, event);
        }
        true
    }

    /// Size `col` to its widest rendered cell.
    pub fn autofit_column(&mut self, col: u32) -> bool {
        let measured: Vec<f32> = self
            .rendered_rows()
            .into_iter()
            .filter_map(|row| self.host.measure_cell(row, col))
            .collect();
        let Some(width) = self.resize.autofit(measured, self.config.autofit_padding) else {
            return false;
        };
        tracing::debug!(col, width, "autofit");
        self.columns.set_width(col, width);
        self.notify_resize(ResizePhase::AutoFit, col, width);
        self.recompute_after_resize();
        true
    }

    pub fn pointer_move(&mut self, event: PointerEvent) -> bool {
        if let Some(update) = self.resize.update(event.x) {
            self.columns.set_width(update.column, update.width);
            self.notify_resize(ResizePhase::Update, update.column, update.width);
            self.needs_render = true;
            return true;
        }

        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        drag.last_x = event.x;
        drag.last_y = event.y;
        let mode = drag.mode;
        let changed = self.extend_drag(mode, event.x, event.y);
        self.needs_render |= changed;
        changed
    }

    /// Cell under a dragged pointer, with the position pulled back inside
    /// the body so a drag past an edge targets the outermost visible cell.
    pub(crate) fn drag_target(&self, x: f32, y: f32) -> Option<Coordinate> {
        let body = self.body_rect();
        let x = x.clamp(body.left, (body.right - 1.0).max(body.left));
        let y = y.clamp(
            self.config.header_height,
            (body.bottom - 1.0).max(self.config.header_height),
        );
        let geo = self.geometry();
        let row = geo.pixel_to_row(y, self.viewport.scroll_top)?;
        let col = match geo.pixel_to_column(x, self.viewport.scroll_left) {
            ColumnHit::Column(col) => col,
            ColumnHit::Fixed => 0,
        };
        Some(Coordinate::new(row, col))
    }

    pub(crate) fn extend_drag(&mut self, mode: DragMode, x: f32, y: f32) -> bool {
        let Some(target) = self.drag_target(x, y) else {
            return false;
        };
        let bounds = self.bounds();
        let target = match mode {
            DragMode::Cells => target,
            DragMode::Rows => Coordinate::new(target.row, bounds.last_col().unwrap_or(0)),
            DragMode::Columns => Coordinate::new(bounds.last_row().unwrap_or(0), target.col),
        };
        if self.selection.focus() == Some(target) {
            return false;
        }
        self.selection.extend(target, bounds).is_some()
    }

    pub fn pointer_up(&mut self, event: PointerEvent) -> bool {
        self.drag = None;
        let Some(done) = self.resize.end(event.x) else {
            return false;
        };
        self.columns.set_width(done.column, done.width);
        self.notify_resize(ResizePhase::End, done.column, done.width);
        self.recompute_after_resize();
        true
    }

    // ---- Keyboard ----

    pub fn key_down(&mut self, event: KeyEvent) -> bool {
        let handled = if self.editor.is_editing() {
            self.editing_key(event)
        } else if self.config.is_tree_mode {
            self.tree_key(event)
        } else {
            self.grid_key(event)
        };
        self.needs_render |= handled;
        handled
    }

    fn editing_key(&mut self, event: KeyEvent) -> bool {
        let bounds = self.bounds();
        match event.key {
            Key::Enter => {
                self.commit_edit();
                if self.config.submit_walks_down {
                    self.selection.walk(Direction::Down, bounds);
                }
                self.reveal_focus();
                true
            }
            Key::Escape => self.cancel_edit(),
            Key::Tab => {
                self.commit_edit();
                let direction = if event.modifiers.shift {
                    Direction::Left
                } else {
                    Direction::Right
                };
                self.selection.walk(direction, bounds);
                self.reveal_focus();
                true
            }
            // everything else edits text in the field
            _ => false,
        }
    }

    fn page_rows(&self) -> i64 {
        let rows = (self.body_height() / self.config.cell_height).floor();
        if rows >= 1.0 {
            i64::from(crate::layout::f32_to_u32_clamped(rows))
        } else {
            1
        }
    }

    fn grid_key(&mut self, event: KeyEvent) -> bool {
        let bounds = self.bounds();
        let mods = event.modifiers;
        let focus = self.selection.focus();
        let (last_row, last_col) = (bounds.last_row().unwrap_or(0), bounds.last_col().unwrap_or(0));

        let moved = match event.key {
            Key::Arrow(direction) if mods.command() => {
                let from = focus.unwrap_or_default();
                let target = match direction {
                    Direction::Up => Coordinate::new(0, from.col),
                    Direction::Down => Coordinate::new(last_row, from.col),
                    Direction::Left => Coordinate::new(from.row, 0),
                    Direction::Right => Coordinate::new(from.row, last_col),
                };
                self.selection.jump_to(target, mods.shift, bounds)
            }
            Key::Arrow(direction) if mods.shift => self.selection.extend_by(direction, bounds),
            Key::Arrow(direction) => self.selection.walk(direction, bounds),
            Key::Tab => {
                let direction = if mods.shift {
                    Direction::Left
                } else {
                    Direction::Right
                };
                self.selection.walk(direction, bounds)
            }
            Key::Home => {
                let from = focus.unwrap_or_default();
                let target = if mods.command() {
                    Coordinate::new(0, 0)
                } else {
                    Coordinate::new(from.row, 0)
                };
                self.selection.jump_to(target, mods.shift, bounds)
            }
            Key::End => {
                let from = focus.unwrap_or_default();
                let target = if mods.command() {
                    Coordinate::new(last_row, last_col)
                } else {
                    Coordinate::new(from.row, last_col)
                };
                self.selection.jump_to(target, mods.shift, bounds)
            }
            Key::PageUp | Key::PageDown => {
                let from = focus.unwrap_or_default();
                let page = self.page_rows();
                let delta = if event.key == Key::PageUp { -page } else { page };
                match bounds.clamp(i64::from(from.row) + delta, i64::from(from.col)) {
                    Some(target) => self.selection.jump_to(target, mods.shift, bounds),
                    None => false,
                }
            }
            _ => return self.grid_command(event),
        };
        if moved {
            self.reveal_focus();
        }
        moved
    }

    /// Non-navigation keys while idle.
    fn grid_command(&mut self, event: KeyEvent) -> bool {
        let mods = event.modifiers;
        let bounds = self.bounds();
        match event.key {
            Key::Char('a' | 'A') if mods.command() => self.selection.select_all(bounds),
            // a drag owns the selection until the button is released
            Key::Escape if self.drag.is_some() => false,
            Key::Escape => self.selection.collapse_to_focus(),
            Key::Enter | Key::F2 => {
                let Some(focus) = self.selection.focus() else {
                    return false;
                };
                matches!(
                    self.open_editor(focus, CaretPlacement::End),
                    OpenOutcome::Opened { .. }
                )
            }
            Key::Char(c) if !mods.command() && !mods.alt => {
                let Some(focus) = self.selection.focus() else {
                    return false;
                };
                match self.open_editor(focus, CaretPlacement::End) {
                    OpenOutcome::Opened { .. } => self.editor.set_pending(&c.to_string()),
                    _ => false,
                }
            }
            Key::Insert => {
                let event = self.row_event(false);
                self.host.on_add_row(&event);
                true
            }
            Key::Delete if mods.command() => {
                let event = self.row_event(false);
                self.host.on_delete_row(&event);
                true
            }
            _ => false,
        }
    }

    fn row_event(&self, as_child: bool) -> RowEvent {
        let row = self.selection.focus().map(|c| c.row);
        let source_id = if self.config.is_tree_mode {
            row.and_then(|r| usize::try_from(r).ok())
                .and_then(|i| self.tree.get(i))
                .map(|t| t.source_id.clone())
        } else {
            None
        };
        RowEvent {
            row,
            source_id,
            as_child,
        }
    }

    fn tree_key(&mut self, event: KeyEvent) -> bool {
        let bounds = self.bounds();
        let focus_row = self.selection.focus().map(|c| c.row);
        let tree_row = focus_row
            .and_then(|r| usize::try_from(r).ok())
            .and_then(|i| self.tree.get(i));
        let (expanded, has_children) =
            tree_row.map_or((false, false), |t| (t.is_expanded, t.has_children()));

        match (event.key, focus_row) {
            (Key::Arrow(direction @ (Direction::Up | Direction::Down)), _) => {
                let target = match (focus_row, direction) {
                    (None, _) => Some(0),
                    (Some(row), Direction::Up) => row.checked_sub(1),
                    (Some(row), _) => Some(row + 1).filter(|&r| r < bounds.rows),
                };
                let Some(target) = target else {
                    return false;
                };
                if event.modifiers.shift && self.selection.is_active() {
                    self.selection.extend(Coordinate::new(target, 0), bounds);
                } else {
                    self.selection.select_row(target, bounds);
                }
                self.reveal_focus();
                true
            }
            (Key::Arrow(Direction::Right), Some(row)) => {
                if expanded {
                    self.selection.select_row(row + 1, bounds);
                    self.reveal_focus();
                    true
                } else if has_children {
                    self.expand_row(row) > 0
                } else {
                    false
                }
            }
            (Key::Arrow(Direction::Left), Some(row)) => {
                if expanded {
                    return self.collapse_row(row) > 0;
                }
                let parent = usize::try_from(row)
                    .ok()
                    .and_then(|i| self.tree.parent_index(i))
                    .and_then(|p| u32::try_from(p).ok());
                match parent {
                    Some(parent) => {
                        self.selection.select_row(parent, bounds);
                        self.reveal_focus();
                        true
                    }
                    None => false,
                }
            }
            (Key::Enter, Some(row)) => self.toggle_row(row),
            (Key::Home | Key::End, _) => {
                let target = if event.key == Key::Home {
                    0
                } else {
                    bounds.last_row().unwrap_or(0)
                };
                if !self.selection.select_row(target, bounds) {
                    return false;
                }
                self.reveal_focus();
                true
            }
            (Key::Escape, _) if self.drag.is_some() => false,
            (Key::Escape, _) => {
                let had = self.selection.is_active();
                self.selection.clear();
                had
            }
            (Key::Insert, _) => {
                let event = self.row_event(event.modifiers.shift);
                self.host.on_add_row(&event);
                true
            }
            (Key::Delete, _) if event.modifiers.command() => {
                let event = self.row_event(false);
                self.host.on_delete_row(&event);
                true
            }
            _ => false,
        }
    }

    /// Key strings from a DOM `KeyboardEvent`.
    pub fn key_down_dom(&mut self, key: &str, modifiers: Modifiers) -> bool {
        self.key_down(KeyEvent::new(Key::from_dom(key), modifiers))
    }
}
