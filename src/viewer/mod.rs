//! `GridEngine` - the composition root of the grid.
//!
//! This module provides the engine that handles:
//! - Asking the host how many rows there are, how wide each column is, and
//!   rendering only the rows inside the current window
//! - Owning selection, edit, resize and scroll state
//! - Handling user interactions (pointer, keyboard, scroll)
//! - The imperative control surface hosts call after changing their data
//!
//! The engine never inspects row content; everything about rows goes
//! through [`GridHost`].

mod events;
mod scroll;
#[cfg(target_arch = "wasm32")]
mod wasm;

use std::ops::{Range, RangeInclusive};

use serde::Serialize;

use crate::editor::{CaretPlacement, EditSession, EditableCell, EditablePosition, OpenOutcome};
use crate::error::Result;
use crate::layout::{
    compute_window, BodyRect, ColumnLayout, Geometry, HitRegion, ScrollCoalescer, ScrollExtent,
    Viewport, Window,
};
use crate::resize::{ResizeController, ResizePhase};
use crate::selection::SelectionModel;
use crate::tree::TreeRowList;
use crate::types::{Coordinate, GridBounds, GridConfig, TreeNode, TreeRow};

#[cfg(target_arch = "wasm32")]
pub use wasm::GridView;

/// Row-level host action (add/delete row) with the row it targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowEvent {
    /// Focused row, if any
    pub row: Option<u32>,
    /// Tree node behind the row (tree mode)
    pub source_id: Option<String>,
    /// Insert a child of `source_id` rather than a sibling
    pub as_child: bool,
}

/// Everything the host needs to render one row.
#[derive(Debug, Clone)]
pub struct RowContext<'a> {
    pub row: u32,
    /// Index within the rendered block
    pub slot: u32,
    /// Viewport y of the row's top edge
    pub top: f32,
    pub is_selected: bool,
    pub is_fixed: bool,
    /// Selected columns when the row is selected
    pub selected_columns: Option<RangeInclusive<u32>>,
    /// Active edit session when it lives on this row
    pub editing: Option<&'a EditSession>,
    /// Tree metadata (tree mode only)
    pub tree_row: Option<&'a TreeRow>,
}

impl RowContext<'_> {
    pub fn snapshot(&self) -> RowSnapshot {
        RowSnapshot {
            row: self.row,
            slot: self.slot,
            top: self.top,
            is_selected: self.is_selected,
            is_fixed: self.is_fixed,
            selected_columns: self
                .selected_columns
                .as_ref()
                .map(|r| (*r.start(), *r.end())),
            editing_column: self.editing.map(|s| s.position.col),
            pending_text: self.editing.map(|s| s.pending.clone()),
            select_all_text: self
                .editing
                .is_some_and(|s| s.caret == CaretPlacement::SelectAll),
            indent: self.tree_row.map(|t| t.indent),
            is_expanded: self.tree_row.map(|t| t.is_expanded),
            has_children: self.tree_row.map(TreeRow::has_children),
            source_id: self.tree_row.map(|t| t.source_id.clone()),
        }
    }
}

/// Owned, serializable form of [`RowContext`] for JS hosts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowSnapshot {
    pub row: u32,
    pub slot: u32,
    pub top: f32,
    pub is_selected: bool,
    pub is_fixed: bool,
    pub selected_columns: Option<(u32, u32)>,
    pub editing_column: Option<u32>,
    pub pending_text: Option<String>,
    pub select_all_text: bool,
    pub indent: Option<u32>,
    pub is_expanded: Option<bool>,
    pub has_children: Option<bool>,
    pub source_id: Option<String>,
}

/// The host side of a grid: data size, column widths, row rendering and
/// notifications. Only the first four methods are required.
pub trait GridHost {
    /// Whatever the render callback produces for a row
    type Row;

    fn row_count(&self) -> u32;
    fn column_count(&self) -> u32;
    fn column_width(&self, col: u32) -> f32;
    fn render_row(&mut self, ctx: &RowContext<'_>) -> Self::Row;

    /// Current content of a cell, captured when editing starts.
    fn cell_text(&self, _row: u32, _col: u32) -> String {
        String::new()
    }

    /// Rendered content width of a cell, used by auto-fit.
    fn measure_cell(&self, _row: u32, _col: u32) -> Option<f32> {
        None
    }

    /// Direct children of a node; `None` asks for the top-level nodes.
    fn children(&self, _parent: Option<&str>) -> Option<Vec<TreeNode>> {
        None
    }

    fn on_cell_edited(&mut self, _content: &str, _row: u32, _col: u32) {}
    fn on_cell_context_menu(&mut self, _row: u32, _col: u32) {}
    fn on_add_row(&mut self, _event: &RowEvent) {}
    fn on_delete_row(&mut self, _event: &RowEvent) {}
    fn on_header_resize(&mut self, _phase: ResizePhase, _col: u32, _width: f32) {}
}

/// Output of one render pass.
#[derive(Debug, Clone)]
pub struct RenderedFrame<R> {
    /// Window in logical rows (pinned rows excluded)
    pub window: Window,
    /// Translation for the scrolled block
    pub pixel_offset: f32,
    /// Logical indices of the rendered rows, in `rows` order
    pub row_indices: Vec<u32>,
    pub rows: Vec<R>,
    /// Bumped by every render
    pub epoch: u32,
}

/// Mode for pointer dragging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DragMode {
    /// Dragging across cells
    Cells,
    /// Dragging across row gutters (or rows in tree mode)
    Rows,
    /// Dragging across column headers
    Columns,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DragState {
    pub(crate) mode: DragMode,
    pub(crate) last_x: f32,
    pub(crate) last_y: f32,
}

pub struct GridEngine<H: GridHost> {
    host: H,
    config: GridConfig,
    columns: ColumnLayout,
    viewport: Viewport,
    selection: SelectionModel,
    editor: EditableCell,
    resize: ResizeController,
    tree: TreeRowList,
    scroll: ScrollCoalescer,
    drag: Option<DragState>,
    window: Window,
    window_dirty: bool,
    focused: bool,
    needs_render: bool,
    epoch: u32,
}

/// Everything a host call can leave half-updated, captured so a failed
/// call can be undone. The host and config are not included.
#[derive(Debug, Clone)]
pub struct EngineCheckpoint {
    columns: ColumnLayout,
    viewport: Viewport,
    selection: SelectionModel,
    editor: EditableCell,
    resize: ResizeController,
    tree: TreeRowList,
    scroll: ScrollCoalescer,
    drag: Option<DragState>,
    window: Window,
    window_dirty: bool,
    focused: bool,
    needs_render: bool,
    epoch: u32,
}

impl<H: GridHost> std::fmt::Debug for GridEngine<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridEngine")
            .field("config", &self.config)
            .field("viewport", &self.viewport)
            .field("selection", &self.selection)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl<H: GridHost> GridEngine<H> {
    /// Build an engine over `host`.
    ///
    /// In tree mode the top-level rows are fetched from the host right away.
    ///
    /// # Errors
    /// Returns an error if the configuration fails validation.
    pub fn new(host: H, config: GridConfig) -> Result<Self> {
        config.validate()?;
        let resize = ResizeController::new(config.min_column_width);
        let mut engine = Self {
            host,
            config,
            columns: ColumnLayout::new(),
            viewport: Viewport::new(),
            selection: SelectionModel::new(),
            editor: EditableCell::new(),
            resize,
            tree: TreeRowList::new(),
            scroll: ScrollCoalescer::default(),
            drag: None,
            window: Window::default(),
            window_dirty: true,
            focused: false,
            needs_render: true,
            epoch: 0,
        };
        if engine.config.is_tree_mode {
            engine.reload_tree();
        }
        engine.recompute_window();
        Ok(engine)
    }

    /// Capture the interaction state ahead of a call whose host callbacks
    /// may fail.
    pub fn checkpoint(&self) -> EngineCheckpoint {
        EngineCheckpoint {
            columns: self.columns.clone(),
            viewport: self.viewport.clone(),
            selection: self.selection.clone(),
            editor: self.editor.clone(),
            resize: self.resize.clone(),
            tree: self.tree.clone(),
            scroll: self.scroll.clone(),
            drag: self.drag,
            window: self.window,
            window_dirty: self.window_dirty,
            focused: self.focused,
            needs_render: self.needs_render,
            epoch: self.epoch,
        }
    }

    /// Put back a state taken with [`GridEngine::checkpoint`].
    pub fn rollback(&mut self, checkpoint: EngineCheckpoint) {
        let EngineCheckpoint {
            columns,
            viewport,
            selection,
            editor,
            resize,
            tree,
            scroll,
            drag,
            window,
            window_dirty,
            focused,
            needs_render,
            epoch,
        } = checkpoint;
        self.columns = columns;
        self.viewport = viewport;
        self.selection = selection;
        self.editor = editor;
        self.resize = resize;
        self.tree = tree;
        self.scroll = scroll;
        self.drag = drag;
        self.window = window;
        self.window_dirty = window_dirty;
        self.focused = focused;
        self.needs_render = needs_render;
        self.epoch = epoch;
        tracing::debug!("engine state rolled back");
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn editor(&self) -> &EditableCell {
        &self.editor
    }

    pub fn tree(&self) -> &TreeRowList {
        &self.tree
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_active()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    // ---- Sizes and geometry ----

    /// Logical row count: the visible tree rows in tree mode, else the host's.
    pub fn row_count(&self) -> u32 {
        if self.config.is_tree_mode {
            u32::try_from(self.tree.len()).unwrap_or(u32::MAX)
        } else {
            self.host.row_count()
        }
    }

    pub fn column_count(&self) -> u32 {
        if self.config.is_tree_mode {
            1
        } else {
            self.host.column_count()
        }
    }

    pub fn bounds(&self) -> GridBounds {
        GridBounds::new(self.row_count(), self.column_count())
    }

    /// Effective width of `col`: a user resize if any, else the host's width.
    pub fn column_width(&self, col: u32) -> f32 {
        self.columns.width(col, |c| self.host.column_width(c))
    }

    pub(crate) fn geometry(&self) -> Geometry<'_, impl Fn(u32) -> f32 + '_> {
        Geometry::new(&self.config, self.bounds(), move |c| self.column_width(c))
    }

    /// Height of the scrolling body (viewport minus header, pinned rows and gutter).
    pub fn body_height(&self) -> f32 {
        (self.viewport.height - self.geometry().body_top() - self.config.scrollbar_size).max(0.0)
    }

    pub fn body_width(&self) -> f32 {
        (self.viewport.width - self.config.fixed_column_pixel_width - self.config.scrollbar_size)
            .max(0.0)
    }

    pub(crate) fn body_rect(&self) -> BodyRect {
        let top = self.geometry().body_top();
        BodyRect {
            left: self.config.fixed_column_pixel_width,
            top,
            right: self.config.fixed_column_pixel_width + self.body_width(),
            bottom: top + self.body_height(),
        }
    }

    pub(crate) fn scroll_extent(&self) -> ScrollExtent {
        let geo = self.geometry();
        ScrollExtent {
            content_width: geo.content_width(),
            content_height: geo.content_height(),
            body_width: self.body_width(),
            body_height: self.body_height(),
        }
    }

    fn frozen_rows(&self) -> u32 {
        self.config.frozen_rows().min(self.row_count())
    }

    /// Current window in logical rows.
    pub fn window(&self) -> Window {
        self.window
    }

    /// Recompute the window from the current scroll offset.
    pub fn recompute_window(&mut self) -> Window {
        let frozen = self.frozen_rows();
        let body_rows = self.row_count() - frozen;
        let body = compute_window(
            self.viewport.scroll_top,
            self.body_height(),
            self.config.cell_height,
            body_rows,
        );
        let window = Window {
            start_row: body.start_row + frozen,
            ..body
        };
        if window != self.window {
            tracing::trace!(
                start_row = window.start_row,
                visible_count = window.visible_count,
                "window recomputed"
            );
            self.needs_render = true;
        }
        self.window = window;
        self.window_dirty = false;
        if self.editor.is_editing() {
            let rendered = self.rendered_rows();
            self.relocate_editor(&rendered);
        }
        window
    }

    /// Point the open editor at the slot its data row renders into.
    fn relocate_editor(&mut self, rendered: &[u32]) {
        let slot = self
            .editor
            .session()
            .and_then(|s| slot_of(rendered, s.position.scroll_row));
        self.editor.relocate(slot);
    }

    /// Rows instantiated by the next render: fixed rows, then the window.
    pub fn rendered_rows(&self) -> Vec<u32> {
        let total = self.row_count();
        let mut fixed: Vec<u32> = self
            .config
            .fixed_row_indices
            .iter()
            .copied()
            .filter(|&r| r < total)
            .collect();
        fixed.sort_unstable();
        fixed.dedup();

        let body: Range<u32> = self.window.overscanned(self.config.overscan_rows, total);
        let frozen = self.frozen_rows();
        let body = body.start.max(frozen)..body.end;
        let mut rows = fixed.clone();
        rows.extend(body.filter(|r| fixed.binary_search(r).is_err()));
        rows
    }

    // ---- Render ----

    /// Render the fixed rows and the windowed rows through the host.
    ///
    /// Rows outside the window are never passed to the host.
    pub fn render(&mut self) -> RenderedFrame<H::Row> {
        let _span = tracing::debug_span!("grid_render", epoch = self.epoch).entered();
        if self.window_dirty {
            self.recompute_window();
        }

        let indices = self.rendered_rows();
        self.relocate_editor(&indices);
        let tree_mode = self.config.is_tree_mode;
        let selection = self.selection.rect();
        let planned: Vec<(u32, f32, bool)> = {
            let geo = self.geometry();
            indices
                .iter()
                .map(|&row| {
                    (
                        row,
                        geo.row_viewport_y(row, self.viewport.scroll_top),
                        self.config.is_fixed_row(row),
                    )
                })
                .collect()
        };

        let selected_rows = self.selection.selected_rows();
        let session = self.editor.session();
        let mut rows = Vec::with_capacity(planned.len());
        for (slot, (row, top, is_fixed)) in planned.into_iter().enumerate() {
            let is_selected = selected_rows.as_ref().is_some_and(|r| r.contains(&row));
            let selected_columns = selection.filter(|_| is_selected).map(|r| {
                let (_, min_col, _, max_col) = r.bounds();
                min_col..=max_col
            });
            let ctx = RowContext {
                row,
                slot: u32::try_from(slot).unwrap_or(u32::MAX),
                top,
                is_selected,
                is_fixed,
                selected_columns,
                editing: session.filter(|s| s.position.scroll_row == row),
                tree_row: if tree_mode {
                    usize::try_from(row).ok().and_then(|i| self.tree.get(i))
                } else {
                    None
                },
            };
            rows.push(self.host.render_row(&ctx));
        }

        self.needs_render = false;
        self.epoch = self.epoch.wrapping_add(1);
        RenderedFrame {
            window: self.window,
            pixel_offset: self.window.pixel_offset,
            row_indices: indices,
            rows,
            epoch: self.epoch,
        }
    }

    // ---- Control surface ----

    /// Mark everything stale so the next render redraws from scratch.
    pub fn force_rerender(&mut self) {
        self.window_dirty = true;
        self.needs_render = true;
    }

    /// Re-clamp scroll and selection and re-window after the host changed
    /// sizes (row count, column widths, container size).
    pub fn recompute_after_resize(&mut self) {
        let extent = self.scroll_extent();
        self.viewport.clamp_scroll(&extent);
        let bounds = self.bounds();
        self.selection.clamp_to(bounds);
        self.recompute_window();
        self.needs_render = true;
    }

    /// Shift selection and edit focus by `offset` rows after the host
    /// inserted (or removed, negative) rows ahead of them.
    pub fn recompute_after_row_insertion(&mut self, offset: i64) {
        self.recompute_after_row_insertion_at(0, offset);
    }

    /// Like [`GridEngine::recompute_after_row_insertion`], only moving rows
    /// at or after `at_row`.
    pub fn recompute_after_row_insertion_at(&mut self, at_row: u32, offset: i64) {
        let bounds = self.bounds();
        self.selection.shift_rows(at_row, offset, bounds);
        self.editor.shift_rows(at_row, offset);
        tracing::debug!(at_row, offset, "rows shifted");
        self.recompute_after_resize();
    }

    /// The grid takes keyboard focus.
    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// Focus left the grid: commits any pending edit.
    pub fn blur(&mut self) {
        self.focused = false;
        if self.commit_edit() {
            self.needs_render = true;
        }
    }

    pub fn has_active_selection(&self) -> bool {
        self.selection.is_active()
    }

    /// Row under a pointer position, if any. The header and scrollbar
    /// gutters have none.
    pub fn resolve_row_index_from_pointer(&self, x: f32, y: f32) -> Option<u32> {
        match self.hit_test(x, y) {
            HitRegion::RowGutter(row) => Some(row),
            HitRegion::Cell(coord) => Some(coord.row),
            _ => None,
        }
    }

    /// Resize the viewport (container size in CSS pixels).
    pub fn resize_viewport(&mut self, width: f32, height: f32) {
        self.viewport.resize(width, height);
        self.recompute_after_resize();
    }

    /// Set a column width programmatically, as a finished resize would.
    pub fn set_column_width(&mut self, col: u32, width: f32) {
        let width = width.max(self.resize.min_width());
        self.columns.set_width(col, width);
        self.recompute_after_resize();
    }

    /// Forget a user-set width and fall back to the host's.
    pub fn reset_column_width(&mut self, col: u32) {
        if self.columns.reset(col) {
            self.recompute_after_resize();
        }
    }

    // ---- Editing ----

    /// Whether edits on `coord` are rejected (fixed row/column, tree mode).
    pub fn is_read_only(&self, coord: Coordinate) -> bool {
        self.config.is_tree_mode
            || self.config.is_fixed_row(coord.row)
            || self.config.is_fixed_column(coord.col)
    }

    /// Open the editor on `coord`, committing any other open cell first.
    pub fn open_editor(&mut self, coord: Coordinate, caret: CaretPlacement) -> OpenOutcome {
        if !self.bounds().contains(coord) {
            return OpenOutcome::Rejected;
        }
        let fixed = self.is_read_only(coord);
        let content = if fixed {
            String::new()
        } else {
            self.host.cell_text(coord.row, coord.col)
        };
        let slot = slot_of(&self.rendered_rows(), coord.row);
        let position = EditablePosition::new(slot, coord.col, coord.row);
        let outcome = self.editor.open(position, content, caret, fixed);
        if let OpenOutcome::Opened { committed } = &outcome {
            if let Some(edit) = committed {
                if edit.changed || self.config.commit_unchanged {
                    self.host.on_cell_edited(&edit.content, edit.row, edit.col);
                }
            }
            self.selection.clear();
            self.drag = None;
            self.needs_render = true;
        }
        outcome
    }

    /// Commit the open edit (if any), notify the host, and leave a single-cell
    /// selection on the edited cell. Returns false while idle.
    pub fn commit_edit(&mut self) -> bool {
        let Some(edit) = self.editor.commit() else {
            return false;
        };
        if edit.changed || self.config.commit_unchanged {
            self.host.on_cell_edited(&edit.content, edit.row, edit.col);
        }
        let bounds = self.bounds();
        self.selection.start(Coordinate::new(edit.row, edit.col), bounds);
        self.needs_render = true;
        true
    }

    /// Discard the open edit (if any); the selection walks back to the cell.
    pub fn cancel_edit(&mut self) -> bool {
        let Some(cancelled) = self.editor.cancel() else {
            return false;
        };
        let bounds = self.bounds();
        self.selection.start(cancelled.position.coordinate(), bounds);
        self.needs_render = true;
        true
    }

    /// Replace the pending text of the open editor (text field input).
    pub fn input_text(&mut self, text: &str) -> bool {
        let changed = self.editor.set_pending(text);
        self.needs_render |= changed;
        changed
    }

    // ---- Tree ----

    /// Re-fetch top-level rows from the host, dropping all expansion.
    pub fn reload_tree(&mut self) {
        let roots = self.host.children(None).unwrap_or_default();
        self.tree = TreeRowList::from_roots(roots);
        let bounds = self.bounds();
        self.selection.clamp_to(bounds);
        self.window_dirty = true;
        self.needs_render = true;
    }

    fn tree_index(row: u32) -> Option<usize> {
        usize::try_from(row).ok()
    }

    /// Expand a tree row. Returns the number of rows inserted.
    pub fn expand_row(&mut self, row: u32) -> u32 {
        let Some(index) = Self::tree_index(row) else {
            return 0;
        };
        let host = &self.host;
        let source = |id: &String| host.children(Some(id.as_str()));
        let inserted = self.tree.expand(index, &source);
        let inserted = u32::try_from(inserted).unwrap_or(u32::MAX);
        if inserted > 0 {
            self.recompute_after_row_insertion_at(row + 1, i64::from(inserted));
        }
        inserted
    }

    /// Collapse a tree row. Returns the number of rows removed.
    pub fn collapse_row(&mut self, row: u32) -> u32 {
        let Some(index) = Self::tree_index(row) else {
            return 0;
        };
        let removed = u32::try_from(self.tree.collapse(index).len()).unwrap_or(u32::MAX);
        if removed > 0 {
            // shifting from the parent itself lands hidden descendants on it
            self.recompute_after_row_insertion_at(row, -i64::from(removed));
        }
        removed
    }

    /// Expand a collapsed row or collapse an expanded one.
    pub fn toggle_row(&mut self, row: u32) -> bool {
        let Some(index) = Self::tree_index(row) else {
            return false;
        };
        let host = &self.host;
        let source = |id: &String| host.children(Some(id.as_str()));
        let delta = self.tree.toggle(index, &source);
        if delta == 0 {
            return false;
        }
        let at_row = if delta < 0 { row } else { row.saturating_add(1) };
        self.recompute_after_row_insertion_at(at_row, delta);
        true
    }

    /// Insert a subtask under `parent_row`; selection and edit focus below
    /// the new row move down with it. Returns the new row's index when it is
    /// visible.
    pub fn insert_tree_child(&mut self, parent_row: u32, node: TreeNode) -> Option<u32> {
        let insertion = self.tree.insert_child(Self::tree_index(parent_row)?, node)?;
        let index = u32::try_from(insertion.index).ok()?;
        if insertion.offset == 0 {
            self.needs_render = true;
            return None;
        }
        self.recompute_after_row_insertion_at(index, insertion.offset);
        Some(index)
    }

    /// Insert a top-level row at `row` (moved past any subtree it would split).
    pub fn insert_tree_root(&mut self, row: u32, node: TreeNode) -> u32 {
        let index = Self::tree_index(row).unwrap_or(usize::MAX);
        let insertion = self.tree.insert_root(index, node);
        let index = u32::try_from(insertion.index).unwrap_or(u32::MAX);
        self.recompute_after_row_insertion_at(index, insertion.offset);
        index
    }

    /// Remove a tree row with its visible descendants.
    pub fn remove_tree_row(&mut self, row: u32) -> u32 {
        let Some(index) = Self::tree_index(row) else {
            return 0;
        };
        let removed = u32::try_from(self.tree.remove(index)).unwrap_or(u32::MAX);
        if removed > 0 {
            self.recompute_after_row_insertion_at(row, -i64::from(removed));
        }
        removed
    }

    fn notify_resize(&mut self, phase: ResizePhase, col: u32, width: f32) {
        self.host.on_header_resize(phase, col, width);
    }
}

/// Position of `row` within a rendered block.
fn slot_of(rendered: &[u32], row: u32) -> Option<u32> {
    rendered
        .iter()
        .position(|&r| r == row)
        .and_then(|i| u32::try_from(i).ok())
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

    struct Rows(u32);

    impl GridHost for Rows {
        type Row = u32;
        fn row_count(&self) -> u32 {
            self.0
        }
        fn column_count(&self) -> u32 {
            4
        }
        fn column_width(&self, _col: u32) -> f32 {
            100.0
        }
        fn render_row(&mut self, ctx: &RowContext<'_>) -> u32 {
            ctx.row
        }
    }

    fn engine(rows: u32, config: GridConfig) -> GridEngine<Rows> {
        let mut engine = GridEngine::new(Rows(rows), config).unwrap();
        engine.resize_viewport(440.0, 525.0);
        engine
    }

    #[test]
    fn test_render_only_window() {
        let mut e = engine(1_000, GridConfig::default());
        let frame = e.render();
        assert_eq!(frame.rows.len(), 20);
        assert_eq!(frame.rows.first(), Some(&0));
        assert_eq!(frame.rows.last(), Some(&19));
    }

    #[test]
    fn test_fixed_rows_always_rendered() {
        let config = GridConfig {
            fixed_row_indices: vec![0, 999],
            ..GridConfig::default()
        };
        let mut e = engine(1_000, config);
        let frame = e.render();
        assert_eq!(frame.rows[0], 0);
        assert_eq!(frame.rows[1], 999);
        // pinned row 0 shrinks the body by one row
        assert_eq!(frame.rows.len(), 2 + 19);
        assert_eq!(frame.rows[2], 1);
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = GridConfig {
            cell_height: -1.0,
            ..GridConfig::default()
        };
        assert!(GridEngine::new(Rows(1), config).is_err());
    }

    #[test]
    fn test_column_override() {
        let mut e = engine(10, GridConfig::default());
        e.set_column_width(1, 3.0);
        assert_eq!(e.column_width(1), 10.0);
        e.reset_column_width(1);
        assert_eq!(e.column_width(1), 100.0);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let ctx = RowContext {
            row: 3,
            slot: 1,
            top: 75.0,
            is_selected: true,
            is_fixed: false,
            selected_columns: Some(0..=2),
            editing: None,
            tree_row: None,
        };
        let json = serde_json::to_value(ctx.snapshot()).unwrap();
        assert_eq!(json["isSelected"], true);
        assert_eq!(json["selectedColumns"], serde_json::json!([0, 2]));
    }
}
