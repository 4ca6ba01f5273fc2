//! Common test utilities: a recording host and pixel helpers.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_precision_loss
)]

use std::collections::HashMap;

use gridview::{
    GridConfig, GridEngine, GridHost, Key, KeyEvent, Modifiers, PointerEvent, ResizePhase,
    RowContext, RowEvent, RowSnapshot, TreeNode,
};

pub const ROW_HEIGHT: f32 = 25.0;
pub const HEADER_HEIGHT: f32 = 25.0;
pub const COLUMN_WIDTH: f32 = 100.0;
pub const VIEWPORT_WIDTH: f32 = 800.0;
/// Header plus a 500px body: 20 rows at 25px.
pub const VIEWPORT_HEIGHT: f32 = 525.0;

/// Everything the engine told the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Edited { content: String, row: u32, col: u32 },
    ContextMenu { row: u32, col: u32 },
    AddRow(RowEvent),
    DeleteRow(RowEvent),
    Resize { phase: ResizePhase, col: u32, width: f32 },
}

#[derive(Debug, Default)]
pub struct MockHost {
    pub rows: u32,
    pub cols: u32,
    pub widths: HashMap<u32, f32>,
    pub cells: HashMap<(u32, u32), String>,
    pub measured: HashMap<(u32, u32), f32>,
    /// Children by parent id; `None` holds the top-level nodes
    pub tree: HashMap<Option<String>, Vec<TreeNode>>,
    pub events: Vec<HostEvent>,
    pub render_calls: usize,
}

impl MockHost {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            ..Self::default()
        }
    }

    pub fn with_cell(mut self, row: u32, col: u32, text: &str) -> Self {
        self.cells.insert((row, col), text.to_string());
        self
    }

    pub fn with_width(mut self, col: u32, width: f32) -> Self {
        self.widths.insert(col, width);
        self
    }

    pub fn with_children(mut self, parent: Option<&str>, ids: &[(&str, u32)]) -> Self {
        let nodes = ids
            .iter()
            .map(|(id, count)| TreeNode::new((*id).to_string(), *count))
            .collect();
        self.tree.insert(parent.map(str::to_string), nodes);
        self
    }

    pub fn edits(&self) -> Vec<(String, u32, u32)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                HostEvent::Edited { content, row, col } => Some((content.clone(), *row, *col)),
                _ => None,
            })
            .collect()
    }

    pub fn resizes(&self) -> Vec<(ResizePhase, u32, f32)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                HostEvent::Resize { phase, col, width } => Some((*phase, *col, *width)),
                _ => None,
            })
            .collect()
    }
}

impl GridHost for MockHost {
    type Row = RowSnapshot;

    fn row_count(&self) -> u32 {
        self.rows
    }

    fn column_count(&self) -> u32 {
        self.cols
    }

    fn column_width(&self, col: u32) -> f32 {
        self.widths.get(&col).copied().unwrap_or(COLUMN_WIDTH)
    }

    fn render_row(&mut self, ctx: &RowContext<'_>) -> RowSnapshot {
        self.render_calls += 1;
        ctx.snapshot()
    }

    fn cell_text(&self, row: u32, col: u32) -> String {
        self.cells.get(&(row, col)).cloned().unwrap_or_default()
    }

    fn measure_cell(&self, row: u32, col: u32) -> Option<f32> {
        self.measured.get(&(row, col)).copied()
    }

    fn children(&self, parent: Option<&str>) -> Option<Vec<TreeNode>> {
        self.tree.get(&parent.map(str::to_string)).cloned()
    }

    fn on_cell_edited(&mut self, content: &str, row: u32, col: u32) {
        self.cells.insert((row, col), content.to_string());
        self.events.push(HostEvent::Edited {
            content: content.to_string(),
            row,
            col,
        });
    }

    fn on_cell_context_menu(&mut self, row: u32, col: u32) {
        self.events.push(HostEvent::ContextMenu { row, col });
    }

    fn on_add_row(&mut self, event: &RowEvent) {
        self.events.push(HostEvent::AddRow(event.clone()));
    }

    fn on_delete_row(&mut self, event: &RowEvent) {
        self.events.push(HostEvent::DeleteRow(event.clone()));
    }

    fn on_header_resize(&mut self, phase: ResizePhase, col: u32, width: f32) {
        self.events.push(HostEvent::Resize { phase, col, width });
    }
}

pub fn engine_with(host: MockHost, config: GridConfig) -> GridEngine<MockHost> {
    let mut engine = GridEngine::new(host, config).unwrap();
    engine.resize_viewport(VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
    engine
}

pub fn engine(rows: u32, cols: u32) -> GridEngine<MockHost> {
    engine_with(MockHost::new(rows, cols), GridConfig::default())
}

/// Viewport y that resolves to `row` with no scroll and no pinned rows:
/// the boundary between `row` and `row + 1`.
pub fn row_y(row: u32) -> f32 {
    HEADER_HEIGHT + (row as f32 + 1.0) * ROW_HEIGHT
}

/// Viewport x in the middle of `col` with uniform widths and no fixed band.
pub fn col_x(col: u32) -> f32 {
    (col as f32 + 0.5) * COLUMN_WIDTH
}

pub fn click(engine: &mut GridEngine<MockHost>, row: u32, col: u32) -> bool {
    let event = PointerEvent::primary(col_x(col), row_y(row));
    let handled = engine.pointer_down(event);
    engine.pointer_up(event);
    handled
}

pub fn double_click(engine: &mut GridEngine<MockHost>, row: u32, col: u32) -> bool {
    let event = PointerEvent::primary(col_x(col), row_y(row)).with_click_count(2);
    let handled = engine.pointer_down(event);
    engine.pointer_up(event);
    handled
}

pub fn press(engine: &mut GridEngine<MockHost>, key: Key) -> bool {
    engine.key_down(KeyEvent::plain(key))
}

pub fn press_with(engine: &mut GridEngine<MockHost>, key: Key, modifiers: Modifiers) -> bool {
    engine.key_down(KeyEvent::new(key, modifiers))
}
