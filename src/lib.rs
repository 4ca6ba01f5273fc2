//! gridview - virtualized grid and tree rendering engine
//!
//! Shows datasets of any size by rendering only the rows inside the
//! viewport. The engine owns interaction state, the host owns the data:
//! - Row windowing from scroll offset and row height
//! - Pixel <-> cell geometry with pinned rows and a fixed row gutter
//! - Rectangular selection with pointer drag, autoscroll and keyboard navigation
//! - One-cell-at-a-time editing with commit/cancel semantics
//! - Expand/collapse of hierarchical rows (tree mode)
//! - Interactive column resize and auto-fit
//!
//! # Usage (Rust)
//!
//! ```
//! use gridview::{GridConfig, GridEngine, GridHost, RowContext};
//!
//! struct Table(Vec<Vec<String>>);
//!
//! impl GridHost for Table {
//!     type Row = u32;
//!     fn row_count(&self) -> u32 { self.0.len() as u32 }
//!     fn column_count(&self) -> u32 { 3 }
//!     fn column_width(&self, _col: u32) -> f32 { 120.0 }
//!     fn render_row(&mut self, ctx: &RowContext<'_>) -> u32 { ctx.row }
//! }
//!
//! let rows = vec![vec![String::new(); 3]; 10_000];
//! let mut grid = GridEngine::new(Table(rows), GridConfig::default()).unwrap();
//! grid.resize_viewport(800.0, 525.0);
//! let frame = grid.render();
//! assert_eq!(frame.rows.len(), 20);
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridView } from 'gridview';
//! await init();
//! const grid = new GridView(host, { cellHeight: 25 });
//! grid.setRenderCallback(() => paint(grid.render()));
//! ```

pub mod editor;
pub mod error;
pub mod layout;
pub mod resize;
pub mod selection;
pub mod tree;
pub mod types;
pub mod viewer;

pub use editor::{CaretPlacement, EditableCell, EditablePosition, OpenOutcome};
pub use error::{GridError, Result};
pub use layout::{compute_window, ColumnHit, HitRegion, Window};
pub use resize::{ResizeController, ResizePhase};
pub use selection::SelectionModel;
pub use tree::{TreeRowList, TreeSource};
pub use types::*;
pub use viewer::{
    EngineCheckpoint, GridEngine, GridHost, RenderedFrame, RowContext, RowEvent, RowSnapshot,
};

#[cfg(target_arch = "wasm32")]
pub use viewer::GridView;
