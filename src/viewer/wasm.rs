//! `GridView` - the WebAssembly face of [`GridEngine`].
//!
//! The host is a plain JS object of callbacks:
//!
//! ```javascript
//! const grid = new GridView({
//!   rowCount: () => rows.length,
//!   columnCount: () => columns.length,
//!   columnWidth: (col) => columns[col].width,
//!   renderRow: (ctx) => drawRow(ctx),
//!   onCellEdited: (content, row, col) => save(row, col, content),
//! }, { cellHeight: 25, fixedRowIndices: [0] });
//! grid.setRenderCallback(() => paint(grid.render()));
//! ```
//!
//! Exceptions thrown by host callbacks are caught at the call site and
//! rethrown from the `GridView` method that triggered them.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::{GridEngine, GridHost, RowContext, RowEvent};
use crate::error::{GridError, Result};
use crate::resize::ResizePhase;
use crate::types::{Coordinate, GridConfig, Modifiers, PointerButton, PointerEvent, TreeNode};

/// Safely convert f64 to u32 with clamping.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn f64_to_u32_clamped(v: f64) -> u32 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, f64::from(u32::MAX)) as u32
}

#[allow(clippy::cast_possible_truncation)]
fn f64_to_f32(v: f64) -> f32 {
    v as f32
}

fn callback(host: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(host, &JsValue::from_str(name))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

fn required(host: &JsValue, name: &str) -> Result<Function> {
    callback(host, name).ok_or_else(|| GridError::Host(format!("missing `{name}` callback")))
}

/// [`GridHost`] over a JS object of callbacks.
pub(crate) struct JsHost {
    this: JsValue,
    row_count: Function,
    column_count: Function,
    column_width: Function,
    render_row: Function,
    cell_text: Option<Function>,
    measure_cell: Option<Function>,
    children: Option<Function>,
    on_cell_edited: Option<Function>,
    on_cell_context_menu: Option<Function>,
    on_add_row: Option<Function>,
    on_delete_row: Option<Function>,
    on_header_resize: Option<Function>,
    /// First exception thrown by a callback since the last check
    error: RefCell<Option<JsValue>>,
}

impl JsHost {
    pub(crate) fn from_object(host: &JsValue) -> Result<Self> {
        if !host.is_object() {
            return Err(GridError::Host("host must be an object".into()));
        }
        Ok(Self {
            this: host.clone(),
            row_count: required(host, "rowCount")?,
            column_count: required(host, "columnCount")?,
            column_width: required(host, "columnWidth")?,
            render_row: required(host, "renderRow")?,
            cell_text: callback(host, "cellText"),
            measure_cell: callback(host, "measureCell"),
            children: callback(host, "children"),
            on_cell_edited: callback(host, "onCellEdited"),
            on_cell_context_menu: callback(host, "onCellContextMenu"),
            on_add_row: callback(host, "onAddRow"),
            on_delete_row: callback(host, "onDeleteRow"),
            on_header_resize: callback(host, "onHeaderResize"),
            error: RefCell::new(None),
        })
    }

    fn record(&self, result: std::result::Result<JsValue, JsValue>) -> JsValue {
        match result {
            Ok(value) => value,
            Err(e) => {
                let mut slot = self.error.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                JsValue::UNDEFINED
            }
        }
    }

    pub(crate) fn take_error(&self) -> Option<JsValue> {
        self.error.borrow_mut().take()
    }

    fn to_js<T: serde::Serialize>(&self, value: &T) -> JsValue {
        let converted = serde_wasm_bindgen::to_value(value)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")));
        self.record(converted)
    }
}

impl GridHost for JsHost {
    type Row = JsValue;

    fn row_count(&self) -> u32 {
        let v = self.record(self.row_count.call0(&self.this));
        v.as_f64().map_or(0, f64_to_u32_clamped)
    }

    fn column_count(&self) -> u32 {
        let v = self.record(self.column_count.call0(&self.this));
        v.as_f64().map_or(0, f64_to_u32_clamped)
    }

    fn column_width(&self, col: u32) -> f32 {
        let v = self.record(self.column_width.call1(&self.this, &JsValue::from(col)));
        v.as_f64().map_or(0.0, f64_to_f32)
    }

    fn render_row(&mut self, ctx: &RowContext<'_>) -> JsValue {
        let info = self.to_js(&ctx.snapshot());
        self.record(self.render_row.call1(&self.this, &info))
    }

    fn cell_text(&self, row: u32, col: u32) -> String {
        let Some(f) = &self.cell_text else {
            return String::new();
        };
        let v = self.record(f.call2(&self.this, &JsValue::from(row), &JsValue::from(col)));
        v.as_string().unwrap_or_default()
    }

    fn measure_cell(&self, row: u32, col: u32) -> Option<f32> {
        let f = self.measure_cell.as_ref()?;
        let v = self.record(f.call2(&self.this, &JsValue::from(row), &JsValue::from(col)));
        v.as_f64().map(f64_to_f32)
    }

    fn children(&self, parent: Option<&str>) -> Option<Vec<TreeNode>> {
        let f = self.children.as_ref()?;
        let parent = parent.map_or(JsValue::NULL, JsValue::from_str);
        let v = self.record(f.call1(&self.this, &parent));
        if v.is_null() || v.is_undefined() {
            return None;
        }
        match serde_wasm_bindgen::from_value(v) {
            Ok(nodes) => Some(nodes),
            Err(e) => {
                tracing::warn!(error = %e, "children callback returned an invalid shape");
                None
            }
        }
    }

    fn on_cell_edited(&mut self, content: &str, row: u32, col: u32) {
        if let Some(f) = &self.on_cell_edited {
            let result = f.call3(
                &self.this,
                &JsValue::from_str(content),
                &JsValue::from(row),
                &JsValue::from(col),
            );
            self.record(result);
        }
    }

    fn on_cell_context_menu(&mut self, row: u32, col: u32) {
        if let Some(f) = &self.on_cell_context_menu {
            let result = f.call2(&self.this, &JsValue::from(row), &JsValue::from(col));
            self.record(result);
        }
    }

    fn on_add_row(&mut self, event: &RowEvent) {
        if let Some(f) = &self.on_add_row {
            let arg = self.to_js(event);
            self.record(f.call1(&self.this, &arg));
        }
    }

    fn on_delete_row(&mut self, event: &RowEvent) {
        if let Some(f) = &self.on_delete_row {
            let arg = self.to_js(event);
            self.record(f.call1(&self.this, &arg));
        }
    }

    fn on_header_resize(&mut self, phase: ResizePhase, col: u32, width: f32) {
        if let Some(f) = &self.on_header_resize {
            let result = f.call3(
                &self.this,
                &JsValue::from_str(phase.as_str()),
                &JsValue::from(col),
                &JsValue::from(width),
            );
            self.record(result);
        }
    }
}

/// State shared with the animation-frame closure.
struct SharedState {
    engine: GridEngine<JsHost>,
    render_callback: Option<Function>,
    frame_closure: Option<Closure<dyn FnMut()>>,
    frame_pending: bool,
}

#[wasm_bindgen]
pub struct GridView {
    state: Rc<RefCell<SharedState>>,
}

impl GridView {
    fn invoke_render_callback(callback: Option<Function>) -> std::result::Result<(), JsValue> {
        if let Some(callback) = callback {
            callback.call0(&JsValue::NULL)?;
        }
        Ok(())
    }

    /// Run `f` against the engine, then notify the render callback.
    ///
    /// If a host callback threw, the engine is rolled back to where it was
    /// before `f` and the exception is rethrown. The borrow is released
    /// before any JS runs.
    fn dispatch<T>(
        &self,
        f: impl FnOnce(&mut GridEngine<JsHost>) -> T,
    ) -> std::result::Result<T, JsValue> {
        let (value, callback, autoscroll) = {
            let mut s = self.state.borrow_mut();
            let checkpoint = s.engine.checkpoint();
            let value = f(&mut s.engine);
            if let Some(e) = s.engine.host().take_error() {
                s.engine.rollback(checkpoint);
                return Err(e);
            }
            let callback = if s.engine.needs_render() {
                s.render_callback.clone()
            } else {
                None
            };
            (value, callback, s.engine.is_autoscrolling())
        };
        if autoscroll {
            Self::request_frame(&self.state);
        }
        Self::invoke_render_callback(callback)?;
        Ok(value)
    }

    /// Read-only counterpart of `dispatch`: rethrows host exceptions so none
    /// is left behind for the next call.
    fn query<T>(
        &self,
        f: impl FnOnce(&GridEngine<JsHost>) -> T,
    ) -> std::result::Result<T, JsValue> {
        let s = self.state.borrow();
        let value = f(&s.engine);
        match s.engine.host().take_error() {
            Some(e) => Err(e),
            None => Ok(value),
        }
    }

    fn request_frame(state: &Rc<RefCell<SharedState>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut s = state.borrow_mut();
        if s.frame_pending {
            return;
        }
        if s.frame_closure.is_none() {
            let weak_state = Rc::downgrade(state);
            let closure = Closure::wrap(Box::new(move || {
                if let Some(state) = weak_state.upgrade() {
                    GridView::handle_frame(&state);
                }
            }) as Box<dyn FnMut()>);
            s.frame_closure = Some(closure);
        }
        let Some(closure) = s.frame_closure.as_ref() else {
            return;
        };
        if window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .is_ok()
        {
            s.frame_pending = true;
        }
    }

    fn handle_frame(state: &Rc<RefCell<SharedState>>) {
        let (callback, again) = {
            let mut s = state.borrow_mut();
            s.frame_pending = false;
            let checkpoint = s.engine.checkpoint();
            let mut redraw = s.engine.animation_frame();
            if let Some(e) = s.engine.host().take_error() {
                s.engine.rollback(checkpoint);
                redraw = false;
                web_sys::console::error_1(&e);
            }
            let callback = if redraw {
                s.render_callback.clone()
            } else {
                None
            };
            (callback, s.engine.is_autoscrolling())
        };
        if again {
            Self::request_frame(state);
        }
        if let Err(e) = Self::invoke_render_callback(callback) {
            web_sys::console::error_1(&e);
        }
    }
}

#[wasm_bindgen]
impl GridView {
    /// Create a grid over a host object. `config` may be `undefined` for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(host: &JsValue, config: JsValue) -> std::result::Result<GridView, JsValue> {
        console_error_panic_hook::set_once();

        let config: GridConfig = if config.is_undefined() || config.is_null() {
            GridConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| GridError::Config(e.to_string()))?
        };
        let host = JsHost::from_object(host)?;
        let engine = GridEngine::new(host, config)?;
        if let Some(e) = engine.host().take_error() {
            return Err(e);
        }
        Ok(GridView {
            state: Rc::new(RefCell::new(SharedState {
                engine,
                render_callback: None,
                frame_closure: None,
                frame_pending: false,
            })),
        })
    }

    /// Called whenever the grid wants a redraw; the callback should call `render()`.
    #[wasm_bindgen(js_name = "setRenderCallback")]
    pub fn set_render_callback(&mut self, callback: Option<Function>) {
        self.state.borrow_mut().render_callback = callback;
    }

    /// Render fixed and windowed rows through `renderRow`.
    ///
    /// Returns `{ startRow, visibleCount, pixelOffset, rowIndices, rows }`.
    /// `renderRow` must not call back into this grid.
    #[wasm_bindgen]
    pub fn render(&mut self) -> std::result::Result<JsValue, JsValue> {
        let frame = {
            let mut s = self.state.borrow_mut();
            let checkpoint = s.engine.checkpoint();
            let frame = s.engine.render();
            if let Some(e) = s.engine.host().take_error() {
                s.engine.rollback(checkpoint);
                return Err(e);
            }
            frame
        };
        let out = Object::new();
        let set = |key: &str, value: &JsValue| Reflect::set(&out, &JsValue::from_str(key), value);
        set("startRow", &JsValue::from(frame.window.start_row))?;
        set("visibleCount", &JsValue::from(frame.window.visible_count))?;
        set("pixelOffset", &JsValue::from(frame.pixel_offset))?;
        set("epoch", &JsValue::from(frame.epoch))?;
        let indices: Array = frame
            .row_indices
            .iter()
            .map(|&r| JsValue::from(r))
            .collect();
        set("rowIndices", &indices)?;
        let rows: Array = frame.rows.into_iter().collect();
        set("rows", &rows)?;
        Ok(out.into())
    }

    #[wasm_bindgen(js_name = "forceRerender")]
    pub fn force_rerender(&mut self) -> std::result::Result<(), JsValue> {
        self.dispatch(GridEngine::force_rerender)
    }

    #[wasm_bindgen(js_name = "recomputeAfterResize")]
    pub fn recompute_after_resize(&mut self) -> std::result::Result<(), JsValue> {
        self.dispatch(GridEngine::recompute_after_resize)
    }

    #[wasm_bindgen(js_name = "recomputeAfterRowInsertion")]
    pub fn recompute_after_row_insertion(
        &mut self,
        offset: i32,
    ) -> std::result::Result<(), JsValue> {
        self.dispatch(|e| e.recompute_after_row_insertion(i64::from(offset)))
    }

    #[wasm_bindgen]
    pub fn focus(&mut self) -> std::result::Result<(), JsValue> {
        self.dispatch(GridEngine::focus)
    }

    #[wasm_bindgen]
    pub fn blur(&mut self) -> std::result::Result<(), JsValue> {
        self.dispatch(GridEngine::blur)
    }

    #[wasm_bindgen(js_name = "hasActiveSelection")]
    pub fn has_active_selection(&self) -> bool {
        self.state.borrow().engine.has_active_selection()
    }

    /// Row under a pointer position, or -1.
    #[wasm_bindgen(js_name = "resolveRowIndexFromPointerEvent")]
    pub fn resolve_row_index_from_pointer_event(
        &self,
        x: f32,
        y: f32,
    ) -> std::result::Result<i32, JsValue> {
        self.query(|e| {
            e.resolve_row_index_from_pointer(x, y)
                .map_or(-1, |row| i32::try_from(row).unwrap_or(i32::MAX))
        })
    }

    /// Column under a viewport x, or -1 in the fixed band.
    #[wasm_bindgen(js_name = "resolveColumnIndex")]
    pub fn resolve_column_index(&self, x: f32) -> std::result::Result<i32, JsValue> {
        self.query(|e| {
            let col = e
                .geometry()
                .pixel_to_column(x, e.viewport().scroll_left)
                .to_signed();
            i32::try_from(col).unwrap_or(i32::MAX)
        })
    }

    #[wasm_bindgen(js_name = "onPointerDown")]
    #[allow(clippy::too_many_arguments)]
    pub fn on_pointer_down(
        &mut self,
        x: f32,
        y: f32,
        button: i16,
        detail: u32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> std::result::Result<bool, JsValue> {
        let event = PointerEvent {
            x,
            y,
            button: PointerButton::from_dom(button),
            modifiers: Modifiers {
                shift,
                ctrl,
                alt,
                meta,
            },
            click_count: detail,
        };
        self.dispatch(|e| e.pointer_down(event))
    }

    #[wasm_bindgen(js_name = "onPointerMove")]
    pub fn on_pointer_move(&mut self, x: f32, y: f32) -> std::result::Result<bool, JsValue> {
        self.dispatch(|e| e.pointer_move(PointerEvent::primary(x, y)))
    }

    #[wasm_bindgen(js_name = "onPointerUp")]
    pub fn on_pointer_up(&mut self, x: f32, y: f32) -> std::result::Result<bool, JsValue> {
        self.dispatch(|e| e.pointer_up(PointerEvent::primary(x, y)))
    }

    /// Returns true when the key was consumed (call `preventDefault`).
    #[wasm_bindgen(js_name = "onKeyDown")]
    pub fn on_key_down(
        &mut self,
        key: &str,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> std::result::Result<bool, JsValue> {
        let modifiers = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        self.dispatch(|e| e.key_down_dom(key, modifiers))
    }

    /// Text field input while a cell is being edited.
    #[wasm_bindgen(js_name = "onInput")]
    pub fn on_input(&mut self, text: &str) -> std::result::Result<bool, JsValue> {
        self.dispatch(|e| e.input_text(text))
    }

    /// Native scroll event from the scroll container.
    #[wasm_bindgen(js_name = "onScroll")]
    pub fn on_scroll(
        &mut self,
        scroll_left: f32,
        scroll_top: f32,
    ) -> std::result::Result<(), JsValue> {
        let request = {
            let mut s = self.state.borrow_mut();
            let checkpoint = s.engine.checkpoint();
            let request = s.engine.scroll_to(scroll_left, scroll_top);
            if let Some(e) = s.engine.host().take_error() {
                s.engine.rollback(checkpoint);
                return Err(e);
            }
            request
        };
        if request {
            Self::request_frame(&self.state);
        }
        Ok(())
    }

    #[wasm_bindgen]
    pub fn resize(&mut self, width: f32, height: f32) -> std::result::Result<(), JsValue> {
        self.dispatch(|e| e.resize_viewport(width, height))
    }

    #[wasm_bindgen(js_name = "setColumnWidth")]
    pub fn set_column_width(&mut self, col: u32, width: f32) -> std::result::Result<(), JsValue> {
        self.dispatch(|e| e.set_column_width(col, width))
    }

    #[wasm_bindgen(js_name = "expandRow")]
    pub fn expand_row(&mut self, row: u32) -> std::result::Result<u32, JsValue> {
        self.dispatch(|e| e.expand_row(row))
    }

    #[wasm_bindgen(js_name = "collapseRow")]
    pub fn collapse_row(&mut self, row: u32) -> std::result::Result<u32, JsValue> {
        self.dispatch(|e| e.collapse_row(row))
    }

    #[wasm_bindgen(js_name = "toggleRow")]
    pub fn toggle_row(&mut self, row: u32) -> std::result::Result<bool, JsValue> {
        self.dispatch(|e| e.toggle_row(row))
    }

    /// Add a subtask row under `parentRow`; returns its index or -1 when the
    /// parent is collapsed.
    #[wasm_bindgen(js_name = "insertTreeChild")]
    pub fn insert_tree_child(
        &mut self,
        parent_row: u32,
        id: String,
        child_count: u32,
    ) -> std::result::Result<i32, JsValue> {
        self.dispatch(|e| {
            e.insert_tree_child(parent_row, TreeNode::new(id, child_count))
                .map_or(-1, |row| i32::try_from(row).unwrap_or(i32::MAX))
        })
    }

    /// Add a top-level row at `row`; returns where it landed.
    #[wasm_bindgen(js_name = "insertTreeRoot")]
    pub fn insert_tree_root(
        &mut self,
        row: u32,
        id: String,
        child_count: u32,
    ) -> std::result::Result<u32, JsValue> {
        self.dispatch(|e| e.insert_tree_root(row, TreeNode::new(id, child_count)))
    }

    #[wasm_bindgen(js_name = "removeTreeRow")]
    pub fn remove_tree_row(&mut self, row: u32) -> std::result::Result<u32, JsValue> {
        self.dispatch(|e| e.remove_tree_row(row))
    }

    #[wasm_bindgen(js_name = "reloadTree")]
    pub fn reload_tree(&mut self) -> std::result::Result<(), JsValue> {
        self.dispatch(GridEngine::reload_tree)
    }

    /// `{ anchor, focus }` or `undefined`.
    #[wasm_bindgen]
    pub fn selection(&self) -> std::result::Result<JsValue, JsValue> {
        let rect = self.state.borrow().engine.selection().rect();
        serde_wasm_bindgen::to_value(&rect)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// `[row, col]` of the cell being edited, if any.
    #[wasm_bindgen(js_name = "editingCell")]
    pub fn editing_cell(&self) -> Option<Vec<u32>> {
        let s = self.state.borrow();
        let Coordinate { row, col } = s.engine.editor().session()?.position.coordinate();
        Some(vec![row, col])
    }
}
