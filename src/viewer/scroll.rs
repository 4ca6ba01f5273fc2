//! Scroll-related logic for `GridEngine`.
//!
//! Native scroll events are coalesced and applied once per animation frame.
//! The same frame also drives drag autoscroll while the pointer sits outside
//! the body.

use super::{GridEngine, GridHost};
use crate::layout::autoscroll_delta;
use crate::types::Coordinate;

fn moved(dx: f32, dy: f32) -> bool {
    dx.abs() > f32::EPSILON || dy.abs() > f32::EPSILON
}

impl<H: GridHost> GridEngine<H> {
    /// Record a native scroll position. Returns true when the caller must
    /// request an animation frame; later calls before that frame only
    /// replace the target.
    pub fn scroll_to(&mut self, scroll_left: f32, scroll_top: f32) -> bool {
        self.scroll.push(scroll_left, scroll_top)
    }

    /// Scroll by a delta right away (wheel, programmatic). Returns true if the
    /// offset changed.
    pub fn scroll_by(&mut self, delta_x: f32, delta_y: f32) -> bool {
        let extent = self.scroll_extent();
        let (dx, dy) = self.viewport.scroll_by(delta_x, delta_y, &extent);
        if !moved(dx, dy) {
            return false;
        }
        self.recompute_window();
        self.needs_render = true;
        true
    }

    /// Apply the coalesced scroll and one autoscroll step. Returns true when
    /// a render is due.
    pub fn animation_frame(&mut self) -> bool {
        let _span = tracing::trace_span!("grid_frame").entered();
        if let Some((left, top)) = self.scroll.take() {
            let extent = self.scroll_extent();
            self.viewport.set_scroll(left, top, &extent);
            self.window_dirty = true;
        }
        self.autoscroll_step();
        if self.window_dirty {
            self.recompute_window();
        }
        self.needs_render
    }

    /// Whether a drag is parked outside the body and wants more frames.
    pub fn is_autoscrolling(&self) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        let (dx, dy) = autoscroll_delta(
            drag.last_x,
            drag.last_y,
            &self.body_rect(),
            self.config.autoscroll_speed,
        );
        moved(dx, dy)
    }

    fn autoscroll_step(&mut self) {
        let Some(drag) = self.drag else {
            return;
        };
        let (dx, dy) = autoscroll_delta(
            drag.last_x,
            drag.last_y,
            &self.body_rect(),
            self.config.autoscroll_speed,
        );
        if !moved(dx, dy) {
            return;
        }
        let extent = self.scroll_extent();
        let (dx, dy) = self.viewport.scroll_by(dx, dy, &extent);
        if moved(dx, dy) {
            tracing::trace!(dx, dy, "autoscroll");
            self.recompute_window();
        }
        if self.extend_drag(drag.mode, drag.last_x, drag.last_y) {
            self.needs_render = true;
        }
    }

    /// Scroll so the selection focus is fully visible.
    pub fn reveal_focus(&mut self) -> bool {
        match self.selection.focus() {
            Some(focus) => self.reveal(focus),
            None => false,
        }
    }

    /// Scroll so `coord` is fully inside the body. Pinned rows are always
    /// visible and never scroll vertically.
    pub fn reveal(&mut self, coord: Coordinate) -> bool {
        let (top, left, width) = {
            let geo = self.geometry();
            let top = (coord.row >= self.config.frozen_rows()).then(|| geo.row_to_pixel(coord.row));
            (top, geo.column_to_pixel(coord.col), self.column_width(coord.col))
        };
        let body_height = self.body_height();
        let body_width = self.body_width();

        let mut changed = false;
        if let Some(top) = top {
            changed |= self
                .viewport
                .reveal_vertical(top, self.config.cell_height, body_height);
        }
        if !self.config.is_tree_mode {
            changed |= self.viewport.reveal_horizontal(left, width, body_width);
        }
        if changed {
            let extent = self.scroll_extent();
            self.viewport.clamp_scroll(&extent);
            self.recompute_window();
            self.needs_render = true;
        }
        changed
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
    use crate::viewer::{GridEngine, GridHost, RowContext};
    use crate::types::{GridConfig, PointerEvent};

    struct Rows;

    impl GridHost for Rows {
        type Row = ();
        fn row_count(&self) -> u32 {
            1_000
        }
        fn column_count(&self) -> u32 {
            10
        }
        fn column_width(&self, _col: u32) -> f32 {
            100.0
        }
        fn render_row(&mut self, _ctx: &RowContext<'_>) {}
    }

    fn engine() -> GridEngine<Rows> {
        let mut e = GridEngine::new(Rows, GridConfig::default()).unwrap();
        e.resize_viewport(400.0, 525.0);
        e
    }

    #[test]
    fn test_scroll_coalesced_into_one_frame() {
        let mut e = engine();
        assert!(e.scroll_to(0.0, 100.0));
        assert!(!e.scroll_to(0.0, 200.0));
        assert!(!e.scroll_to(0.0, 250.0));
        assert_eq!(e.window().start_row, 0);
        e.animation_frame();
        assert_eq!(e.viewport().scroll_top, 250.0);
        assert_eq!(e.window().start_row, 10);
        // next burst asks for a new frame
        assert!(e.scroll_to(0.0, 0.0));
    }

    #[test]
    fn test_reveal_scrolls_down_and_right() {
        let mut e = engine();
        assert!(e.reveal(crate::types::Coordinate::new(50, 6)));
        assert_eq!(e.viewport().scroll_top, 51.0 * 25.0 - 500.0);
        assert_eq!(e.viewport().scroll_left, 700.0 - 400.0);
        assert!(!e.reveal(crate::types::Coordinate::new(50, 6)));
    }

    #[test]
    fn test_drag_below_body_autoscrolls() {
        let mut e = engine();
        e.pointer_down(PointerEvent::primary(50.0, 40.0));
        e.pointer_move(PointerEvent::primary(50.0, 600.0));
        assert!(e.is_autoscrolling());
        e.animation_frame();
        assert!(e.viewport().scroll_top > 0.0);
        let focus = e.selection().focus().unwrap();
        assert!(focus.row > 19);
        e.pointer_up(PointerEvent::primary(50.0, 600.0));
        assert!(!e.is_autoscrolling());
    }
}
