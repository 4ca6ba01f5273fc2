//! Viewport state management for scrolling.

/// Viewport state - the visible area of the grid
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Horizontal scroll position of the scrolling columns
    pub scroll_left: f32,
    /// Vertical scroll position of the scrolling body
    pub scroll_top: f32,
    /// Viewport width in pixels
    pub width: f32,
    /// Viewport height in pixels
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

/// Sizes needed to clamp scrolling: content extents and the area that shows them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollExtent {
    pub content_width: f32,
    pub content_height: f32,
    pub body_width: f32,
    pub body_height: f32,
}

impl ScrollExtent {
    pub fn max_scroll_left(&self) -> f32 {
        (self.content_width - self.body_width).max(0.0)
    }

    pub fn max_scroll_top(&self) -> f32 {
        (self.content_height - self.body_height).max(0.0)
    }
}

impl Viewport {
    /// Create a new viewport with default values
    pub fn new() -> Self {
        Self {
            scroll_left: 0.0,
            scroll_top: 0.0,
            width: 800.0,
            height: 600.0,
        }
    }

    /// Clamp scroll position to valid range.
    ///
    /// Scrolling stops once the last row/column is fully visible.
    pub fn clamp_scroll(&mut self, extent: &ScrollExtent) {
        self.scroll_left = finite_or_zero(self.scroll_left).clamp(0.0, extent.max_scroll_left());
        self.scroll_top = finite_or_zero(self.scroll_top).clamp(0.0, extent.max_scroll_top());
    }

    /// Scroll by delta amounts; returns the applied delta.
    pub fn scroll_by(&mut self, delta_x: f32, delta_y: f32, extent: &ScrollExtent) -> (f32, f32) {
        let (old_x, old_y) = (self.scroll_left, self.scroll_top);
        self.scroll_left += delta_x;
        self.scroll_top += delta_y;
        self.clamp_scroll(extent);
        (self.scroll_left - old_x, self.scroll_top - old_y)
    }

    /// Set absolute scroll position
    pub fn set_scroll(&mut self, x: f32, y: f32, extent: &ScrollExtent) {
        self.scroll_left = x;
        self.scroll_top = y;
        self.clamp_scroll(extent);
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = finite_or_zero(width).max(0.0);
        self.height = finite_or_zero(height).max(0.0);
    }

    /// Adjust `scroll_top` so the span `[top, top + size)` (scroll space) is
    /// fully inside a body of `body_height`. Returns true if it moved.
    pub fn reveal_vertical(&mut self, top: f32, size: f32, body_height: f32) -> bool {
        let old = self.scroll_top;
        if top < self.scroll_top {
            self.scroll_top = top;
        } else if top + size > self.scroll_top + body_height {
            self.scroll_top = (top + size - body_height).max(0.0);
        }
        (self.scroll_top - old).abs() > f32::EPSILON
    }

    /// Horizontal counterpart of [`Viewport::reveal_vertical`].
    pub fn reveal_horizontal(&mut self, left: f32, size: f32, body_width: f32) -> bool {
        let old = self.scroll_left;
        if left < self.scroll_left {
            self.scroll_left = left;
        } else if left + size > self.scroll_left + body_width {
            self.scroll_left = (left + size - body_width).max(0.0);
        }
        (self.scroll_left - old).abs() > f32::EPSILON
    }
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Coalesces bursts of scroll events into one update per animation frame.
#[derive(Debug, Clone, Default)]
pub struct ScrollCoalescer {
    pending: Option<(f32, f32)>,
    frame_requested: bool,
}

impl ScrollCoalescer {
    /// Record the latest scroll target. Returns true when the caller must
    /// request an animation frame (none is outstanding yet).
    pub fn push(&mut self, scroll_left: f32, scroll_top: f32) -> bool {
        self.pending = Some((scroll_left, scroll_top));
        if self.frame_requested {
            return false;
        }
        self.frame_requested = true;
        true
    }

    /// Take the target to apply on this frame.
    pub fn take(&mut self) -> Option<(f32, f32)> {
        self.frame_requested = false;
        self.pending.take()
    }
}

/// Rectangle of the scrolling body in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

/// Scroll delta for one frame while dragging with the pointer at `(x, y)`.
///
/// Zero while the pointer is inside the body; otherwise proportional to how
/// far outside it is, capped at one body extent per frame.
pub fn autoscroll_delta(x: f32, y: f32, body: &BodyRect, speed: f32) -> (f32, f32) {
    let axis = |pos: f32, lo: f32, hi: f32| -> f32 {
        let limit = (hi - lo).max(0.0);
        if pos < lo {
            -((lo - pos) * speed).min(limit)
        } else if pos > hi {
            ((pos - hi) * speed).min(limit)
        } else {
            0.0
        }
    };
    (
        axis(x, body.left, body.right),
        axis(y, body.top, body.bottom),
    )
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

    fn extent() -> ScrollExtent {
        ScrollExtent {
            content_width: 1000.0,
            content_height: 2500.0,
            body_width: 400.0,
            body_height: 500.0,
        }
    }

    #[test]
    fn test_scroll_clamps_to_content() {
        let mut vp = Viewport::new();
        vp.set_scroll(-50.0, 99_999.0, &extent());
        assert_eq!(vp.scroll_left, 0.0);
        assert_eq!(vp.scroll_top, 2000.0);
    }

    #[test]
    fn test_scroll_by_reports_applied_delta() {
        let mut vp = Viewport::new();
        let applied = vp.scroll_by(700.0, 10.0, &extent());
        assert_eq!(applied, (600.0, 10.0));
    }

    #[test]
    fn test_reveal_vertical() {
        let mut vp = Viewport::new();
        vp.scroll_top = 100.0;
        assert!(vp.reveal_vertical(50.0, 25.0, 500.0));
        assert_eq!(vp.scroll_top, 50.0);
        assert!(vp.reveal_vertical(600.0, 25.0, 500.0));
        assert_eq!(vp.scroll_top, 125.0);
        assert!(!vp.reveal_vertical(300.0, 25.0, 500.0));
    }

    #[test]
    fn test_coalescer_requests_one_frame() {
        let mut c = ScrollCoalescer::default();
        assert!(c.push(0.0, 10.0));
        assert!(!c.push(0.0, 20.0));
        assert!(!c.push(0.0, 30.0));
        assert_eq!(c.take(), Some((0.0, 30.0)));
        assert_eq!(c.take(), None);
        assert!(c.push(0.0, 40.0));
    }

    #[test]
    fn test_autoscroll_proportional() {
        let body = BodyRect {
            left: 40.0,
            top: 25.0,
            right: 400.0,
            bottom: 300.0,
        };
        assert_eq!(autoscroll_delta(100.0, 100.0, &body, 0.5), (0.0, 0.0));
        assert_eq!(autoscroll_delta(100.0, 340.0, &body, 0.5), (0.0, 20.0));
        assert_eq!(autoscroll_delta(0.0, 5.0, &body, 0.5), (-20.0, -10.0));
        // capped at one body height
        assert_eq!(autoscroll_delta(100.0, 5000.0, &body, 1.0), (0.0, 275.0));
    }
}
