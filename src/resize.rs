//! Interactive column resizing.
//!
//! A drag computes `max(min_width, original + (pointer_x - start_x))`.
//! Double-clicking the handle auto-fits to the widest visible cell.

/// Phase reported to the host's header-resize callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePhase {
    Begin,
    Update,
    End,
    AutoFit,
}

impl ResizePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Begin => "begin",
            Self::Update => "update",
            Self::End => "end",
            Self::AutoFit => "autofit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveResize {
    pub column: u32,
    pub start_x: f32,
    pub original_width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeUpdate {
    pub column: u32,
    pub width: f32,
}

#[derive(Debug, Clone, Default)]
pub struct ResizeController {
    active: Option<ActiveResize>,
    min_width: f32,
}

impl ResizeController {
    pub fn new(min_width: f32) -> Self {
        Self {
            active: None,
            min_width: min_width.max(0.0),
        }
    }

    pub fn min_width(&self) -> f32 {
        self.min_width
    }

    pub fn active(&self) -> Option<ActiveResize> {
        self.active
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Start dragging the right edge of `column`.
    pub fn begin(&mut self, column: u32, pointer_x: f32, original_width: f32) {
        tracing::debug!(column, original_width, "resize begin");
        self.active = Some(ActiveResize {
            column,
            start_x: pointer_x,
            original_width,
        });
    }

    fn width_at(&self, drag: &ActiveResize, pointer_x: f32) -> f32 {
        (drag.original_width + (pointer_x - drag.start_x)).max(self.min_width)
    }

    /// Width for the current pointer position, if a drag is active.
    pub fn update(&self, pointer_x: f32) -> Option<ResizeUpdate> {
        let drag = self.active?;
        Some(ResizeUpdate {
            column: drag.column,
            width: self.width_at(&drag, pointer_x),
        })
    }

    /// Finish the drag and return the final width.
    pub fn end(&mut self, pointer_x: f32) -> Option<ResizeUpdate> {
        let drag = self.active.take()?;
        let width = self.width_at(&drag, pointer_x);
        tracing::debug!(column = drag.column, width, "resize end");
        Some(ResizeUpdate {
            column: drag.column,
            width,
        })
    }

    /// Abandon the drag without a final width.
    pub fn cancel(&mut self) -> Option<ActiveResize> {
        self.active.take()
    }

    /// Width that fits the widest of `measured` plus `padding`.
    ///
    /// Returns `None` when nothing was measured.
    pub fn autofit<I>(&self, measured: I, padding: f32) -> Option<f32>
    where
        I: IntoIterator<Item = f32>,
    {
        let widest = measured
            .into_iter()
            .filter(|w| w.is_finite())
            .fold(None, |acc: Option<f32>, w| Some(acc.map_or(w, |a| a.max(w))))?;
        Some((widest + padding).max(self.min_width))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_grows_column() {
        let mut ctl = ResizeController::new(10.0);
        ctl.begin(2, 300.0, 150.0);
        assert_eq!(ctl.update(340.0).unwrap().width, 190.0);
        let done = ctl.end(340.0).unwrap();
        assert_eq!(done, ResizeUpdate { column: 2, width: 190.0 });
        assert!(!ctl.is_active());
    }

    #[test]
    fn test_drag_clamps_to_min() {
        let mut ctl = ResizeController::new(10.0);
        ctl.begin(2, 300.0, 150.0);
        assert_eq!(ctl.update(100.0).unwrap().width, 10.0);
    }

    #[test]
    fn test_update_without_drag() {
        let mut ctl = ResizeController::new(10.0);
        assert!(ctl.update(5.0).is_none());
        assert!(ctl.end(5.0).is_none());
    }

    #[test]
    fn test_autofit() {
        let ctl = ResizeController::new(10.0);
        assert_eq!(ctl.autofit([40.0, 72.5, 12.0], 16.0), Some(88.5));
        assert_eq!(ctl.autofit([], 16.0), None);
        assert_eq!(ctl.autofit([0.0], 4.0), Some(10.0));
    }
}
