//! Column widths: host-provided defaults overridden by interactive resizes.

use std::collections::HashMap;

/// Width overrides set by resize drags and auto-fit.
///
/// Owned by the engine; the host keeps reporting its own widths and the
/// layout decides which one wins.
#[derive(Debug, Clone, Default)]
pub struct ColumnLayout {
    overrides: HashMap<u32, f32>,
}

impl ColumnLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective width of `col`, falling back to `host_width` when unset.
    pub fn width(&self, col: u32, host_width: impl FnOnce(u32) -> f32) -> f32 {
        match self.overrides.get(&col) {
            Some(&w) => w,
            None => sanitize(host_width(col)),
        }
    }

    pub fn set_width(&mut self, col: u32, width: f32) {
        self.overrides.insert(col, sanitize(width));
    }

    /// Drop an override so the host width applies again.
    pub fn reset(&mut self, col: u32) -> bool {
        self.overrides.remove(&col).is_some()
    }
}

/// Host widths come from untyped JS; NaN or negative widths collapse to 0.
fn sanitize(width: f32) -> f32 {
    if width.is_finite() {
        width.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins_over_host() {
        let mut layout = ColumnLayout::new();
        assert_eq!(layout.width(2, |_| 150.0), 150.0);
        layout.set_width(2, 190.0);
        assert_eq!(layout.width(2, |_| 150.0), 190.0);
        assert!(layout.reset(2));
        assert_eq!(layout.width(2, |_| 150.0), 150.0);
    }

    #[test]
    fn test_bad_host_width() {
        let layout = ColumnLayout::new();
        assert_eq!(layout.width(0, |_| f32::NAN), 0.0);
        assert_eq!(layout.width(0, |_| -5.0), 0.0);
    }
}
