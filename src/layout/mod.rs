//! Layout engine: row windowing, pixel geometry and viewport scrolling.
//!
//! This module handles:
//! - Computing the contiguous window of rows to instantiate
//! - Mapping pointer pixels to logical rows/columns and back
//! - Classifying pointer positions into hit regions
//! - Managing viewport state (scroll position, frame coalescing, autoscroll)

mod columns;
mod geometry;
mod viewport;
mod window;

pub use columns::ColumnLayout;
pub use geometry::{ColumnHit, Geometry, HitRegion};
pub use viewport::{autoscroll_delta, BodyRect, ScrollCoalescer, ScrollExtent, Viewport};
pub use window::{compute_window, Window};

/// Safely convert f32 to u32 with clamping.
/// The clamp ensures the value is in [0, u32::MAX] before casting; NaN maps to 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn f32_to_u32_clamped(v: f32) -> u32 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, u32::MAX as f32) as u32
}
