use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Construction-time configuration for a grid.
///
/// Accepted as camelCase JSON or a plain JS object. Every field has a
/// default, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Height of every row in pixels
    pub cell_height: f32,
    /// Width of the frozen band on the left (row gutter) in pixels
    pub fixed_column_pixel_width: f32,
    /// Rows that never scroll and never accept edits
    pub fixed_row_indices: Vec<u32>,
    /// Columns that never accept edits
    pub fixed_column_indices: Vec<u32>,
    /// Hierarchical mode: row selection only, single-column geometry
    pub is_tree_mode: bool,
    /// Height of the column header band in pixels
    pub header_height: f32,
    /// Lower bound for interactive column resizing
    pub min_column_width: f32,
    /// Added to the widest measured cell when auto-fitting a column
    pub autofit_padding: f32,
    /// Width of the grab zone at a column header's right edge
    pub resize_handle_width: f32,
    /// Thickness of the scrollbar gutters on the right and bottom
    pub scrollbar_size: f32,
    /// Move the selection down one row after Enter commits an edit
    pub submit_walks_down: bool,
    /// Extra rows rendered above and below the window
    pub overscan_rows: u32,
    /// Pixels scrolled per frame for each pixel the pointer is outside the body
    pub autoscroll_speed: f32,
    /// Report commits whose content equals the original content
    pub commit_unchanged: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_height: 25.0,
            fixed_column_pixel_width: 0.0,
            fixed_row_indices: Vec::new(),
            fixed_column_indices: Vec::new(),
            is_tree_mode: false,
            header_height: 25.0,
            min_column_width: 10.0,
            autofit_padding: 16.0,
            resize_handle_width: 6.0,
            scrollbar_size: 0.0,
            submit_walks_down: false,
            overscan_rows: 0,
            autoscroll_speed: 0.5,
            commit_unchanged: false,
        }
    }
}

impl GridConfig {
    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    /// Returns [`GridError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !self.cell_height.is_finite() || self.cell_height <= 0.0 {
            return Err(GridError::Config(format!(
                "cellHeight must be positive, got {}",
                self.cell_height
            )));
        }
        let non_negative = [
            ("fixedColumnPixelWidth", self.fixed_column_pixel_width),
            ("headerHeight", self.header_height),
            ("minColumnWidth", self.min_column_width),
            ("autofitPadding", self.autofit_padding),
            ("resizeHandleWidth", self.resize_handle_width),
            ("scrollbarSize", self.scrollbar_size),
            ("autoscrollSpeed", self.autoscroll_speed),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(GridError::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn is_fixed_row(&self, row: u32) -> bool {
        self.fixed_row_indices.contains(&row)
    }

    pub fn is_fixed_column(&self, col: u32) -> bool {
        self.fixed_column_indices.contains(&col)
    }

    /// Number of fixed rows that form a leading run `0..n`.
    ///
    /// Only this run is pinned below the header; later fixed rows are
    /// rendered every frame but keep their scroll position.
    pub fn frozen_rows(&self) -> u32 {
        leading_run(&self.fixed_row_indices)
    }

    /// Total height of the pinned leading rows.
    pub fn frozen_rows_height(&self) -> f32 {
        count_to_f32(self.frozen_rows()) * self.cell_height
    }
}

fn leading_run(indices: &[u32]) -> u32 {
    let mut n = 0;
    while indices.contains(&n) {
        n += 1;
    }
    n
}

/// Row counts stay far below 2^24 in practice; the conversion is exact there.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn count_to_f32(n: u32) -> f32 {
    n as f32
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

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = GridConfig::from_json("{}").unwrap();
        assert_eq!(config, GridConfig::default());
    }

    #[test]
    fn test_camel_case_fields() {
        let config = GridConfig::from_json(
            r#"{"cellHeight": 30, "fixedRowIndices": [0, 1, 5], "isTreeMode": true}"#,
        )
        .unwrap();
        assert_eq!(config.cell_height, 30.0);
        assert!(config.is_tree_mode);
        assert_eq!(config.frozen_rows(), 2);
        assert!(config.is_fixed_row(5));
        assert_eq!(config.frozen_rows_height(), 60.0);
    }

    #[test]
    fn test_rejects_zero_cell_height() {
        let err = GridConfig::from_json(r#"{"cellHeight": 0}"#).unwrap_err();
        assert!(matches!(err, GridError::Config(_)));
    }

    #[test]
    fn test_rejects_negative_gutter() {
        let err = GridConfig::from_json(r#"{"fixedColumnPixelWidth": -4}"#).unwrap_err();
        assert!(err.to_string().contains("fixedColumnPixelWidth"));
    }

    #[test]
    fn test_malformed_json() {
        let err = GridConfig::from_json("{cellHeight").unwrap_err();
        assert!(matches!(err, GridError::Json(_)));
    }
}
