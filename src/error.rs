//! Structured error types for gridview.
//!
//! Input handling never fails (pointer and key coordinates are clamped), so
//! errors only surface while building an engine or talking to a JS host.

/// All errors that can occur while configuring or hosting a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Configuration value out of range.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Configuration JSON could not be decoded.
    #[error("Configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A JS host object is missing a callback or returned the wrong shape.
    #[error("Host binding: {0}")]
    Host(String),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
