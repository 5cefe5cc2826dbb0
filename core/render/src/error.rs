//! FILENAME: core/render/src/error.rs

use forest_engine::LayoutError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Unsupported image format: {0:?} (expected .png or .svg)")]
    UnsupportedImageFormat(String),

    /// The x range cannot be mapped to pixels (empty, reversed or not finite).
    #[error("Invalid x range: {min} to {max}")]
    DegenerateAxis { min: f64, max: f64 },

    #[error("Drawing error: {0}")]
    Drawing(String),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}
