//! FILENAME: core/render/src/lib.rs
//! Forest plot rendering.
//!
//! Layers:
//! - `figure`: pixel geometry computed from a `RowLayout` (WHERE things go)
//! - `draw`: plotters backend calls for PNG/SVG output (HOW they are drawn)

pub mod draw;
pub mod error;
pub mod figure;

pub use draw::{draw_figure, render_svg, save_figure, ImageFormat};
pub use error::RenderError;
pub use figure::{
    x_ticks, Column, ColumnKind, ErrorBar, FigureLayout, Fill, PixelRect, Segment, TextAlign,
    TextItem,
};
