//! FILENAME: core/forest-engine/src/lib.rs
//! PURPOSE: Library entry point for the forest plot layout engine.
//! CONTEXT: Pure data and layout logic. Loading lives in `persistence`,
//! drawing in `forest-render`.
//!
//! PIPELINE: ResultTable --> RowLayout::build --> (labels, error bars, shading) --> renderer

pub mod error;
pub mod layout;
pub mod number_format;
pub mod row;
pub mod style;

pub use error::LayoutError;
pub use layout::{
    auto_x_limits, column_headers, compute_group_boundaries, derive_error_magnitudes,
    derive_group_labels, format_estimate_cell, groups_are_contiguous, row_position,
    shading_bands, y_limits, ErrorMagnitudes, GroupBoundary, GroupShade, Limits, RowLayout,
    ShadeBand, REFERENCE_LINE_X,
};
pub use number_format::{format_count, format_interval, format_tick};
pub use row::{sample_table, CiBound, Interval, ResultRow, ResultTable, REFERENCE_LABEL};
pub use style::{Color, LabelOffsets, PlotOptions, StyleConfig};
