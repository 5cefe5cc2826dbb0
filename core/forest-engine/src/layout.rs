//! FILENAME: core/forest-engine/src/layout.rs
//! PURPOSE: The row layout engine. Turns a result table into the strings,
//! numeric arrays and shading intervals needed to draw one row per variable.
//! CONTEXT: Everything here is a pure function of the table. Rows keep their
//! loaded order in every output vector; row `i` is drawn at y = n - i, so the
//! first row ends up at the top of the plot.
//!
//! Note the two notions of "group" used below:
//! - `derive_group_labels` works on contiguous runs (A, B, A labels A twice).
//! - `compute_group_boundaries` counts each distinct group over the whole
//!   table and lays the spans end to end in first-occurrence order.
//! They agree whenever groups are contiguous, which is the expected input.

use log::{debug, warn};

use crate::error::LayoutError;
use crate::number_format::{format_count, format_interval};
use crate::row::{Interval, ResultRow, ResultTable, REFERENCE_LABEL};
use crate::style::{Color, PlotOptions};

/// x position of the dashed "no effect" line.
pub const REFERENCE_LINE_X: f64 = 1.0;

/// Share of the row count added above and below the rows.
const Y_PADDING_RATIO: f64 = 0.2;
const X_LOWER_MARGIN: f64 = 0.3;
const X_UPPER_FACTOR: f64 = 1.3;

/// Header shown over the group/variable column.
pub const VARIABLE_HEADER: &str = "Variable";
/// Header shown over the sample size column.
pub const COUNT_HEADER: &str = "Number";

// ============================================================================
// ERROR BARS
// ============================================================================

/// Horizontal error bar lengths, one entry per row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorMagnitudes {
    /// estimate - lower bound
    pub low: Vec<f64>,
    /// upper bound - estimate
    pub high: Vec<f64>,
}

/// Computes error bar lengths. Reference rows get zero on both sides.
/// Negative lengths (bounds on the wrong side of the estimate) are passed
/// through unchanged.
pub fn derive_error_magnitudes(rows: &[ResultRow]) -> Result<ErrorMagnitudes, LayoutError> {
    let mut errors = ErrorMagnitudes {
        low: Vec::with_capacity(rows.len()),
        high: Vec::with_capacity(rows.len()),
    };

    for (index, row) in rows.iter().enumerate() {
        let (low, high) = match row.checked_interval(index)? {
            Interval::Reference => (0.0, 0.0),
            Interval::Bounds { lower, upper } => (row.estimate - lower, upper - row.estimate),
        };
        errors.low.push(low);
        errors.high.push(high);
    }

    Ok(errors)
}

// ============================================================================
// LABELS
// ============================================================================

/// Group name on the first row of every contiguous run, empty elsewhere.
pub fn derive_group_labels(rows: &[ResultRow]) -> Vec<String> {
    let mut previous: Option<&str> = None;
    rows.iter()
        .map(|row| {
            let label = if previous == Some(row.group.as_str()) {
                String::new()
            } else {
                row.group.clone()
            };
            previous = Some(row.group.as_str());
            label
        })
        .collect()
}

/// Text for the numeric column: "Reference" or "2.30 (2.10, 2.50)".
/// `index` is the row's position in the table, reported when the bounds
/// are a mismatched sentinel pair.
pub fn format_estimate_cell(row: &ResultRow, index: usize) -> Result<String, LayoutError> {
    Ok(match row.checked_interval(index)? {
        Interval::Reference => REFERENCE_LABEL.to_string(),
        Interval::Bounds { lower, upper } => format_interval(row.estimate, lower, upper),
    })
}

/// Header text for each column, left to right.
pub fn column_headers(result_label: &str, counts: bool) -> Vec<String> {
    let mut headers = vec![
        VARIABLE_HEADER.to_string(),
        result_label.to_string(),
        format!("{}\n(Confidence Interval)", result_label),
    ];
    if counts {
        headers.push(COUNT_HEADER.to_string());
    }
    headers
}

// ============================================================================
// GROUP BOUNDARIES
// ============================================================================

/// Half-open row span `[start, end)` covered by one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBoundary {
    pub group: String,
    pub start: usize,
    pub end: usize,
}

impl GroupBoundary {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One span per distinct group, in first-occurrence order, each as long as
/// the group's total row count. Spans are laid end to end from row 0.
pub fn compute_group_boundaries(rows: &[ResultRow]) -> Vec<GroupBoundary> {
    let mut totals: Vec<(&str, usize)> = Vec::new();
    for row in rows {
        match totals.iter_mut().find(|(group, _)| *group == row.group) {
            Some((_, count)) => *count += 1,
            None => totals.push((row.group.as_str(), 1)),
        }
    }

    if !groups_are_contiguous(rows) {
        warn!(
            target: "LAYOUT",
            "Groups are not contiguous; shading spans will not match the drawn rows"
        );
    }

    let mut start = 0;
    totals
        .into_iter()
        .map(|(group, count)| {
            let boundary = GroupBoundary {
                group: group.to_string(),
                start,
                end: start + count,
            };
            start += count;
            boundary
        })
        .collect()
}

/// True when every group occupies a single run of consecutive rows.
pub fn groups_are_contiguous(rows: &[ResultRow]) -> bool {
    let mut seen: Vec<&str> = Vec::new();
    let mut previous: Option<&str> = None;
    for row in rows {
        let group = row.group.as_str();
        if previous != Some(group) {
            if seen.contains(&group) {
                return false;
            }
            seen.push(group);
            previous = Some(group);
        }
    }
    true
}

// ============================================================================
// AXES AND SHADING
// ============================================================================

/// A closed data-space range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub min: f64,
    pub max: f64,
}

impl Limits {
    pub fn new(min: f64, max: f64) -> Self {
        Limits { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl From<(f64, f64)> for Limits {
    fn from((min, max): (f64, f64)) -> Self {
        Limits { min, max }
    }
}

/// Vertical extent for `n` rows: ticks 1..=n plus 20% of n on either side.
pub fn y_limits(n: usize) -> Limits {
    let n = n as f64;
    Limits::new(1.0 - Y_PADDING_RATIO * n, n + Y_PADDING_RATIO * n)
}

/// y coordinate of row `index` in a table of `n` rows.
pub fn row_position(n: usize, index: usize) -> f64 {
    (n - index) as f64
}

/// Default x extent derived from the point estimates. For a negative
/// maximum, scaling by 1.3 would move the bound left of the data, so the
/// upper bound falls back to the same margin used below.
pub fn auto_x_limits(rows: &[ResultRow]) -> Option<Limits> {
    let first = rows.first()?.estimate;
    let (min, max) = rows
        .iter()
        .fold((first, first), |(lo, hi), row| (lo.min(row.estimate), hi.max(row.estimate)));
    let scaled = max * X_UPPER_FACTOR;
    let upper = if scaled >= max { scaled } else { max + X_LOWER_MARGIN };
    Some(Limits::new(min - X_LOWER_MARGIN, upper))
}

/// Vertical band behind one group, in plot coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadeBand {
    /// Position of the boundary in first-occurrence order.
    pub index: usize,
    pub y_low: f64,
    pub y_high: f64,
}

/// Converts boundaries to y bands. The first band extends up to the top
/// limit and the last one down to the bottom limit.
pub fn shading_bands(boundaries: &[GroupBoundary], n: usize, y_limits: Limits) -> Vec<ShadeBand> {
    let last = boundaries.len().saturating_sub(1);
    boundaries
        .iter()
        .enumerate()
        .map(|(index, boundary)| {
            let mut y_high = n as f64 - boundary.start as f64 + 0.5;
            let mut y_low = n as f64 - boundary.end as f64 + 0.5;
            if index == 0 {
                y_high = y_limits.max;
            }
            if index == last {
                y_low = y_limits.min;
            }
            ShadeBand { index, y_low, y_high }
        })
        .collect()
}

/// A band with the color it is filled with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupShade {
    pub band: ShadeBand,
    pub color: Color,
    pub alpha: f64,
}

// ============================================================================
// ROW LAYOUT
// ============================================================================

/// Everything the renderer needs, derived in one pass from a table.
/// All per-row vectors are in loaded order (index 0 = top row).
#[derive(Debug, Clone, PartialEq)]
pub struct RowLayout {
    pub headers: Vec<String>,
    pub group_labels: Vec<String>,
    pub variables: Vec<String>,
    pub estimates: Vec<f64>,
    pub estimate_cells: Vec<String>,
    pub reference_rows: Vec<bool>,
    pub counts: Option<Vec<String>>,
    pub errors: ErrorMagnitudes,
    pub boundaries: Vec<GroupBoundary>,
    pub shading: Vec<GroupShade>,
    /// y coordinate of each row.
    pub positions: Vec<f64>,
    pub y_limits: Limits,
    pub x_limits: Limits,
}

impl RowLayout {
    pub fn build(table: &ResultTable, options: &PlotOptions) -> Result<Self, LayoutError> {
        let rows = table.rows();
        if rows.is_empty() {
            return Err(LayoutError::EmptyTable);
        }
        let n = rows.len();
        let x_limits = match options.xlim {
            Some(xlim) => Limits::from(xlim),
            None => auto_x_limits(rows).ok_or(LayoutError::EmptyTable)?,
        };

        // Fails on the first mismatched sentinel, before anything is drawn
        let errors = derive_error_magnitudes(rows)?;

        let estimate_cells = rows
            .iter()
            .enumerate()
            .map(|(index, row)| format_estimate_cell(row, index))
            .collect::<Result<Vec<_>, _>>()?;

        let counts = if options.counts {
            let texts = rows
                .iter()
                .enumerate()
                .map(|(index, row)| {
                    row.count.map(format_count).ok_or_else(|| LayoutError::MissingCount {
                        row: index,
                        variable: row.variable.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Some(texts)
        } else {
            None
        };

        let y_limits = y_limits(n);
        let boundaries = compute_group_boundaries(rows);
        let shading = shading_bands(&boundaries, n, y_limits)
            .into_iter()
            .filter_map(|band| {
                options.group_color(band.index).map(|color| GroupShade {
                    band,
                    color,
                    alpha: options.group_alpha,
                })
            })
            .collect();

        debug!(
            target: "LAYOUT",
            "Laid out {} rows in {} groups, x range {:.2}..{:.2}",
            n,
            boundaries.len(),
            x_limits.min,
            x_limits.max
        );

        Ok(RowLayout {
            headers: column_headers(table.result_label(), options.counts),
            group_labels: derive_group_labels(rows),
            variables: rows.iter().map(|r| r.variable.clone()).collect(),
            estimates: rows.iter().map(|r| r.estimate).collect(),
            estimate_cells,
            reference_rows: rows.iter().map(|r| r.is_reference()).collect(),
            counts,
            errors,
            boundaries,
            shading,
            positions: (0..n).map(|i| row_position(n, i)).collect(),
            y_limits,
            x_limits,
        })
    }

    pub fn row_count(&self) -> usize {
        self.variables.len()
    }

    pub fn has_counts(&self) -> bool {
        self.counts.is_some()
    }
}
