//! FILENAME: core/forest-engine/src/row.rs
//! PURPOSE: Defines the result table: one row per variable with its estimate
//! and confidence interval.
//! CONTEXT: Rows are kept in the order they were loaded (top to bottom). The
//! layout engine reverses them for display; nothing here knows about pixels.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Text shown in place of an interval for the baseline level of a group.
pub const REFERENCE_LABEL: &str = "Reference";

/// Spellings accepted for the sentinel when reading cells.
const REFERENCE_ALIASES: [&str; 2] = ["Reference", "Ref"];

/// One bound of a confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CiBound {
    /// The row is the reference level; no interval exists.
    Reference,
    Value(f64),
}

impl CiBound {
    pub fn is_reference(&self) -> bool {
        matches!(self, CiBound::Reference)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            CiBound::Reference => None,
            CiBound::Value(v) => Some(*v),
        }
    }

    /// Returns true if a raw cell holds the reference sentinel.
    pub fn is_sentinel_text(text: &str) -> bool {
        let text = text.trim();
        REFERENCE_ALIASES.iter().any(|alias| *alias == text)
    }
}

impl From<f64> for CiBound {
    fn from(value: f64) -> Self {
        CiBound::Value(value)
    }
}

/// A resolved confidence interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interval {
    Reference,
    Bounds { lower: f64, upper: f64 },
}

/// A single line of regression output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub group: String,
    pub variable: String,
    pub estimate: f64,
    pub ci_lower: CiBound,
    pub ci_upper: CiBound,
    pub count: Option<u64>,
}

impl ResultRow {
    pub fn new(
        group: impl Into<String>,
        variable: impl Into<String>,
        estimate: f64,
        ci_lower: impl Into<CiBound>,
        ci_upper: impl Into<CiBound>,
    ) -> Self {
        ResultRow {
            group: group.into(),
            variable: variable.into(),
            estimate,
            ci_lower: ci_lower.into(),
            ci_upper: ci_upper.into(),
            count: None,
        }
    }

    /// Creates a baseline row (both bounds set to the sentinel).
    pub fn reference(group: impl Into<String>, variable: impl Into<String>, estimate: f64) -> Self {
        Self::new(group, variable, estimate, CiBound::Reference, CiBound::Reference)
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    /// True only when both bounds are the sentinel.
    pub fn is_reference(&self) -> bool {
        self.ci_lower.is_reference() && self.ci_upper.is_reference()
    }

    /// Resolves the two bounds into an interval.
    /// Returns None when exactly one bound is the sentinel.
    pub fn interval(&self) -> Option<Interval> {
        match (self.ci_lower, self.ci_upper) {
            (CiBound::Reference, CiBound::Reference) => Some(Interval::Reference),
            (CiBound::Value(lower), CiBound::Value(upper)) => Some(Interval::Bounds { lower, upper }),
            _ => None,
        }
    }

    /// Same as `interval`, reporting a mismatch as an error for row `index`.
    pub(crate) fn checked_interval(&self, index: usize) -> Result<Interval, LayoutError> {
        self.interval().ok_or_else(|| LayoutError::InvalidReferenceRow {
            row: index,
            variable: self.variable.clone(),
        })
    }
}

// ============================================================================
// RESULT TABLE
// ============================================================================

/// The whole result set for one plot. Immutable once built; a new load
/// produces a new table.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
    result_label: String,
}

impl ResultTable {
    /// `result_label` is the name of the estimate column ("Odds Ratio",
    /// "Result", ...) and is reused for the plot headers.
    pub fn new(rows: Vec<ResultRow>, result_label: impl Into<String>) -> Self {
        ResultTable {
            rows,
            result_label: result_label.into(),
        }
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn result_label(&self) -> &str {
        &self.result_label
    }

    /// True when every row carries a sample size.
    pub fn has_counts(&self) -> bool {
        !self.rows.is_empty() && self.rows.iter().all(|r| r.count.is_some())
    }

    /// Checks the sentinel pairing of every row.
    pub fn validate(&self) -> Result<(), LayoutError> {
        for (index, row) in self.rows.iter().enumerate() {
            row.checked_interval(index)?;
        }
        Ok(())
    }
}

/// Demonstration table: two categorical variables, the first level of
/// "Animal" being the reference.
pub fn sample_table() -> ResultTable {
    let rows = vec![
        ResultRow::reference("Animal", "Cat", 1.0).with_count(142),
        ResultRow::new("Animal", "Dog", 2.3, 2.1, 2.5).with_count(118),
        ResultRow::new("Age (years)", "1-2", 1.3, 1.2, 1.4).with_count(87),
        ResultRow::new("Age (years)", "3-4", 2.7, 2.4, 3.0).with_count(96),
        ResultRow::new("Age (years)", "5-6", 6.0, 5.0, 7.0).with_count(77),
    ];
    ResultTable::new(rows, "Odds Ratio")
}
