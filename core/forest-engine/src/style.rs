//! FILENAME: core/forest-engine/src/style.rs
//! PURPOSE: Colors, plot options and typography settings for a forest plot.
//! CONTEXT: `PlotOptions` is the per-render configuration surface (shading,
//! header fill, scaling, x limits). `StyleConfig` holds font sizes and the
//! fine-grained pixel offsets used to align labels. Both round-trip through
//! JSON so the CLI can read them from a config file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LayoutError;

/// RGBA color. Serialized as a hex string ("#rrggbb" or "#rrggbbaa").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8, // Alpha channel (255 = opaque)
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    pub const fn black() -> Self {
        Color::new(0, 0, 0)
    }

    pub const fn white() -> Self {
        Color::new(255, 255, 255)
    }

    /// Parse from hex string (e.g., "#FF0000" or "FF0000").
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::new(r, g, b))
        } else if hex.len() == 8 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            let a = u8::from_str_radix(&hex[6..8], 16).ok()?;
            Some(Color::with_alpha(r, g, b, a))
        } else {
            None
        }
    }

    /// The handful of named colors people actually put in plot configs.
    pub fn from_name(name: &str) -> Option<Self> {
        let color = match name.trim().to_ascii_lowercase().as_str() {
            "black" => Color::black(),
            "white" => Color::white(),
            "gray" | "grey" => Color::new(128, 128, 128),
            "lightgray" | "lightgrey" => Color::new(211, 211, 211),
            "yellow" => Color::new(255, 255, 0),
            "red" => Color::new(255, 0, 0),
            "green" => Color::new(0, 128, 0),
            "blue" => Color::new(0, 0, 255),
            "orange" => Color::new(255, 165, 0),
            _ => return None,
        };
        Some(color)
    }

    /// Alpha channel as a 0.0..=1.0 factor.
    pub fn opacity(&self) -> f64 {
        self.a as f64 / 255.0
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::black()
    }
}

impl FromStr for Color {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_name(s)
            .or_else(|| {
                if s.trim().starts_with('#') {
                    Color::from_hex(s.trim())
                } else {
                    None
                }
            })
            .ok_or_else(|| LayoutError::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = LayoutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ============================================================================
// PLOT OPTIONS
// ============================================================================

/// Per-render options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    /// Adds a column with the per-row sample size.
    pub counts: bool,
    /// Shading for even-numbered group boundaries (first, third, ...).
    pub group1_color: Option<Color>,
    /// Shading for odd-numbered group boundaries (second, fourth, ...).
    pub group2_color: Option<Color>,
    pub group_alpha: f64,
    /// Background of the header row across all columns.
    pub head_fill: Option<Color>,
    pub head_alpha: f64,
    /// Vertical scale multiplier for the whole figure.
    pub length_scale: f64,
    /// Explicit x bounds for the estimate column.
    pub xlim: Option<(f64, f64)>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        PlotOptions {
            counts: false,
            group1_color: None,
            group2_color: None,
            group_alpha: 0.15,
            head_fill: None,
            head_alpha: 1.0,
            length_scale: 1.0,
            xlim: None,
        }
    }
}

impl PlotOptions {
    /// Shading color for the boundary at `index`, alternating by parity.
    pub fn group_color(&self, index: usize) -> Option<Color> {
        if index % 2 == 0 {
            self.group1_color
        } else {
            self.group2_color
        }
    }
}

// ============================================================================
// STYLE CONFIG
// ============================================================================

/// Horizontal pixel offsets used to line labels up inside their columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelOffsets {
    pub header: f64,
    pub group_label: f64,
    /// Variable names sit to the right of the group names, in the same column.
    pub variable_label: f64,
    pub estimate_text: f64,
    /// Extra indent for the "Reference" cell so it lines up with the numbers.
    pub reference_indent: f64,
    pub count_text: f64,
}

impl Default for LabelOffsets {
    fn default() -> Self {
        LabelOffsets {
            header: 8.0,
            group_label: 8.0,
            variable_label: 135.0,
            estimate_text: 8.0,
            reference_indent: 24.0,
            count_text: 8.0,
        }
    }
}

/// Typography and resolution, owned by one plot session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Base font size in points.
    pub font_size: f64,
    pub header_font_size: f64,
    pub group_font_size: f64,
    pub dpi: f64,
    pub offsets: LabelOffsets,
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig {
            font_size: 11.0,
            header_font_size: 11.0,
            group_font_size: 11.0,
            dpi: 100.0,
            offsets: LabelOffsets::default(),
        }
    }
}

impl StyleConfig {
    /// Converts a size in points to pixels at the configured resolution.
    pub fn points_to_pixels(&self, points: f64) -> f64 {
        points * self.dpi / 72.0
    }
}
