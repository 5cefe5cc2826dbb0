//! FILENAME: core/render/src/figure.rs
//! PURPOSE: Pixel geometry of a forest plot figure.
//! CONTEXT: Converts a `RowLayout` (data coordinates, strings) into absolute
//! pixel positions: column rectangles, fills, text items, error bars and
//! line segments. Nothing here touches a drawing backend, so the geometry
//! can be checked without fonts or files. `draw` replays it with plotters.
//!
//! Columns, left to right: labels (group + variable), plot, estimate text,
//! and optionally sample sizes. A header band sits above all of them and an
//! axis strip for the x tick labels sits below the plot.

use forest_engine::{
    format_tick, Color, Limits, PlotOptions, RowLayout, StyleConfig, REFERENCE_LINE_X,
};
use plotters::coord::ranged1d::Ranged;
use plotters::coord::types::RangedCoordf64;

use crate::error::RenderError;

/// Figure width in inches without the count column.
const BASE_WIDTH_IN: f64 = 7.0;
/// Relative column widths: labels, plot, estimate text, counts.
const COLUMN_WEIGHTS: [f64; 4] = [5.0, 4.0, 4.0, 2.0];
/// Height of one y unit in inches, before `length_scale`.
const ROW_PITCH_IN: f64 = 0.5;
const HEADER_HEIGHT_IN: f64 = 0.6;
const AXIS_HEIGHT_IN: f64 = 0.35;
const MARKER_RADIUS_IN: f64 = 0.04;
const TICK_LENGTH_IN: f64 = 0.05;
const MAX_X_TICKS: usize = 6;
/// Line spacing for multi-line headers, as a multiple of the font size.
const LINE_SPACING: f64 = 1.2;

/// Axis-aligned pixel rectangle, `x0 <= x1`, `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl PixelRect {
    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Labels,
    Plot,
    Estimates,
    Counts,
}

/// Horizontal extent of one column; columns span header and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub kind: ColumnKind,
    pub x0: i32,
    pub x1: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// A single line of text, vertically centered on `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub x: i32,
    pub y: i32,
    /// Font size in pixels.
    pub size: f64,
    pub align: TextAlign,
    pub bold: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub rect: PixelRect,
    pub color: Color,
    /// Final opacity: the option's alpha times the color's own alpha.
    pub alpha: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub from: (i32, i32),
    pub to: (i32, i32),
    pub dashed: bool,
}

/// Point estimate with its horizontal interval. For reference rows
/// `low == high == x`, so only the marker is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorBar {
    pub x: i32,
    pub y: i32,
    pub low: i32,
    pub high: i32,
}

/// Everything needed to draw one figure, in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureLayout {
    pub width: u32,
    pub height: u32,
    pub header: PixelRect,
    pub body: PixelRect,
    pub columns: Vec<Column>,
    /// Drawn first, in order (header fill, then group shading).
    pub fills: Vec<Fill>,
    pub lines: Vec<Segment>,
    pub bars: Vec<ErrorBar>,
    pub marker_radius: i32,
    pub texts: Vec<TextItem>,
}

impl FigureLayout {
    pub fn new(
        layout: &RowLayout,
        options: &PlotOptions,
        style: &StyleConfig,
    ) -> Result<Self, RenderError> {
        let x_limits = layout.x_limits;
        if !(x_limits.span() > 0.0 && x_limits.min.is_finite() && x_limits.max.is_finite()) {
            return Err(RenderError::DegenerateAxis {
                min: x_limits.min,
                max: x_limits.max,
            });
        }

        let dpi = style.dpi;
        let scale = options.length_scale;
        let px = |inches: f64| (inches * dpi).round() as i32;

        // Horizontal split
        let kinds: &[ColumnKind] = if layout.has_counts() {
            &[ColumnKind::Labels, ColumnKind::Plot, ColumnKind::Estimates, ColumnKind::Counts]
        } else {
            &[ColumnKind::Labels, ColumnKind::Plot, ColumnKind::Estimates]
        };
        let base_weight: f64 = COLUMN_WEIGHTS[..3].iter().sum();
        let inch_per_weight = BASE_WIDTH_IN / base_weight;
        let mut columns = Vec::with_capacity(kinds.len());
        let mut cursor = 0.0;
        for (i, kind) in kinds.iter().enumerate() {
            let next = cursor + COLUMN_WEIGHTS[i] * inch_per_weight;
            columns.push(Column {
                kind: *kind,
                x0: px(cursor),
                x1: px(next),
            });
            cursor = next;
        }
        let width = px(cursor);

        // Vertical split
        let header = PixelRect {
            x0: 0,
            y0: 0,
            x1: width,
            y1: px(HEADER_HEIGHT_IN * scale),
        };
        let body = PixelRect {
            x0: 0,
            y0: header.y1,
            x1: width,
            y1: header.y1 + px(layout.y_limits.span() * ROW_PITCH_IN * scale),
        };
        let height = body.y1 + px(AXIS_HEIGHT_IN);

        let mut figure = FigureLayout {
            width: width.max(1) as u32,
            height: height.max(1) as u32,
            header,
            body,
            columns,
            fills: Vec::new(),
            lines: Vec::new(),
            bars: Vec::new(),
            marker_radius: px(MARKER_RADIUS_IN).max(1),
            texts: Vec::new(),
        };

        let y_map = AxisMap::new(layout.y_limits, body.y1 as f64, body.y0 as f64);
        figure.add_fills(layout, options, &y_map);
        figure.add_headers(layout, style);
        figure.add_row_text(layout, style, &y_map);
        figure.add_plot(layout, style, &y_map, px(TICK_LENGTH_IN));
        Ok(figure)
    }

    pub fn column(&self, kind: ColumnKind) -> Option<&Column> {
        self.columns.iter().find(|c| c.kind == kind)
    }

    fn add_fills(&mut self, layout: &RowLayout, options: &PlotOptions, y_map: &AxisMap) {
        if let Some(color) = options.head_fill {
            self.fills.push(Fill {
                rect: self.header,
                color,
                alpha: options.head_alpha * color.opacity(),
            });
        }

        // Bands run across every column
        for shade in &layout.shading {
            let top = y_map.to_pixel(shade.band.y_high);
            let bottom = y_map.to_pixel(shade.band.y_low);
            self.fills.push(Fill {
                rect: PixelRect {
                    x0: self.body.x0,
                    y0: top.min(bottom),
                    x1: self.body.x1,
                    y1: top.max(bottom),
                },
                color: shade.color,
                alpha: shade.alpha * shade.color.opacity(),
            });
        }
    }

    fn add_headers(&mut self, layout: &RowLayout, style: &StyleConfig) {
        let size = style.points_to_pixels(style.header_font_size);
        let center = (self.header.y0 + self.header.y1) as f64 / 2.0;
        let columns = self.columns.clone();

        for (column, header) in columns.iter().zip(&layout.headers) {
            let lines: Vec<&str> = header.lines().collect();
            let block = (lines.len().saturating_sub(1)) as f64 * size * LINE_SPACING;
            for (i, line) in lines.iter().enumerate() {
                let y = center - block / 2.0 + i as f64 * size * LINE_SPACING;
                self.texts.push(TextItem {
                    text: line.to_string(),
                    x: column.x0 + style.offsets.header.round() as i32,
                    y: y.round() as i32,
                    size,
                    align: TextAlign::Left,
                    bold: true,
                });
            }
        }
    }

    fn add_row_text(&mut self, layout: &RowLayout, style: &StyleConfig, y_map: &AxisMap) {
        let size = style.points_to_pixels(style.font_size);
        let group_size = style.points_to_pixels(style.group_font_size);
        let offsets = style.offsets;
        let labels_x = self.column_x(ColumnKind::Labels);
        let estimates_x = self.column_x(ColumnKind::Estimates);
        let counts_x = self.column_x(ColumnKind::Counts);

        for (i, &position) in layout.positions.iter().enumerate() {
            let y = y_map.to_pixel(position);

            if !layout.group_labels[i].is_empty() {
                self.push_text(&layout.group_labels[i], labels_x + offsets.group_label, y, group_size, true);
            }
            self.push_text(&layout.variables[i], labels_x + offsets.variable_label, y, size, false);

            let mut estimate_x = estimates_x + offsets.estimate_text;
            if layout.reference_rows[i] {
                estimate_x += offsets.reference_indent;
            }
            self.push_text(&layout.estimate_cells[i], estimate_x, y, size, false);

            if let Some(counts) = &layout.counts {
                self.push_text(&counts[i], counts_x + offsets.count_text, y, size, false);
            }
        }
    }

    fn add_plot(&mut self, layout: &RowLayout, style: &StyleConfig, y_map: &AxisMap, tick_length: i32) {
        let Some(plot) = self.column(ColumnKind::Plot).copied() else {
            return;
        };
        let x_limits = layout.x_limits;
        let x_map = AxisMap::new(x_limits, plot.x0 as f64, plot.x1 as f64);
        let (top, bottom) = (self.body.y0, self.body.y1);

        // Frame
        let corners = [(plot.x0, top), (plot.x1, top), (plot.x1, bottom), (plot.x0, bottom)];
        for i in 0..corners.len() {
            self.lines.push(Segment {
                from: corners[i],
                to: corners[(i + 1) % corners.len()],
                dashed: false,
            });
        }

        if x_limits.contains(REFERENCE_LINE_X) {
            let x = x_map.to_pixel(REFERENCE_LINE_X);
            self.lines.push(Segment {
                from: (x, y_map.to_pixel(layout.y_limits.max)),
                to: (x, y_map.to_pixel(layout.y_limits.min)),
                dashed: true,
            });
        }

        for (i, &position) in layout.positions.iter().enumerate() {
            let estimate = layout.estimates[i];
            self.bars.push(ErrorBar {
                x: x_map.to_pixel(estimate),
                y: y_map.to_pixel(position),
                low: x_map.to_pixel(estimate - layout.errors.low[i]),
                high: x_map.to_pixel(estimate + layout.errors.high[i]),
            });
        }

        let tick_size = style.points_to_pixels(style.font_size) * 0.9;
        for value in x_ticks(x_limits) {
            let x = x_map.to_pixel(value);
            self.lines.push(Segment {
                from: (x, bottom),
                to: (x, bottom + tick_length),
                dashed: false,
            });
            self.texts.push(TextItem {
                text: format_tick(value),
                x,
                y: bottom + tick_length + (tick_size * 0.8).round() as i32,
                size: tick_size,
                align: TextAlign::Center,
                bold: false,
            });
        }
    }

    fn column_x(&self, kind: ColumnKind) -> f64 {
        self.column(kind).map(|c| c.x0 as f64).unwrap_or(0.0)
    }

    fn push_text(&mut self, text: &str, x: f64, y: i32, size: f64, bold: bool) {
        self.texts.push(TextItem {
            text: text.to_string(),
            x: x.round() as i32,
            y,
            size,
            align: TextAlign::Left,
            bold,
        });
    }
}

/// Tick values inside the x range, picked by plotters' key point search.
pub fn x_ticks(limits: Limits) -> Vec<f64> {
    let range: RangedCoordf64 = (limits.min..limits.max).into();
    range.key_points(MAX_X_TICKS)
}

/// Linear map from a data range onto a pixel range. The pixel range may be
/// inverted (y grows downward on screen).
struct AxisMap {
    limits: Limits,
    start: f64,
    end: f64,
}

impl AxisMap {
    fn new(limits: Limits, start: f64, end: f64) -> Self {
        AxisMap { limits, start, end }
    }

    fn to_pixel(&self, value: f64) -> i32 {
        let t = (value - self.limits.min) / self.limits.span();
        (self.start + t * (self.end - self.start)).round() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forest_engine::sample_table;

    fn figure_for(options: &PlotOptions) -> (RowLayout, FigureLayout) {
        let layout = RowLayout::build(&sample_table(), options).unwrap();
        let figure = FigureLayout::new(&layout, options, &StyleConfig::default()).unwrap();
        (layout, figure)
    }

    fn text_at<'a>(figure: &'a FigureLayout, text: &str) -> Option<&'a TextItem> {
        figure.texts.iter().find(|t| t.text == text)
    }

    #[test]
    fn test_figure_dimensions() {
        let (_, figure) = figure_for(&PlotOptions::default());
        // 7in wide at 100 dpi; header 60px, 6 y units * 50px, axis strip 35px
        assert_eq!(figure.width, 700);
        assert_eq!(figure.header.height(), 60);
        assert_eq!(figure.body.height(), 300);
        assert_eq!(figure.height, 395);
        assert_eq!(figure.columns.len(), 3);
        assert_eq!(figure.columns[0].x0, 0);
        assert_eq!(figure.columns[2].x1, 700);
    }

    #[test]
    fn test_counts_column_widens_figure() {
        let options = PlotOptions { counts: true, ..PlotOptions::default() };
        let (_, figure) = figure_for(&options);
        assert_eq!(figure.columns.len(), 4);
        let counts = figure.column(ColumnKind::Counts).unwrap();
        assert_eq!(counts.x0, 700);
        assert!(figure.width > 700);
        assert!(text_at(&figure, "Number").is_some());
        assert!(text_at(&figure, "142").is_some());
    }

    #[test]
    fn test_length_scale_stretches_body() {
        let options = PlotOptions { length_scale: 2.0, ..PlotOptions::default() };
        let (_, figure) = figure_for(&options);
        assert_eq!(figure.body.height(), 600);
        assert_eq!(figure.header.height(), 120);
    }

    #[test]
    fn test_first_row_drawn_on_top() {
        let (_, figure) = figure_for(&PlotOptions::default());
        let cat = text_at(&figure, "Cat").unwrap();
        let oldest = text_at(&figure, "5-6").unwrap();
        assert!(cat.y < oldest.y);
        // y = 5 of [0, 6] over a 300px body starting at 60
        assert_eq!(cat.y, 110);
        assert_eq!(figure.bars[0].y, 110);
    }

    #[test]
    fn test_reference_row_has_no_whiskers_and_is_indented() {
        let (_, figure) = figure_for(&PlotOptions::default());
        let bar = figure.bars[0];
        assert_eq!((bar.low, bar.high), (bar.x, bar.x));
        assert!(figure.bars[1].low < figure.bars[1].x);
        assert!(figure.bars[1].high > figure.bars[1].x);

        let reference = text_at(&figure, "Reference").unwrap();
        let numeric = text_at(&figure, "2.30 (2.10, 2.50)").unwrap();
        assert_eq!(reference.x - numeric.x, 24);
    }

    #[test]
    fn test_group_labels_only_on_first_row_of_run() {
        let (_, figure) = figure_for(&PlotOptions::default());
        assert_eq!(figure.texts.iter().filter(|t| t.text == "Animal").count(), 1);
        assert_eq!(figure.texts.iter().filter(|t| t.text == "Age (years)").count(), 1);
        assert!(text_at(&figure, "Animal").unwrap().bold);
    }

    #[test]
    fn test_two_line_header() {
        let (_, figure) = figure_for(&PlotOptions::default());
        let first = text_at(&figure, "Odds Ratio").unwrap();
        let second = text_at(&figure, "(Confidence Interval)").unwrap();
        assert!(second.y > figure.header.y0 && second.y < figure.header.y1);
        assert!(text_at(&figure, "Variable").is_some());
        assert!(first.y >= figure.header.y0);
    }

    #[test]
    fn test_shading_is_flush_with_body() {
        let options = PlotOptions {
            group1_color: Some(Color::new(128, 128, 128)),
            group2_color: Some(Color::new(255, 255, 0)),
            head_fill: Some(Color::new(211, 211, 211)),
            ..PlotOptions::default()
        };
        let (_, figure) = figure_for(&options);
        assert_eq!(figure.fills.len(), 3);
        assert_eq!(figure.fills[0].rect, figure.header);

        let (first, second) = (figure.fills[1].rect, figure.fills[2].rect);
        assert_eq!(first.y0, figure.body.y0);
        assert_eq!(first.y1, second.y0);
        assert_eq!(second.y1, figure.body.y1);
        assert_eq!((first.x0, first.x1), (0, figure.width as i32));
    }

    #[test]
    fn test_reference_line_only_inside_range() {
        let (_, figure) = figure_for(&PlotOptions::default());
        assert_eq!(figure.lines.iter().filter(|l| l.dashed).count(), 1);

        let options = PlotOptions { xlim: Some((2.0, 8.0)), ..PlotOptions::default() };
        let (_, figure) = figure_for(&options);
        assert!(figure.lines.iter().all(|l| !l.dashed));
    }

    #[test]
    fn test_degenerate_axis_rejected() {
        let options = PlotOptions { xlim: Some((3.0, 3.0)), ..PlotOptions::default() };
        let layout = RowLayout::build(&sample_table(), &options).unwrap();
        let result = FigureLayout::new(&layout, &options, &StyleConfig::default());
        assert!(matches!(result, Err(RenderError::DegenerateAxis { .. })));
    }

    #[test]
    fn test_fill_alpha_includes_color_alpha() {
        let options = PlotOptions {
            group1_color: Some("#ff000080".parse().unwrap()),
            group_alpha: 0.5,
            head_fill: Some(Color::new(128, 128, 128)),
            head_alpha: 0.8,
            ..PlotOptions::default()
        };
        let (_, figure) = figure_for(&options);

        let head = &figure.fills[0];
        assert!((head.alpha - 0.8).abs() < 1e-9);
        let band = &figure.fills[1];
        assert!((band.alpha - 0.5 * 128.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_negative_row_renders() {
        let table = forest_engine::ResultTable::new(
            vec![forest_engine::ResultRow::new("Dose", "High", -1.5, -2.0, -1.0)],
            "Mean difference",
        );
        let options = PlotOptions::default();
        let layout = RowLayout::build(&table, &options).unwrap();
        let figure = FigureLayout::new(&layout, &options, &StyleConfig::default()).unwrap();

        assert_eq!(figure.bars.len(), 1);
        let plot = figure.column(ColumnKind::Plot).unwrap();
        let bar = figure.bars[0];
        assert!(bar.low < bar.x && bar.x < bar.high);
        assert!(plot.x0 <= bar.x && bar.x <= plot.x1);
        assert!(figure.lines.iter().all(|l| !l.dashed));
    }

    #[test]
    fn test_x_ticks_inside_range() {
        let limits = Limits::new(0.7, 7.8);
        let ticks = x_ticks(limits);
        assert!(!ticks.is_empty());
        assert!(ticks.len() <= MAX_X_TICKS);
        assert!(ticks.iter().all(|t| limits.contains(*t)));
    }
}
