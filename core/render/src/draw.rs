//! FILENAME: core/render/src/draw.rs
//! PURPOSE: Replays a `FigureLayout` onto a plotters drawing area and saves
//! it as PNG or SVG.

use std::path::Path;

use log::{debug, info};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::{
    BitMapBackend, Circle, DrawingArea, DrawingBackend, IntoDrawingArea, PathElement, RGBAColor,
    Rectangle, SVGBackend, Text, BLACK, WHITE,
};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{Color as _, FontDesc, FontFamily, FontStyle};

use crate::error::RenderError;
use crate::figure::{FigureLayout, Segment, TextAlign};

/// Dash pattern for the reference line, in pixels.
const DASH_LENGTH: i32 = 6;
const DASH_GAP: i32 = 4;

/// Output image formats, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match extension.as_str() {
            "png" => Ok(ImageFormat::Png),
            "svg" => Ok(ImageFormat::Svg),
            _ => Err(RenderError::UnsupportedImageFormat(extension)),
        }
    }
}

/// Writes the figure to `path`. The image is exactly the figure's size.
pub fn save_figure(figure: &FigureLayout, path: &Path) -> Result<(), RenderError> {
    let format = ImageFormat::from_path(path)?;
    let size = (figure.width, figure.height);
    info!(
        target: "RENDER",
        "Saving {}x{} {:?} to {}",
        figure.width,
        figure.height,
        format,
        path.display()
    );

    match format {
        ImageFormat::Png => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw_figure(&root, figure)?;
            root.present().map_err(drawing_error)?;
        }
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_figure(&root, figure)?;
            root.present().map_err(drawing_error)?;
        }
    }
    Ok(())
}

/// Renders the figure to an SVG document in memory.
pub fn render_svg(figure: &FigureLayout) -> Result<String, RenderError> {
    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, (figure.width, figure.height))
            .into_drawing_area();
        draw_figure(&root, figure)?;
        root.present().map_err(drawing_error)?;
    }
    Ok(buffer)
}

/// Draws fills, lines, error bars and text, in that order.
pub fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &FigureLayout,
) -> Result<(), RenderError> {
    root.fill(&WHITE).map_err(drawing_error)?;

    for fill in &figure.fills {
        let color = RGBAColor(fill.color.r, fill.color.g, fill.color.b, fill.alpha);
        let r = fill.rect;
        root.draw(&Rectangle::new([(r.x0, r.y0), (r.x1, r.y1)], color.filled()))
            .map_err(drawing_error)?;
    }

    for segment in &figure.lines {
        for (from, to) in segment_pieces(segment) {
            root.draw(&PathElement::new(vec![from, to], BLACK.stroke_width(1)))
                .map_err(drawing_error)?;
        }
    }

    for bar in &figure.bars {
        if bar.low != bar.high {
            root.draw(&PathElement::new(
                vec![(bar.low, bar.y), (bar.high, bar.y)],
                BLACK.stroke_width(1),
            ))
            .map_err(drawing_error)?;
        }
        root.draw(&Circle::new((bar.x, bar.y), figure.marker_radius, BLACK.filled()))
            .map_err(drawing_error)?;
    }

    for item in &figure.texts {
        let weight = if item.bold { FontStyle::Bold } else { FontStyle::Normal };
        let h_pos = match item.align {
            TextAlign::Left => HPos::Left,
            TextAlign::Center => HPos::Center,
        };
        let style = FontDesc::new(FontFamily::SansSerif, item.size, weight)
            .color(&BLACK)
            .pos(Pos::new(h_pos, VPos::Center));
        root.draw(&Text::new(item.text.clone(), (item.x, item.y), style))
            .map_err(drawing_error)?;
    }

    debug!(
        target: "RENDER",
        "Drew {} fills, {} lines, {} bars, {} labels",
        figure.fills.len(),
        figure.lines.len(),
        figure.bars.len(),
        figure.texts.len()
    );
    Ok(())
}

/// Splits a segment into the pieces actually stroked (one for solid lines).
fn segment_pieces(segment: &Segment) -> Vec<((i32, i32), (i32, i32))> {
    if !segment.dashed {
        return vec![(segment.from, segment.to)];
    }

    let (dx, dy) = (
        (segment.to.0 - segment.from.0) as f64,
        (segment.to.1 - segment.from.1) as f64,
    );
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        return Vec::new();
    }

    let point = |distance: f64| {
        let t = distance.min(length) / length;
        (
            segment.from.0 + (dx * t).round() as i32,
            segment.from.1 + (dy * t).round() as i32,
        )
    };

    let mut pieces = Vec::new();
    let mut start = 0.0;
    while start < length {
        pieces.push((point(start), point(start + DASH_LENGTH as f64)));
        start += (DASH_LENGTH + DASH_GAP) as f64;
    }
    pieces
}

fn drawing_error<E: std::error::Error + Send + Sync>(error: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Drawing(error.to_string())
}
