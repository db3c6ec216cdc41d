//! SVG backend for [`Figure`].

use crate::figure::{BandKind, Figure, Panel};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use svg::node::element::{Element, Group, Line, Path as SvgPath, Rectangle, Text as SvgText};
use svg::node::Text as TextNode;
use svg::{Document, Node};
use tracing::info;

const TITLE_HEIGHT: f64 = 48.0;
const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 32.0;
const MARGIN_BOTTOM: f64 = 72.0;

/// Sizes and palette of the rendered image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvgStyle {
    /// Total image width in pixels.
    pub width: u32,
    /// Height of one row of panels in pixels.
    pub panel_height: u32,
    pub bar_color: String,
    pub comfortable_color: String,
    pub stretch_color: String,
    pub band_opacity: f64,
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            panel_height: 400,
            bar_color: "#1f77b4".to_string(),
            comfortable_color: "green".to_string(),
            stretch_color: "orange".to_string(),
            band_opacity: 0.2,
        }
    }
}

/// Render the whole figure as a standalone SVG document.
pub fn render_svg(figure: &Figure, style: &SvgStyle) -> String {
    document(figure, style).to_string()
}

/// Render and write the figure to `path`.
pub fn write_svg(figure: &Figure, style: &SvgStyle, path: &Path) -> Result<()> {
    svg::save(path, &document(figure, style)).map_err(|source| Error::Output {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), panels = figure.panels.len(), "wrote svg");
    Ok(())
}

fn document(figure: &Figure, style: &SvgStyle) -> Document {
    let width = f64::from(style.width);
    let panel_height = f64::from(style.panel_height);
    let height = TITLE_HEIGHT + panel_height * figure.rows.max(1) as f64;
    let cell_width = width / figure.columns as f64;

    let mut doc = Document::new()
        .set("width", style.width)
        .set("height", height)
        .set("viewBox", (0, 0, width, height))
        .set("font-family", "sans-serif");

    doc = doc.add(
        Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", width)
            .set("height", height)
            .set("fill", "white"),
    );
    doc = doc.add(
        SvgText::new(figure.title.as_str())
            .set("class", "figure-title")
            .set("x", width / 2.0)
            .set("y", 30)
            .set("font-size", 18)
            .set("text-anchor", "middle"),
    );

    if figure.panels.is_empty() {
        doc = doc.add(
            SvgText::new("No voices found")
                .set("x", width / 2.0)
                .set("y", TITLE_HEIGHT + panel_height / 2.0)
                .set("font-size", 14)
                .set("text-anchor", "middle")
                .set("fill", "#666"),
        );
    }

    for (index, panel) in figure.panels.iter().enumerate() {
        let (row, col) = figure.cell(index);
        let origin = (col as f64 * cell_width, TITLE_HEIGHT + row as f64 * panel_height);
        doc = doc.add(render_panel(panel, origin, (cell_width, panel_height), style));
    }

    doc
}

fn render_panel(panel: &Panel, origin: (f64, f64), size: (f64, f64), style: &SvgStyle) -> Group {
    let left = origin.0 + MARGIN_LEFT;
    let right = origin.0 + size.0 - MARGIN_RIGHT;
    let top = origin.1 + MARGIN_TOP;
    let bottom = origin.1 + size.1 - MARGIN_BOTTOM;
    let plot_width = (right - left).max(1.0);
    let plot_height = (bottom - top).max(1.0);

    let x_span = (panel.x_max - panel.x_min).max(f64::EPSILON);
    let y_top = panel.y_max.max(1) as f64 * 1.05;
    let px = |x: f64| round2(left + (x - panel.x_min) / x_span * plot_width);
    let py = |count: f64| round2(bottom - count / y_top * plot_height);

    let mut group = Group::new().set("class", "panel");
    group = group.add(
        SvgText::new(panel.title.as_str())
            .set("class", "panel-title")
            .set("x", round2((left + right) / 2.0))
            .set("y", round2(top - 10.0))
            .set("font-size", 14)
            .set("text-anchor", "middle"),
    );

    // Bands sit beneath the bars and are clipped to the axis
    for band in &panel.bands {
        let start = px(band.start.max(panel.x_min));
        let end = px(band.end.min(panel.x_max));
        if end <= start {
            continue;
        }
        let color = match band.kind {
            BandKind::Comfortable => &style.comfortable_color,
            BandKind::Stretch => &style.stretch_color,
        };
        group = group.add(
            Rectangle::new()
                .set("class", "band")
                .set("x", start)
                .set("y", round2(top))
                .set("width", round2(end - start))
                .set("height", round2(plot_height))
                .set("fill", color.as_str())
                .set("fill-opacity", style.band_opacity),
        );
    }

    for bar in &panel.bars {
        let y = py(bar.count as f64);
        let mut tooltip = Element::new("title");
        tooltip.append(TextNode::new(format!("{}: {}", bar.bucket, bar.count)));
        group = group.add(
            Rectangle::new()
                .set("class", "bar")
                .set("x", px(bar.x))
                .set("y", y)
                .set("width", round2(bar.width / x_span * plot_width))
                .set("height", round2(bottom - y))
                .set("fill", style.bar_color.as_str())
                .add(tooltip),
        );
    }

    // Axes
    let (left, top, right, bottom) = (round2(left), round2(top), round2(right), round2(bottom));
    let axes = format!("M{left},{top} L{left},{bottom} L{right},{bottom}");
    group = group.add(
        SvgPath::new()
            .set("d", axes)
            .set("stroke", "black")
            .set("fill", "none"),
    );

    for tick in &panel.ticks {
        let x = px(tick.x);
        let y = round2(bottom + 16.0);
        group = group.add(
            Line::new()
                .set("x1", x)
                .set("y1", round2(bottom))
                .set("x2", x)
                .set("y2", round2(bottom + 5.0))
                .set("stroke", "black"),
        );
        group = group.add(
            SvgText::new(tick.label.as_str())
                .set("class", "tick")
                .set("x", x)
                .set("y", y)
                .set("font-size", 10)
                .set("text-anchor", "end")
                .set("transform", format!("rotate(-45 {x} {y})")),
        );
    }

    for count in [0, panel.y_max] {
        group = group.add(
            SvgText::new(count.to_string())
                .set("x", round2(left - 6.0))
                .set("y", round2(py(count as f64) + 4.0))
                .set("font-size", 10)
                .set("text-anchor", "end"),
        );
        if panel.y_max == 0 {
            break;
        }
    }

    group = group.add(
        SvgText::new("Pitch")
            .set("x", round2((left + right) / 2.0))
            .set("y", round2(bottom + 56.0))
            .set("font-size", 12)
            .set("text-anchor", "middle"),
    );
    let label_x = round2(origin.0 + 18.0);
    let label_y = round2((top + bottom) / 2.0);
    group.add(
        SvgText::new("Occurrences")
            .set("x", label_x)
            .set("y", label_y)
            .set("font-size", 12)
            .set("text-anchor", "middle")
            .set("transform", format!("rotate(-90 {label_x} {label_y})")),
    )
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
