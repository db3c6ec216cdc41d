//! Histogram panel widget - bars drawn over range-coloured columns

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use voicerange::{BandKind, Panel, Zone};

const COMFORTABLE_BG: Color = Color::Rgb(18, 56, 18);
const STRETCH_BG: Color = Color::Rgb(72, 48, 8);

/// Render one voice panel with its border and title
pub fn render_panel(frame: &mut Frame, area: Rect, panel: &Panel) {
    let title = match &panel.range {
        Some(range) => format!(" {} · {} · max {} ", panel.title, range.part, panel.y_max),
        None => format!(" {} · max {} ", panel.title, panel.y_max),
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 2 || inner.width < 4 {
        return;
    }
    let lines = panel_lines(panel, inner.width, inner.height);
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Plot rows followed by one row of tick labels.
pub fn panel_lines(panel: &Panel, width: u16, height: u16) -> Vec<Line<'static>> {
    let width = width as usize;
    let plot_rows = height.saturating_sub(1) as usize;
    let span = (panel.x_max - panel.x_min).max(f64::EPSILON);
    let step = span / width as f64;

    // What sits under each terminal column
    let columns: Vec<Column> = (0..width)
        .map(|c| {
            let x = panel.x_min + (c as f64 + 0.5) * step;
            let background = panel
                .bands
                .iter()
                .find(|b| x >= b.start && x < b.end)
                .map(|b| match b.kind {
                    BandKind::Comfortable => COMFORTABLE_BG,
                    BandKind::Stretch => STRETCH_BG,
                });
            let bar = panel
                .bars
                .iter()
                .find(|b| x >= b.x && x < b.x + b.width.max(step.min(1.0)));
            let level = bar.map_or(0, |b| {
                if panel.y_max == 0 {
                    0
                } else {
                    ((b.count as f64 / panel.y_max as f64) * plot_rows as f64)
                        .round()
                        .max(1.0) as usize
                }
            });
            Column {
                background,
                level,
                color: bar.map_or(Color::Cyan, |b| bar_color(b.zone)),
            }
        })
        .collect();

    let mut lines = Vec::with_capacity(plot_rows + 1);
    for row in 0..plot_rows {
        let height_here = plot_rows - row;
        let spans: Vec<Span<'static>> = columns
            .iter()
            .map(|col| {
                let mut style = Style::default();
                if let Some(bg) = col.background {
                    style = style.bg(bg);
                }
                if col.level >= height_here {
                    Span::styled("█", style.fg(col.color))
                } else {
                    Span::styled(" ", style)
                }
            })
            .collect();
        lines.push(Line::from(spans));
    }

    if panel.is_empty() && plot_rows > 0 {
        lines[0] = Line::from(Span::styled(
            format!("{:^width$}", "(no notes)"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    lines.push(Line::from(Span::styled(
        tick_row(panel, width, step),
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

struct Column {
    background: Option<Color>,
    level: usize,
    color: Color,
}

fn bar_color(zone: Option<Zone>) -> Color {
    match zone {
        Some(Zone::Comfortable) | None => Color::Cyan,
        Some(Zone::StretchLow) | Some(Zone::StretchHigh) => Color::Yellow,
        Some(Zone::BelowRange) | Some(Zone::AboveRange) => Color::Red,
    }
}

/// Tick labels placed at their column, skipping any that would overlap.
fn tick_row(panel: &Panel, width: usize, step: f64) -> String {
    let mut row = vec![' '; width];
    let mut next_free = 0;
    for tick in &panel.ticks {
        let col = ((tick.x - panel.x_min) / step).floor();
        if col < 0.0 {
            continue;
        }
        let col = col as usize;
        let label: Vec<char> = tick.label.chars().collect();
        if col < next_free || col + label.len() > width {
            continue;
        }
        row[col..col + label.len()].copy_from_slice(&label);
        next_free = col + label.len() + 1;
    }
    row.into_iter().collect()
}
