//! Interactive terminal display of the histogram figure.

mod panel;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use voicerange::Figure;

/// Panels shorter than this are scrolled rather than squeezed.
const MIN_PANEL_HEIGHT: u16 = 10;

/// Take over the terminal until the user quits.
pub fn show(figure: &Figure) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = UiApp::new(figure).run(&mut terminal);
    ratatui::restore();
    result
}

/// UI application state
pub struct UiApp<'a> {
    figure: &'a Figure,
    /// First visible row of panels
    scroll: usize,
    /// Rows that fit on screen at the last draw
    visible_rows: usize,
    should_quit: bool,
}

impl<'a> UiApp<'a> {
    pub fn new(figure: &'a Figure) -> Self {
        Self {
            figure,
            scroll: 0,
            visible_rows: 1,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key.code);
                }
            }
        }

        Ok(())
    }

    fn max_scroll(&self) -> usize {
        self.figure.rows.saturating_sub(self.visible_rows)
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = (self.scroll + 1).min(self.max_scroll());
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            KeyCode::PageDown => {
                self.scroll = (self.scroll + self.visible_rows).min(self.max_scroll());
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(self.visible_rows);
            }
            KeyCode::Home => self.scroll = 0,
            KeyCode::End => self.scroll = self.max_scroll(),
            _ => {}
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        // Main layout: title, panel grid, help
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Min(3),    // Panels
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let title = Paragraph::new(self.figure.title.as_str())
            .style(Style::default().add_modifier(Modifier::BOLD))
            .centered();
        frame.render_widget(title, chunks[0]);

        if self.figure.panels.is_empty() {
            frame.render_widget(
                Paragraph::new("No voices found").centered(),
                chunks[1],
            );
        } else {
            self.render_grid(frame, chunks[1]);
        }

        let help = Paragraph::new(" [Q] Quit  [↑/↓] Scroll  [PgUp/PgDn] Page")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[2]);
    }

    fn render_grid(&mut self, frame: &mut Frame, area: Rect) {
        let fit = (area.height / MIN_PANEL_HEIGHT).max(1) as usize;
        self.visible_rows = fit.min(self.figure.rows).max(1);
        self.scroll = self.scroll.min(self.max_scroll());

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Ratio(1, self.visible_rows as u32); self.visible_rows])
            .split(area);
        let columns = self.figure.columns;

        for (offset, row_area) in rows.iter().enumerate() {
            let row = self.scroll + offset;
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
                .split(*row_area);

            for (col, cell) in cells.iter().enumerate() {
                if let Some(panel) = self.figure.panels.get(row * columns + col) {
                    panel::render_panel(frame, *cell, panel);
                }
            }
        }
    }
}
