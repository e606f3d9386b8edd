//! Terminal renderer: board, HUD line, overlay and a one-line message area.

use crate::engine::{Cell, GameState};
use crate::hud::{Hud, Overlay};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Terminal columns per board cell, so cells come out roughly square.
pub const CELL_WIDTH: u16 = 2;

const FOOD_SYMBOL: &str = "●";

/// Draws the board cells of a [`GameState`].
pub struct BoardView<'a> {
    state: &'a GameState,
    grid_size: i32,
}

impl<'a> BoardView<'a> {
    pub fn new(state: &'a GameState, grid_size: i32) -> Self {
        BoardView { state, grid_size }
    }

    fn paint(&self, buf: &mut Buffer, area: Rect, cell: Cell, symbol: &str, style: Style) {
        if !cell.in_bounds(self.grid_size) {
            return;
        }
        let (Ok(column), Ok(row)) = (u16::try_from(cell.x), u16::try_from(cell.y)) else {
            return;
        };
        let x = area.x.saturating_add(column.saturating_mul(CELL_WIDTH));
        let y = area.y.saturating_add(row);
        if y >= area.bottom() {
            return;
        }
        for offset in 0..CELL_WIDTH {
            let x = x.saturating_add(offset);
            if x >= area.right() {
                break;
            }
            if let Some(target) = buf.cell_mut((x, y)) {
                target.set_symbol(symbol).set_style(style);
            }
        }
    }
}

impl Widget for BoardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let empty = Style::default().fg(Color::DarkGray);
        // Only the cells that fit in the area.
        let columns = self.grid_size.min(i32::from(area.width / CELL_WIDTH));
        let rows = self.grid_size.min(i32::from(area.height));
        for y in 0..rows {
            for x in 0..columns {
                self.paint(buf, area, Cell::new(x, y), " ", empty);
            }
        }

        self.paint(
            buf,
            area,
            self.state.food(),
            FOOD_SYMBOL,
            Style::default().fg(Color::LightGreen),
        );

        let body = Style::default().bg(Color::Blue);
        for &cell in self.state.snake() {
            self.paint(buf, area, cell, " ", body);
        }
        self.paint(
            buf,
            area,
            self.state.head(),
            "█",
            Style::default().fg(Color::LightBlue),
        );
    }
}

/// Screen layout and transient UI state kept between frames.
#[derive(Debug, Default)]
pub struct Ui {
    /// Inner board rectangle from the last frame, for mouse hit-testing.
    board: Rect,
    message: Option<String>,
}

impl Ui {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Board cell under a terminal position, if it lies on the board.
    pub fn cell_at(&self, column: u16, row: u16) -> Option<Cell> {
        if !self.board.contains(Position::new(column, row)) {
            return None;
        }
        Some(Cell::new(
            ((column - self.board.x) / CELL_WIDTH) as i32,
            (row - self.board.y) as i32,
        ))
    }

    pub fn draw(&mut self, frame: &mut Frame, state: &GameState, hud: &Hud, grid_size: i32) {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .areas(frame.area());

        frame.render_widget(
            Paragraph::new(hud_line(hud))
                .alignment(Alignment::Left)
                .block(Block::default().borders(Borders::ALL).title(" GRIDSNEK ")),
            header,
        );

        let side = u16::try_from(grid_size.max(0)).unwrap_or(u16::MAX);
        let outer = centered(
            body,
            side.saturating_mul(CELL_WIDTH).saturating_add(2),
            side.saturating_add(2),
        );
        let block = Block::default().borders(Borders::ALL);
        self.board = block.inner(outer);
        frame.render_widget(block, outer);
        frame.render_widget(BoardView::new(state, grid_size), self.board);

        if let Some(overlay) = hud.overlay() {
            render_overlay(frame, outer, &overlay);
        }

        let footer_text = self.message.clone().unwrap_or_else(|| {
            "↑↓←→/WASD move  Space pause  R restart  C share  Q quit".to_string()
        });
        frame.render_widget(
            Paragraph::new(footer_text)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL)),
            footer,
        );
    }
}

fn hud_line(hud: &Hud) -> Line<'static> {
    let label = Style::default().fg(Color::Yellow);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    Line::from(vec![
        Span::styled("Score: ", label),
        Span::styled(hud.score.to_string(), value),
        Span::raw("    "),
        Span::styled("Best: ", label),
        Span::styled(hud.best.to_string(), value),
        Span::raw("    "),
        Span::styled("Speed: ", label),
        Span::styled(hud.speed_label(), value),
        Span::raw("    "),
        Span::styled(format!("[Space] {}", hud.pause_label()), Style::default().fg(Color::Gray)),
    ])
}

fn render_overlay(frame: &mut Frame, board: Rect, overlay: &Overlay) {
    let area = centered(board, board.width.saturating_sub(4).min(40), 7);
    let text = vec![
        Line::from(Span::styled(
            overlay.title,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(overlay.text.as_str()),
        Line::from(""),
        Line::from(format!(
            "[Enter] {}   [R] {}",
            overlay.primary, overlay.secondary
        ))
        .style(Style::default().fg(Color::Gray)),
    ];
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
