use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::app_state::TuiState;
use super::{card_widget, status_bar};

const HELP: [&str; 8] = [
    "Space / Enter   flip card",
    "\u{2192} / l          next card",
    "\u{2190} / h          previous card",
    "1               again",
    "2               good",
    "3               easy",
    "r               reverse direction",
    "q / Esc         quit",
];

pub fn draw(f: &mut Frame, state: &mut TuiState) {
    let size = f.area();

    // Main layout: card area + status bar
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(size);

    card_widget::draw(f, outer[0], state);
    status_bar::draw(f, outer[1], state);

    if state.show_help {
        draw_help(f, size);
    }
}

fn draw_help(f: &mut Frame, size: Rect) {
    let width = 40.min(size.width);
    let height = (HELP.len() as u16 + 2).min(size.height);
    let area = Rect {
        x: size.x + (size.width - width) / 2,
        y: size.y + (size.height - height) / 2,
        width,
        height,
    };

    let lines: Vec<Line> = HELP.iter().map(|l| Line::from(format!(" {}", l))).collect();
    let help = Paragraph::new(lines)
        .block(Block::default().title(" Keys ").borders(Borders::ALL));

    f.render_widget(Clear, area);
    f.render_widget(help, area);
}
