use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::app_state::TuiState;

pub fn draw(f: &mut Frame, area: Rect, state: &TuiState) {
    if let Some(ref msg) = state.flash_message {
        let flash = Paragraph::new(format!(" {}", msg))
            .style(Style::default().bg(Color::Green).fg(Color::Black));
        f.render_widget(flash, area);
        return;
    }

    let hints = if state.session.is_showing_back() {
        " 1: again  2: good  3: easy  \u{2190}/\u{2192}: navigate  r: reverse  ?: help  q: quit "
    } else {
        " Space: flip  \u{2190}/\u{2192}: navigate  r: reverse  ?: help  q: quit "
    };

    let status = Paragraph::new(format!("{} \u{2502} graded {}", hints, state.graded))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(status, area);
}
