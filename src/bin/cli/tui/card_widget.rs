use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use cidian_lib::vocab::algorithm::{format_interval, preview_intervals};
use cidian_lib::vocab::Grade;

use super::app_state::TuiState;
use crate::render::terminal::format_due;

pub fn draw(f: &mut Frame, area: Rect, state: &TuiState) {
    let session = &state.session;
    let title = match session.index() {
        Some(i) => format!(" {}/{} \u{00b7} {} ", i + 1, session.len(), session.mode()),
        None => " Review ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if session.is_showing_back() {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        });

    let Some(card) = session.current() else {
        let empty = Paragraph::new("No cards to review.").block(block);
        f.render_widget(empty, area);
        return;
    };

    let mode = session.mode();
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            mode.front(card).to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if session.is_showing_back() {
        lines.push(Line::from(Span::styled(
            mode.answer(card).to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        if !card.pinyin.is_empty() {
            lines.push(Line::from(card.pinyin.clone()));
        }
        if !card.part_of_speech.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("({})", card.part_of_speech),
                Style::default().fg(Color::DarkGray),
            )));
        }
        if !card.example.is_empty() {
            lines.push(Line::from(""));
            for example_line in card.example.lines() {
                lines.push(Line::from(Span::styled(
                    example_line.to_string(),
                    Style::default().add_modifier(Modifier::ITALIC),
                )));
            }
        }

        lines.push(Line::from(""));
        let previews = preview_intervals(&card.srs, state.store.now());
        let buttons: Vec<Span> = Grade::ALL.iter()
            .zip(previews)
            .enumerate()
            .flat_map(|(i, (grade, days))| {
                let color = match grade {
                    Grade::Again => Color::Red,
                    Grade::Good => Color::Green,
                    Grade::Easy => Color::Cyan,
                };
                [
                    Span::styled(format!(" {} {} ", i + 1, grade), Style::default().fg(Color::Black).bg(color)),
                    Span::raw(format!(" {}   ", format_interval(days))),
                ]
            })
            .collect();
        lines.push(Line::from(buttons));
    } else {
        lines.push(Line::from(Span::styled(
            "Space to show the answer",
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(
            "due {}  \u{00b7}  reps {}  \u{00b7}  ease {:.2}",
            format_due(card.srs.due, state.store.now()),
            card.srs.reps,
            card.srs.ease
        ),
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
