use chrono::{DateTime, Local, Utc};

use cidian_lib::vocab::algorithm::{format_interval, preview_intervals};
use cidian_lib::vocab::{DisplayMode, Grade, VocabCard};

use crate::app::short_id;

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap `text` in an ANSI style when colors are enabled
pub fn paint(text: &str, style: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", style, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Terminal column width; East Asian wide characters take two columns
pub fn display_width(text: &str) -> usize {
    text.chars().map(|c| if is_wide(c) { 2 } else { 1 }).sum()
}

fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA960..=0xA97F
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x20000..=0x3FFFD)
}

/// Pad or truncate to exactly `width` columns
pub fn fit(text: &str, width: usize) -> String {
    let text = text.replace('\n', " ");
    if display_width(&text) <= width {
        let pad = width - display_width(&text);
        return format!("{}{}", text, " ".repeat(pad));
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = if is_wide(c) { 2 } else { 1 };
        if used + w > width.saturating_sub(1) {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('\u{2026}');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

/// Local date, or "today" when already due
pub fn format_due(due: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if due <= now {
        "today".to_string()
    } else {
        due.with_timezone(&Local).format("%Y-%m-%d").to_string()
    }
}

/// Render cards as a fixed-width table
pub fn render_card_table(cards: &[VocabCard], now: DateTime<Utc>, use_color: bool) -> Vec<String> {
    const COLUMNS: [(&str, usize); 8] = [
        ("ID", 8),
        ("Hanzi", 10),
        ("Pinyin", 12),
        ("Meaning", 24),
        ("POS", 8),
        ("Chapter", 8),
        ("Due", 10),
        ("Ease", 4),
    ];

    let mut lines = Vec::with_capacity(cards.len() + 2);
    let header = COLUMNS.iter()
        .map(|(name, width)| fit(name, *width))
        .collect::<Vec<_>>()
        .join(" ");
    lines.push(paint(header.trim_end(), Color::BOLD, use_color));
    lines.push(COLUMNS.iter()
        .map(|(_, width)| "\u{2500}".repeat(*width))
        .collect::<Vec<_>>()
        .join(" "));

    for card in cards {
        let due = format_due(card.srs.due, now);
        let due_cell = fit(&due, 10);
        let due_cell = if card.srs.is_due(now) {
            paint(&due_cell, Color::YELLOW, use_color)
        } else {
            due_cell
        };

        let row = [
            paint(&fit(short_id(&card.id), 8), Color::GRAY, use_color),
            fit(&card.hanzi, 10),
            fit(&card.pinyin, 12),
            fit(&card.meaning, 24),
            fit(&card.part_of_speech, 8),
            fit(&card.chapter, 8),
            due_cell,
            format!("{:.2}", card.srs.ease),
        ];
        lines.push(row.join(" "));
    }

    lines
}

/// Render one face of a card for the line-based review
pub fn render_card_face(
    card: &VocabCard,
    mode: DisplayMode,
    showing_back: bool,
    now: DateTime<Utc>,
    use_color: bool,
) -> Vec<String> {
    let mut lines = vec![paint(mode.front(card), Color::BOLD, use_color)];

    if !showing_back {
        return lines;
    }

    lines.push(String::new());
    lines.push(paint(mode.answer(card), Color::CYAN, use_color));
    if !card.pinyin.is_empty() {
        lines.push(card.pinyin.clone());
    }
    if !card.part_of_speech.is_empty() {
        lines.push(paint(&format!("({})", card.part_of_speech), Color::DIM, use_color));
    }
    if !card.example.is_empty() {
        lines.push(String::new());
        lines.extend(card.example.lines().map(|l| format!("  {}", l)));
    }
    lines.push(String::new());
    lines.push(grade_hints(card, now, use_color));
    lines
}

/// "1 again (now)  2 good (1d)  3 easy (3d)"
pub fn grade_hints(card: &VocabCard, now: DateTime<Utc>, use_color: bool) -> String {
    let previews = preview_intervals(&card.srs, now);
    Grade::ALL.iter()
        .zip(previews)
        .enumerate()
        .map(|(i, (grade, days))| {
            let style = match grade {
                Grade::Again => Color::RED,
                Grade::Good => Color::GREEN,
                Grade::Easy => Color::CYAN,
            };
            format!("{} {} ({})", i + 1, paint(grade.as_str(), style, use_color), format_interval(days))
        })
        .collect::<Vec<_>>()
        .join("  ")
}
