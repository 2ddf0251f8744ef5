use std::io::{self, BufRead, Write};

use anyhow::Result;

use cidian_lib::vocab::{CardStore, Grade, ReviewSession};

use crate::app::App;
use crate::render::terminal::{self, paint, Color};
use crate::FilterArgs;

pub fn run(app: &mut App, all: bool, filters: FilterArgs, reverse: bool, use_color: bool) -> Result<()> {
    let filters = App::filters(filters.query, filters.pos, filters.chapter);
    let due_only = app.config.due_only && !all;
    let mode = if reverse {
        app.config.display_mode.reversed()
    } else {
        app.config.display_mode
    };

    let session = ReviewSession::build(&app.store, &filters, due_only, mode);
    if session.is_empty() {
        if due_only && !app.store.is_empty() {
            println!("Nothing due. Use --all to review every card.");
        } else {
            println!("No cards to review.");
        }
        return Ok(());
    }

    #[cfg(feature = "tui")]
    {
        use std::io::IsTerminal;
        if io::stdin().is_terminal() && io::stdout().is_terminal() {
            return crate::tui::run(&mut app.store, session);
        }
    }

    let stdin = io::stdin();
    run_lines(&mut app.store, session, stdin.lock(), io::stdout(), use_color)
}

/// Line-based review loop: one command per line until `q` or end of input
pub fn run_lines<R: BufRead, W: Write>(
    store: &mut CardStore,
    mut session: ReviewSession,
    input: R,
    mut out: W,
    use_color: bool,
) -> Result<()> {
    writeln!(out, "{} cards. Enter: flip  n/p: next/previous  1/2/3: grade  r: reverse  q: quit", session.len())?;
    show(&session, store, &mut out, use_color)?;

    let mut graded = 0;
    for line in input.lines() {
        let line = line?;
        let command = line.trim();

        match command {
            "q" | "quit" => break,
            "" | "f" | "flip" => session.flip(),
            "n" | "next" => session.next(),
            "p" | "prev" => session.previous(),
            "r" | "reverse" => session.set_mode(session.mode().reversed()),
            other => match other.parse::<Grade>() {
                Ok(grade) => {
                    if let Some(card) = session.grade(store, grade)? {
                        graded += 1;
                        let next = terminal::format_due(card.srs.due, store.now());
                        writeln!(out, "{} {} \u{2192} due {}", paint(grade.as_str(), Color::GREEN, use_color), card.hanzi, next)?;
                    }
                }
                Err(e) => {
                    writeln!(out, "{}", e)?;
                    continue;
                }
            },
        }
        show(&session, store, &mut out, use_color)?;
    }

    writeln!(out, "Reviewed {} cards.", graded)?;
    Ok(())
}

fn show<W: Write>(session: &ReviewSession, store: &CardStore, out: &mut W, use_color: bool) -> Result<()> {
    let (Some(card), Some(index)) = (session.current(), session.index()) else {
        return Ok(());
    };

    writeln!(out)?;
    writeln!(out, "{}", paint(&format!("[{}/{}]", index + 1, session.len()), Color::DIM, use_color))?;
    for line in terminal::render_card_face(card, session.mode(), session.is_showing_back(), store.now(), use_color) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cidian_lib::storage::MemoryStorage;
    use cidian_lib::vocab::models::parse_timestamp;
    use cidian_lib::vocab::{CardDraft, DeckFilters, DisplayMode, ManualClock, SequentialIds};

    fn create_store() -> CardStore {
        let clock = ManualClock::new(parse_timestamp("2024-03-01T10:00:00Z").unwrap());
        let mut store = CardStore::open(
            Box::new(MemoryStorage::new()),
            Box::new(clock),
            Box::new(SequentialIds::new("card")),
        );
        store.upsert(CardDraft::new("茶", "tea")).unwrap();
        store.upsert(CardDraft::new("水", "water")).unwrap();
        store
    }

    fn review(store: &mut CardStore, input: &str) -> String {
        let session = ReviewSession::build(store, &DeckFilters::default(), true, DisplayMode::default());
        let mut out = Vec::new();
        run_lines(store, session, input.as_bytes(), &mut out, false).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_flip_shows_answer() {
        let mut store = create_store();
        let output = review(&mut store, "\nq\n");

        assert!(output.contains("tea"));
        assert!(output.contains("1 again (now)  2 good (1d)  3 easy (3d)"));
        assert!(output.contains("Reviewed 0 cards."));
    }

    #[test]
    fn test_grades_are_saved() {
        let mut store = create_store();
        let output = review(&mut store, "f\n3\n1\n");

        assert!(output.contains("Reviewed 2 cards."));
        assert_eq!(store.get("card-1").unwrap().srs.interval, 3);
        assert_eq!(store.get("card-2").unwrap().srs.reps, 1);
    }

    #[test]
    fn test_unknown_command_is_reported() {
        let mut store = create_store();
        let output = review(&mut store, "maybe\n");

        assert!(output.contains("unknown grade 'maybe'"));
        assert_eq!(store.get("card-1").unwrap().srs.reps, 0);
    }
}
