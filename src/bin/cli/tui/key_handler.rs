use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use cidian_lib::vocab::Grade;

use super::app_state::TuiState;

pub fn handle_key(state: &mut TuiState, key: KeyEvent) {
    // Clear flash message on any keypress
    state.flash_message = None;

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.quit = true;
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => state.quit = true,
        KeyCode::Char(' ') | KeyCode::Enter => state.session.flip(),
        KeyCode::Right | KeyCode::Char('l') => state.session.next(),
        KeyCode::Left | KeyCode::Char('h') => state.session.previous(),
        KeyCode::Char('1') => state.grade(Grade::Again),
        KeyCode::Char('2') => state.grade(Grade::Good),
        KeyCode::Char('3') => state.grade(Grade::Easy),
        KeyCode::Char('r') => state.toggle_direction(),
        KeyCode::Char('?') => {
            state.show_help = !state.show_help;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cidian_lib::storage::MemoryStorage;
    use cidian_lib::vocab::models::parse_timestamp;
    use cidian_lib::vocab::{
        CardDraft, CardStore, DeckFilters, DisplayMode, ManualClock, ReviewSession, SequentialIds, SessionState,
    };

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

    fn press(state: &mut TuiState, code: KeyCode) {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_grade_requires_flip() {
        let mut store = create_store();
        let session = ReviewSession::build(&store, &DeckFilters::default(), true, DisplayMode::default());
        let mut state = TuiState::new(&mut store, session);

        press(&mut state, KeyCode::Char('2'));
        assert_eq!(state.graded, 0);
        assert!(state.flash_message.is_some());

        press(&mut state, KeyCode::Char(' '));
        press(&mut state, KeyCode::Char('2'));
        assert_eq!(state.graded, 1);
        assert_eq!(state.session.state(), SessionState::ShowingFront(1));
        assert_eq!(state.store.get("card-1").unwrap().srs.interval, 1);
    }

    #[test]
    fn test_arrows_and_quit() {
        let mut store = create_store();
        let session = ReviewSession::build(&store, &DeckFilters::default(), true, DisplayMode::default());
        let mut state = TuiState::new(&mut store, session);

        press(&mut state, KeyCode::Left);
        assert_eq!(state.session.index(), Some(1));
        press(&mut state, KeyCode::Right);
        assert_eq!(state.session.index(), Some(0));

        press(&mut state, KeyCode::Char('r'));
        assert_eq!(state.session.mode(), DisplayMode::MeaningToHanzi);

        press(&mut state, KeyCode::Char('q'));
        assert!(state.quit);
    }
}
