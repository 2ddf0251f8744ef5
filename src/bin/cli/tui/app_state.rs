use cidian_lib::vocab::{CardStore, Grade, ReviewSession};

/// State of the review screen
pub struct TuiState<'a> {
    pub store: &'a mut CardStore,
    pub session: ReviewSession,

    /// Cards graded since the screen opened
    pub graded: usize,
    pub flash_message: Option<String>,

    pub show_help: bool,
    pub quit: bool,
}

impl<'a> TuiState<'a> {
    pub fn new(store: &'a mut CardStore, session: ReviewSession) -> Self {
        Self {
            store,
            session,
            graded: 0,
            flash_message: None,
            show_help: false,
            quit: false,
        }
    }

    /// Grade the current card; grading is only offered once the answer is shown
    pub fn grade(&mut self, grade: Grade) {
        if !self.session.is_showing_back() {
            self.flash_message = Some("Flip the card before grading (Space)".to_string());
            return;
        }

        match self.session.grade(self.store, grade) {
            Ok(Some(card)) => {
                self.graded += 1;
                self.flash_message = Some(format!(
                    "{} \u{2192} {} (next in {})",
                    card.hanzi,
                    grade,
                    cidian_lib::vocab::algorithm::format_interval(card.srs.interval)
                ));
            }
            Ok(None) => {
                self.flash_message = Some("Card no longer exists".to_string());
            }
            Err(e) => {
                self.flash_message = Some(format!("Failed to save: {}", e));
            }
        }
    }

    pub fn toggle_direction(&mut self) {
        self.session.set_mode(self.session.mode().reversed());
    }
}
