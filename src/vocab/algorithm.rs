//! Spaced repetition scheduler
//!
//! A simplified ease/interval scheme with three grades:
//! - Again: interval resets to 0, ease drops by 0.2, due immediately
//! - Good: interval grows by the ease factor (first success: 1 day), ease +0.02 up to 2.8
//! - Easy: interval grows by ease x 1.2 (first success: 3 days), ease +0.1 up to 3.0
//!
//! The next due date is always anchored to the grading instant, not to the
//! previous due date, so a card reviewed late is scheduled from when it was
//! actually reviewed.

use chrono::{DateTime, Duration, Utc};

use super::models::{Grade, SchedulingState, VocabCard, DEFAULT_EASE, MAX_EASE, MIN_EASE};

/// Ease ceiling reachable through Good grades
const GOOD_EASE_CEILING: f64 = 2.8;
const GOOD_EASE_STEP: f64 = 0.02;
const EASY_EASE_STEP: f64 = 0.1;
const AGAIN_EASE_PENALTY: f64 = 0.2;
/// Extra growth applied on top of ease for Easy grades
const EASY_BONUS: f64 = 1.2;
const FIRST_GOOD_INTERVAL: u32 = 1;
const FIRST_EASY_INTERVAL: u32 = 3;

/// Calculate the scheduling state that results from grading at `now`
pub fn calculate_next_review(state: &SchedulingState, grade: Grade, now: DateTime<Utc>) -> SchedulingState {
    // Cards edited by hand may carry an out-of-range ease
    let current = if state.ease.is_finite() {
        state.ease.clamp(MIN_EASE, MAX_EASE)
    } else {
        DEFAULT_EASE
    };

    let (ease, interval) = match grade {
        Grade::Again => ((current - AGAIN_EASE_PENALTY).max(MIN_EASE), 0),
        Grade::Good => {
            let ease = (current + GOOD_EASE_STEP).min(GOOD_EASE_CEILING);
            let interval = match state.interval {
                0 => FIRST_GOOD_INTERVAL,
                n => scale_interval(n, ease),
            };
            (ease, interval)
        }
        Grade::Easy => {
            let ease = (current + EASY_EASE_STEP).min(MAX_EASE);
            let interval = match state.interval {
                0 => FIRST_EASY_INTERVAL,
                n => scale_interval(n, ease * EASY_BONUS),
            };
            (ease, interval)
        }
    };

    SchedulingState {
        interval,
        ease,
        due: add_days(now, interval),
        reps: state.reps.saturating_add(1),
    }
}

/// Grade a card in place, bumping its `updated_at`
pub fn apply_grade(card: &mut VocabCard, grade: Grade, now: DateTime<Utc>) {
    card.srs = calculate_next_review(&card.srs, grade, now);
    card.touch(now);
}

/// Interval each grade would produce, in `Grade::ALL` order
pub fn preview_intervals(state: &SchedulingState, now: DateTime<Utc>) -> [u32; 3] {
    Grade::ALL.map(|grade| calculate_next_review(state, grade, now).interval)
}

fn scale_interval(interval: u32, factor: f64) -> u32 {
    // f64::round rounds half away from zero; `as` saturates on overflow
    (f64::from(interval) * factor).round() as u32
}

fn add_days(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now.checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: u32) -> String {
    match days {
        0 => "now".to_string(),
        1..=6 => format!("{}d", days),
        7..=29 => format!("{}w", days / 7),
        30..=364 => format!("{}mo", days / 30),
        _ => format!("{}y", days / 365),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::models::parse_timestamp;

    fn now() -> DateTime<Utc> {
        parse_timestamp("2024-05-10T09:30:00Z").unwrap()
    }

    fn new_state() -> SchedulingState {
        SchedulingState::new(now())
    }

    #[test]
    fn test_first_good_review() {
        let result = calculate_next_review(&new_state(), Grade::Good, now());

        assert_eq!(result.interval, 1);
        assert!((result.ease - 2.52).abs() < 1e-9);
        assert_eq!(result.due, now() + Duration::days(1));
        assert_eq!(result.reps, 1);
    }

    #[test]
    fn test_first_easy_review() {
        let result = calculate_next_review(&new_state(), Grade::Easy, now());

        assert_eq!(result.interval, 3);
        assert!((result.ease - 2.6).abs() < 1e-9);
        assert_eq!(result.due, now() + Duration::days(3));
    }

    #[test]
    fn test_good_compounds_with_updated_ease() {
        let first = calculate_next_review(&new_state(), Grade::Good, now());
        let second = calculate_next_review(&first, Grade::Good, now());

        // round(1 * 2.54) = 3, not round(1 * 2.5) = 2 or the old ease
        assert!((second.ease - 2.54).abs() < 1e-9);
        assert_eq!(second.interval, 3);
    }

    #[test]
    fn test_easy_applies_bonus() {
        let mut state = new_state();
        state.interval = 10;
        state.ease = 2.5;

        let result = calculate_next_review(&state, Grade::Easy, now());

        // 10 * 2.6 * 1.2 = 31.2
        assert_eq!(result.interval, 31);
    }

    #[test]
    fn test_again_resets_interval_and_due() {
        let mut state = new_state();
        state.interval = 40;
        state.reps = 7;
        state.due = now() + Duration::days(12);

        let result = calculate_next_review(&state, Grade::Again, now());

        assert_eq!(result.interval, 0);
        assert_eq!(result.due, now());
        assert!((result.ease - 2.3).abs() < 1e-9);
        assert_eq!(result.reps, 8);
    }

    #[test]
    fn test_good_lowers_ease_above_its_ceiling() {
        let mut state = new_state();
        state.ease = 2.95;
        state.interval = 2;

        let result = calculate_next_review(&state, Grade::Good, now());

        assert!((result.ease - 2.8).abs() < 1e-9);
        assert_eq!(result.interval, 6);
    }

    #[test]
    fn test_ease_stays_within_bounds() {
        for start in [f64::NAN, 0.0, 1.0, 1.3, 1.4, DEFAULT_EASE, 2.8, 2.95, 3.0, 5.0] {
            for grade in Grade::ALL {
                let mut state = new_state();
                state.ease = start;
                state.interval = 5;
                let result = calculate_next_review(&state, grade, now());
                assert!(
                    (MIN_EASE..=MAX_EASE).contains(&result.ease),
                    "ease {} after {} from {}",
                    result.ease,
                    grade,
                    start
                );
            }
        }
    }

    #[test]
    fn test_repeated_again_floors_ease() {
        let mut state = new_state();
        for _ in 0..10 {
            state = calculate_next_review(&state, Grade::Again, now());
        }
        assert_eq!(state.ease, MIN_EASE);
        assert_eq!(state.reps, 10);
    }

    #[test]
    fn test_due_anchored_to_grading_instant() {
        let mut state = new_state();
        state.interval = 4;
        state.due = now() - Duration::days(30);

        let later = now() + Duration::days(2);
        let result = calculate_next_review(&state, Grade::Good, later);

        assert_eq!(result.due, later + Duration::days(i64::from(result.interval)));
    }

    #[test]
    fn test_huge_interval_saturates() {
        let mut state = new_state();
        state.interval = u32::MAX;

        let result = calculate_next_review(&state, Grade::Easy, now());

        assert_eq!(result.interval, u32::MAX);
        assert_eq!(result.due, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_apply_grade_touches_card() {
        let created = now() - Duration::days(3);
        let mut card = VocabCard::new("a".into(), "学习".into(), "to study".into(), created);

        apply_grade(&mut card, Grade::Good, now());

        assert_eq!(card.updated_at, now());
        assert_eq!(card.created_at, created);
        assert_eq!(card.srs.interval, 1);
    }

    #[test]
    fn test_preview_intervals() {
        let mut state = new_state();
        assert_eq!(preview_intervals(&state, now()), [0, 1, 3]);

        state.interval = 10;
        assert_eq!(preview_intervals(&state, now()), [0, 25, 31]);
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(0), "now");
        assert_eq!(format_interval(1), "1d");
        assert_eq!(format_interval(5), "5d");
        assert_eq!(format_interval(7), "1w");
        assert_eq!(format_interval(14), "2w");
        assert_eq!(format_interval(30), "1mo");
        assert_eq!(format_interval(90), "3mo");
        assert_eq!(format_interval(365), "1y");
        assert_eq!(format_interval(730), "2y");
    }
}
