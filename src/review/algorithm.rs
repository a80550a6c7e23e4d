//! SM-2 scheduling
//!
//! Quality ratings (0-5):
//! - 0: Complete blackout
//! - 1: Wrong, but the answer was recognized
//! - 2: Wrong, but the answer seemed easy once shown
//! - 3: Correct with serious difficulty
//! - 4: Correct after hesitation
//! - 5: Perfect recall
//!
//! A correct recall grows the interval 1 day, then 6 days, then by the ease
//! factor. A failure sends the card back to a 1 day interval.

use chrono::{DateTime, Duration, Utc};

use super::models::{CardState, CardStatus, Quality};

/// Ease factor never drops below this
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Longest interval handed out, about a hundred years
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Penalty applied to the ease factor on a failed recall
const FAILURE_PENALTY: f64 = 0.2;

/// Outcome of rating a card
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub interval: u32,
    pub ease_factor: f64,
    pub repetitions: u32,
    pub due_date: DateTime<Utc>,
    pub status: CardStatus,
}

pub fn next_review(state: &CardState, quality: Quality, now: DateTime<Utc>) -> Schedule {
    let (interval, ease_factor, repetitions, status) = if quality.is_correct() {
        let interval = match state.repetitions {
            0 => 1,
            1 => 6,
            _ => {
                let grown = (f64::from(state.interval) * state.ease_factor).round();
                grown.min(f64::from(MAX_INTERVAL_DAYS)) as u32
            }
        };
        let status = if state.repetitions == 0 {
            CardStatus::Learning
        } else {
            CardStatus::Review
        };
        (interval, adjust_ease(state.ease_factor, quality), state.repetitions + 1, status)
    } else {
        let status = match state.status {
            CardStatus::Review | CardStatus::Relearning => CardStatus::Relearning,
            CardStatus::New | CardStatus::Learning => CardStatus::Learning,
        };
        let ease_factor = (state.ease_factor - FAILURE_PENALTY).max(MIN_EASE_FACTOR);
        (1, ease_factor, 0, status)
    };

    Schedule {
        interval,
        ease_factor,
        repetitions,
        due_date: due_after(now, interval),
        status,
    }
}

/// `now` plus `interval` days, pinned to chrono's last instant on overflow
fn due_after(now: DateTime<Utc>, interval: u32) -> DateTime<Utc> {
    let interval = interval.min(MAX_INTERVAL_DAYS);
    now.checked_add_signed(Duration::days(i64::from(interval)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)), floored
fn adjust_ease(ease_factor: f64, quality: Quality) -> f64 {
    let miss = f64::from(Quality::MAX - quality.value());
    (ease_factor + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASE_FACTOR)
}

impl CardState {
    /// Fold a schedule and its rating into this state
    pub fn apply(&mut self, schedule: &Schedule, quality: Quality, now: DateTime<Utc>) {
        self.interval = schedule.interval;
        self.ease_factor = schedule.ease_factor;
        self.repetitions = schedule.repetitions;
        self.due_date = schedule.due_date;
        self.status = schedule.status;
        self.review_count += 1;
        if quality.is_correct() {
            self.correct_count += 1;
        }
        self.last_reviewed = Some(now);
    }
}

/// Short label for an interval ("1d", "3w", "2mo")
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
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap()
    }

    fn q(value: u8) -> Quality {
        Quality::new(value).unwrap()
    }

    #[test]
    fn test_first_correct_is_one_day() {
        let state = CardState::new("c1", now());
        let schedule = next_review(&state, q(4), now());

        assert_eq!(schedule.interval, 1);
        assert_eq!(schedule.repetitions, 1);
        assert_eq!(schedule.status, CardStatus::Learning);
        assert_eq!(schedule.due_date, now() + Duration::days(1));
        // q=4 leaves the ease factor unchanged
        assert!((schedule.ease_factor - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_second_correct_is_six_days() {
        let mut state = CardState::new("c1", now());
        state.repetitions = 1;
        state.interval = 1;

        let schedule = next_review(&state, q(5), now());
        assert_eq!(schedule.interval, 6);
        assert_eq!(schedule.status, CardStatus::Review);
        assert!((schedule.ease_factor - 2.6).abs() < 1e-9);
    }

    #[test]
    fn test_later_intervals_scale_by_ease() {
        let mut state = CardState::new("c1", now());
        state.repetitions = 2;
        state.interval = 6;
        state.ease_factor = 2.5;

        let schedule = next_review(&state, q(3), now());
        assert_eq!(schedule.interval, 15);
        assert_eq!(schedule.repetitions, 3);
        assert!((schedule.ease_factor - 2.36).abs() < 1e-9);
    }

    #[test]
    fn test_failure_resets() {
        let mut state = CardState::new("c1", now());
        state.repetitions = 4;
        state.interval = 40;
        state.status = CardStatus::Review;

        let schedule = next_review(&state, q(1), now());
        assert_eq!(schedule.interval, 1);
        assert_eq!(schedule.repetitions, 0);
        assert_eq!(schedule.status, CardStatus::Relearning);
        assert!((schedule.ease_factor - 2.3).abs() < 1e-9);
    }

    #[test]
    fn test_ease_floor() {
        let mut state = CardState::new("c1", now());
        state.ease_factor = 1.35;

        assert_eq!(next_review(&state, q(0), now()).ease_factor, MIN_EASE_FACTOR);
        assert_eq!(next_review(&state, q(3), now()).ease_factor, MIN_EASE_FACTOR);
    }

    #[test]
    fn test_apply_counts_reviews() {
        let mut state = CardState::new("c1", now());
        let schedule = next_review(&state, q(4), now());
        state.apply(&schedule, q(4), now());
        let schedule = next_review(&state, q(2), now());
        state.apply(&schedule, q(2), now());

        assert_eq!(state.review_count, 2);
        assert_eq!(state.correct_count, 1);
        assert_eq!(state.status, CardStatus::Learning);
        assert_eq!(state.last_reviewed, Some(now()));
    }

    #[test]
    fn test_long_streak_stays_capped() {
        let mut state = CardState::new("c1", now());
        let mut reviewed_at = now();
        for _ in 0..30 {
            let schedule = next_review(&state, q(5), reviewed_at);
            state.apply(&schedule, q(5), reviewed_at);
            reviewed_at = state.due_date;
        }

        assert_eq!(state.interval, MAX_INTERVAL_DAYS);
        assert_eq!(state.repetitions, 30);
        assert!(state.due_date > now());
    }

    #[test]
    fn test_due_date_saturates_near_chrono_max() {
        let late = DateTime::<Utc>::MAX_UTC - Duration::days(10);
        let mut state = CardState::new("c1", late);
        state.repetitions = 5;
        state.interval = MAX_INTERVAL_DAYS;

        let schedule = next_review(&state, q(5), late);
        assert_eq!(schedule.interval, MAX_INTERVAL_DAYS);
        assert_eq!(schedule.due_date, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(0), "now");
        assert_eq!(format_interval(6), "6d");
        assert_eq!(format_interval(14), "2w");
        assert_eq!(format_interval(90), "3mo");
        assert_eq!(format_interval(800), "2y");
    }
}
