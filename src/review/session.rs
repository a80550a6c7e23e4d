use chrono::{DateTime, Utc};

use super::algorithm::next_review;
use super::models::{CardState, CardStates, Deck, Quality, ReviewCard, ReviewRecord, ReviewSummary};
use super::ReviewError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Front of the current card is showing
    Reviewing,
    AnswerRevealed,
    /// Every card has been rated
    Complete,
}

/// Walks a fixed list of cards: reveal, rate, move on
#[derive(Debug)]
pub struct ReviewSession {
    deck_id: String,
    cards: Vec<ReviewCard>,
    states: CardStates,
    position: usize,
    phase: Phase,
    records: Vec<ReviewRecord>,
}

impl ReviewSession {
    /// Review every card in the deck
    pub fn new(deck: Deck, states: CardStates) -> Self {
        let phase = if deck.cards.is_empty() {
            Phase::Complete
        } else {
            Phase::Reviewing
        };
        Self {
            deck_id: deck.id,
            cards: deck.cards,
            states,
            position: 0,
            phase,
            records: Vec::new(),
        }
    }

    /// Review only the cards that are due at `now` (unseen cards are due)
    pub fn due(mut deck: Deck, states: CardStates, now: DateTime<Utc>) -> Self {
        deck.cards
            .retain(|card| states.get(&card.id).map_or(true, |s| s.is_due_at(now)));
        log::debug!("Deck {}: {} card(s) due", deck.id, deck.cards.len());
        Self::new(deck, states)
    }

    pub fn deck_id(&self) -> &str {
        &self.deck_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current(&self) -> Option<&ReviewCard> {
        match self.phase {
            Phase::Complete => None,
            _ => self.cards.get(self.position),
        }
    }

    /// 1-based position and total, for progress display
    pub fn progress(&self) -> (usize, usize) {
        ((self.position + 1).min(self.cards.len()), self.cards.len())
    }

    pub fn reveal(&mut self) -> Result<&ReviewCard, ReviewError> {
        match self.phase {
            Phase::Reviewing => {
                self.phase = Phase::AnswerRevealed;
                self.cards.get(self.position).ok_or(ReviewError::SessionComplete)
            }
            Phase::AnswerRevealed => Err(ReviewError::AlreadyRevealed),
            Phase::Complete => Err(ReviewError::SessionComplete),
        }
    }

    /// Rate the revealed card and advance
    pub fn rate(&mut self, quality: Quality, now: DateTime<Utc>) -> Result<&ReviewRecord, ReviewError> {
        match self.phase {
            Phase::AnswerRevealed => {}
            Phase::Reviewing => return Err(ReviewError::NotRevealed),
            Phase::Complete => return Err(ReviewError::SessionComplete),
        }

        let card_id = self.cards[self.position].id.clone();
        let state = self
            .states
            .entry(card_id.clone())
            .or_insert_with(|| CardState::new(card_id.clone(), now));
        let schedule = next_review(state, quality, now);
        state.apply(&schedule, quality, now);

        self.records.push(ReviewRecord {
            card_id,
            quality,
            interval: schedule.interval,
            ease_factor: schedule.ease_factor,
            reviewed_at: now,
        });

        self.position += 1;
        self.phase = if self.position >= self.cards.len() {
            Phase::Complete
        } else {
            Phase::Reviewing
        };

        self.records.last().ok_or(ReviewError::SessionComplete)
    }

    pub fn records(&self) -> &[ReviewRecord] {
        &self.records
    }

    pub fn states(&self) -> &CardStates {
        &self.states
    }

    pub fn into_states(self) -> CardStates {
        self.states
    }

    pub fn summary(&self) -> ReviewSummary {
        ReviewSummary {
            total: self.cards.len(),
            reviewed: self.records.len(),
            correct: self.records.iter().filter(|r| r.quality.is_correct()).count(),
        }
    }
}
