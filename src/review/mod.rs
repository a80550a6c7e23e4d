//! Spaced-repetition review
//!
//! - SM-2 scheduling with an injected clock
//! - A review session over a fixed list of cards
//! - Card states persisted per deck in local storage

pub mod algorithm;
mod models;
mod session;
mod store;

use thiserror::Error;

pub use models::{CardState, CardStates, CardStatus, Deck, Quality, ReviewCard, ReviewRecord, ReviewSummary};
pub use session::{Phase, ReviewSession};
pub use store::{load_states, save_states};

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Quality must be between 0 and 5, got {0}")]
    InvalidQuality(u8),

    #[error("Reveal the answer before rating")]
    NotRevealed,

    #[error("Answer is already revealed")]
    AlreadyRevealed,

    #[error("Review session is complete")]
    SessionComplete,
}
