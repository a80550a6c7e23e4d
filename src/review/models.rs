//! Data models for spaced-repetition review

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ReviewError;

/// SM-2 recall quality, 0 (blackout) to 5 (perfect)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, ReviewError> {
        if value > Self::MAX {
            return Err(ReviewError::InvalidQuality(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// 3 and above count as a correct recall
    pub fn is_correct(self) -> bool {
        self.0 >= 3
    }
}

impl TryFrom<u8> for Quality {
    type Error = ReviewError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// A card to review: prompt on the front, answer on the back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCard {
    pub id: String,
    pub front: String,
    pub back: String,
}

/// A deck file as read by the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cards: Vec<ReviewCard>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardStatus {
    /// Never reviewed
    #[default]
    New,
    Learning,
    Review,
    /// Failed after reaching review
    Relearning,
}

/// Scheduling state for one card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardState {
    pub card_id: String,
    /// Days until the next review
    #[serde(default)]
    pub interval: u32,
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
    /// Consecutive correct recalls; reset by a failure
    #[serde(default)]
    pub repetitions: u32,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub status: CardStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
}

pub(crate) fn default_ease_factor() -> f64 {
    2.5
}

impl CardState {
    /// Fresh state, due immediately
    pub fn new(card_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            card_id: card_id.into(),
            interval: 0,
            ease_factor: default_ease_factor(),
            repetitions: 0,
            due_date: now,
            review_count: 0,
            correct_count: 0,
            status: CardStatus::New,
            last_reviewed: None,
        }
    }

    pub fn is_due_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.due_date
    }
}

pub type CardStates = HashMap<String, CardState>;

/// One rating of one card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub card_id: String,
    pub quality: Quality,
    /// Interval scheduled by this rating (days)
    pub interval: u32,
    pub ease_factor: f64,
    pub reviewed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub total: usize,
    pub reviewed: usize,
    pub correct: usize,
}
