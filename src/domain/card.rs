use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::SchedulerError;

/// A named collection of cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
  pub id: i64,
  pub name: String,
  pub created_at: DateTime<Utc>,
}

impl Deck {
  pub fn new(name: String) -> Self {
    Self {
      id: 0,
      name,
      created_at: Utc::now(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
  pub id: i64,
  pub deck_id: i64,
  pub front: String,
  pub back: String,
  /// Opaque image references, never read by the scheduler
  #[serde(default)]
  pub front_image: Option<String>,
  #[serde(default)]
  pub back_image: Option<String>,

  // SM-2 state
  pub repetitions: i64,
  pub interval_days: i64,
  pub ease_factor: f64,
  /// None = never scheduled
  #[serde(default)]
  pub next_review_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub last_review_at: Option<DateTime<Utc>>,

  /// Reviews graded >= 3. Missing on cards restored from older snapshots.
  #[serde(default)]
  pub total_successes: Option<i64>,
}

impl Card {
  pub fn new(deck_id: i64, front: String, back: String) -> Self {
    Self {
      id: 0,
      deck_id,
      front,
      back,
      front_image: None,
      back_image: None,
      repetitions: 0,
      interval_days: 0,
      ease_factor: config::DEFAULT_EASE_FACTOR,
      next_review_at: None,
      last_review_at: None,
      total_successes: Some(0),
    }
  }

  /// True until the first successful review, and again after every lapse
  pub fn is_new(&self) -> bool {
    self.repetitions == 0
  }

  /// Success count, falling back to the repetition count for legacy cards
  pub fn successes(&self) -> i64 {
    self.total_successes.unwrap_or(self.repetitions)
  }

  /// Check the scheduling invariants before the card is scheduled again.
  pub fn validate(&self) -> Result<(), SchedulerError> {
    let reason = if !self.ease_factor.is_finite() || self.ease_factor < config::MIN_EASE_FACTOR {
      Some(format!("ease factor {} below floor {}", self.ease_factor, config::MIN_EASE_FACTOR))
    } else if self.interval_days < 0 {
      Some(format!("negative interval {}", self.interval_days))
    } else if self.repetitions < 0 {
      Some(format!("negative repetition count {}", self.repetitions))
    } else if self.total_successes.is_some_and(|s| s < 0) {
      Some("negative success count".to_string())
    } else if self.last_review_at.is_some() && self.interval_days < 1 {
      Some("reviewed card with interval below one day".to_string())
    } else {
      None
    };

    match reason {
      Some(reason) => Err(SchedulerError::InvalidCard { id: self.id, reason }),
      None => Ok(()),
    }
  }
}
