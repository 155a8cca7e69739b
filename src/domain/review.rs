use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;

/// SM-2 quality of a review, 1-5. Anything below 3 is a lapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
  pub const LAPSE_BELOW: u8 = 3;

  pub fn new(value: u8) -> Result<Self, SchedulerError> {
    if (1..=5).contains(&value) {
      Ok(Self(value))
    } else {
      Err(SchedulerError::InvalidQuality(value))
    }
  }

  pub fn value(self) -> u8 {
    self.0
  }

  pub fn is_lapse(self) -> bool {
    self.0 < Self::LAPSE_BELOW
  }
}

impl TryFrom<u8> for Quality {
  type Error = SchedulerError;

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Self::new(value)
  }
}

impl From<Quality> for u8 {
  fn from(q: Quality) -> Self {
    q.0
  }
}

/// The four buttons offered to the learner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiGrade {
  Again = 1,
  Hard = 2,
  Good = 3,
  Easy = 4,
}

impl UiGrade {
  pub fn from_u8(value: u8) -> Option<Self> {
    match value {
      1 => Some(Self::Again),
      2 => Some(Self::Hard),
      3 => Some(Self::Good),
      4 => Some(Self::Easy),
      _ => None,
    }
  }

  /// UI grade to SM-2 quality: 1→1, 2→3, 3→4, 4→5.
  /// Quality 2 is never produced here.
  pub fn quality(self) -> Quality {
    match self {
      Self::Again => Quality(1),
      Self::Hard => Quality(3),
      Self::Good => Quality(4),
      Self::Easy => Quality(5),
    }
  }
}

/// Immutable record of one review event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewLogEntry {
  pub id: i64,
  pub card_id: i64,
  pub reviewed_at: DateTime<Utc>,
  pub quality: Quality,
  pub interval_before: i64,
  pub interval_after: i64,
  pub ease_before: f64,
  pub ease_after: f64,
}

impl ReviewLogEntry {
  pub fn is_lapse(&self) -> bool {
    self.quality.is_lapse()
  }
}
