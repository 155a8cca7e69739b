//! Turns a graded review into the card's next state and a log entry.
//!
//! SM-2 supplies the base update. Two multipliers then adapt it:
//! - the learner's forgetting rate scales the new ease factor
//! - the card's retention score scales the interval of mature cards
//!
//! The first two successful repetitions keep the fixed 1 and 6 day steps.

use chrono::{DateTime, Duration, Utc};

use super::ledger::ForgettingRate;
use super::retention::card_stats;
use super::sm2::calculate_sm2;
use crate::config;
use crate::domain::{Card, Quality, ReviewLogEntry};
use crate::error::SchedulerError;

/// Next card state plus the log entry recording the transition
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedReview {
  pub card: Card,
  pub log: ReviewLogEntry,
}

pub fn ease_multiplier(forget_rate: f64) -> f64 {
  if forget_rate > config::HIGH_FORGET_RATE {
    config::EASE_DAMPING
  } else if forget_rate < config::LOW_FORGET_RATE {
    config::EASE_BOOST
  } else {
    1.0
  }
}

pub fn retention_multiplier(retention_score: f64) -> f64 {
  if retention_score < config::WEAK_RETENTION_SCORE {
    config::WEAK_RETENTION_MULTIPLIER
  } else if retention_score > config::STRONG_RETENTION_SCORE {
    config::STRONG_RETENTION_MULTIPLIER
  } else {
    1.0
  }
}

/// Compute the post-review state of `card`. The input card is not modified.
pub fn finalize_review(
  card: &Card,
  quality: Quality,
  forget_rate: &ForgettingRate,
  now: DateTime<Utc>,
) -> Result<FinalizedReview, SchedulerError> {
  card.validate()?;

  let ease_mult = ease_multiplier(forget_rate.rate);
  // Unused on the fixed-step path that new cards always take
  let retention_mult = retention_multiplier(card_stats(card, now).retention_score);

  let sm2 = calculate_sm2(card.repetitions, card.interval_days, card.ease_factor, quality);
  let ease_factor = (sm2.ease_factor * ease_mult).max(config::MIN_EASE_FACTOR);

  let raw_interval = if quality.is_lapse() {
    1
  } else if sm2.repetitions > 2 {
    (card.interval_days as f64 * ease_factor * retention_mult).round() as i64
  } else {
    sm2.interval_days
  };
  let interval_days = raw_interval.min(config::MAX_INTERVAL_DAYS);

  tracing::debug!(
    card_id = card.id,
    quality = quality.value(),
    forget_rate = forget_rate.rate,
    ease_mult,
    retention_mult,
    interval_days,
    ease_factor,
    "Finalized review"
  );

  let mut next = card.clone();
  next.repetitions = sm2.repetitions;
  next.interval_days = interval_days;
  next.ease_factor = ease_factor;
  next.last_review_at = Some(now);
  next.next_review_at = Some(now + Duration::days(interval_days));
  if !quality.is_lapse() {
    next.total_successes = Some(card.successes() + 1);
  }

  let log = ReviewLogEntry {
    id: 0,
    card_id: card.id,
    reviewed_at: now,
    quality,
    interval_before: card.interval_days,
    interval_after: interval_days,
    ease_before: card.ease_factor,
    ease_after: ease_factor,
  };

  Ok(FinalizedReview { card: next, log })
}
