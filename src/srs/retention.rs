//! Per-card retention estimate and review priority.
//!
//! Retention decays exponentially with the time since the last review, using
//! `interval × ease` as the memory strength. The priority score blends:
//! - forget risk (weight 0.5)
//! - weakness of the success history (weight 0.3)
//! - difficulty, as inverse ease (weight 0.1)
//! - how long the card is overdue, log-scaled (weight 0.1)

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{MIN_MEMORY_STRENGTH, NEW_CARD_PRIORITY};
use crate::domain::Card;

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardStats {
  pub retention_probability: f64,
  pub forget_risk: f64,
  /// 0-100, grows with successes and ease
  pub retention_score: f64,
  /// Roughly [0, 1] for scheduled cards; `NEW_CARD_PRIORITY` for new ones
  pub priority_score: f64,
}

impl CardStats {
  const NEW_CARD: Self = Self {
    retention_probability: 0.0,
    forget_risk: 1.0,
    retention_score: 0.0,
    priority_score: NEW_CARD_PRIORITY,
  };
}

/// Fractional days from `from` to `to`; negative if `to` is earlier
fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
  (to - from).num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY
}

pub fn retention_score(card: &Card) -> f64 {
  let successes = card.successes().max(0) as f64;
  ((1.0 + successes).log2() * card.ease_factor * 10.0).min(100.0)
}

pub fn card_stats(card: &Card, now: DateTime<Utc>) -> CardStats {
  if card.is_new() {
    return CardStats::NEW_CARD;
  }

  // No anchor means "just reviewed"; a review stamped in the future counts as now
  let elapsed = card
    .last_review_at
    .map(|last| days_between(last, now).max(0.0))
    .unwrap_or(0.0);
  let strength = (card.interval_days as f64 * card.ease_factor).max(MIN_MEMORY_STRENGTH);
  let retention_probability = (-elapsed / strength).exp();
  let forget_risk = 1.0 - retention_probability;

  let retention_score = retention_score(card);

  let overdue_days = card
    .next_review_at
    .map(|next| days_between(next, now).max(0.0))
    .unwrap_or(0.0);

  let priority_score = 0.5 * forget_risk
    + 0.3 * (1.0 - retention_score / 100.0)
    + 0.1 * (1.0 / card.ease_factor)
    + 0.1 * (1.0 + overdue_days).log10();

  CardStats {
    retention_probability,
    forget_risk,
    retention_score,
    priority_score,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;

  fn scheduled_card(n: i64, interval: i64, ef: f64, successes: i64) -> Card {
    let mut card = Card::new(1, "front".into(), "back".into());
    card.repetitions = n;
    card.interval_days = interval;
    card.ease_factor = ef;
    card.total_successes = Some(successes);
    card
  }

  #[test]
  fn test_new_card_sentinel() {
    let now = Utc::now();
    let mut card = Card::new(1, "a".into(), "b".into());
    card.interval_days = 30;
    card.ease_factor = 3.0;
    card.last_review_at = Some(now - Duration::days(400));
    card.next_review_at = Some(now + Duration::days(10));
    card.total_successes = Some(12);

    let stats = card_stats(&card, now);
    assert_eq!(stats.priority_score, 100.0);
    assert_eq!(stats.retention_probability, 0.0);
    assert_eq!(stats.forget_risk, 1.0);
  }

  #[test]
  fn test_missing_last_review_means_full_retention() {
    let now = Utc::now();
    let card = scheduled_card(2, 6, 2.5, 2);
    let stats = card_stats(&card, now);
    assert_eq!(stats.retention_probability, 1.0);
    assert_eq!(stats.forget_risk, 0.0);
  }

  #[test]
  fn test_future_last_review_clamps_to_full_retention() {
    let now = Utc::now();
    let mut card = scheduled_card(3, 10, 2.0, 3);
    card.last_review_at = Some(now + Duration::hours(5));

    let stats = card_stats(&card, now);
    assert_eq!(stats.retention_probability, 1.0);
    assert_eq!(stats.forget_risk, 0.0);
  }

  #[test]
  fn test_retention_decays_with_strength() {
    let now = Utc::now();
    let mut card = scheduled_card(3, 10, 2.0, 3);
    card.last_review_at = Some(now - Duration::days(20));

    let stats = card_stats(&card, now);
    // t = 20, S = 20 → e^-1
    assert!((stats.retention_probability - (-1.0f64).exp()).abs() < 1e-9);
    assert!((stats.forget_risk - (1.0 - (-1.0f64).exp())).abs() < 1e-9);
  }

  #[test]
  fn test_strength_floor_avoids_division_by_zero() {
    let now = Utc::now();
    let mut card = scheduled_card(1, 0, 2.5, 1);
    card.last_review_at = Some(now - Duration::days(1));

    let stats = card_stats(&card, now);
    assert!(stats.retention_probability.is_finite());
    // t = 1, S = 0.1 → e^-10
    assert!((stats.retention_probability - (-10.0f64).exp()).abs() < 1e-12);
  }

  #[test]
  fn test_retention_score_formula_and_cap() {
    // log2(4) * 2.5 * 10 = 50
    let card = scheduled_card(3, 15, 2.5, 3);
    assert!((retention_score(&card) - 50.0).abs() < 1e-9);

    let card = scheduled_card(3, 15, 2.5, 1000);
    assert_eq!(retention_score(&card), 100.0);
  }

  #[test]
  fn test_retention_score_uses_repetitions_for_legacy_cards() {
    let mut card = scheduled_card(3, 15, 2.5, 0);
    card.total_successes = None;
    assert!((retention_score(&card) - 50.0).abs() < 1e-9);
  }

  #[test]
  fn test_priority_composite() {
    let now = Utc::now();
    let mut card = scheduled_card(3, 15, 2.5, 3);
    card.last_review_at = Some(now);
    card.next_review_at = Some(now - Duration::days(9));

    let stats = card_stats(&card, now);
    // forget risk 0, retention score 50, 1/EF = 0.4, log10(10) = 1
    let expected = 0.0 + 0.3 * 0.5 + 0.1 * 0.4 + 0.1 * 1.0;
    assert!((stats.priority_score - expected).abs() < 1e-9);
  }

  #[test]
  fn test_not_yet_due_has_no_overdue_term() {
    let now = Utc::now();
    let mut card = scheduled_card(3, 15, 2.5, 3);
    card.last_review_at = Some(now);
    card.next_review_at = Some(now + Duration::days(15));

    let stats = card_stats(&card, now);
    let expected = 0.3 * 0.5 + 0.1 * 0.4;
    assert!((stats.priority_score - expected).abs() < 1e-9);
  }

  #[test]
  fn test_overdue_card_outranks_fresh_card() {
    let now = Utc::now();
    let mut fresh = scheduled_card(4, 20, 2.5, 4);
    fresh.last_review_at = Some(now - Duration::days(1));
    fresh.next_review_at = Some(now + Duration::days(19));

    let mut overdue = fresh.clone();
    overdue.last_review_at = Some(now - Duration::days(60));
    overdue.next_review_at = Some(now - Duration::days(40));

    assert!(card_stats(&overdue, now).priority_score > card_stats(&fresh, now).priority_score);
  }
}
