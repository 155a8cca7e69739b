//! Due-card selection.
//!
//! A card is due when it has never been scheduled, its review time has
//! passed, it has no successful review yet (new or lapsed), or its priority
//! crosses `DUE_PRIORITY_THRESHOLD`. Due cards are ranked by priority.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ledger::{forgetting_rate, ForgettingRate};
use super::retention::{card_stats, CardStats};
use crate::config::DUE_PRIORITY_THRESHOLD;
use crate::domain::{Card, ReviewLogEntry};

/// A due card with the stats it was ranked by
#[derive(Debug, Clone, Serialize)]
pub struct DueCard {
  pub card: Card,
  pub stats: CardStats,
}

/// Snapshot of due cards, highest priority first
#[derive(Debug, Clone, Serialize)]
pub struct DueQueue {
  pub forget_rate: ForgettingRate,
  pub entries: Vec<DueCard>,
}

impl DueQueue {
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn into_cards(self) -> Vec<Card> {
    self.entries.into_iter().map(|e| e.card).collect()
  }
}

pub fn is_due(card: &Card, stats: &CardStats, now: DateTime<Utc>) -> bool {
  match card.next_review_at {
    None => true,
    Some(next) if next <= now => true,
    _ => card.is_new() || stats.priority_score >= DUE_PRIORITY_THRESHOLD,
  }
}

pub fn due_queue(cards: Vec<Card>, logs: &[ReviewLogEntry], now: DateTime<Utc>) -> DueQueue {
  let forget_rate = forgetting_rate(logs, now);

  let mut entries: Vec<DueCard> = cards
    .into_iter()
    .filter_map(|card| {
      let stats = card_stats(&card, now);
      is_due(&card, &stats, now).then_some(DueCard { card, stats })
    })
    .collect();

  // Stable: equal priorities keep input order
  entries.sort_by(|a, b| b.stats.priority_score.total_cmp(&a.stats.priority_score));

  DueQueue {
    forget_rate,
    entries,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Quality;
  use chrono::Duration;

  fn card(id: i64) -> Card {
    let mut card = Card::new(1, format!("front {}", id), format!("back {}", id));
    card.id = id;
    card
  }

  /// A freshly reviewed card that is not due for a while
  fn settled_card(id: i64, now: DateTime<Utc>) -> Card {
    let mut c = card(id);
    c.repetitions = 6;
    c.interval_days = 60;
    c.ease_factor = 2.8;
    c.total_successes = Some(40);
    c.last_review_at = Some(now);
    c.next_review_at = Some(now + Duration::days(60));
    c
  }

  #[test]
  fn test_never_reviewed_card_always_due() {
    let now = Utc::now();
    for offset in [-365, 0, 365] {
      let queue = due_queue(vec![card(1)], &[], now + Duration::days(offset));
      assert_eq!(queue.len(), 1);
    }
  }

  #[test]
  fn test_settled_card_not_due() {
    let now = Utc::now();
    let queue = due_queue(vec![settled_card(1, now)], &[], now);
    assert!(queue.is_empty());
  }

  #[test]
  fn test_past_due_card_included() {
    let now = Utc::now();
    let mut c = settled_card(1, now - Duration::days(61));
    c.next_review_at = Some(now - Duration::hours(1));
    let queue = due_queue(vec![c], &[], now);
    assert_eq!(queue.len(), 1);
  }

  #[test]
  fn test_lapsed_card_due_before_next_review() {
    let now = Utc::now();
    let mut c = settled_card(1, now);
    c.repetitions = 0;
    c.interval_days = 1;
    c.next_review_at = Some(now + Duration::days(1));
    let queue = due_queue(vec![c], &[], now);
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.entries[0].stats.priority_score, 100.0);
  }

  #[test]
  fn test_high_priority_card_due_early() {
    let now = Utc::now();
    // Weak card: low ease, one success, long since last review
    let mut c = card(1);
    c.repetitions = 1;
    c.interval_days = 1;
    c.ease_factor = 1.3;
    c.total_successes = Some(1);
    c.last_review_at = Some(now - Duration::days(10));
    c.next_review_at = Some(now + Duration::hours(1));

    let stats = card_stats(&c, now);
    assert!(stats.priority_score >= DUE_PRIORITY_THRESHOLD);
    assert_eq!(due_queue(vec![c], &[], now).len(), 1);
  }

  #[test]
  fn test_queue_sorted_by_priority() {
    let now = Utc::now();
    let mut overdue = settled_card(2, now - Duration::days(90));
    overdue.next_review_at = Some(now - Duration::days(30));
    let mut slightly_due = settled_card(3, now - Duration::days(60));
    slightly_due.next_review_at = Some(now);

    let cards = vec![slightly_due, card(1), settled_card(4, now), overdue];
    let queue = due_queue(cards, &[], now);

    let ids: Vec<i64> = queue.entries.iter().map(|e| e.card.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    for pair in queue.entries.windows(2) {
      assert!(pair[0].stats.priority_score >= pair[1].stats.priority_score);
    }
    for entry in &queue.entries {
      assert!(is_due(&entry.card, &entry.stats, now));
    }
  }

  #[test]
  fn test_ties_keep_input_order() {
    let now = Utc::now();
    let queue = due_queue(vec![card(5), card(3), card(9)], &[], now);
    let ids: Vec<i64> = queue.into_cards().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![5, 3, 9]);
  }

  #[test]
  fn test_queue_carries_forget_rate() {
    let now = Utc::now();
    let logs = vec![ReviewLogEntry {
      id: 1,
      card_id: 1,
      reviewed_at: now - Duration::days(1),
      quality: Quality::new(1).unwrap(),
      interval_before: 6,
      interval_after: 1,
      ease_before: 2.5,
      ease_after: 1.96,
    }];
    let queue = due_queue(vec![card(1)], &logs, now);
    assert_eq!(queue.forget_rate.total, 1);
    assert_eq!(queue.forget_rate.rate, 1.0);
  }
}
