//! Learner-wide forgetting rate over recent review history.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::config::FORGETTING_WINDOW_DAYS;
use crate::domain::ReviewLogEntry;

/// Lapse share among reviews in the trailing window
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ForgettingRate {
  pub lapses: usize,
  pub total: usize,
  /// In [0, 1]; 0 when the window is empty
  pub rate: f64,
}

/// Earliest `reviewed_at` that still counts toward the rate at `now`
pub fn window_start(now: DateTime<Utc>) -> DateTime<Utc> {
  now - Duration::days(FORGETTING_WINDOW_DAYS)
}

pub fn forgetting_rate<'a, I>(logs: I, now: DateTime<Utc>) -> ForgettingRate
where
  I: IntoIterator<Item = &'a ReviewLogEntry>,
{
  let cutoff = window_start(now);
  let (lapses, total) = logs
    .into_iter()
    .filter(|log| log.reviewed_at >= cutoff)
    .fold((0, 0), |(lapses, total), log| {
      (lapses + usize::from(log.is_lapse()), total + 1)
    });

  if total == 0 {
    return ForgettingRate::default();
  }

  ForgettingRate {
    lapses,
    total,
    rate: lapses as f64 / total as f64,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Quality;

  fn log(q: u8, reviewed_at: DateTime<Utc>) -> ReviewLogEntry {
    ReviewLogEntry {
      id: 0,
      card_id: 1,
      reviewed_at,
      quality: Quality::new(q).unwrap(),
      interval_before: 1,
      interval_after: 1,
      ease_before: 2.5,
      ease_after: 2.5,
    }
  }

  #[test]
  fn test_empty_logs_rate_zero() {
    let logs: Vec<ReviewLogEntry> = Vec::new();
    let rate = forgetting_rate(&logs, Utc::now());
    assert_eq!(rate.total, 0);
    assert_eq!(rate.rate, 0.0);
  }

  #[test]
  fn test_only_old_logs_rate_zero() {
    let now = Utc::now();
    let logs = vec![log(1, now - Duration::days(31)), log(1, now - Duration::days(90))];
    let rate = forgetting_rate(&logs, now);
    assert_eq!(rate, ForgettingRate::default());
  }

  #[test]
  fn test_rate_counts_lapses_in_window() {
    let now = Utc::now();
    let logs = vec![
      log(1, now - Duration::days(1)),
      log(2, now - Duration::days(2)),
      log(4, now - Duration::days(3)),
      log(5, now - Duration::days(29)),
      // outside the window, ignored
      log(1, now - Duration::days(45)),
    ];
    let rate = forgetting_rate(&logs, now);
    assert_eq!(rate.lapses, 2);
    assert_eq!(rate.total, 4);
    assert!((rate.rate - 0.5).abs() < 1e-9);
  }

  #[test]
  fn test_window_boundary_inclusive() {
    let now = Utc::now();
    let logs = vec![log(1, window_start(now))];
    let rate = forgetting_rate(&logs, now);
    assert_eq!(rate.total, 1);
    assert_eq!(rate.rate, 1.0);
  }
}
