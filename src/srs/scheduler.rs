//! Scheduler service over a [`Repository`].
//!
//! Reads a fresh snapshot for every call. A review writes the card first and
//! then appends its log entry; losing the second write only loses history.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Mutex;

use super::due_set::{due_queue, DueQueue};
use super::finalizer::{finalize_review, FinalizedReview};
use super::ledger::{forgetting_rate, window_start, ForgettingRate};
use crate::db::Repository;
use crate::domain::{Card, Quality, ReviewLogEntry, UiGrade};
use crate::error::SchedulerError;
use crate::session::StudySession;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReviewOutcome {
  Recorded { card: Card, log: ReviewLogEntry },
  /// The card was deleted before the review could be saved
  CardMissing { card_id: i64 },
}

pub struct Scheduler<R> {
  repo: R,
  in_flight: Mutex<HashSet<i64>>,
}

/// Marks a card as under review until dropped
struct InFlight<'a> {
  set: &'a Mutex<HashSet<i64>>,
  card_id: i64,
}

impl Drop for InFlight<'_> {
  fn drop(&mut self) {
    let mut set = self.set.lock().unwrap_or_else(|e| e.into_inner());
    set.remove(&self.card_id);
  }
}

impl<R: Repository> Scheduler<R> {
  pub fn new(repo: R) -> Self {
    Self {
      repo,
      in_flight: Mutex::new(HashSet::new()),
    }
  }

  pub fn repo(&self) -> &R {
    &self.repo
  }

  fn begin_review(&self, card_id: i64) -> Result<InFlight<'_>, SchedulerError> {
    let mut set = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
    if !set.insert(card_id) {
      return Err(SchedulerError::ReviewInFlight(card_id));
    }
    Ok(InFlight {
      set: &self.in_flight,
      card_id,
    })
  }

  pub async fn forgetting_rate(&self, now: DateTime<Utc>) -> Result<ForgettingRate, SchedulerError> {
    let logs = self.repo.logs_since(window_start(now)).await?;
    Ok(forgetting_rate(&logs, now))
  }

  pub async fn due_queue(&self, now: DateTime<Utc>) -> Result<DueQueue, SchedulerError> {
    let cards = self.repo.all_cards().await?;
    let logs = self.repo.logs_since(window_start(now)).await?;
    let queue = due_queue(cards, &logs, now);
    tracing::debug!(
      due = queue.len(),
      forget_rate = queue.forget_rate.rate,
      "Built due queue"
    );
    Ok(queue)
  }

  /// Grade a card with one of the four UI buttons (1-4)
  pub async fn submit_review(
    &self,
    card_id: i64,
    grade: u8,
    now: DateTime<Utc>,
  ) -> Result<ReviewOutcome, SchedulerError> {
    let grade = UiGrade::from_u8(grade).ok_or(SchedulerError::InvalidGrade(grade))?;
    self.submit_quality(card_id, grade.quality(), now).await
  }

  /// Grade a card with a raw SM-2 quality
  pub async fn submit_quality(
    &self,
    card_id: i64,
    quality: Quality,
    now: DateTime<Utc>,
  ) -> Result<ReviewOutcome, SchedulerError> {
    let _in_flight = self.begin_review(card_id)?;

    let Some(card) = self.repo.get_card(card_id).await? else {
      tracing::warn!(card_id, "Skipping review of missing card");
      return Ok(ReviewOutcome::CardMissing { card_id });
    };

    let forget_rate = self.forgetting_rate(now).await?;
    let FinalizedReview { card, mut log } = finalize_review(&card, quality, &forget_rate, now)?;

    if !self.repo.put_card(&card).await? {
      tracing::warn!(card_id, "Card deleted during review, dropping result");
      return Ok(ReviewOutcome::CardMissing { card_id });
    }
    log.id = self.repo.add_log(&log).await?;

    Ok(ReviewOutcome::Recorded { card, log })
  }

  pub async fn start_session(&self, now: DateTime<Utc>) -> Result<StudySession, SchedulerError> {
    Ok(StudySession::from_queue(self.due_queue(now).await?))
  }

  /// Grade the session's current card and advance past it.
  ///
  /// Returns None when the session has no cards left. On error the session
  /// is left on the same card.
  pub async fn grade_current(
    &self,
    session: &mut StudySession,
    grade: u8,
    now: DateTime<Utc>,
  ) -> Result<Option<ReviewOutcome>, SchedulerError> {
    let Some(card_id) = session.current().map(|c| c.id) else {
      return Ok(None);
    };
    let outcome = self.submit_review(card_id, grade, now).await?;
    session.record(&outcome);
    Ok(Some(outcome))
  }
}
