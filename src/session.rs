//! Study sessions.
//!
//! A [`StudySession`] is a snapshot of the due queue consumed front to back.
//! The HTTP layer keeps sessions in a [`SessionStore`] keyed by a random id;
//! sessions expire after a period of inactivity.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::config;
use crate::domain::Card;
use crate::srs::{DueQueue, ReviewOutcome};

#[derive(Debug, Clone, Default, Serialize)]
pub struct StudySession {
  /// Cards still to review, in priority order
  queue: VecDeque<Card>,
  reviewed: u32,
  lapses: u32,
  /// Cards that vanished before they could be graded
  skipped: u32,
}

impl StudySession {
  pub fn from_queue(queue: DueQueue) -> Self {
    Self {
      queue: queue.into_cards().into(),
      ..Self::default()
    }
  }

  pub fn current(&self) -> Option<&Card> {
    self.queue.front()
  }

  pub fn remaining(&self) -> usize {
    self.queue.len()
  }

  pub fn is_finished(&self) -> bool {
    self.queue.is_empty()
  }

  pub fn reviewed(&self) -> u32 {
    self.reviewed
  }

  pub fn lapses(&self) -> u32 {
    self.lapses
  }

  pub fn skipped(&self) -> u32 {
    self.skipped
  }

  /// Count the outcome and move past the current card
  pub fn record(&mut self, outcome: &ReviewOutcome) {
    match outcome {
      ReviewOutcome::Recorded { log, .. } => {
        self.reviewed += 1;
        if log.is_lapse() {
          self.lapses += 1;
        }
      }
      ReviewOutcome::CardMissing { .. } => self.skipped += 1,
    }
    self.queue.pop_front();
  }
}

/// Shared handle to one live session. Holding its lock serializes grading.
pub type SessionHandle = Arc<tokio::sync::Mutex<StudySession>>;

/// Session entry with last access time for expiration
struct SessionEntry {
  session: SessionHandle,
  last_access: DateTime<Utc>,
}

#[derive(Default)]
pub struct SessionStore {
  sessions: Mutex<HashMap<String, SessionEntry>>,
}

impl SessionStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, SessionEntry>> {
    self.sessions.lock().unwrap_or_else(|e| e.into_inner())
  }

  /// Store a new session and return its id
  pub fn insert(&self, session: StudySession, now: DateTime<Utc>) -> String {
    let id = generate_session_id();
    let mut sessions = self.lock();
    cleanup_expired(&mut sessions, now);
    sessions.insert(
      id.clone(),
      SessionEntry {
        session: Arc::new(tokio::sync::Mutex::new(session)),
        last_access: now,
      },
    );
    id
  }

  /// Get a live session, refreshing its access time
  pub fn get(&self, id: &str, now: DateTime<Utc>) -> Option<SessionHandle> {
    let mut sessions = self.lock();
    cleanup_expired(&mut sessions, now);
    sessions.get_mut(id).map(|entry| {
      entry.last_access = now;
      Arc::clone(&entry.session)
    })
  }

  pub fn len(&self) -> usize {
    self.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

fn cleanup_expired(sessions: &mut HashMap<String, SessionEntry>, now: DateTime<Utc>) {
  let expiry = now - Duration::hours(config::SESSION_EXPIRY_HOURS);
  sessions.retain(|_, entry| entry.last_access > expiry);
}

/// Generate a new session ID
pub fn generate_session_id() -> String {
  use rand::Rng;
  let mut rng = rand::rng();
  (0..32)
    .map(|_| {
      let idx = rng.random_range(0..36u8);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}
