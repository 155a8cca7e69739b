//! Whole-collection JSON snapshots for manual backup and restore.
//!
//! ## Format
//! ```text
//! {
//!   "format_version": 1,
//!   "exported_at": "...",
//!   "app_version": "...",
//!   "decks": [...], "cards": [...], "logs": [...]
//! }
//! ```
//!
//! Restore replaces every table and keeps the snapshot's ids, so review logs
//! stay attached to their cards.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::{cards, decks, reviews};
use crate::domain::{Card, Deck, ReviewLogEntry};
use crate::error::{SchedulerError, StoreError};

/// Snapshot format version
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub format_version: u32,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,
    pub decks: Vec<Deck>,
    pub cards: Vec<Card>,
    pub logs: Vec<ReviewLogEntry>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Counts of restored records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RestoreSummary {
    pub decks: usize,
    pub cards: usize,
    pub logs: usize,
}

pub fn export_snapshot(conn: &Connection, now: DateTime<Utc>) -> Result<Snapshot, StoreError> {
    Ok(Snapshot {
        format_version: FORMAT_VERSION,
        exported_at: now,
        app_version: env!("CARGO_PKG_VERSION").to_string(),
        decks: decks::get_all_decks(conn)?,
        cards: cards::get_all_cards(conn)?,
        logs: reviews::get_all_review_logs(conn)?,
    })
}

/// Replace the collection with `snapshot`.
///
/// Nothing is written unless every card satisfies the scheduling invariants.
pub fn import_snapshot(conn: &Connection, snapshot: &Snapshot) -> Result<RestoreSummary, SchedulerError> {
    if snapshot.format_version != FORMAT_VERSION {
        return Err(SchedulerError::UnsupportedBackupVersion(snapshot.format_version));
    }
    for card in &snapshot.cards {
        card.validate()?;
        if !snapshot.decks.iter().any(|d| d.id == card.deck_id) {
            return Err(SchedulerError::DeckNotFound(card.deck_id));
        }
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        r#"
        DELETE FROM review_logs;
        DELETE FROM cards;
        DELETE FROM decks;
        "#,
    )?;
    for deck in &snapshot.decks {
        decks::insert_deck_with_id(&tx, deck)?;
    }
    for card in &snapshot.cards {
        cards::insert_card_with_id(&tx, card)?;
    }
    for log in &snapshot.logs {
        reviews::insert_review_log_with_id(&tx, log)?;
    }
    tx.commit()?;

    let summary = RestoreSummary {
        decks: snapshot.decks.len(),
        cards: snapshot.cards.len(),
        logs: snapshot.logs.len(),
    };
    tracing::info!(
        decks = summary.decks,
        cards = summary.cards,
        logs = summary.logs,
        "Restored snapshot exported at {}",
        snapshot.exported_at
    );
    Ok(summary)
}
