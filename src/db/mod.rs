pub mod cards;
pub mod decks;
pub mod reviews;
pub mod schema;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection;
use std::future::Future;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{Card, Deck, ReviewLogEntry};
use crate::error::StoreError;

pub use schema::run_migrations;

pub type DbPool = Arc<Mutex<Connection>>;

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
    /// Log the error at warn level and return None
    fn log_warn(self, context: &str) -> Option<T>;
    /// Log the error at warn level and return the default
    fn log_warn_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
    fn log_warn(self, context: &str) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                None
            }
        }
    }

    fn log_warn_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                T::default()
            }
        }
    }
}

/// Fixed-width UTC timestamps so text comparison matches time order
pub fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            tracing::warn!("Unparseable timestamp {:?}: {}", s, e);
            DateTime::<Utc>::UNIX_EPOCH
        })
}

pub fn parse_opt_ts(s: Option<String>) -> Option<DateTime<Utc>> {
    s.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .log_warn("Dropping unparseable timestamp")
    })
}

/// Record store consumed by the scheduler.
///
/// `put_card` overwrites an existing card in place and reports whether it
/// still existed; `add_*` assign fresh ids.
pub trait Repository: Send + Sync {
    fn all_cards(&self) -> impl Future<Output = Result<Vec<Card>, StoreError>> + Send;
    fn all_decks(&self) -> impl Future<Output = Result<Vec<Deck>, StoreError>> + Send;
    fn all_logs(&self) -> impl Future<Output = Result<Vec<ReviewLogEntry>, StoreError>> + Send;

    fn cards_by_deck(&self, deck_id: i64) -> impl Future<Output = Result<Vec<Card>, StoreError>> + Send;
    fn logs_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<ReviewLogEntry>, StoreError>> + Send;

    fn get_card(&self, id: i64) -> impl Future<Output = Result<Option<Card>, StoreError>> + Send;
    fn add_card(&self, card: &Card) -> impl Future<Output = Result<i64, StoreError>> + Send;
    fn put_card(&self, card: &Card) -> impl Future<Output = Result<bool, StoreError>> + Send;
    fn delete_card(&self, id: i64) -> impl Future<Output = Result<bool, StoreError>> + Send;

    fn get_deck(&self, id: i64) -> impl Future<Output = Result<Option<Deck>, StoreError>> + Send;
    fn add_deck(&self, deck: &Deck) -> impl Future<Output = Result<i64, StoreError>> + Send;
    fn delete_deck(&self, id: i64) -> impl Future<Output = Result<bool, StoreError>> + Send;

    fn add_log(&self, log: &ReviewLogEntry) -> impl Future<Output = Result<i64, StoreError>> + Send;
}

/// SQLite-backed repository sharing one connection
#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }

        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        run_migrations(&conn)?;
        Ok(Self {
            pool: Arc::new(Mutex::new(conn)),
        })
    }

    /// Acquire the connection, failing if a previous holder panicked
    pub fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.pool.lock().map_err(|_: PoisonError<_>| {
            tracing::error!("Database mutex poisoned - a thread panicked while holding the lock");
            StoreError::LockPoisoned
        })
    }
}

impl Repository for SqliteStore {
    async fn all_cards(&self) -> Result<Vec<Card>, StoreError> {
        let conn = self.conn()?;
        Ok(cards::get_all_cards(&conn)?)
    }

    async fn all_decks(&self) -> Result<Vec<Deck>, StoreError> {
        let conn = self.conn()?;
        Ok(decks::get_all_decks(&conn)?)
    }

    async fn all_logs(&self) -> Result<Vec<ReviewLogEntry>, StoreError> {
        let conn = self.conn()?;
        Ok(reviews::get_all_review_logs(&conn)?)
    }

    async fn cards_by_deck(&self, deck_id: i64) -> Result<Vec<Card>, StoreError> {
        let conn = self.conn()?;
        Ok(cards::get_cards_by_deck(&conn, deck_id)?)
    }

    async fn logs_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<ReviewLogEntry>, StoreError> {
        let conn = self.conn()?;
        Ok(reviews::get_review_logs_since(&conn, cutoff)?)
    }

    async fn get_card(&self, id: i64) -> Result<Option<Card>, StoreError> {
        let conn = self.conn()?;
        Ok(cards::get_card_by_id(&conn, id)?)
    }

    async fn add_card(&self, card: &Card) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        Ok(cards::insert_card(&conn, card)?)
    }

    async fn put_card(&self, card: &Card) -> Result<bool, StoreError> {
        let conn = self.conn()?;
        Ok(cards::update_card(&conn, card)?)
    }

    async fn delete_card(&self, id: i64) -> Result<bool, StoreError> {
        let conn = self.conn()?;
        Ok(cards::delete_card(&conn, id)?)
    }

    async fn get_deck(&self, id: i64) -> Result<Option<Deck>, StoreError> {
        let conn = self.conn()?;
        Ok(decks::get_deck_by_id(&conn, id)?)
    }

    async fn add_deck(&self, deck: &Deck) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        Ok(decks::insert_deck(&conn, deck)?)
    }

    async fn delete_deck(&self, id: i64) -> Result<bool, StoreError> {
        let conn = self.conn()?;
        Ok(decks::delete_deck(&conn, id)?)
    }

    async fn add_log(&self, log: &ReviewLogEntry) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        Ok(reviews::insert_review_log(&conn, log)?)
    }
}
