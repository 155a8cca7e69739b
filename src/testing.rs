//! Test utilities for database setup.
//!
//! Reuses the authoritative schema initialization so tests never carry
//! their own copy of the tables.

use rusqlite::Connection;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::db::SqliteStore;
use crate::error::StoreError;
use crate::state::AppState;

/// Test environment with a migrated recall.db in a temporary directory.
///
/// The directory is removed when the environment is dropped.
pub struct TestEnv {
    /// Temporary directory (kept alive for database file persistence)
    pub temp: TempDir,
    /// Direct connection to recall.db with all migrations applied
    pub conn: Connection,
}

impl TestEnv {
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let conn = Connection::open(temp.path().join("recall.db"))?;
        crate::db::schema::run_migrations(&conn)?;

        Ok(Self { temp, conn })
    }

    pub fn db_path(&self) -> PathBuf {
        self.temp.path().join("recall.db")
    }

    /// Open a second handle on the same file as a repository
    pub fn store(&self) -> Result<SqliteStore, StoreError> {
        SqliteStore::open(&self.db_path())
    }

    /// Application state backed by this environment's database
    pub fn state(&self) -> Result<AppState, StoreError> {
        Ok(AppState::new(self.store()?))
    }
}
