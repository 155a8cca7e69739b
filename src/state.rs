//! Application state shared by all handlers.

use std::sync::Arc;

use crate::db::SqliteStore;
use crate::session::SessionStore;
use crate::srs::Scheduler;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub scheduler: Arc<Scheduler<SqliteStore>>,

    /// Live study sessions keyed by session id
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(store: SqliteStore) -> Self {
        Self {
            scheduler: Arc::new(Scheduler::new(store)),
            sessions: Arc::new(SessionStore::new()),
        }
    }

    pub fn store(&self) -> &SqliteStore {
        self.scheduler.repo()
    }
}
