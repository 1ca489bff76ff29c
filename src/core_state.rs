//! Shared application state handed to every request.
//!
//! Holds no open connection: each request opens its own through
//! `open_db()` and drops it when done.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use crate::config::{BillingRules, ServerConfig};
use crate::db;

pub struct CoreState {
    db_path: PathBuf,
    pub rules: BillingRules,
}

impl CoreState {
    pub fn new(db_path: impl Into<PathBuf>, rules: BillingRules) -> Self {
        Self {
            db_path: db_path.into(),
            rules,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.db_path.clone(), config.rules)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a fresh connection to the billing database, migrating if needed.
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        db::open_database(&self.db_path).map_err(CoreError::Database)
    }

    /// Server-local calendar date used for service-date checks.
    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_db_creates_and_migrates() {
        let dir = tempfile::tempdir().unwrap();
        let state = CoreState::new(dir.path().join("nested").join("cpss.db"), BillingRules::default());

        let conn = state.open_db().unwrap();
        assert_eq!(db::count_tables(&conn).unwrap(), 6);
        assert!(state.db_path().exists());
    }

    #[test]
    fn each_call_is_a_separate_connection() {
        let dir = tempfile::tempdir().unwrap();
        let state = CoreState::new(dir.path().join("cpss.db"), BillingRules::default());

        let first = state.open_db().unwrap();
        db::insert_consumer(&first, "Carl", "Client", true).unwrap();
        drop(first);

        let second = state.open_db().unwrap();
        let count: i64 = second
            .query_row("SELECT COUNT(*) FROM consumer", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn unopenable_path_is_a_database_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let state = CoreState::new(blocker.join("cpss.db"), BillingRules::default());
        assert!(matches!(state.open_db(), Err(CoreError::Database(_))));
    }
}
