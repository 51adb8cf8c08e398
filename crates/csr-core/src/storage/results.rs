//! Durable result storage.
//!
//! A string-keyed kv table holding the rounded integer score per category
//! (aptitude) and per stream (personality), plus the two completion flags
//! that gate the test flow. Score sets are flushed in a single transaction
//! together with their completion flag, so a reader either sees the full
//! set or none of it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::DatabaseError;

/// Flag set when the aptitude test has been finalized.
pub const KEY_APTITUDE_COMPLETED: &str = "aptitude_test_completed";
/// Flag set when the personality test has been finalized.
pub const KEY_PERSONALITY_COMPLETED: &str = "personality_test_completed";

/// SQLite-backed kv store for final scores (`csr_results.db`).
pub struct ResultStore {
    conn: Connection,
}

impl ResultStore {
    /// Open the store at `~/.config/csr/csr_results.db`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let path = super::data_dir()
            .map_err(|e| DatabaseError::OpenFailed {
                path: PathBuf::from("~/.config/csr"),
                source: rusqlite::Error::InvalidPath(PathBuf::from(e.to_string())),
            })?
            .join("csr_results.db");
        Self::open_at(&path)
    }

    /// Open a store at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        Ok(stmt
            .query_row(params![key], |row| row.get::<_, String>(0))
            .optional()?)
    }

    /// Integer score stored under a category or stream name.
    pub fn score(&self, name: &str) -> Result<Option<i32>, DatabaseError> {
        Ok(self.kv_get(name)?.and_then(|v| v.parse().ok()))
    }

    /// Scores for a set of names, omitting names with no stored score.
    pub fn scores(&self, names: &[String]) -> Result<BTreeMap<String, i32>, DatabaseError> {
        let mut out = BTreeMap::new();
        for name in names {
            if let Some(score) = self.score(name)? {
                out.insert(name.clone(), score);
            }
        }
        Ok(out)
    }

    pub fn aptitude_completed(&self) -> Result<bool, DatabaseError> {
        Ok(self.kv_get(KEY_APTITUDE_COMPLETED)?.as_deref() == Some("true"))
    }

    pub fn personality_completed(&self) -> Result<bool, DatabaseError> {
        Ok(self.kv_get(KEY_PERSONALITY_COMPLETED)?.as_deref() == Some("true"))
    }

    /// Persist the aptitude category scores and set the completion flag.
    ///
    /// All-or-nothing: the scores and the flag land in one transaction.
    pub fn write_aptitude_scores(
        &mut self,
        scores: &BTreeMap<String, i32>,
    ) -> Result<(), DatabaseError> {
        self.write_scores(scores, KEY_APTITUDE_COMPLETED)
    }

    /// Persist the personality stream scores and set the completion flag.
    pub fn write_personality_scores(
        &mut self,
        scores: &BTreeMap<String, i32>,
    ) -> Result<(), DatabaseError> {
        self.write_scores(scores, KEY_PERSONALITY_COMPLETED)
    }

    fn write_scores(
        &mut self,
        scores: &BTreeMap<String, i32>,
        completion_key: &str,
    ) -> Result<(), DatabaseError> {
        let tx = self.conn.transaction()?;
        for (name, score) in scores {
            tx.execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![name, score.to_string()],
            )?;
        }
        tx.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, 'true')",
            params![completion_key],
        )?;
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_default_to_false() {
        let store = ResultStore::open_memory().unwrap();
        assert!(!store.aptitude_completed().unwrap());
        assert!(!store.personality_completed().unwrap());
        assert!(store.score("logical").unwrap().is_none());
    }

    #[test]
    fn score_write_sets_flag_atomically() {
        let mut store = ResultStore::open_memory().unwrap();
        let scores = BTreeMap::from([("logical".to_string(), 15), ("verbal".to_string(), -3)]);
        store.write_aptitude_scores(&scores).unwrap();

        assert!(store.aptitude_completed().unwrap());
        assert!(!store.personality_completed().unwrap());
        assert_eq!(store.score("logical").unwrap(), Some(15));
        assert_eq!(store.score("verbal").unwrap(), Some(-3));
    }

    #[test]
    fn scores_skips_missing_names() {
        let mut store = ResultStore::open_memory().unwrap();
        store
            .write_personality_scores(&BTreeMap::from([("science".to_string(), 40)]))
            .unwrap();
        let got = store
            .scores(&["science".to_string(), "commerce".to_string()])
            .unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got["science"], 40);
    }
}
