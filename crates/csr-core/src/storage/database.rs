//! SQLite-backed question bank.
//!
//! The database ships pre-seeded with the app: streams, jobs, aptitude
//! questions and personality questions. Nothing in the test flows writes
//! to it -- the insert helpers exist for the seeding tool and for tests.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::DatabaseError;
use crate::question::{AptitudeQuestion, Job, PersonalityQuestion, QuestionKind, Stream};

/// Narrow repository interface the test sessions are built against.
///
/// `QuestionDb` is the production implementation; tests substitute an
/// in-memory bank seeded through the same schema.
pub trait QuestionBank {
    fn all_streams(&self) -> Result<Vec<Stream>, DatabaseError>;
    fn all_categories(&self) -> Result<Vec<String>, DatabaseError>;
    /// All aptitude questions, grouped by category in a stable order.
    fn aptitude_questions(&self) -> Result<Vec<AptitudeQuestion>, DatabaseError>;
    fn aptitude_questions_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<AptitudeQuestion>, DatabaseError>;
    /// The full personality pool of one stream. Random per-stream sampling
    /// happens in the personality module so it can be seeded in tests.
    fn personality_questions_by_stream(
        &self,
        stream: &str,
    ) -> Result<Vec<PersonalityQuestion>, DatabaseError>;
}

/// SQLite question bank (`csr_data.db`).
pub struct QuestionDb {
    conn: Connection,
}

impl QuestionDb {
    /// Open the pre-seeded bank at `~/.config/csr/csr_data.db`.
    ///
    /// Creates the schema if the file is new (the `seed` tool populates it).
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let path = super::data_dir()
            .map_err(|e| DatabaseError::OpenFailed {
                path: PathBuf::from("~/.config/csr"),
                source: rusqlite::Error::InvalidPath(PathBuf::from(e.to_string())),
            })?
            .join("csr_data.db");
        Self::open_at(&path)
    }

    /// Open a bank at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory bank (for tests and scripted seeding).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS stream (
                    id          TEXT PRIMARY KEY,
                    title       TEXT NOT NULL,
                    description TEXT NOT NULL DEFAULT ''
                );

                CREATE TABLE IF NOT EXISTS job (
                    id          INTEGER PRIMARY KEY AUTOINCREMENT,
                    title       TEXT NOT NULL,
                    description TEXT NOT NULL,
                    stream      TEXT NOT NULL REFERENCES stream(id)
                );

                CREATE TABLE IF NOT EXISTS aptitude_question (
                    id              INTEGER PRIMARY KEY AUTOINCREMENT,
                    category        TEXT NOT NULL,
                    text            TEXT NOT NULL,
                    option1         TEXT NOT NULL,
                    option2         TEXT NOT NULL,
                    option3         TEXT NOT NULL,
                    option4         TEXT NOT NULL,
                    correct_option  INTEGER NOT NULL CHECK (correct_option BETWEEN 1 AND 4),
                    reference_image TEXT
                );

                CREATE TABLE IF NOT EXISTS personality_question (
                    id     INTEGER PRIMARY KEY AUTOINCREMENT,
                    stream TEXT NOT NULL REFERENCES stream(id),
                    kind   TEXT NOT NULL CHECK (kind IN ('textual', 'slider')),
                    text   TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_aptitude_category ON aptitude_question(category);
                CREATE INDEX IF NOT EXISTS idx_personality_stream ON personality_question(stream);
                CREATE INDEX IF NOT EXISTS idx_job_stream ON job(stream);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    // ── Seeding helpers ──────────────────────────────────────────────

    pub fn insert_stream(&self, stream: &Stream) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO stream (id, title, description) VALUES (?1, ?2, ?3)",
            params![stream.id, stream.title, stream.description],
        )?;
        Ok(())
    }

    pub fn insert_job(&self, title: &str, description: &str, stream: &str) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO job (title, description, stream) VALUES (?1, ?2, ?3)",
            params![title, description, stream],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn insert_aptitude_question(&self, q: &AptitudeQuestion) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO aptitude_question
                (category, text, option1, option2, option3, option4, correct_option, reference_image)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                q.category,
                q.text,
                q.options[0],
                q.options[1],
                q.options[2],
                q.options[3],
                q.correct_option,
                q.reference_image,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn insert_personality_question(
        &self,
        q: &PersonalityQuestion,
    ) -> Result<i64, DatabaseError> {
        let kind = match q.kind {
            QuestionKind::Textual => "textual",
            QuestionKind::Slider => "slider",
        };
        self.conn.execute(
            "INSERT INTO personality_question (stream, kind, text) VALUES (?1, ?2, ?3)",
            params![q.stream, kind, q.text],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    // ── Job queries ──────────────────────────────────────────────────

    pub fn jobs_by_stream(&self, stream: &str) -> Result<Vec<Job>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, stream FROM job WHERE stream = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![stream], job_from_row)?;
        collect(rows)
    }

    pub fn job_by_id(&self, id: i64) -> Result<Option<Job>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, description, stream FROM job WHERE id = ?1")?;
        Ok(stmt.query_row(params![id], job_from_row).optional()?)
    }

    pub fn all_jobs(&self) -> Result<Vec<Job>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, description, stream FROM job ORDER BY id")?;
        let rows = stmt.query_map([], job_from_row)?;
        collect(rows)
    }
}

impl QuestionBank for QuestionDb {
    fn all_streams(&self) -> Result<Vec<Stream>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, description FROM stream ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Stream {
                id: row.get(0)?,
                title: row.get(1)?,
                description: row.get(2)?,
            })
        })?;
        collect(rows)
    }

    fn all_categories(&self) -> Result<Vec<String>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT category FROM aptitude_question ORDER BY category")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        collect(rows)
    }

    fn aptitude_questions(&self) -> Result<Vec<AptitudeQuestion>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, category, text, option1, option2, option3, option4,
                    correct_option, reference_image
             FROM aptitude_question ORDER BY category, id",
        )?;
        let rows = stmt.query_map([], aptitude_from_row)?;
        collect(rows)
    }

    fn aptitude_questions_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<AptitudeQuestion>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, category, text, option1, option2, option3, option4,
                    correct_option, reference_image
             FROM aptitude_question WHERE category = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![category], aptitude_from_row)?;
        collect(rows)
    }

    fn personality_questions_by_stream(
        &self,
        stream: &str,
    ) -> Result<Vec<PersonalityQuestion>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, stream, kind, text FROM personality_question
             WHERE stream = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![stream], |row| {
            let kind: String = row.get(2)?;
            Ok(PersonalityQuestion {
                id: row.get(0)?,
                stream: row.get(1)?,
                // The CHECK constraint limits the column to these two values.
                kind: if kind == "textual" {
                    QuestionKind::Textual
                } else {
                    QuestionKind::Slider
                },
                text: row.get(3)?,
            })
        })?;
        collect(rows)
    }
}

fn job_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Job> {
    Ok(Job {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        stream: row.get(3)?,
    })
}

fn aptitude_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AptitudeQuestion> {
    Ok(AptitudeQuestion {
        id: row.get(0)?,
        category: row.get(1)?,
        text: row.get(2)?,
        options: [row.get(3)?, row.get(4)?, row.get(5)?, row.get(6)?],
        correct_option: row.get(7)?,
        reference_image: row.get(8)?,
    })
}

fn collect<T>(
    rows: impl Iterator<Item = rusqlite::Result<T>>,
) -> Result<Vec<T>, DatabaseError> {
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
