//! SQLite-backed progress store.
//!
//! Provides persistent storage for:
//! - Users and the locally signed-in identity
//! - Per-topic notes, completion flag and accumulated study minutes
//! - Aggregate user statistics

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::gateway::{ProgressStore, ProgressUpdate, TopicProgress, UserIdentity};
use super::migrations;
use crate::error::{AuthError, StorageError};
use crate::stats::UserStats;

const CURRENT_USER_KEY: &str = "current_user";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Row of `topic_progress`, as listed by `progress show`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub topic_id: String,
    pub notes: String,
    pub completed: bool,
    pub study_minutes: u64,
    pub updated_at: String,
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (and migrate) the database file at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|e| StorageError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Sign in locally as `email`, reusing the existing user id for that
    /// address or minting a new one.
    pub fn sign_in(&self, email: &str) -> Result<UserIdentity, StorageError> {
        let conn = self.conn();
        let existing: Option<String> = conn
            .query_row(
                "SELECT id FROM users WHERE email = ?1",
                params![email],
                |row| row.get(0),
            )
            .optional()?;
        let identity = UserIdentity {
            id: existing.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            email: email.to_string(),
        };
        let json = serde_json::to_string(&identity)
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        kv_set(&conn, CURRENT_USER_KEY, &json)?;
        Ok(identity)
    }

    pub fn sign_out(&self) -> Result<(), StorageError> {
        self.conn()
            .execute("DELETE FROM kv WHERE key = ?1", params![CURRENT_USER_KEY])?;
        Ok(())
    }

    /// All topics with stored progress for a user, most recently updated first.
    pub fn list_progress(&self, user_id: &str) -> Result<Vec<ProgressRecord>, StorageError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT topic_id, notes, completed, study_minutes, updated_at
             FROM topic_progress
             WHERE user_id = ?1
             ORDER BY updated_at DESC",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok(ProgressRecord {
                topic_id: row.get(0)?,
                notes: row.get(1)?,
                completed: row.get(2)?,
                study_minutes: row.get(3)?,
                updated_at: row.get(4)?,
            })
        })?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    pub fn study_minutes(&self, user_id: &str, topic_id: &str) -> Result<u64, StorageError> {
        let minutes = self
            .conn()
            .query_row(
                "SELECT study_minutes FROM topic_progress WHERE user_id = ?1 AND topic_id = ?2",
                params![user_id, topic_id],
                |row| row.get::<_, u64>(0),
            )
            .optional()?;
        Ok(minutes.unwrap_or(0))
    }
}

impl ProgressStore for SqliteStore {
    fn load_progress(
        &self,
        user_id: &str,
        topic_id: &str,
    ) -> Result<Option<TopicProgress>, StorageError> {
        let progress = self
            .conn()
            .query_row(
                "SELECT notes, completed FROM topic_progress
                 WHERE user_id = ?1 AND topic_id = ?2",
                params![user_id, topic_id],
                |row| {
                    Ok(TopicProgress {
                        notes: row.get(0)?,
                        completed: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(progress)
    }

    fn save_progress(
        &self,
        user_id: &str,
        topic_id: &str,
        update: &ProgressUpdate,
    ) -> Result<(), StorageError> {
        self.conn().execute(
            "INSERT INTO topic_progress (user_id, topic_id, notes, completed, study_minutes, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(user_id, topic_id) DO UPDATE SET
                notes = excluded.notes,
                completed = excluded.completed,
                study_minutes = topic_progress.study_minutes + excluded.study_minutes,
                updated_at = excluded.updated_at",
            params![
                user_id,
                topic_id,
                update.notes,
                update.completed,
                update.study_minutes_delta,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn load_stats(&self, user_id: &str) -> Result<Option<UserStats>, StorageError> {
        let row = self
            .conn()
            .query_row(
                "SELECT total_study_minutes, current_streak, last_study_date, total_notes
                 FROM user_stats WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok((
                        row.get::<_, u64>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, u64>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((total_study_minutes, current_streak, last, total_notes)) = row else {
            return Ok(None);
        };
        let last_study_date = last
            .map(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT))
            .transpose()
            .map_err(|e| StorageError::QueryFailed(format!("bad last_study_date: {e}")))?;

        Ok(Some(UserStats {
            total_study_minutes,
            current_streak,
            last_study_date,
            total_notes,
        }))
    }

    fn save_stats(&self, user_id: &str, stats: &UserStats) -> Result<(), StorageError> {
        self.conn().execute(
            "INSERT INTO user_stats
                (user_id, total_study_minutes, current_streak, last_study_date, total_notes, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(user_id) DO UPDATE SET
                total_study_minutes = excluded.total_study_minutes,
                current_streak = excluded.current_streak,
                last_study_date = excluded.last_study_date,
                total_notes = excluded.total_notes,
                updated_at = excluded.updated_at",
            params![
                user_id,
                stats.total_study_minutes,
                stats.current_streak,
                stats
                    .last_study_date
                    .map(|d| d.format(DATE_FORMAT).to_string()),
                stats.total_notes,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn current_user(&self) -> Result<UserIdentity, AuthError> {
        let conn = self.conn();
        let json = kv_get(&conn, CURRENT_USER_KEY)
            .map_err(|e| AuthError::Lookup(e.to_string()))?
            .ok_or(AuthError::NotAuthenticated)?;
        serde_json::from_str(&json).map_err(|e| AuthError::Lookup(e.to_string()))
    }

    fn ensure_user_record(&self, user_id: &str, email: &str) -> Result<(), StorageError> {
        self.conn().execute(
            "INSERT INTO users (id, email, created_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET email = excluded.email",
            params![user_id, email, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn count_notes(&self, user_id: &str) -> Result<u64, StorageError> {
        let count = self.conn().query_row(
            "SELECT COUNT(*) FROM topic_progress WHERE user_id = ?1 AND TRIM(notes) != ''",
            params![user_id],
            |row| row.get::<_, u64>(0),
        )?;
        Ok(count)
    }
}

fn kv_get(conn: &Connection, key: &str) -> Result<Option<String>, rusqlite::Error> {
    conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
        row.get::<_, String>(0)
    })
    .optional()
}

fn kv_set(conn: &Connection, key: &str, value: &str) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}
