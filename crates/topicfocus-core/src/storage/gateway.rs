use serde::{Deserialize, Serialize};

use crate::error::{AuthError, StorageError};
use crate::stats::UserStats;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub email: String,
}

/// Stored notes and completion state for one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TopicProgress {
    pub notes: String,
    pub completed: bool,
}

/// Payload of a `save_progress` write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub notes: String,
    pub completed: bool,
    /// Study minutes to add to the topic's running total. Zero for every
    /// save except the one that follows a finished work session.
    pub study_minutes_delta: u32,
}

/// Durable storage used by the focus surface.
///
/// Every external service the surface depends on sits behind this trait:
/// identity, per-topic progress and aggregate stats. Writes must be
/// idempotent for a given payload; the surface never retries on its own.
pub trait ProgressStore: Send + Sync {
    fn load_progress(
        &self,
        user_id: &str,
        topic_id: &str,
    ) -> Result<Option<TopicProgress>, StorageError>;

    fn save_progress(
        &self,
        user_id: &str,
        topic_id: &str,
        update: &ProgressUpdate,
    ) -> Result<(), StorageError>;

    fn load_stats(&self, user_id: &str) -> Result<Option<UserStats>, StorageError>;

    fn save_stats(&self, user_id: &str, stats: &UserStats) -> Result<(), StorageError>;

    fn current_user(&self) -> Result<UserIdentity, AuthError>;

    /// Upsert the user row. Safe to call before every write.
    fn ensure_user_record(&self, user_id: &str, email: &str) -> Result<(), StorageError>;

    /// Number of topics with non-empty notes for this user.
    fn count_notes(&self, user_id: &str) -> Result<u64, StorageError>;
}

impl<T: ProgressStore + ?Sized> ProgressStore for std::sync::Arc<T> {
    fn load_progress(
        &self,
        user_id: &str,
        topic_id: &str,
    ) -> Result<Option<TopicProgress>, StorageError> {
        (**self).load_progress(user_id, topic_id)
    }

    fn save_progress(
        &self,
        user_id: &str,
        topic_id: &str,
        update: &ProgressUpdate,
    ) -> Result<(), StorageError> {
        (**self).save_progress(user_id, topic_id, update)
    }

    fn load_stats(&self, user_id: &str) -> Result<Option<UserStats>, StorageError> {
        (**self).load_stats(user_id)
    }

    fn save_stats(&self, user_id: &str, stats: &UserStats) -> Result<(), StorageError> {
        (**self).save_stats(user_id, stats)
    }

    fn current_user(&self) -> Result<UserIdentity, AuthError> {
        (**self).current_user()
    }

    fn ensure_user_record(&self, user_id: &str, email: &str) -> Result<(), StorageError> {
        (**self).ensure_user_record(user_id, email)
    }

    fn count_notes(&self, user_id: &str) -> Result<u64, StorageError> {
        (**self).count_notes(user_id)
    }
}
