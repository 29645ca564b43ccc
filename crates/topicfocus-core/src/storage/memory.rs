//! In-process store.
//!
//! Backs ephemeral sessions and tests. Keeps a log of every progress write
//! and can be told to fail writes or drop the signed-in user.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::gateway::{ProgressStore, ProgressUpdate, TopicProgress, UserIdentity};
use crate::error::{AuthError, StorageError};
use crate::stats::UserStats;

#[derive(Debug, Default)]
struct Inner {
    user: Option<UserIdentity>,
    users: HashMap<String, String>,
    progress: HashMap<(String, String), TopicProgress>,
    study_minutes: HashMap<(String, String), u64>,
    stats: HashMap<String, UserStats>,
    writes: Vec<ProgressUpdate>,
    stats_writes: usize,
    fail_writes: bool,
    fail_progress_writes: bool,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with `user` already signed in.
    pub fn signed_in(id: &str, email: &str) -> Self {
        let store = Self::new();
        store.sign_in(id, email);
        store
    }

    pub fn sign_in(&self, id: &str, email: &str) {
        self.lock().user = Some(UserIdentity {
            id: id.into(),
            email: email.into(),
        });
    }

    pub fn sign_out(&self) {
        self.lock().user = None;
    }

    /// Make every subsequent write fail with `StorageError::Unavailable`.
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Make only `save_progress` fail; stats and user records still write.
    pub fn fail_progress_writes(&self, fail: bool) {
        self.lock().fail_progress_writes = fail;
    }

    pub fn seed_progress(&self, user_id: &str, topic_id: &str, progress: TopicProgress) {
        self.lock()
            .progress
            .insert((user_id.into(), topic_id.into()), progress);
    }

    pub fn seed_stats(&self, user_id: &str, stats: UserStats) {
        self.lock().stats.insert(user_id.into(), stats);
    }

    /// Every successful `save_progress` payload, oldest first.
    pub fn progress_writes(&self) -> Vec<ProgressUpdate> {
        self.lock().writes.clone()
    }

    pub fn stats_writes(&self) -> usize {
        self.lock().stats_writes
    }

    pub fn study_minutes(&self, user_id: &str, topic_id: &str) -> u64 {
        self.lock()
            .study_minutes
            .get(&(user_id.to_string(), topic_id.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn has_user_record(&self, user_id: &str) -> bool {
        self.lock().users.contains_key(user_id)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_writable(inner: &Inner) -> Result<(), StorageError> {
        if inner.fail_writes {
            Err(StorageError::Unavailable("writes disabled".into()))
        } else {
            Ok(())
        }
    }
}

impl ProgressStore for MemoryStore {
    fn load_progress(
        &self,
        user_id: &str,
        topic_id: &str,
    ) -> Result<Option<TopicProgress>, StorageError> {
        Ok(self
            .lock()
            .progress
            .get(&(user_id.to_string(), topic_id.to_string()))
            .cloned())
    }

    fn save_progress(
        &self,
        user_id: &str,
        topic_id: &str,
        update: &ProgressUpdate,
    ) -> Result<(), StorageError> {
        let mut inner = self.lock();
        Self::check_writable(&inner)?;
        if inner.fail_progress_writes {
            return Err(StorageError::QueryFailed("progress table locked".into()));
        }
        let key = (user_id.to_string(), topic_id.to_string());
        inner.progress.insert(
            key.clone(),
            TopicProgress {
                notes: update.notes.clone(),
                completed: update.completed,
            },
        );
        *inner.study_minutes.entry(key).or_default() += u64::from(update.study_minutes_delta);
        inner.writes.push(update.clone());
        Ok(())
    }

    fn load_stats(&self, user_id: &str) -> Result<Option<UserStats>, StorageError> {
        Ok(self.lock().stats.get(user_id).cloned())
    }

    fn save_stats(&self, user_id: &str, stats: &UserStats) -> Result<(), StorageError> {
        let mut inner = self.lock();
        Self::check_writable(&inner)?;
        inner.stats.insert(user_id.into(), stats.clone());
        inner.stats_writes += 1;
        Ok(())
    }

    fn current_user(&self) -> Result<UserIdentity, AuthError> {
        self.lock().user.clone().ok_or(AuthError::NotAuthenticated)
    }

    fn ensure_user_record(&self, user_id: &str, email: &str) -> Result<(), StorageError> {
        let mut inner = self.lock();
        Self::check_writable(&inner)?;
        inner.users.insert(user_id.into(), email.into());
        Ok(())
    }

    fn count_notes(&self, user_id: &str) -> Result<u64, StorageError> {
        Ok(self
            .lock()
            .progress
            .iter()
            .filter(|((user, _), p)| user == user_id && !p.notes.trim().is_empty())
            .count() as u64)
    }
}
