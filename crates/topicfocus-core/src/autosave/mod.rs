//! Autosave coordinator.
//!
//! Decides *when* the focus surface should write, without doing any IO or
//! owning any timer. The surface feeds it the current `(notes, completed)`
//! pair after every change and asks for the next instant it needs waking up
//! at; the coordinator answers with either the debounce deadline or the
//! moment a `saved`/`error` status should fall back to `idle`.
//!
//! ## Status Transitions
//!
//! ```text
//! Idle -> Saving -> (Saved | Error) -> (display window) -> Idle
//! ```

mod writer;

pub use writer::{record_session, refresh_stats, write_progress};

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::debug;

use crate::storage::AutosaveConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
    Error,
}

/// What caused a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveTrigger {
    Debounce,
    Manual,
    SessionComplete,
    Close,
}

/// The persisted pair the coordinator compares against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSnapshot {
    pub notes: String,
    pub completed: bool,
}

/// Result of feeding a change to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Initial load has not finished; changes are not tracked yet.
    NotLoaded,
    /// Matches the last saved state; any pending save was dropped.
    Unchanged,
    /// A save is due at this instant unless superseded.
    Scheduled(Instant),
}

#[derive(Debug, Clone)]
pub struct AutosaveCoordinator {
    config: AutosaveConfig,
    saved: Option<SaveSnapshot>,
    pending: Option<Instant>,
    status: SaveStatus,
    status_until: Option<Instant>,
}

impl AutosaveCoordinator {
    pub fn new(config: AutosaveConfig) -> Self {
        Self {
            config,
            saved: None,
            pending: None,
            status: SaveStatus::Idle,
            status_until: None,
        }
    }

    /// Seed the snapshot with what was just loaded. Changes are tracked from
    /// here on.
    pub fn mark_loaded(&mut self, loaded: SaveSnapshot) {
        self.saved = Some(loaded);
    }

    pub fn is_loaded(&self) -> bool {
        self.saved.is_some()
    }

    pub fn saved(&self) -> Option<&SaveSnapshot> {
        self.saved.as_ref()
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    pub fn pending_deadline(&self) -> Option<Instant> {
        self.pending
    }

    /// True when `current` differs from the last saved state.
    pub fn is_dirty(&self, current: &SaveSnapshot) -> bool {
        self.saved.as_ref().is_some_and(|saved| saved != current)
    }

    /// Register a change. Replaces any pending deadline; never queues a
    /// second one.
    pub fn observe(&mut self, current: &SaveSnapshot, now: Instant) -> Observation {
        if !self.is_loaded() {
            return Observation::NotLoaded;
        }
        if !self.is_dirty(current) {
            if self.pending.take().is_some() {
                debug!("change reverted to saved state, pending save dropped");
            }
            return Observation::Unchanged;
        }
        let deadline = now + self.config.debounce();
        if self.pending.replace(deadline).is_some() {
            debug!("pending save superseded");
        }
        Observation::Scheduled(deadline)
    }

    pub fn cancel_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Consume the pending deadline if it has passed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(deadline) if deadline <= now => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    pub fn begin_save(&mut self) -> SaveStatus {
        self.status = SaveStatus::Saving;
        self.status_until = None;
        self.status
    }

    /// Record the outcome of a save that wrote `written`.
    pub fn finish_save(&mut self, written: SaveSnapshot, ok: bool, now: Instant) -> SaveStatus {
        if ok {
            self.saved = Some(written);
            self.status = SaveStatus::Saved;
            self.status_until = Some(now + self.config.saved_display());
        } else {
            self.status = SaveStatus::Error;
            self.status_until = Some(now + self.config.error_display());
        }
        self.status
    }

    /// Drop a `saved`/`error` status back to idle once its window is over.
    /// Returns true if the status changed.
    pub fn expire_status(&mut self, now: Instant) -> bool {
        match self.status_until {
            Some(until) if until <= now => {
                self.status_until = None;
                self.status = SaveStatus::Idle;
                true
            }
            _ => false,
        }
    }

    /// Earliest instant at which `take_due` or `expire_status` can change
    /// anything.
    pub fn next_wakeup(&self) -> Option<Instant> {
        match (self.pending, self.status_until) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}
