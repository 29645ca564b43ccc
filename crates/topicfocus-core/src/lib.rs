//! # TopicFocus Core Library
//!
//! Core logic for a per-topic study surface: block-structured notes, a
//! work/break session timer and debounced autosave into a progress store.
//! All operations are available through the standalone `topicfocus` CLI,
//! which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Notes**: Block model, markdown codec and an editing engine with
//!   keyboard policy
//! - **Timer**: A tick-driven work/break state machine; the caller invokes
//!   `tick()` once per second
//! - **Autosave**: A sans-IO coordinator deciding when to write, plus the
//!   write path shared by every save trigger
//! - **Focus**: The surface task tying the three together behind a handle
//! - **Storage**: SQLite and in-memory progress stores, TOML configuration
//!
//! ## Key Components
//!
//! - [`FocusSurface`] / [`FocusHandle`]: one open topic
//! - [`BlockEditor`]: in-memory document editing
//! - [`SessionTimer`]: countdown state machine
//! - [`ProgressStore`]: the storage seam, implemented by [`SqliteStore`]
//!   and [`MemoryStore`]
//! - [`Config`]: application configuration management

pub mod autosave;
pub mod error;
pub mod events;
pub mod focus;
pub mod notes;
pub mod stats;
pub mod storage;
pub mod timer;

pub use autosave::{AutosaveCoordinator, SaveSnapshot, SaveStatus, SaveTrigger};
pub use error::{AuthError, ConfigError, CoreError, StorageError, ValidationError};
pub use events::{Event, NotificationLevel};
pub use focus::{CloseSummary, FocusHandle, FocusOptions, FocusSurface, FocusView};
pub use notes::{Block, BlockEditor, BlockId, BlockType, Document, Key, KeyOutcome};
pub use stats::UserStats;
pub use storage::{
    AutosaveConfig, Config, MemoryStore, ProgressStore, ProgressUpdate, SqliteStore,
    TopicProgress, UserIdentity,
};
pub use timer::{Phase, SessionTimer, TimerSnapshot};
