use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::autosave::{SaveStatus, SaveTrigger};
use crate::timer::Phase;

/// Every observable state change of a focus surface produces an Event.
/// The CLI prints them as JSON lines; tests assert on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SurfaceOpened {
        topic_id: String,
        user_id: String,
        blocks: usize,
        completed: bool,
        at: DateTime<Utc>,
    },
    TimerStarted {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    TimerTick {
        phase: Phase,
        remaining_secs: u64,
    },
    /// A work phase ran to zero. `minutes` is credited as study time.
    WorkSessionCompleted {
        minutes: u32,
        completed_sessions: u32,
        accumulated_study_minutes: u64,
        at: DateTime<Utc>,
    },
    BreakCompleted {
        at: DateTime<Utc>,
    },
    SaveStatusChanged {
        status: SaveStatus,
        at: DateTime<Utc>,
    },
    Saved {
        trigger: SaveTrigger,
        at: DateTime<Utc>,
    },
    /// User-facing message, e.g. a failed save.
    Notification {
        level: NotificationLevel,
        message: String,
        at: DateTime<Utc>,
    },
    Closed {
        flushed: bool,
        at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Error,
}

impl Event {
    pub fn notify(level: NotificationLevel, message: impl Into<String>) -> Self {
        Event::Notification {
            level,
            message: message.into(),
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_value(Event::TimerTick {
            phase: Phase::Work,
            remaining_secs: 59,
        })
        .unwrap();
        assert_eq!(json["type"], "TimerTick");
        assert_eq!(json["phase"], "work");

        let json = serde_json::to_value(Event::Saved {
            trigger: SaveTrigger::SessionComplete,
            at: Utc::now(),
        })
        .unwrap();
        assert_eq!(json["trigger"], "session_complete");
    }
}
