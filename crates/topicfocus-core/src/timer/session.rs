//! Work/break session timer.
//!
//! A countdown state machine with no internal thread. The owner calls
//! `tick()` once per second while the timer is running; the focus surface
//! does this from a `tokio::time::Interval` that only exists while running.
//!
//! ## State Transitions
//!
//! ```text
//! Work(running) --0s--> Break(stopped) --start--> Break(running) --0s--> Work(stopped)
//! ```
//!
//! Every finished work phase yields `Event::WorkSessionCompleted`, which the
//! surface persists immediately.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::events::Event;

pub const MIN_PHASE_MINUTES: u32 = 1;
pub const MAX_PHASE_MINUTES: u32 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

/// Read-only view of the timer for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub remaining_secs: u64,
    pub running: bool,
    pub work_minutes: u32,
    pub break_minutes: u32,
    pub accumulated_study_minutes: u64,
    pub completed_sessions: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTimer {
    phase: Phase,
    remaining_secs: u64,
    running: bool,
    work_minutes: u32,
    break_minutes: u32,
    accumulated_study_minutes: u64,
    completed_sessions: u32,
}

impl SessionTimer {
    /// Fresh timer: work phase, stopped, full work duration remaining.
    pub fn new(work_minutes: u32, break_minutes: u32) -> Result<Self, ValidationError> {
        validate_minutes("work_minutes", work_minutes)?;
        validate_minutes("break_minutes", break_minutes)?;
        Ok(Self {
            phase: Phase::Work,
            remaining_secs: minutes_to_secs(work_minutes),
            running: false,
            work_minutes,
            break_minutes,
            accumulated_study_minutes: 0,
            completed_sessions: 0,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn accumulated_study_minutes(&self) -> u64 {
        self.accumulated_study_minutes
    }

    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            running: self.running,
            work_minutes: self.work_minutes,
            break_minutes: self.break_minutes,
            accumulated_study_minutes: self.accumulated_study_minutes,
            completed_sessions: self.completed_sessions,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        Some(Event::TimerStarted {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(Event::TimerPaused {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.phase = Phase::Work;
        self.running = false;
        self.remaining_secs = minutes_to_secs(self.work_minutes);
        Some(Event::TimerReset { at: Utc::now() })
    }

    /// Change phase lengths. Only the current phase's countdown is re-based.
    ///
    /// Refused while running.
    pub fn set_durations(
        &mut self,
        work_minutes: u32,
        break_minutes: u32,
    ) -> Result<(), ValidationError> {
        if self.running {
            return Err(ValidationError::TimerRunning);
        }
        validate_minutes("work_minutes", work_minutes)?;
        validate_minutes("break_minutes", break_minutes)?;
        self.work_minutes = work_minutes;
        self.break_minutes = break_minutes;
        self.remaining_secs = match self.phase {
            Phase::Work => minutes_to_secs(work_minutes),
            Phase::Break => minutes_to_secs(break_minutes),
        };
        Ok(())
    }

    /// Advance one second. Returns the completion event when a phase ends.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }

        self.running = false;
        match self.phase {
            Phase::Work => {
                let minutes = self.work_minutes;
                self.accumulated_study_minutes += u64::from(minutes);
                self.completed_sessions += 1;
                self.phase = Phase::Break;
                self.remaining_secs = minutes_to_secs(self.break_minutes);
                Some(Event::WorkSessionCompleted {
                    minutes,
                    completed_sessions: self.completed_sessions,
                    accumulated_study_minutes: self.accumulated_study_minutes,
                    at: Utc::now(),
                })
            }
            Phase::Break => {
                self.phase = Phase::Work;
                self.remaining_secs = minutes_to_secs(self.work_minutes);
                Some(Event::BreakCompleted { at: Utc::now() })
            }
        }
    }
}

fn minutes_to_secs(minutes: u32) -> u64 {
    u64::from(minutes) * 60
}

fn validate_minutes(field: &str, minutes: u32) -> Result<(), ValidationError> {
    if (MIN_PHASE_MINUTES..=MAX_PHASE_MINUTES).contains(&minutes) {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.into(),
            message: format!(
                "must be between {MIN_PHASE_MINUTES} and {MAX_PHASE_MINUTES} minutes, got {minutes}"
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_out(timer: &mut SessionTimer) -> Option<Event> {
        let secs = timer.remaining_secs();
        let mut last = None;
        for _ in 0..secs {
            last = timer.tick();
        }
        last
    }

    #[test]
    fn start_pause_keeps_remaining() {
        let mut timer = SessionTimer::new(25, 5).unwrap();
        assert!(timer.start().is_some());
        assert!(timer.start().is_none());
        timer.tick();
        timer.tick();
        assert!(timer.pause().is_some());
        assert_eq!(timer.remaining_secs(), 25 * 60 - 2);
        assert!(timer.tick().is_none());
        assert_eq!(timer.remaining_secs(), 25 * 60 - 2);
    }

    #[test]
    fn work_completion_moves_to_break() {
        let mut timer = SessionTimer::new(25, 5).unwrap();
        timer.start();
        match run_out(&mut timer) {
            Some(Event::WorkSessionCompleted {
                minutes,
                completed_sessions,
                ..
            }) => {
                assert_eq!(minutes, 25);
                assert_eq!(completed_sessions, 1);
            }
            other => panic!("expected work completion, got {other:?}"),
        }
        assert_eq!(timer.accumulated_study_minutes(), 25);
        assert_eq!(timer.completed_sessions(), 1);
        assert_eq!(timer.phase(), Phase::Break);
        assert_eq!(timer.remaining_secs(), 5 * 60);
        assert!(!timer.is_running());
    }

    #[test]
    fn break_completion_returns_to_work_without_study_time() {
        let mut timer = SessionTimer::new(1, 2).unwrap();
        timer.start();
        run_out(&mut timer);
        timer.start();
        assert!(matches!(
            run_out(&mut timer),
            Some(Event::BreakCompleted { .. })
        ));
        assert_eq!(timer.phase(), Phase::Work);
        assert_eq!(timer.remaining_secs(), 60);
        assert_eq!(timer.accumulated_study_minutes(), 1);
        assert!(!timer.is_running());
    }

    #[test]
    fn reset_forces_work_phase() {
        let mut timer = SessionTimer::new(1, 5).unwrap();
        timer.start();
        run_out(&mut timer);
        assert_eq!(timer.phase(), Phase::Break);
        timer.reset();
        assert_eq!(timer.phase(), Phase::Work);
        assert_eq!(timer.remaining_secs(), 60);
        assert!(!timer.is_running());
        // Accumulated time is not rolled back.
        assert_eq!(timer.accumulated_study_minutes(), 1);
    }

    #[test]
    fn set_durations_rebases_current_phase_only() {
        let mut timer = SessionTimer::new(1, 5).unwrap();
        timer.start();
        run_out(&mut timer);
        timer.set_durations(50, 10).unwrap();
        assert_eq!(timer.phase(), Phase::Break);
        assert_eq!(timer.remaining_secs(), 10 * 60);
        timer.reset();
        assert_eq!(timer.remaining_secs(), 50 * 60);
    }

    #[test]
    fn set_durations_refused_while_running() {
        let mut timer = SessionTimer::new(25, 5).unwrap();
        timer.start();
        assert_eq!(
            timer.set_durations(30, 5),
            Err(ValidationError::TimerRunning)
        );
        assert_eq!(timer.snapshot().work_minutes, 25);
    }

    #[test]
    fn durations_out_of_range_are_rejected() {
        assert!(SessionTimer::new(0, 5).is_err());
        assert!(SessionTimer::new(25, 181).is_err());
        let mut timer = SessionTimer::new(25, 5).unwrap();
        assert!(timer.set_durations(0, 5).is_err());
        assert_eq!(timer.remaining_secs(), 25 * 60);
    }
}
