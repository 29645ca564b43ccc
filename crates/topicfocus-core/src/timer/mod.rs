mod session;

pub use session::{Phase, SessionTimer, TimerSnapshot, MAX_PHASE_MINUTES, MIN_PHASE_MINUTES};
