//! Aggregate per-user study statistics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UserStats {
    pub total_study_minutes: u64,
    pub current_streak: u32,
    #[serde(default)]
    pub last_study_date: Option<NaiveDate>,
    pub total_notes: u64,
}

impl UserStats {
    /// Credit finished study time on `today`.
    ///
    /// The streak grows at most once per calendar day. Returns true when it
    /// did.
    pub fn record_study(&mut self, minutes: u64, today: NaiveDate) -> bool {
        self.total_study_minutes += minutes;
        let new_day = self.last_study_date != Some(today);
        if new_day {
            self.current_streak += 1;
        }
        self.last_study_date = Some(today);
        new_day
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn first_study_starts_streak() {
        let mut stats = UserStats::default();
        assert!(stats.record_study(25, day(1)));
        assert_eq!(stats.total_study_minutes, 25);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.last_study_date, Some(day(1)));
    }

    #[test]
    fn same_day_counts_minutes_twice_streak_once() {
        let mut stats = UserStats::default();
        stats.record_study(25, day(1));
        assert!(!stats.record_study(25, day(1)));
        assert_eq!(stats.total_study_minutes, 50);
        assert_eq!(stats.current_streak, 1);
    }

    #[test]
    fn new_day_increments_streak() {
        let mut stats = UserStats {
            total_study_minutes: 100,
            current_streak: 3,
            last_study_date: Some(day(1)),
            total_notes: 2,
        };
        assert!(stats.record_study(30, day(2)));
        assert_eq!(stats.current_streak, 4);
        assert_eq!(stats.total_study_minutes, 130);
        assert_eq!(stats.total_notes, 2);
    }
}
