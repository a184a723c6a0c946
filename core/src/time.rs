use std::fmt;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Number of in-game days elapsed since the game started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameClock {
    elapsed_days: u64,
}

impl GameClock {
    pub fn new() -> Self {
        Self { elapsed_days: 0 }
    }

    pub fn elapsed_days(&self) -> u64 {
        self.elapsed_days
    }

    pub fn advance_day(&mut self) -> u64 {
        self.elapsed_days = self.elapsed_days.saturating_add(1);
        self.elapsed_days
    }
}

/// A day on the game calendar. Serializes as an ISO date (`2024-07-01`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Default opening day of a new game: 1 July 2024, the start of a season.
    pub fn from_start() -> Self {
        Self(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap_or(NaiveDate::MIN))
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    /// The following day, or `None` at the end of the representable calendar.
    pub fn next_day(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    pub fn plus_days(&self, days: u64) -> Option<Self> {
        self.0.checked_add_days(Days::new(days)).map(Self)
    }

    pub fn is_first_of_month(&self) -> bool {
        self.0.day() == 1
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Friday and Saturday carry the weekend fixtures.
    pub fn is_match_day(&self) -> bool {
        matches!(self.weekday(), Weekday::Fri | Weekday::Sat)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }
}

impl Default for CalendarDate {
    fn default() -> Self {
        Self::from_start()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_day_rolls_over_month_and_leap_february() {
        let jan_end = CalendarDate::new(2024, 1, 31).unwrap();
        let feb_first = jan_end.next_day().unwrap();
        assert_eq!(feb_first, CalendarDate::new(2024, 2, 1).unwrap());
        assert!(feb_first.is_first_of_month());

        let leap = CalendarDate::new(2024, 2, 28).unwrap().next_day().unwrap();
        assert_eq!(leap.day(), 29);
    }

    #[test]
    fn friday_and_saturday_are_match_days() {
        // 2024-03-01 is a Friday.
        let friday = CalendarDate::new(2024, 3, 1).unwrap();
        let saturday = friday.next_day().unwrap();
        let sunday = saturday.next_day().unwrap();
        assert!(friday.is_match_day());
        assert!(saturday.is_match_day());
        assert!(!sunday.is_match_day());
    }

    #[test]
    fn end_of_calendar_has_no_next_day() {
        let last = CalendarDate::from_naive(NaiveDate::MAX);
        assert!(last.next_day().is_none());
    }

    #[test]
    fn clock_counts_days() {
        let mut clock = GameClock::new();
        clock.advance_day();
        assert_eq!(clock.advance_day(), 2);
        assert_eq!(clock.elapsed_days(), 2);
    }
}
