//! View range resolution.
//!
//! Maps a navigation anchor date and a granularity to a half-open,
//! midnight-aligned wall-clock interval. Weeks start on Sunday.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::utils::date::{start_of_day, week_start};

/// How wide a view window is.
///
/// The service only drives `Week`; `Day` remains for single-day windows
/// such as ad-hoc range queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Day,
    Week,
}

/// A half-open `[start, end)` window, always midnight-aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ViewRange {
    /// Resolve the window containing `anchor`.
    ///
    /// Week windows run from the Sunday on or before the anchor to the
    /// following Sunday, exactly 7 days. Day windows cover the anchor's
    /// calendar day.
    pub fn resolve(anchor: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Day => {
                let start = start_of_day(anchor);
                Self {
                    start,
                    end: start + Duration::days(1),
                }
            }
            Granularity::Week => {
                let start = start_of_day(week_start(anchor, 0));
                Self {
                    start,
                    end: start + Duration::days(7),
                }
            }
        }
    }

    /// Number of whole days the window spans.
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Iterate the calendar days inside the window.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let first = self.start.date();
        (0..self.day_count()).map(move |offset| first + Duration::days(offset))
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_resolves_to_preceding_sunday() {
        // Wednesday, March 6, 2024
        let range = ViewRange::resolve(date(2024, 3, 6), Granularity::Week);
        assert_eq!(range.start, start_of_day(date(2024, 3, 3)));
        assert_eq!(range.end, start_of_day(date(2024, 3, 10)));
        assert_eq!(range.day_count(), 7);
    }

    #[test_case(date(2024, 3, 3); "anchor on sunday")]
    #[test_case(date(2024, 3, 6); "anchor midweek")]
    #[test_case(date(2024, 3, 9); "anchor on saturday")]
    fn test_week_is_seven_days_and_contains_anchor(anchor: NaiveDate) {
        let range = ViewRange::resolve(anchor, Granularity::Week);
        assert_eq!(range.day_count(), 7);
        assert!(range.contains(start_of_day(anchor)));
    }

    #[test]
    fn test_day_granularity_covers_one_day() {
        let range = ViewRange::resolve(date(2024, 3, 6), Granularity::Day);
        assert_eq!(range.start, start_of_day(date(2024, 3, 6)));
        assert_eq!(range.day_count(), 1);
    }

    #[test]
    fn test_days_iterator_matches_span() {
        let range = ViewRange::resolve(date(2024, 3, 6), Granularity::Week);
        let days: Vec<NaiveDate> = range.days().collect();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], date(2024, 3, 3));
        assert_eq!(days[6], date(2024, 3, 9));
    }

    #[test]
    fn test_half_open_end_excluded() {
        let range = ViewRange::resolve(date(2024, 3, 6), Granularity::Week);
        assert!(!range.contains(range.end));
        assert!(range.contains(range.start));
    }
}
