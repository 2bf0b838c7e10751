//! Per-day segmentation of time intervals.
//!
//! A multi-day interval yields one contiguous segment per calendar day it
//! touches, each clipped to that day's boundaries. Segments are ephemeral:
//! they are produced fresh on every render pass and never stored.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::utils::date::start_of_day;

/// The portion of an interval that falls on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySegment {
    pub day: NaiveDate,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DaySegment {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Split `[start, end)` into day-local segments.
///
/// Walks midnight-aligned from the interval's first day while the cursor is
/// before `end`; each day contributes `[max(start, day), min(end, day+1))`
/// when that clip is non-empty. An inverted or empty interval yields no
/// segments.
pub fn day_segments(start: NaiveDateTime, end: NaiveDateTime) -> Vec<DaySegment> {
    let mut segments = Vec::new();
    let mut cursor = start_of_day(start.date());
    while cursor < end {
        let next = cursor + Duration::days(1);
        let seg_start = start.max(cursor);
        let seg_end = end.min(next);
        if seg_end > seg_start {
            segments.push(DaySegment {
                day: cursor.date(),
                start: seg_start,
                end: seg_end,
            });
        }
        cursor = next;
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_single_day_interval_is_one_segment() {
        let segments = day_segments(at(6, 9, 0), at(6, 10, 30));
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].day, NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
        assert_eq!(segments[0].start, at(6, 9, 0));
        assert_eq!(segments[0].end, at(6, 10, 30));
    }

    #[test]
    fn test_three_day_span_yields_three_segments() {
        let segments = day_segments(at(5, 22, 0), at(7, 8, 0));
        assert_eq!(segments.len(), 3);

        assert_eq!(segments[0].start, at(5, 22, 0));
        assert_eq!(segments[0].end, at(6, 0, 0));
        assert_eq!(segments[1].start, at(6, 0, 0));
        assert_eq!(segments[1].end, at(7, 0, 0));
        assert_eq!(segments[2].start, at(7, 0, 0));
        assert_eq!(segments[2].end, at(7, 8, 0));

        // Union of segments covers the original interval exactly.
        let total: Duration = segments.iter().map(DaySegment::duration).sum();
        assert_eq!(total, at(7, 8, 0) - at(5, 22, 0));
    }

    #[test]
    fn test_segments_stay_within_their_day() {
        let segments = day_segments(at(5, 22, 0), at(8, 3, 0));
        for seg in &segments {
            assert!(seg.start >= start_of_day(seg.day));
            assert!(seg.end <= start_of_day(seg.day) + Duration::days(1));
            assert!(seg.end > seg.start);
        }
    }

    #[test]
    fn test_interval_ending_at_midnight_excludes_next_day() {
        let segments = day_segments(at(6, 20, 0), at(7, 0, 0));
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].day, NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
    }

    #[test]
    fn test_empty_interval_yields_nothing() {
        assert!(day_segments(at(6, 9, 0), at(6, 9, 0)).is_empty());
        assert!(day_segments(at(6, 9, 0), at(6, 8, 0)).is_empty());
    }

    #[test]
    fn test_all_day_week_span() {
        // Seven full days, open end.
        let segments = day_segments(at(3, 0, 0), at(10, 0, 0));
        assert_eq!(segments.len(), 7);
        for seg in &segments {
            assert_eq!(seg.duration(), Duration::days(1));
        }
    }
}
