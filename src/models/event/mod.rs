// Calendar event model
// Normalized form of the heterogeneous shapes the remote calendar returns

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::utils::date::start_of_day;

/// Title used when the remote calendar returns an event without a summary.
pub const UNTITLED_EVENT: &str = "Busy";

/// A calendar event, either timed (instants) or all-day (whole calendar days).
///
/// All-day events follow the open-range convention: `end` is the midnight
/// *after* the last occupied day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub id: Option<String>,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub all_day: bool,
}

impl CalendarEvent {
    /// Create a timed event.
    ///
    /// # Examples
    /// ```
    /// use skedule::models::event::CalendarEvent;
    /// use chrono::NaiveDate;
    ///
    /// let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    /// let event = CalendarEvent::timed(
    ///     "Team Meeting",
    ///     day.and_hms_opt(9, 0, 0).unwrap(),
    ///     day.and_hms_opt(10, 0, 0).unwrap(),
    /// )
    /// .unwrap();
    /// assert!(!event.all_day);
    /// ```
    pub fn timed(
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, String> {
        let event = Self {
            id: None,
            title: non_empty_title(title.into()),
            start,
            end,
            all_day: false,
        };
        event.validate()?;
        Ok(event)
    }

    /// Create an all-day event from calendar dates.
    ///
    /// An end date equal to or before the start date is corrected to
    /// `start + 1 day`, so a degenerate span still occupies exactly one day.
    pub fn all_day(
        title: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        let start = start_of_day(start_date);
        let mut end = start_of_day(end_date);
        if end <= start {
            end = start + Duration::days(1);
        }
        Self {
            id: None,
            title: non_empty_title(title.into()),
            start,
            end,
            all_day: true,
        }
    }

    /// Validate the event span.
    pub fn validate(&self) -> Result<(), String> {
        if self.end <= self.start {
            return Err("Event end time must be after start time".to_string());
        }
        Ok(())
    }

    /// Get the duration of the event.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

fn non_empty_title(title: String) -> String {
    if title.trim().is_empty() {
        UNTITLED_EVENT.to_string()
    } else {
        title
    }
}
