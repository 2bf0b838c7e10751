//! Remote schedule backend boundary.
//!
//! `ScheduleApi` is the seam the core depends on: profile/connection
//! status, time-windowed calendar data, the suggestion lifecycle calls and
//! task deletion. `HttpScheduleApi` is the reqwest implementation against
//! the backend's REST routes.

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;

use crate::grid::ViewRange;
use crate::models::busy::{BusyBlock, FreeWindow};
use crate::models::event::CalendarEvent;
use crate::models::suggestion::{Suggestion, SuggestionStatus};
use crate::models::task::Task;

mod http;

pub use http::HttpScheduleApi;

/// Error taxonomy for remote calls.
///
/// `NotConnected` is a state transition, not a failure: the caller must
/// drop its cache and show the disconnected placeholder. Every other
/// variant is transient on the week fetch (the affected lists are cleared
/// for the current pass and the next navigation retries) and surfaces to
/// the caller on user-initiated actions.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("calendar not connected")]
    NotConnected,
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned {code}: {message}")]
    Status { code: u16, message: String },
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Connection status and profile basics, read at startup and after
/// reconnect redirects.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    pub calendar_connected: bool,
}

/// One fetched data window: everything the backend knows about a range.
#[derive(Debug, Clone, Default)]
pub struct WeekData {
    pub events: Vec<CalendarEvent>,
    pub busy: Vec<BusyBlock>,
    pub free: Vec<FreeWindow>,
}

#[async_trait]
pub trait ScheduleApi: Send + Sync {
    async fn fetch_profile(&self) -> Result<Profile, ApiError>;
    async fn fetch_events(&self, range: ViewRange) -> Result<Vec<CalendarEvent>, ApiError>;
    async fn fetch_free_busy(
        &self,
        range: ViewRange,
    ) -> Result<(Vec<BusyBlock>, Vec<FreeWindow>), ApiError>;
    async fn fetch_suggestions(&self) -> Result<Vec<Suggestion>, ApiError>;
    /// Opaque AI call: ask the backend to propose slots for a task within a
    /// range. The core only ever consumes its output via
    /// `fetch_suggestions`.
    async fn suggest_slots(&self, task_id: &str, range: ViewRange) -> Result<(), ApiError>;
    async fn approve_suggestion(&self, id: &str) -> Result<(), ApiError>;
    async fn reject_suggestion(&self, id: &str) -> Result<(), ApiError>;
    async fn reject_task_suggestions(&self, task_id: &str) -> Result<(), ApiError>;
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError>;
    async fn delete_task(&self, id: &str) -> Result<(), ApiError>;
}

// Wire DTOs. The backend returns timed instants as RFC 3339 and all-day
// boundaries as bare calendar dates; both arrive in the same field.

#[derive(Debug, Deserialize)]
pub(crate) struct EventDto {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    start: String,
    end: String,
    #[serde(default)]
    all_day: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WindowDto {
    start: String,
    end: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FreeBusyDto {
    #[serde(default)]
    busy: Vec<WindowDto>,
    #[serde(default)]
    free: Vec<WindowDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SuggestionDto {
    id: String,
    task_id: String,
    start_time: String,
    end_time: String,
    status: SuggestionStatus,
    #[serde(default)]
    task_name: Option<String>,
}

fn parse_instant(value: &str) -> Result<NaiveDateTime, ApiError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Local).naive_local())
        .map_err(|e| ApiError::Decode(format!("bad timestamp {value:?}: {e}")))
}

fn parse_all_day_date(value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| ApiError::Decode(format!("bad all-day date {value:?}: {e}")))
}

impl TryFrom<EventDto> for CalendarEvent {
    type Error = ApiError;

    fn try_from(dto: EventDto) -> Result<Self, Self::Error> {
        let title = dto.summary.unwrap_or_default();
        let mut event = if dto.all_day {
            CalendarEvent::all_day(
                title,
                parse_all_day_date(&dto.start)?,
                parse_all_day_date(&dto.end)?,
            )
        } else {
            CalendarEvent::timed(title, parse_instant(&dto.start)?, parse_instant(&dto.end)?)
                .map_err(ApiError::Decode)?
        };
        event.id = dto.id;
        Ok(event)
    }
}

impl TryFrom<WindowDto> for BusyBlock {
    type Error = ApiError;

    fn try_from(dto: WindowDto) -> Result<Self, Self::Error> {
        BusyBlock::new(parse_instant(&dto.start)?, parse_instant(&dto.end)?)
            .map_err(ApiError::Decode)
    }
}

impl TryFrom<WindowDto> for FreeWindow {
    type Error = ApiError;

    fn try_from(dto: WindowDto) -> Result<Self, Self::Error> {
        Ok(FreeWindow {
            start: parse_instant(&dto.start)?,
            end: parse_instant(&dto.end)?,
        })
    }
}

impl TryFrom<SuggestionDto> for Suggestion {
    type Error = ApiError;

    fn try_from(dto: SuggestionDto) -> Result<Self, Self::Error> {
        Ok(Suggestion {
            id: dto.id,
            task_id: dto.task_id,
            start: parse_instant(&dto.start_time)?,
            end: parse_instant(&dto.end_time)?,
            status: dto.status,
            task_name: dto.task_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::date::start_of_day;

    #[test]
    fn test_timed_event_dto_converts() {
        let dto: EventDto = serde_json::from_str(
            r#"{"id":"e1","summary":"Standup","start":"2024-03-06T09:00:00+00:00","end":"2024-03-06T09:30:00+00:00","all_day":false}"#,
        )
        .unwrap();
        let event = CalendarEvent::try_from(dto).unwrap();
        assert_eq!(event.id.as_deref(), Some("e1"));
        assert_eq!(event.title, "Standup");
        assert!(!event.all_day);
        assert_eq!(event.duration(), chrono::Duration::minutes(30));
    }

    #[test]
    fn test_all_day_event_dto_zero_span_corrected() {
        let dto: EventDto = serde_json::from_str(
            r#"{"summary":"Holiday","start":"2024-03-01","end":"2024-03-01","all_day":true}"#,
        )
        .unwrap();
        let event = CalendarEvent::try_from(dto).unwrap();
        let mar1 = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(event.all_day);
        assert_eq!(event.start, start_of_day(mar1));
        assert_eq!(event.end, start_of_day(mar1) + chrono::Duration::days(1));
    }

    #[test]
    fn test_missing_summary_defaults_to_busy() {
        let dto: EventDto = serde_json::from_str(
            r#"{"start":"2024-03-06T09:00:00Z","end":"2024-03-06T10:00:00Z"}"#,
        )
        .unwrap();
        let event = CalendarEvent::try_from(dto).unwrap();
        assert_eq!(event.title, crate::models::event::UNTITLED_EVENT);
    }

    #[test]
    fn test_garbage_timestamp_is_decode_error() {
        let dto: EventDto = serde_json::from_str(
            r#"{"summary":"X","start":"soon","end":"later","all_day":false}"#,
        )
        .unwrap();
        assert!(matches!(
            CalendarEvent::try_from(dto),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn test_suggestion_dto_converts() {
        let dto: SuggestionDto = serde_json::from_str(
            r#"{"id":"s1","task_id":"t1","start_time":"2024-03-06T12:00:00Z","end_time":"2024-03-06T12:50:00Z","status":"pending"}"#,
        )
        .unwrap();
        let suggestion = Suggestion::try_from(dto).unwrap();
        assert!(suggestion.is_pending());
        assert!(suggestion.task_name.is_none());
    }
}
