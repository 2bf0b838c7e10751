//! Reqwest implementation of the schedule backend API.

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime, TimeZone};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use std::time::Duration;

use super::{
    ApiError, EventDto, FreeBusyDto, Profile, ScheduleApi, SuggestionDto,
};
use crate::grid::ViewRange;
use crate::models::busy::{BusyBlock, FreeWindow};
use crate::models::event::CalendarEvent;
use crate::models::suggestion::Suggestion;
use crate::models::task::Task;

pub struct HttpScheduleApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpScheduleApi {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn range_query(range: ViewRange) -> [(&'static str, String); 2] {
        [
            ("start", to_wire(range.start)),
            ("end", to_wire(range.end)),
        ]
    }

    /// Map non-success statuses onto the error taxonomy. 400/401 and
    /// "not connected" messages mean the calendar link is gone, which is a
    /// state transition rather than an error.
    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        if status == StatusCode::BAD_REQUEST
            || status == StatusCode::UNAUTHORIZED
            || message.to_lowercase().contains("not connected")
        {
            log::info!("backend reports calendar not connected ({status})");
            return Err(ApiError::NotConnected);
        }
        Err(ApiError::Status {
            code: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.request(Method::GET, path).send().await?;
        Self::check(response)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn post_ok(&self, path: &str, body: Option<serde_json::Value>) -> Result<(), ApiError> {
        let mut builder = self.request(Method::POST, path);
        if let Some(body) = body {
            builder = builder.json(&body);
        }
        let response = builder.send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

/// RFC 3339 form of a local wall-clock time for query parameters.
fn to_wire(at: NaiveDateTime) -> String {
    match Local.from_local_datetime(&at).earliest() {
        Some(local) => local.to_rfc3339(),
        // Skipped by a DST gap; the UTC reading is close enough for a
        // window boundary.
        None => at.and_utc().to_rfc3339(),
    }
}

#[async_trait]
impl ScheduleApi for HttpScheduleApi {
    async fn fetch_profile(&self) -> Result<Profile, ApiError> {
        self.get_json("/api/profile").await
    }

    async fn fetch_events(&self, range: ViewRange) -> Result<Vec<CalendarEvent>, ApiError> {
        let response = self
            .request(Method::GET, "/api/calendar/events")
            .query(&Self::range_query(range))
            .send()
            .await?;
        let dtos: Vec<EventDto> = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        dtos.into_iter().map(CalendarEvent::try_from).collect()
    }

    async fn fetch_free_busy(
        &self,
        range: ViewRange,
    ) -> Result<(Vec<BusyBlock>, Vec<FreeWindow>), ApiError> {
        let response = self
            .request(Method::GET, "/api/calendar/free-busy")
            .query(&Self::range_query(range))
            .send()
            .await?;
        let dto: FreeBusyDto = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let busy = dto
            .busy
            .into_iter()
            .map(BusyBlock::try_from)
            .collect::<Result<_, _>>()?;
        let free = dto
            .free
            .into_iter()
            .map(FreeWindow::try_from)
            .collect::<Result<_, _>>()?;
        Ok((busy, free))
    }

    async fn fetch_suggestions(&self) -> Result<Vec<Suggestion>, ApiError> {
        let dtos: Vec<SuggestionDto> = self.get_json("/api/suggestions").await?;
        dtos.into_iter().map(Suggestion::try_from).collect()
    }

    async fn suggest_slots(&self, task_id: &str, range: ViewRange) -> Result<(), ApiError> {
        let response = self
            .request(Method::POST, &format!("/api/suggestions/suggest/{task_id}"))
            .query(&Self::range_query(range))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn approve_suggestion(&self, id: &str) -> Result<(), ApiError> {
        self.post_ok(
            &format!("/api/suggestions/{id}/approve"),
            Some(serde_json::json!({ "add_to_calendar": true })),
        )
        .await
    }

    async fn reject_suggestion(&self, id: &str) -> Result<(), ApiError> {
        self.post_ok(&format!("/api/suggestions/{id}/reject"), None)
            .await
    }

    async fn reject_task_suggestions(&self, task_id: &str) -> Result<(), ApiError> {
        let response = self
            .request(Method::POST, "/api/suggestions/reject-all")
            .query(&[("task_id", task_id)])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.get_json("/api/tasks").await
    }

    async fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .request(Method::DELETE, &format!("/api/tasks/{id}"))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
