//! Schedule state owner and command surface.
//!
//! `ScheduleService` holds the only mutable schedule state (current anchor,
//! connection flag, fetched lists, cache) and exposes the commands the
//! outer surface wires to: navigation, refresh, suggestion accept/decline,
//! task deletion. Every command ends by recomputing the grid from current
//! state, never by patching a previous frame.
//!
//! All mutation happens on one logical thread between suspension points;
//! the only awaits are the remote calls. A fetch result is applied to the
//! visible state only when its range still matches the currently resolved
//! one; results for other ranges are still cached under their own key.

use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, Local, NaiveDate};
use std::time::Duration;

use crate::grid::{self, GridFrame, GridGeometry, ScheduleState, ViewRange};
use crate::models::task::Task;
use crate::services::remote::{ApiError, ScheduleApi, WeekData};

pub mod cache;

pub use cache::{ScheduleCache, DEFAULT_TTL};

pub struct ScheduleService<A> {
    api: A,
    state: ScheduleState,
    cache: ScheduleCache,
    geometry: GridGeometry,
}

impl<A: ScheduleApi> ScheduleService<A> {
    pub fn new(api: A, anchor: NaiveDate, geometry: GridGeometry, ttl: Duration) -> Self {
        Self {
            api,
            state: ScheduleState::new(anchor),
            cache: ScheduleCache::new(ttl),
            geometry,
        }
    }

    pub fn state(&self) -> &ScheduleState {
        &self.state
    }

    /// Recompute the grid from current state.
    pub fn render(&self) -> GridFrame {
        grid::render(&self.state, &self.geometry)
    }

    /// Initial load: read the connection flag from the profile, then pull
    /// week data and pending suggestions.
    pub async fn start(&mut self) -> Result<GridFrame> {
        match self.api.fetch_profile().await {
            Ok(profile) => {
                self.state.connected = profile.calendar_connected;
                log::info!(
                    "profile loaded, calendar {}",
                    if profile.calendar_connected { "connected" } else { "not connected" }
                );
            }
            Err(ApiError::NotConnected) => self.disconnect(),
            Err(err) => return Err(err).context("Failed to load profile"),
        }
        self.refresh(false).await?;
        if let Err(err) = self.fetch_suggestions_into_state().await {
            log::warn!("initial suggestion load failed: {err}");
        }
        Ok(self.render())
    }

    /// Move the anchor by whole weeks and reload (possibly from cache).
    pub async fn shift_weeks(&mut self, delta: i64) -> Result<GridFrame> {
        self.state.anchor += ChronoDuration::weeks(delta);
        self.refresh(false).await
    }

    /// Snap the anchor back to today and reload.
    pub async fn go_to_today(&mut self) -> Result<GridFrame> {
        self.state.anchor = Local::now().date_naive();
        self.refresh(false).await
    }

    /// Reload the current window. `force` bypasses the cache, for use after
    /// mutations that write to the remote calendar.
    pub async fn refresh(&mut self, force: bool) -> Result<GridFrame> {
        let requested = self.state.view_range();

        if !force && self.state.connected {
            if let Some(data) = self.cache.get(&requested) {
                log::debug!("cache hit for {requested:?}");
                self.apply_week_data(data);
                return Ok(self.render());
            }
        }

        match self.fetch_week(requested).await {
            Ok(data) => {
                self.state.connected = true;
                self.cache.put(requested, data.clone());
                // A navigation racing this fetch would have moved the
                // displayed range; the result then stays cache-only.
                if self.state.view_range() == requested {
                    self.apply_week_data(data);
                } else {
                    log::debug!("fetched range {requested:?} no longer displayed, cached only");
                }
            }
            Err(ApiError::NotConnected) => {
                log::info!("calendar disconnected, dropping cached data");
                self.disconnect();
            }
            Err(err) => {
                // Any other fetch failure is transient: clear the affected
                // lists for this pass; the next navigation or refresh
                // retries. Only user-initiated actions surface errors.
                log::warn!("week fetch failed, clearing lists: {err}");
                self.state.events.clear();
                self.state.busy.clear();
            }
        }

        Ok(self.render())
    }

    /// Pull the pending suggestion list.
    pub async fn load_suggestions(&mut self) -> Result<GridFrame> {
        self.fetch_suggestions_into_state().await?;
        Ok(self.render())
    }

    /// Accept a pending suggestion. On success the slot leaves the pending
    /// set and the current window is reloaded bypassing the cache, since
    /// approval writes a new block into the remote calendar. On failure
    /// nothing changes locally.
    pub async fn approve(&mut self, id: &str) -> Result<GridFrame> {
        self.api
            .approve_suggestion(id)
            .await
            .context("Failed to approve suggestion")?;
        self.state.suggestions.retain(|s| s.id != id);
        self.fetch_suggestions_into_state().await?;
        self.refresh(true).await
    }

    /// Decline a pending suggestion. Local removal only; the calendar is
    /// untouched, so the cache stays valid.
    pub async fn reject(&mut self, id: &str) -> Result<GridFrame> {
        self.api
            .reject_suggestion(id)
            .await
            .context("Failed to reject suggestion")?;
        self.state.suggestions.retain(|s| s.id != id);
        Ok(self.render())
    }

    /// Delete a task and bulk-reject its remaining pending suggestions.
    pub async fn delete_task(&mut self, task_id: &str) -> Result<GridFrame> {
        self.api
            .delete_task(task_id)
            .await
            .context("Failed to delete task")?;
        self.api
            .reject_task_suggestions(task_id)
            .await
            .context("Failed to reject task suggestions")?;
        self.state.suggestions.retain(|s| s.task_id != task_id);
        Ok(self.render())
    }

    /// Ask the backend to propose slots for a task over the coming week,
    /// then reload the pending list.
    pub async fn suggest_for_task(&mut self, task_id: &str) -> Result<GridFrame> {
        let start = crate::utils::date::start_of_day(Local::now().date_naive());
        let range = ViewRange {
            start,
            end: start + ChronoDuration::days(7),
        };
        self.api
            .suggest_slots(task_id, range)
            .await
            .context("Failed to request suggestions")?;
        self.load_suggestions().await
    }

    pub async fn load_tasks(&self) -> Result<Vec<Task>> {
        self.api.list_tasks().await.context("Failed to list tasks")
    }

    /// Connection lost: the flag flips, all cached windows are dropped and
    /// the next render shows the placeholder.
    pub fn disconnect(&mut self) {
        self.state.connected = false;
        self.cache.clear();
    }

    #[cfg(test)]
    pub(crate) fn cache_mut(&mut self) -> &mut ScheduleCache {
        &mut self.cache
    }

    async fn fetch_week(&self, range: ViewRange) -> Result<WeekData, ApiError> {
        let events = self.api.fetch_events(range).await?;
        let (busy, free) = self.api.fetch_free_busy(range).await?;
        Ok(WeekData { events, busy, free })
    }

    fn apply_week_data(&mut self, data: WeekData) {
        self.state.events = data.events;
        self.state.busy = data.busy;
    }

    async fn fetch_suggestions_into_state(&mut self) -> Result<()> {
        self.state.suggestions = self
            .api
            .fetch_suggestions()
            .await
            .context("Failed to load suggestions")?;
        Ok(())
    }
}
