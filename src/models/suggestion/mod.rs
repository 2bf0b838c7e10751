// AI slot suggestion model
// Proposed work sessions produced by the remote suggestion service

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Lifecycle of a suggested slot.
///
/// Only `Pending` suggestions are rendered on the grid or listed under a
/// task; every other status is terminal for rendering purposes. The backend
/// reports accepted slots as `approved` and declined slots as `rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    Pending,
    #[serde(alias = "approved")]
    Scheduled,
    Completed,
    #[serde(alias = "rejected")]
    Cancelled,
}

/// A proposed time slot for working on a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub id: String,
    pub task_id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: SuggestionStatus,
    pub task_name: Option<String>,
}

impl Suggestion {
    pub fn is_pending(&self) -> bool {
        self.status == SuggestionStatus::Pending
    }
}
