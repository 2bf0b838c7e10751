//! Vertical placement of day segments on the hour grid.
//!
//! Converts a clipped day segment into a pixel offset and height inside the
//! visible hour window. A minimum height keeps very short blocks clickable.

use chrono::{Duration, NaiveDateTime};

use super::segment::DaySegment;
use crate::utils::date::start_of_day;

/// Grid geometry. These are presentation constants exposed through
/// configuration, not business rules.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GridGeometry {
    /// First visible hour of each day column (0..=24).
    pub start_hour: u32,
    /// End of the visible window, exclusive (0..=24).
    pub end_hour: u32,
    /// Rendered height of one hour, in pixels.
    pub hour_height: f32,
    /// Floor applied to every block's height, in pixels.
    pub min_block_height: f32,
    /// Height of one all-day chip row, in pixels.
    pub chip_row_height: f32,
    /// Gap between the all-day header and the timed area, in pixels.
    pub chip_gap: f32,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            start_hour: 0,
            end_hour: 24,
            hour_height: 48.0,
            min_block_height: 12.0,
            chip_row_height: 20.0,
            chip_gap: 4.0,
        }
    }
}

impl GridGeometry {
    /// The visible `[start, end)` window of the given day.
    pub fn visible_window(&self, day: chrono::NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let midnight = start_of_day(day);
        (
            midnight + Duration::hours(self.start_hour as i64),
            midnight + Duration::hours(self.end_hour as i64),
        )
    }
}

/// Pixel geometry of one placed segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedBlock {
    pub top: f32,
    pub height: f32,
}

/// Place a day segment within the visible hour window.
///
/// Returns `None` when the segment falls entirely outside the window.
/// Input already clipped to the window places identically to unclipped
/// input, so callers may clip ahead of time or not at all.
pub fn place(segment: &DaySegment, geometry: &GridGeometry) -> Option<PlacedBlock> {
    let (window_start, window_end) = geometry.visible_window(segment.day);

    let clipped_start = segment.start.max(window_start);
    let clipped_end = segment.end.min(window_end);
    if clipped_end <= clipped_start {
        return None;
    }

    let minute_height = geometry.hour_height / 60.0;
    let minutes_from_start = (clipped_start - window_start).num_minutes() as f32;
    let duration_minutes = (clipped_end - clipped_start).num_minutes() as f32;

    Some(PlacedBlock {
        top: minutes_from_start * minute_height,
        height: (duration_minutes * minute_height).max(geometry.min_block_height),
    })
}
