//! Lane stacking for all-day chips.
//!
//! All-day entries on the same day stack into ordinal lanes so they never
//! cover each other; the day column then reserves header space for the
//! stack, pushing its timed blocks down. Allocation runs before timed
//! placement on every render pass and is rebuilt from scratch each time.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::placement::GridGeometry;

/// Per-render allocator of all-day chip lanes.
#[derive(Debug, Default)]
pub struct AllDayLanes {
    chips: HashMap<NaiveDate, Vec<String>>,
}

impl AllDayLanes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chip to `day`'s stack and return its lane index.
    pub fn allocate(&mut self, day: NaiveDate, title: impl Into<String>) -> usize {
        let lanes = self.chips.entry(day).or_default();
        lanes.push(title.into());
        lanes.len() - 1
    }

    /// Number of lanes occupied on `day`.
    pub fn lane_count(&self, day: NaiveDate) -> usize {
        self.chips.get(&day).map_or(0, Vec::len)
    }

    /// Chip titles on `day`, in lane order.
    pub fn chips(&self, day: NaiveDate) -> &[String] {
        self.chips.get(&day).map_or(&[], Vec::as_slice)
    }

    /// Header space the day column reserves above its timed area.
    ///
    /// Zero when the day has no chips; otherwise one chip row per lane plus
    /// the configured gap.
    pub fn header_height(&self, day: NaiveDate, geometry: &GridGeometry) -> f32 {
        let count = self.lane_count(day);
        if count == 0 {
            return 0.0;
        }
        count as f32 * geometry.chip_row_height + geometry.chip_gap
    }
}
