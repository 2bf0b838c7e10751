//! Time-bounded cache of fetched data windows.
//!
//! Calendar data changes slowly compared to how fast a user can flip
//! between weeks, so each fetched window is kept for a TTL and reused on
//! repeat navigation. Keying is exact: two ranges share an entry only when
//! their `(start, end)` pair is identical, so a partially overlapping
//! window always misses.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::grid::ViewRange;
use crate::services::remote::WeekData;

#[derive(Debug, Clone)]
struct CacheEntry {
    data: WeekData,
    fetched_at: Instant,
}

#[derive(Debug)]
pub struct ScheduleCache {
    entries: HashMap<ViewRange, CacheEntry>,
    ttl: Duration,
}

/// Default time-to-live: ten minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

impl ScheduleCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Look up `range`. Expired entries are evicted by the lookup itself.
    pub fn get(&mut self, range: &ViewRange) -> Option<WeekData> {
        self.get_at(range, Instant::now())
    }

    pub(crate) fn get_at(&mut self, range: &ViewRange, now: Instant) -> Option<WeekData> {
        match self.entries.get(range) {
            Some(entry) if now.duration_since(entry.fetched_at) <= self.ttl => {
                Some(entry.data.clone())
            }
            Some(_) => {
                log::debug!("cache entry for {range:?} expired, evicting");
                self.entries.remove(range);
                None
            }
            None => None,
        }
    }

    /// Store `data` under `range`, stamping the fetch time. Unconditional
    /// overwrite.
    pub fn put(&mut self, range: ViewRange, data: WeekData) {
        self.put_at(range, data, Instant::now());
    }

    pub(crate) fn put_at(&mut self, range: ViewRange, data: WeekData, now: Instant) {
        self.entries.insert(
            range,
            CacheEntry {
                data,
                fetched_at: now,
            },
        );
    }

    /// Drop everything. Called when the calendar connection is lost, since
    /// previously fetched data may now be wrong or unauthorized.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            log::info!("clearing {} cached window(s)", self.entries.len());
        }
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ScheduleCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
