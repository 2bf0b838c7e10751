// Busy block model
// Opaque occupied interval from the remote calendar's free-busy query

use chrono::{Duration, NaiveDateTime};

/// An occupied interval with no title. Always timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyBlock {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl BusyBlock {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, String> {
        if end <= start {
            return Err("Busy block end must be after start".to_string());
        }
        Ok(Self { start, end })
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// A free interval between busy blocks, as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}
