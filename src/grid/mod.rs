//! Headless weekly grid engine.
//!
//! Pure functions that turn the in-memory schedule state into pixel
//! geometry: range resolution, per-day segmentation, vertical placement,
//! all-day lane stacking, and the render orchestrator that ties them
//! together. Nothing in here touches the network or any drawing surface.

pub mod lanes;
pub mod placement;
pub mod range;
pub mod render;
pub mod segment;

pub use placement::{GridGeometry, PlacedBlock};
pub use range::{Granularity, ViewRange};
pub use render::{render, AllDayChip, BlockLayer, DayColumn, GridBlock, GridFrame, ScheduleState};
pub use segment::DaySegment;
