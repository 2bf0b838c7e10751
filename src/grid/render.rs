//! Render orchestration.
//!
//! `render` is the single re-render entry point: it recomputes the whole
//! grid from the current state on every call. It is pure and idempotent, so
//! callers re-run it after each state mutation instead of patching the
//! previous frame.

use chrono::{NaiveDate, NaiveDateTime};

use super::lanes::AllDayLanes;
use super::placement::{place, GridGeometry};
use super::range::{Granularity, ViewRange};
use super::segment::day_segments;
use crate::models::busy::BusyBlock;
use crate::models::event::CalendarEvent;
use crate::models::suggestion::Suggestion;

/// Everything the renderer reads. Owned by the schedule service and mutated
/// only through its commands.
#[derive(Debug, Clone)]
pub struct ScheduleState {
    pub anchor: NaiveDate,
    pub granularity: Granularity,
    pub connected: bool,
    pub events: Vec<CalendarEvent>,
    pub busy: Vec<BusyBlock>,
    pub suggestions: Vec<Suggestion>,
}

impl ScheduleState {
    pub fn new(anchor: NaiveDate) -> Self {
        Self {
            anchor,
            granularity: Granularity::Week,
            connected: false,
            events: Vec::new(),
            busy: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// The window currently being displayed.
    pub fn view_range(&self) -> ViewRange {
        ViewRange::resolve(self.anchor, self.granularity)
    }

    /// Pending suggestions, the only ones that reach the grid.
    pub fn pending_suggestions(&self) -> impl Iterator<Item = &Suggestion> {
        self.suggestions.iter().filter(|s| s.is_pending())
    }
}

/// Which visual layer a timed block belongs to. Later layers paint on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BlockLayer {
    Busy,
    Event,
    Suggestion,
}

/// One timed block, positioned within its day column's hour area.
#[derive(Debug, Clone, PartialEq)]
pub struct GridBlock {
    pub layer: BlockLayer,
    pub top: f32,
    pub height: f32,
    pub label: String,
    /// Set on suggestion blocks so the surface can wire accept/decline.
    pub suggestion_id: Option<String>,
}

/// One stacked all-day entry in a day's header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllDayChip {
    pub lane: usize,
    pub title: String,
}

/// A rendered day column: all-day header plus timed blocks in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub chips: Vec<AllDayChip>,
    /// Vertical space reserved above the hour grid for the chip stack;
    /// timed blocks start below it.
    pub header_height: f32,
    pub blocks: Vec<GridBlock>,
}

/// The complete rendered grid for one view range.
#[derive(Debug, Clone, PartialEq)]
pub struct GridFrame {
    pub range: ViewRange,
    pub connected: bool,
    pub days: Vec<DayColumn>,
}

impl GridFrame {
    /// Placeholder frame shown while the remote calendar is not connected.
    fn disconnected(range: ViewRange) -> Self {
        Self {
            range,
            connected: false,
            days: Vec::new(),
        }
    }
}

/// Recompute the full grid from `state`.
///
/// Disconnected state short-circuits to an empty placeholder regardless of
/// any stale in-memory lists. Otherwise this runs two passes: all-day chips
/// are laid out first so each day knows its header reservation, then timed
/// blocks are placed busy-first, events, then pending suggestions.
pub fn render(state: &ScheduleState, geometry: &GridGeometry) -> GridFrame {
    let range = state.view_range();

    if !state.connected {
        log::debug!("render: calendar not connected, emitting placeholder frame");
        return GridFrame::disconnected(range);
    }

    // Pass 1: all-day chips.
    let mut lanes = AllDayLanes::new();
    for event in state.events.iter().filter(|e| e.all_day) {
        for segment in clipped_segments(event.start, event.end, &range) {
            lanes.allocate(segment.day, event.title.clone());
        }
    }

    // Pass 2: timed blocks per day, in paint order.
    let days = range
        .days()
        .map(|date| {
            let mut blocks = Vec::new();

            for block in &state.busy {
                push_blocks(
                    &mut blocks,
                    block.start,
                    block.end,
                    date,
                    &range,
                    geometry,
                    BlockLayer::Busy,
                    "Busy",
                    None,
                );
            }

            for event in state.events.iter().filter(|e| !e.all_day) {
                push_blocks(
                    &mut blocks,
                    event.start,
                    event.end,
                    date,
                    &range,
                    geometry,
                    BlockLayer::Event,
                    &event.title,
                    None,
                );
            }

            for suggestion in state.pending_suggestions() {
                let label = suggestion
                    .task_name
                    .as_deref()
                    .unwrap_or("Suggested")
                    .to_string();
                push_blocks(
                    &mut blocks,
                    suggestion.start,
                    suggestion.end,
                    date,
                    &range,
                    geometry,
                    BlockLayer::Suggestion,
                    &label,
                    Some(suggestion.id.clone()),
                );
            }

            DayColumn {
                date,
                chips: lanes
                    .chips(date)
                    .iter()
                    .enumerate()
                    .map(|(lane, title)| AllDayChip {
                        lane,
                        title: title.clone(),
                    })
                    .collect(),
                header_height: lanes.header_height(date, geometry),
                blocks,
            }
        })
        .collect();

    GridFrame {
        range,
        connected: true,
        days,
    }
}

fn clipped_segments(
    start: NaiveDateTime,
    end: NaiveDateTime,
    range: &ViewRange,
) -> Vec<super::segment::DaySegment> {
    day_segments(start, end)
        .into_iter()
        .filter(|seg| range.contains(seg.start))
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn push_blocks(
    blocks: &mut Vec<GridBlock>,
    start: NaiveDateTime,
    end: NaiveDateTime,
    date: NaiveDate,
    range: &ViewRange,
    geometry: &GridGeometry,
    layer: BlockLayer,
    label: &str,
    suggestion_id: Option<String>,
) {
    for segment in clipped_segments(start, end, range) {
        if segment.day != date {
            continue;
        }
        if let Some(placed) = place(&segment, geometry) {
            blocks.push(GridBlock {
                layer,
                top: placed.top,
                height: placed.height,
                label: label.to_string(),
                suggestion_id: suggestion_id.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::suggestion::SuggestionStatus;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn connected_state() -> ScheduleState {
        let mut state = ScheduleState::new(date(6));
        state.connected = true;
        state
    }

    fn suggestion(id: &str, status: SuggestionStatus) -> Suggestion {
        Suggestion {
            id: id.to_string(),
            task_id: "t-1".to_string(),
            start: date(6).and_hms_opt(12, 0, 0).unwrap(),
            end: date(6).and_hms_opt(12, 50, 0).unwrap(),
            status,
            task_name: None,
        }
    }

    fn day_column<'a>(frame: &'a GridFrame, d: NaiveDate) -> &'a DayColumn {
        frame.days.iter().find(|col| col.date == d).unwrap()
    }

    #[test]
    fn test_disconnected_short_circuits() {
        let mut state = connected_state();
        state.connected = false;
        state.events.push(
            CalendarEvent::timed(
                "Stale",
                date(6).and_hms_opt(9, 0, 0).unwrap(),
                date(6).and_hms_opt(10, 0, 0).unwrap(),
            )
            .unwrap(),
        );

        let frame = render(&state, &GridGeometry::default());
        assert!(!frame.connected);
        assert!(frame.days.is_empty());
    }

    #[test]
    fn test_week_frame_has_seven_columns() {
        let frame = render(&connected_state(), &GridGeometry::default());
        assert!(frame.connected);
        assert_eq!(frame.days.len(), 7);
        assert_eq!(frame.days[0].date, date(3));
        assert_eq!(frame.days[6].date, date(9));
    }

    #[test]
    fn test_paint_order_busy_event_suggestion() {
        let mut state = connected_state();
        state.busy.push(
            BusyBlock::new(
                date(6).and_hms_opt(12, 0, 0).unwrap(),
                date(6).and_hms_opt(13, 0, 0).unwrap(),
            )
            .unwrap(),
        );
        state.events.push(
            CalendarEvent::timed(
                "Overlapping",
                date(6).and_hms_opt(12, 0, 0).unwrap(),
                date(6).and_hms_opt(13, 0, 0).unwrap(),
            )
            .unwrap(),
        );
        state.suggestions.push(suggestion("s-1", SuggestionStatus::Pending));

        let frame = render(&state, &GridGeometry::default());
        let layers: Vec<BlockLayer> = day_column(&frame, date(6))
            .blocks
            .iter()
            .map(|b| b.layer)
            .collect();
        assert_eq!(
            layers,
            vec![BlockLayer::Busy, BlockLayer::Event, BlockLayer::Suggestion]
        );
    }

    #[test]
    fn test_non_pending_suggestions_never_render() {
        let mut state = connected_state();
        state.suggestions.push(suggestion("s-1", SuggestionStatus::Scheduled));
        state.suggestions.push(suggestion("s-2", SuggestionStatus::Cancelled));
        state.suggestions.push(suggestion("s-3", SuggestionStatus::Completed));

        let frame = render(&state, &GridGeometry::default());
        assert!(frame.days.iter().all(|col| col.blocks.is_empty()));
    }

    #[test]
    fn test_suggestion_block_carries_id() {
        let mut state = connected_state();
        state.suggestions.push(suggestion("s-9", SuggestionStatus::Pending));

        let frame = render(&state, &GridGeometry::default());
        let blocks = &day_column(&frame, date(6)).blocks;
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].suggestion_id.as_deref(), Some("s-9"));
        assert_eq!(blocks[0].layer, BlockLayer::Suggestion);
    }

    #[test]
    fn test_multi_day_event_spans_columns() {
        let mut state = connected_state();
        state.events.push(
            CalendarEvent::timed(
                "Offsite",
                date(5).and_hms_opt(22, 0, 0).unwrap(),
                date(7).and_hms_opt(8, 0, 0).unwrap(),
            )
            .unwrap(),
        );

        let frame = render(&state, &GridGeometry::default());
        assert_eq!(day_column(&frame, date(5)).blocks.len(), 1);
        assert_eq!(day_column(&frame, date(6)).blocks.len(), 1);
        assert_eq!(day_column(&frame, date(7)).blocks.len(), 1);
        assert!(day_column(&frame, date(8)).blocks.is_empty());
    }

    #[test]
    fn test_all_day_events_become_chips_not_blocks() {
        let mut state = connected_state();
        state.events.push(CalendarEvent::all_day("Conference", date(6), date(6)));
        state.events.push(CalendarEvent::all_day("Holiday", date(6), date(6)));

        let geometry = GridGeometry::default();
        let frame = render(&state, &geometry);
        let col = day_column(&frame, date(6));

        assert!(col.blocks.is_empty());
        assert_eq!(col.chips.len(), 2);
        assert_eq!(col.chips[0].lane, 0);
        assert_eq!(col.chips[1].lane, 1);
        assert_eq!(
            col.header_height,
            2.0 * geometry.chip_row_height + geometry.chip_gap
        );

        // Untouched days reserve no header.
        assert_eq!(day_column(&frame, date(7)).header_height, 0.0);
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut state = connected_state();
        state.events.push(
            CalendarEvent::timed(
                "Meeting",
                date(6).and_hms_opt(9, 0, 0).unwrap(),
                date(6).and_hms_opt(10, 0, 0).unwrap(),
            )
            .unwrap(),
        );
        state.events.push(CalendarEvent::all_day("Conference", date(6), date(8)));

        let geometry = GridGeometry::default();
        assert_eq!(render(&state, &geometry), render(&state, &geometry));
    }

    #[test]
    fn test_events_outside_range_are_ignored() {
        let mut state = connected_state();
        state.events.push(
            CalendarEvent::timed(
                "Next week",
                date(12).and_hms_opt(9, 0, 0).unwrap(),
                date(12).and_hms_opt(10, 0, 0).unwrap(),
            )
            .unwrap(),
        );

        let frame = render(&state, &GridGeometry::default());
        assert!(frame.days.iter().all(|col| col.blocks.is_empty()));
    }
}
