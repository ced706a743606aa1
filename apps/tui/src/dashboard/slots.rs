use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::charts::{ChartSpec, ValuesTable};

/// Sequence number of an orchestration pass.
pub type Generation = u64;

/// A named placeholder owned by exactly one renderer. The serialized names
/// are the container identifiers the presentation shell lays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SlotId {
    #[serde(rename = "mapChart")]
    Map,
    #[serde(rename = "symbolMap")]
    BubbleMap,
    #[serde(rename = "trendChart")]
    Trend,
    #[serde(rename = "barChart")]
    Bar,
    #[serde(rename = "decadeChart")]
    Decade,
    #[serde(rename = "yearlyChart")]
    Yearly,
    #[serde(rename = "scatterChart")]
    Scatter,
    #[serde(rename = "statsChart")]
    Stats,
    #[serde(rename = "bubbleChart")]
    Bubble,
    #[serde(rename = "topProducersChart")]
    TopProducers,
    #[serde(rename = "radarChart")]
    Radar,
    #[serde(rename = "values-container")]
    Values,
}

impl SlotId {
    pub const ALL: [Self; 12] = [
        Self::Map,
        Self::BubbleMap,
        Self::Trend,
        Self::Bar,
        Self::Decade,
        Self::Yearly,
        Self::Scatter,
        Self::Stats,
        Self::Bubble,
        Self::TopProducers,
        Self::Radar,
        Self::Values,
    ];

    pub const fn container_id(self) -> &'static str {
        match self {
            Self::Map => "mapChart",
            Self::BubbleMap => "symbolMap",
            Self::Trend => "trendChart",
            Self::Bar => "barChart",
            Self::Decade => "decadeChart",
            Self::Yearly => "yearlyChart",
            Self::Scatter => "scatterChart",
            Self::Stats => "statsChart",
            Self::Bubble => "bubbleChart",
            Self::TopProducers => "topProducersChart",
            Self::Radar => "radarChart",
            Self::Values => "values-container",
        }
    }

    /// Heading shown above the slot while it has no chart of its own.
    pub const fn caption(self) -> &'static str {
        match self {
            Self::Map => "Global Production",
            Self::BubbleMap => "Production Intensity",
            Self::Trend => "Production Trend",
            Self::Bar => "Production by Year",
            Self::Decade => "Decadal Production",
            Self::Yearly => "Production by Product",
            Self::Scatter => "Production Trends",
            Self::Stats => "Statistics",
            Self::Bubble => "Total Crop Production by Country",
            Self::TopProducers => "Top Producers",
            Self::Radar => "Production Comparison",
            Self::Values => "Actual Production Values",
        }
    }
}

/// What a slot currently shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum SlotContent {
    /// Cleared, or never rendered.
    #[default]
    Empty,
    Chart(ChartSpec),
    Table(ValuesTable),
    /// Inline error message shown in place of the chart.
    Error(String),
}

impl SlotContent {
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotEntry {
    pub content: SlotContent,
    pub generation: Generation,
    pub updated_at: DateTime<Local>,
    /// Live radar chart instance, radar slot only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radar_instance: Option<u64>,
}

/// The rendering sink renderers publish into.
pub trait ChartSink: Send + Sync + 'static {
    /// Starts a new orchestration pass. Publishes tagged with any earlier
    /// generation are discarded from now on.
    fn begin_pass(&self) -> Generation;

    fn current_generation(&self) -> Generation;

    /// Replaces `slot` with `content` unless `generation` has been superseded.
    /// Returns whether the content was applied.
    fn publish(&self, slot: SlotId, content: SlotContent, generation: Generation) -> bool;

    /// Whether the radar canvas, which needs its chart instance destroyed
    /// before a new one is created, is attached.
    fn has_radar_canvas(&self) -> bool;

    fn renderer_started(&self) {}

    fn renderer_finished(&self) {}
}

#[derive(Debug, Default)]
struct BoardState {
    slots: BTreeMap<SlotId, SlotEntry>,
    next_radar_instance: u64,
}

/// In-memory [`ChartSink`] that keeps the latest content of every slot.
#[derive(Debug)]
pub struct SlotBoard {
    generation: AtomicU64,
    in_flight: AtomicUsize,
    radar_canvas: bool,
    state: Mutex<BoardState>,
}

impl Default for SlotBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotBoard {
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            radar_canvas: true,
            state: Mutex::new(BoardState::default()),
        }
    }

    /// A board whose radar canvas is missing; comparisons fail inline.
    pub fn without_radar_canvas() -> Self {
        Self {
            radar_canvas: false,
            ..Self::new()
        }
    }

    fn state(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn entry(&self, slot: SlotId) -> Option<SlotEntry> {
        self.state().slots.get(&slot).cloned()
    }

    pub fn content(&self, slot: SlotId) -> SlotContent {
        self.entry(slot).map(|entry| entry.content).unwrap_or_default()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            generation: self.current_generation(),
            slots: self.state().slots.clone(),
        }
    }
}

impl ChartSink for SlotBoard {
    fn begin_pass(&self) -> Generation {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn current_generation(&self) -> Generation {
        self.generation.load(Ordering::SeqCst)
    }

    fn publish(&self, slot: SlotId, content: SlotContent, generation: Generation) -> bool {
        let mut state = self.state();

        let current = self.current_generation();
        if generation < current {
            tracing::debug!(
                slot = slot.container_id(),
                generation,
                current,
                "discarding stale render"
            );
            return false;
        }

        let mut radar_instance = None;
        if slot == SlotId::Radar {
            if let Some(previous) = state
                .slots
                .get(&slot)
                .and_then(|entry| entry.radar_instance)
            {
                tracing::debug!(instance = previous, "destroying radar chart instance");
            }
            if matches!(content, SlotContent::Chart(ChartSpec::Radar(_))) {
                state.next_radar_instance += 1;
                radar_instance = Some(state.next_radar_instance);
            }
        }

        state.slots.insert(
            slot,
            SlotEntry {
                content,
                generation,
                updated_at: Local::now(),
                radar_instance,
            },
        );
        true
    }

    fn has_radar_canvas(&self) -> bool {
        self.radar_canvas
    }

    fn renderer_started(&self) {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
    }

    fn renderer_finished(&self) {
        // saturating: a finish without a start must not wrap
        let _ = self
            .in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                Some(count.saturating_sub(1))
            });
    }
}

/// Point-in-time copy of the board, serializable for headless output.
#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    pub generation: Generation,
    pub slots: BTreeMap<SlotId, SlotEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::RadarSpec;

    fn radar() -> SlotContent {
        SlotContent::Chart(ChartSpec::Radar(RadarSpec {
            title: "Compare".to_string(),
            labels: vec!["China".to_string()],
            datasets: vec![],
            max_production: 1.0,
        }))
    }

    #[test]
    fn stale_generations_are_discarded() {
        let board = SlotBoard::new();
        let first = board.begin_pass();
        let second = board.begin_pass();

        assert!(board.publish(SlotId::Bar, SlotContent::Error("new".into()), second));
        assert!(!board.publish(SlotId::Bar, SlotContent::Error("old".into()), first));
        assert_eq!(board.content(SlotId::Bar), SlotContent::Error("new".into()));
    }

    #[test]
    fn current_generation_may_overwrite_itself() {
        let board = SlotBoard::new();
        let pass = board.begin_pass();

        assert!(board.publish(SlotId::Stats, SlotContent::Error("a".into()), pass));
        assert!(board.publish(SlotId::Stats, SlotContent::Empty, pass));
        assert_eq!(board.content(SlotId::Stats), SlotContent::Empty);
    }

    #[test]
    fn radar_instances_are_replaced() {
        let board = SlotBoard::new();
        let pass = board.begin_pass();

        board.publish(SlotId::Radar, radar(), pass);
        let first = board.entry(SlotId::Radar).and_then(|e| e.radar_instance);
        board.publish(SlotId::Radar, radar(), pass);
        let second = board.entry(SlotId::Radar).and_then(|e| e.radar_instance);

        assert_eq!(first, Some(1));
        assert_eq!(second, Some(2));

        board.publish(SlotId::Radar, SlotContent::Error("gone".into()), pass);
        assert_eq!(board.entry(SlotId::Radar).and_then(|e| e.radar_instance), None);
    }

    #[test]
    fn in_flight_never_underflows() {
        let board = SlotBoard::new();
        board.renderer_finished();
        assert_eq!(board.in_flight(), 0);

        board.renderer_started();
        board.renderer_started();
        board.renderer_finished();
        assert_eq!(board.in_flight(), 1);
    }

    #[test]
    fn snapshot_serializes_container_ids() {
        let board = SlotBoard::new();
        let pass = board.begin_pass();
        board.publish(SlotId::Values, SlotContent::Empty, pass);

        let json = serde_json::to_value(board.snapshot()).unwrap();
        assert_eq!(json["generation"], 1);
        assert_eq!(json["slots"]["values-container"]["content"]["kind"], "empty");
    }
}
