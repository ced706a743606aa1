//! Filter-driven chart updates: dropdown population, the orchestrator, the
//! renderers and the slot board they publish into.

pub mod dropdowns;
pub mod orchestrator;
pub mod renderers;
pub mod slots;

pub use dropdowns::{fetch_dimension_lists, DimensionLists};
pub use orchestrator::{plan, OrchestrationPass, Orchestrator, PassSummary};
pub use renderers::{initialize_fixed_charts, RendererKind, DEFAULT_FALLBACK_PRODUCT};
pub use slots::{BoardSnapshot, ChartSink, Generation, SlotBoard, SlotContent, SlotEntry, SlotId};

use crate::api::DataFetcher;
use crate::domain::FilterState;

/// Result of the startup sequence.
#[derive(Debug)]
pub struct Startup {
    pub lists: DimensionLists,
    pub first_pass: OrchestrationPass,
}

/// Populates the dropdowns, draws the fixed overview charts and then starts
/// the first pass with empty filters. Every step contains its own failures.
pub async fn initialize<F, S>(orchestrator: &Orchestrator<F, S>) -> Startup
where
    F: DataFetcher,
    S: ChartSink,
{
    let api = orchestrator.api();
    let lists = fetch_dimension_lists(api, orchestrator.fetcher()).await;
    initialize_fixed_charts(api, orchestrator.fetcher(), orchestrator.sink()).await;

    let first_pass = orchestrator.run(FilterState::default());
    Startup { lists, first_pass }
}
