use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::api::{ApiBase, DataFetcher};
use crate::dashboard::renderers::{self, RenderContext, RendererKind};
use crate::dashboard::slots::{ChartSink, Generation};
use crate::domain::{Dimension, FilterState};

/// Renderers to run for `filters`, in invocation order.
///
/// Year-driven charts run when a year is selected, country charts when both
/// country and product are, and the top-producers chart always.
pub fn plan(filters: &FilterState) -> Vec<RendererKind> {
    let mut kinds = Vec::with_capacity(RendererKind::ALL.len());

    if filters.has(Dimension::Year) {
        kinds.extend([RendererKind::Map, RendererKind::Decade, RendererKind::Yearly]);
    }
    if filters.has(Dimension::Country) && filters.has(Dimension::Product) {
        kinds.extend([
            RendererKind::Trend,
            RendererKind::Bar,
            RendererKind::Stats,
            RendererKind::Bubble,
            RendererKind::Scatter,
            RendererKind::Comparison,
        ]);
    }
    kinds.push(RendererKind::TopProducers);

    kinds
}

/// Turns filter snapshots into renderer tasks.
#[derive(Debug)]
pub struct Orchestrator<F, S> {
    fetcher: Arc<F>,
    sink: Arc<S>,
    api: ApiBase,
    fallback_product: String,
}

impl<F, S> Clone for Orchestrator<F, S> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            sink: Arc::clone(&self.sink),
            api: self.api.clone(),
            fallback_product: self.fallback_product.clone(),
        }
    }
}

impl<F, S> Orchestrator<F, S>
where
    F: DataFetcher,
    S: ChartSink,
{
    pub fn new(
        fetcher: Arc<F>,
        sink: Arc<S>,
        api: ApiBase,
        fallback_product: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            sink,
            api,
            fallback_product: fallback_product.into(),
        }
    }

    pub const fn api(&self) -> &ApiBase {
        &self.api
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Starts one pass for `filters` and returns without waiting for it.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn run(&self, filters: FilterState) -> OrchestrationPass {
        let generation = self.sink.begin_pass();
        let invoked = plan(&filters);

        tracing::info!(
            generation,
            country = %filters.country,
            year = %filters.year,
            product = %filters.product,
            renderers = invoked.len(),
            "starting update pass"
        );

        let ctx = Arc::new(RenderContext {
            filters,
            generation,
            api: self.api.clone(),
            fallback_product: self.fallback_product.clone(),
        });

        let handles = invoked
            .iter()
            .map(|&kind| {
                let ctx = Arc::clone(&ctx);
                let fetcher = Arc::clone(&self.fetcher);
                let sink = Arc::clone(&self.sink);
                tokio::spawn(async move {
                    renderers::run(kind, &ctx, fetcher.as_ref(), sink.as_ref()).await;
                })
            })
            .collect();

        OrchestrationPass {
            generation,
            invoked,
            handles,
        }
    }
}

/// Handle to a started pass. Dropping it leaves the renderers running.
#[derive(Debug)]
pub struct OrchestrationPass {
    pub generation: Generation,
    pub invoked: Vec<RendererKind>,
    handles: Vec<JoinHandle<()>>,
}

impl OrchestrationPass {
    pub fn is_finished(&self) -> bool {
        self.handles.iter().all(JoinHandle::is_finished)
    }

    /// Waits for every renderer of the pass.
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(error) = handle.await {
                tracing::error!(generation = self.generation, %error, "renderer task aborted");
            }
        }
    }

    pub fn summary(&self) -> PassSummary {
        PassSummary {
            generation: self.generation,
            invoked: self.invoked.clone(),
        }
    }
}

/// Serializable record of what a pass ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub generation: Generation,
    pub invoked: Vec<RendererKind>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::charts::ChartSpec;
    use crate::dashboard::renderers::test_support::{ScriptedFetcher, BASE};
    use crate::dashboard::slots::{SlotBoard, SlotContent, SlotId};

    fn orchestrator(
        fetcher: &Arc<ScriptedFetcher>,
        board: &Arc<SlotBoard>,
    ) -> Orchestrator<ScriptedFetcher, SlotBoard> {
        Orchestrator::new(
            Arc::clone(fetcher),
            Arc::clone(board),
            ApiBase::parse(BASE).unwrap(),
            "Maize_Production",
        )
    }

    /// Yields until `path` has been requested `count` times. Tests run on the
    /// current-thread runtime, so a recorded request means its task is parked.
    async fn wait_for_requests(fetcher: &ScriptedFetcher, path: &str, count: usize) {
        let url = format!("{BASE}{path}");
        for _ in 0..10_000 {
            if fetcher.requests().iter().filter(|r| **r == url).count() >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("{path} was never requested {count} times");
    }

    #[test]
    fn country_and_product_without_year() {
        let kinds = plan(&FilterState::new("X", "", "Y"));
        assert_eq!(
            kinds,
            [
                RendererKind::Trend,
                RendererKind::Bar,
                RendererKind::Stats,
                RendererKind::Bubble,
                RendererKind::Scatter,
                RendererKind::Comparison,
                RendererKind::TopProducers,
            ]
        );
    }

    #[test]
    fn year_only() {
        let kinds = plan(&FilterState::new("", "2020", ""));
        assert_eq!(
            kinds,
            [
                RendererKind::Map,
                RendererKind::Decade,
                RendererKind::Yearly,
                RendererKind::TopProducers,
            ]
        );
    }

    #[test]
    fn empty_filters_still_show_top_producers() {
        assert_eq!(plan(&FilterState::default()), [RendererKind::TopProducers]);
        // country alone is not enough for the country charts
        assert_eq!(
            plan(&FilterState::new("Kenya", "", "")),
            [RendererKind::TopProducers]
        );
        assert_eq!(plan(&FilterState::new("Kenya", "2020", "Rice")).len(), 10);
    }

    #[tokio::test]
    async fn year_pass_requests_only_year_endpoints() {
        let board = Arc::new(SlotBoard::new());
        let fetcher = Arc::new(ScriptedFetcher::new());

        let pass = orchestrator(&fetcher, &board).run(FilterState::new("", "2020", ""));
        assert_eq!(pass.generation, 1);
        pass.join().await;

        let mut requests = fetcher.requests();
        requests.sort();
        assert_eq!(
            requests,
            [
                format!("{BASE}/api/data/yearly"),
                format!("{BASE}/api/top_producers?crop_type=Maize_Production"),
            ]
        );
        // map and decade need a product and were cleared instead
        assert_eq!(board.content(SlotId::Map), SlotContent::Empty);
        assert_eq!(board.content(SlotId::Decade), SlotContent::Empty);
        assert!(board.content(SlotId::Yearly).is_error());
    }

    #[tokio::test]
    async fn superseded_pass_cannot_overwrite_newer_results() {
        let board = Arc::new(SlotBoard::new());
        let fetcher = Arc::new(
            ScriptedFetcher::new()
                .json(
                    "/api/trend/Kenya/Maize_Production",
                    json!([{"Year": 2000, "production": 1.0}]),
                )
                .json(
                    "/api/trend/Chad/Maize_Production",
                    json!([{"Year": 2000, "production": 2.0}]),
                ),
        );
        let slow = fetcher.gate("/api/trend/Kenya/Maize_Production");
        let orchestrator = orchestrator(&fetcher, &board);

        let first = orchestrator.run(FilterState::new("Kenya", "", "Maize_Production"));
        // trend and bar both wait on the Kenya response
        wait_for_requests(&fetcher, "/api/trend/Kenya/Maize_Production", 2).await;

        let second = orchestrator.run(FilterState::new("Chad", "", "Maize_Production"));
        second.join().await;

        slow.notify_waiters();
        first.join().await;

        let SlotContent::Chart(ChartSpec::Bar(bar)) = board.content(SlotId::Bar) else {
            panic!("expected bars");
        };
        assert_eq!(bar.title, "Maize Production Production in Chad");
        assert_eq!(board.entry(SlotId::Trend).map(|e| e.generation), Some(2));
        assert_eq!(board.in_flight(), 0);
    }

    #[tokio::test]
    async fn run_returns_before_renderers_finish() {
        let board = Arc::new(SlotBoard::new());
        let fetcher = Arc::new(ScriptedFetcher::new().json(
            "/api/top_producers?crop_type=Maize_Production",
            json!([]),
        ));
        let gate = fetcher.gate("/api/top_producers?crop_type=Maize_Production");

        let pass = orchestrator(&fetcher, &board).run(FilterState::default());
        assert_eq!(pass.summary().invoked, [RendererKind::TopProducers]);
        wait_for_requests(&fetcher, "/api/top_producers?crop_type=Maize_Production", 1).await;
        assert!(!pass.is_finished());
        assert_eq!(board.in_flight(), 1);

        gate.notify_waiters();
        pass.join().await;
        assert!(matches!(
            board.content(SlotId::TopProducers),
            SlotContent::Chart(_)
        ));
    }
}
