use std::sync::Arc;

use tokio::sync::oneshot;

use crate::api::{DataFetcher, HttpFetcher};
use crate::config::DashboardConfig;
use crate::dashboard::{
    initialize, BoardSnapshot, DimensionLists, OrchestrationPass, Orchestrator, PassSummary,
    SlotBoard,
};
use crate::domain::FilterState;

/// What the background startup task hands back to the UI.
#[derive(Debug)]
pub struct StartupOutcome {
    pub lists: DimensionLists,
    pub first_pass: PassSummary,
}

/// Network-facing side of the app: the orchestrator and the board it
/// publishes into.
pub struct DashboardActions<F = HttpFetcher> {
    orchestrator: Orchestrator<F, SlotBoard>,
    board: Arc<SlotBoard>,
}

impl DashboardActions<HttpFetcher> {
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(Arc::new(HttpFetcher::new()), config)
    }
}

impl<F> DashboardActions<F> {
    pub fn board(&self) -> &SlotBoard {
        &self.board
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.board.snapshot()
    }

    pub fn in_flight(&self) -> usize {
        self.board.in_flight()
    }
}

impl<F: DataFetcher> DashboardActions<F> {
    pub fn new(fetcher: Arc<F>, config: &DashboardConfig) -> Self {
        let board = Arc::new(SlotBoard::new());
        let orchestrator = Orchestrator::new(
            fetcher,
            Arc::clone(&board),
            config.api.clone(),
            config.fallback_product.clone(),
        );
        Self {
            orchestrator,
            board,
        }
    }

    /// Runs the startup sequence in the background. The receiver yields
    /// once dropdowns and fixed charts are done and the first pass started.
    pub fn spawn_startup(&self) -> oneshot::Receiver<StartupOutcome> {
        let (tx, rx) = oneshot::channel();
        let orchestrator = self.orchestrator.clone();
        tokio::spawn(async move {
            let startup = initialize(&orchestrator).await;
            let outcome = StartupOutcome {
                lists: startup.lists,
                first_pass: startup.first_pass.summary(),
            };
            if tx.send(outcome).is_err() {
                tracing::debug!("startup finished after the UI went away");
            }
        });
        rx
    }

    /// Startup awaited in place, for headless runs.
    pub async fn startup(&self) -> DimensionLists {
        let startup = initialize(&self.orchestrator).await;
        startup.first_pass.join().await;
        startup.lists
    }

    pub fn run_pass(&self, filters: FilterState) -> OrchestrationPass {
        self.orchestrator.run(filters)
    }
}
