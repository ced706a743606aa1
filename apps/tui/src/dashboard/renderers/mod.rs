//! The chart renderers.
//!
//! Each renderer reads the fields it needs from the pass's [`FilterState`],
//! fetches one resource and turns it into slot content. [`run`] is the
//! boundary: whatever happens inside, the outcome lands in the renderer's own
//! slots and never escapes as an error.

mod comparison;
mod map;
mod producers;
mod summary;
mod trend;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::api::{ApiBase, DataFetcher, FetchError};
use crate::dashboard::slots::{ChartSink, Generation, SlotContent, SlotId};
use crate::domain::FilterState;

pub use summary::initialize_fixed_charts;

/// Product used for the top-producers chart when none is selected.
pub const DEFAULT_FALLBACK_PRODUCT: &str = "Maize_Production";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("{0}")]
    Shape(String),

    /// The API gave an `{error}` reason, in a 2xx body or with a rejection.
    #[error("{0}")]
    Api(String),

    #[error("radar chart canvas is not available")]
    MissingCanvas,
}

/// Everything a renderer may read during one pass.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub filters: FilterState,
    pub generation: Generation,
    pub api: ApiBase,
    pub fallback_product: String,
}

/// New content for one slot.
pub type SlotUpdate = (SlotId, SlotContent);

fn cleared(slots: &[SlotId]) -> Vec<SlotUpdate> {
    slots
        .iter()
        .map(|slot| (*slot, SlotContent::Empty))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererKind {
    Map,
    Decade,
    Yearly,
    Trend,
    Bar,
    Stats,
    Bubble,
    Scatter,
    Comparison,
    TopProducers,
}

impl RendererKind {
    pub const ALL: [Self; 10] = [
        Self::Map,
        Self::Decade,
        Self::Yearly,
        Self::Trend,
        Self::Bar,
        Self::Stats,
        Self::Bubble,
        Self::Scatter,
        Self::Comparison,
        Self::TopProducers,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::Decade => "decade",
            Self::Yearly => "yearly",
            Self::Trend => "trend",
            Self::Bar => "bar",
            Self::Stats => "stats",
            Self::Bubble => "bubble",
            Self::Scatter => "scatter",
            Self::Comparison => "comparison",
            Self::TopProducers => "top_producers",
        }
    }

    /// Slots this renderer owns.
    pub const fn slots(self) -> &'static [SlotId] {
        match self {
            Self::Map => &[SlotId::Map, SlotId::BubbleMap],
            Self::Decade => &[SlotId::Decade],
            Self::Yearly => &[SlotId::Yearly],
            Self::Trend => &[SlotId::Trend],
            Self::Bar => &[SlotId::Bar],
            Self::Stats => &[SlotId::Stats],
            Self::Bubble => &[SlotId::Bubble],
            Self::Scatter => &[SlotId::Scatter],
            Self::Comparison => &[SlotId::Radar, SlotId::Values],
            Self::TopProducers => &[SlotId::TopProducers],
        }
    }

    /// Slot content shown after a failure.
    fn failure(self, error: &RenderError) -> Vec<SlotUpdate> {
        let inline = |slot, message: String| (slot, SlotContent::Error(message));
        match self {
            Self::Map => vec![
                inline(SlotId::Map, "Failed to load map data".to_string()),
                (SlotId::BubbleMap, SlotContent::Empty),
            ],
            Self::Decade => vec![inline(
                SlotId::Decade,
                format!("Failed to load decade data: {error}"),
            )],
            Self::Yearly => vec![inline(
                SlotId::Yearly,
                format!("Failed to load yearly data: {error}"),
            )],
            Self::Trend => vec![inline(
                SlotId::Trend,
                format!("Failed to load trend data: {error}"),
            )],
            Self::Bar => vec![inline(
                SlotId::Bar,
                format!("Failed to load bar chart data: {error}"),
            )],
            Self::Stats => vec![inline(
                SlotId::Stats,
                format!("Failed to load statistics: {error}"),
            )],
            Self::Bubble => vec![inline(
                SlotId::Bubble,
                "Failed to load bubble chart data".to_string(),
            )],
            Self::Scatter => vec![inline(
                SlotId::Scatter,
                format!("Error loading multi-line data: {error}"),
            )],
            Self::Comparison => vec![
                inline(SlotId::Radar, format!("Error loading comparison: {error}")),
                (SlotId::Values, SlotContent::Empty),
            ],
            Self::TopProducers => vec![inline(
                SlotId::TopProducers,
                format!("Failed to load top producers data: {error}"),
            )],
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

async fn render<F, S>(
    kind: RendererKind,
    ctx: &RenderContext,
    fetcher: &F,
    sink: &S,
) -> Result<Vec<SlotUpdate>, RenderError>
where
    F: DataFetcher,
    S: ChartSink,
{
    match kind {
        RendererKind::Map => map::render_map(ctx, fetcher).await,
        RendererKind::Decade => summary::render_decade(ctx, fetcher).await,
        RendererKind::Yearly => summary::render_yearly(ctx, fetcher).await,
        RendererKind::Stats => summary::render_stats(ctx, fetcher).await,
        RendererKind::Trend => trend::render_trend(ctx, fetcher).await,
        RendererKind::Bar => trend::render_bar(ctx, fetcher).await,
        RendererKind::Scatter => trend::render_scatter(ctx, fetcher).await,
        RendererKind::Bubble => producers::render_bubble(ctx, fetcher).await,
        RendererKind::TopProducers => producers::render_top_producers(ctx, fetcher).await,
        RendererKind::Comparison => {
            comparison::render_comparison(ctx, fetcher, sink.has_radar_canvas()).await
        }
    }
}

/// Runs one renderer to completion and publishes its outcome.
///
/// Failures are logged and shown inline in the renderer's slots; nothing is
/// returned to the caller.
pub async fn run<F, S>(kind: RendererKind, ctx: &RenderContext, fetcher: &F, sink: &S)
where
    F: DataFetcher,
    S: ChartSink,
{
    sink.renderer_started();

    let updates = match render(kind, ctx, fetcher, sink).await {
        Ok(updates) => updates,
        Err(error) => {
            tracing::error!(renderer = %kind, generation = ctx.generation, %error, "render failed");
            kind.failure(&error)
        }
    };

    for (slot, content) in updates {
        sink.publish(slot, content, ctx.generation);
    }

    sink.renderer_finished();
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Scripted fetcher shared by the renderer and orchestrator tests.

    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use reqwest::{StatusCode, Url};
    use serde_json::Value;
    use tokio::sync::Notify;

    use crate::api::{ApiBase, DataFetcher, FetchError};
    use crate::dashboard::slots::{ChartSink, SlotBoard};
    use crate::domain::FilterState;

    use super::{RenderContext, DEFAULT_FALLBACK_PRODUCT};

    pub const BASE: &str = "http://api.test";

    #[derive(Clone)]
    enum Reply {
        Json(Value),
        Status(u16, String),
    }

    /// Answers from a URL → reply table and records every request.
    #[derive(Clone, Default)]
    pub struct ScriptedFetcher {
        replies: Arc<Mutex<HashMap<String, Reply>>>,
        gates: Arc<Mutex<HashMap<String, Arc<Notify>>>>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        /// `path` is relative to [`BASE`], including any query string.
        pub fn json(self, path: &str, body: Value) -> Self {
            self.replies
                .lock()
                .unwrap()
                .insert(format!("{BASE}{path}"), Reply::Json(body));
            self
        }

        pub fn status(self, path: &str, status: u16) -> Self {
            self.status_with_body(path, status, "")
        }

        /// Non-2xx reply that also carries a body, like the API's
        /// `{"error": ...}` answers.
        pub fn status_with_body(self, path: &str, status: u16, body: &str) -> Self {
            self.replies
                .lock()
                .unwrap()
                .insert(format!("{BASE}{path}"), Reply::Status(status, body.to_string()));
            self
        }

        /// Holds the reply for `path` until the returned gate is notified.
        pub fn gate(&self, path: &str) -> Arc<Notify> {
            let gate = Arc::new(Notify::new());
            self.gates
                .lock()
                .unwrap()
                .insert(format!("{BASE}{path}"), gate.clone());
            gate
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        pub fn requested(&self, path: &str) -> bool {
            let url = format!("{BASE}{path}");
            self.requests().iter().any(|request| *request == url)
        }
    }

    impl DataFetcher for ScriptedFetcher {
        async fn fetch_json(&self, url: &Url) -> Result<Value, FetchError> {
            let key = url.as_str().to_string();
            self.requests.lock().unwrap().push(key.clone());

            let gate = self.gates.lock().unwrap().get(&key).cloned();
            if let Some(gate) = gate {
                gate.notified().await;
            }

            let reply = self.replies.lock().unwrap().get(&key).cloned();
            match reply {
                Some(Reply::Json(body)) => Ok(body),
                Some(Reply::Status(code, body)) => Err(FetchError::Status {
                    status: StatusCode::from_u16(code).unwrap(),
                    url: url.clone(),
                    body,
                }),
                None => Err(FetchError::Status {
                    status: StatusCode::NOT_FOUND,
                    url: url.clone(),
                    body: String::new(),
                }),
            }
        }
    }

    pub fn context(filters: FilterState, board: &SlotBoard) -> RenderContext {
        RenderContext {
            filters,
            generation: board.begin_pass(),
            api: ApiBase::parse(BASE).unwrap(),
            fallback_product: DEFAULT_FALLBACK_PRODUCT.to_string(),
        }
    }
}
